//! # Ticket models
//!
//! The backend owns tickets; the console only reads the fields it renders and
//! sends back status, priority, remark and assignment changes.
//!
//! Status and priority arrive in whatever casing the backend happens to use
//! (`"IN_PROGRESS"`, `"In Progress"`, `"in-progress"`), so both enums parse
//! leniently and keep unrecognised values in an `Other` variant instead of
//! failing the whole page.

use std::fmt;

use serde::{Deserialize, Serialize};

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lifecycle state of a ticket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    Other(String),
}

impl TicketStatus {
    /// Statuses offered in filters and the status modal.
    pub const SELECTABLE: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn parse(value: &str) -> Self {
        match normalize(value).as_str() {
            "open" => Self::Open,
            "inprogress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            _ => Self::Other(value.trim().to_string()),
        }
    }

    /// Resolved and closed tickets are frozen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    pub fn wire_value(&self) -> &str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
            Self::Other(v) => v,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Other(v) if v.is_empty() => "N/A",
            Self::Other(v) => v,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Open => "badge badge-open",
            Self::InProgress => "badge badge-progress",
            Self::Resolved => "badge badge-resolved",
            Self::Closed => "badge badge-closed",
            Self::Other(_) => "badge badge-muted",
        }
    }
}

impl From<String> for TicketStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// `null` on the wire becomes an empty `Other`, shown as "N/A".
impl From<Option<String>> for TicketStatus {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_else(|| Self::Other(String::new()))
    }
}

impl From<TicketStatus> for String {
    fn from(value: TicketStatus) -> Self {
        value.wire_value().to_string()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TicketPriority {
    #[default]
    Normal,
    High,
    Urgent,
    Low,
    Other(String),
}

impl TicketPriority {
    pub const SELECTABLE: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Normal,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn parse(value: &str) -> Self {
        match normalize(value).as_str() {
            "normal" | "medium" => Self::Normal,
            "high" => Self::High,
            "urgent" | "critical" => Self::Urgent,
            "low" => Self::Low,
            _ => Self::Other(value.trim().to_string()),
        }
    }

    pub fn wire_value(&self) -> &str {
        match self {
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
            Self::Low => "LOW",
            Self::Other(v) => v,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Urgent => "Urgent",
            Self::Low => "Low",
            Self::Other(v) if v.is_empty() => "N/A",
            Self::Other(v) => v,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Urgent => "badge badge-urgent",
            Self::High => "badge badge-high",
            Self::Normal => "badge badge-normal",
            Self::Low => "badge badge-low",
            Self::Other(_) => "badge badge-muted",
        }
    }
}

impl From<String> for TicketPriority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// `null` on the wire becomes an empty `Other`, shown as "N/A".
impl From<Option<String>> for TicketPriority {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_else(|| Self::Other(String::new()))
    }
}

impl From<TicketPriority> for String {
    fn from(value: TicketPriority) -> Self {
        value.wire_value().to_string()
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Staff member as embedded in a ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRef {
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub ticket_no: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub complainant_name: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub assigned_staff: Vec<StaffRef>,
}

impl Ticket {
    /// Ticket number for display, falling back to the numeric id.
    pub fn display_no(&self) -> String {
        match self.ticket_no.as_deref() {
            Some(no) if !no.is_empty() => no.to_string(),
            _ => format!("#{}", self.id),
        }
    }

    pub fn assignee_names(&self) -> String {
        if self.assigned_staff.is_empty() {
            return "Unassigned".to_string();
        }
        self.assigned_staff
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Query parameters for the ticket list endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketQuery {
    pub page: u32,
    pub size: u32,
    pub search: String,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

impl Default for TicketQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            search: String::new(),
            status: None,
            priority: None,
        }
    }
}

impl TicketQuery {
    /// Query pairs with empty values omitted.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("searchTerm", search.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.wire_value().to_string()));
        }
        if let Some(priority) = &self.priority {
            pairs.push(("priority", priority.wire_value().to_string()));
        }
        pairs
    }
}

/// Body of `POST /api/tickets/assign`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub staff_ids: Vec<i64>,
    pub ticket_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;

    #[test]
    fn test_status_parses_any_casing() {
        for raw in ["IN_PROGRESS", "In Progress", "in-progress", "inprogress"] {
            assert_eq!(TicketStatus::parse(raw), TicketStatus::InProgress);
        }
        assert_eq!(TicketStatus::parse("CLOSED"), TicketStatus::Closed);
        assert_eq!(
            TicketStatus::parse(" Escalated "),
            TicketStatus::Other("Escalated".to_string())
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TicketStatus::Resolved.is_terminal());
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Open.is_terminal());
        assert!(!TicketStatus::InProgress.is_terminal());
        assert!(!TicketStatus::Other("Escalated".into()).is_terminal());
    }

    #[test]
    fn test_ticket_decodes_with_missing_optionals() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"id": 7, "status": "Resolved", "priority": "urgent", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::Resolved);
        assert_eq!(ticket.priority, TicketPriority::Urgent);
        assert!(ticket.subject.is_none());
        assert_eq!(ticket.display_no(), "#7");
        assert_eq!(ticket.assignee_names(), "Unassigned");
    }

    #[test]
    fn test_null_status_and_priority_render_as_na() {
        let page: Page<Ticket> = serde_json::from_str(
            r#"{"data":[{"id":1,"status":null,"priority":null,"subject":"x","assignedStaff":null},
                        {"id":2,"status":"OPEN","priority":"HIGH","assignedStaff":[{"id":4,"name":null}]}],
                "totalElements":2,"totalPages":1}"#,
        )
        .unwrap();
        let first = &page.data[0];
        assert_eq!(first.status, TicketStatus::Other(String::new()));
        assert_eq!(first.priority, TicketPriority::Other(String::new()));
        assert_eq!(first.status.label(), "N/A");
        assert_eq!(first.priority.label(), "N/A");
        assert!(!first.status.is_terminal());
        assert_eq!(first.assignee_names(), "Unassigned");

        let second = &page.data[1];
        assert_eq!(second.status, TicketStatus::Open);
        assert_eq!(second.assigned_staff[0].name, "");
    }

    #[test]
    fn test_status_serializes_to_wire_value() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_query_omits_empty_values() {
        let query = TicketQuery {
            page: 2,
            size: 25,
            search: "  ".to_string(),
            status: Some(TicketStatus::Open),
            priority: None,
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("page", "2".to_string()),
                ("size", "25".to_string()),
                ("status", "OPEN".to_string()),
            ]
        );
    }

    #[test]
    fn test_assignment_body_is_camel_case() {
        let body = AssignmentRequest {
            staff_ids: vec![1, 2],
            ticket_ids: vec![9],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"staffIds": [1, 2], "ticketIds": [9]})
        );
    }
}
