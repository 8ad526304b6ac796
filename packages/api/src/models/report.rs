//! Report rows and the shared report filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ticket::{TicketPriority, TicketStatus};

/// One ticket line of the master report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterReportRow {
    #[serde(default)]
    pub ticket_no: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

/// Per-server aggregate counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerReportRow {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub resolved: u64,
    #[serde(default)]
    pub closed: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub staff_id: Option<i64>,
    pub page: u32,
    pub size: u32,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            staff_id: None,
            page: 0,
            size: 10,
        }
    }
}

impl ReportQuery {
    /// `Err` carries the message shown under the date inputs.
    pub fn validate(&self) -> Result<(), String> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                Err("Start date must not be after end date".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Date range only, for the aggregate endpoint.
    pub fn range_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.range_pairs();
        if let Some(staff_id) = self.staff_id {
            pairs.push(("staffId", staff_id.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let query = ReportQuery {
            from: Some(date("2024-03-10")),
            to: Some(date("2024-03-01")),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let same_day = ReportQuery {
            from: Some(date("2024-03-01")),
            to: Some(date("2024-03-01")),
            ..Default::default()
        };
        assert!(same_day.validate().is_ok());
    }

    #[test]
    fn test_pairs_format_dates_and_staff() {
        let query = ReportQuery {
            from: Some(date("2024-01-05")),
            to: None,
            staff_id: Some(12),
            page: 1,
            size: 25,
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("from", "2024-01-05".to_string()),
                ("staffId", "12".to_string()),
                ("page", "1".to_string()),
                ("size", "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_master_row_with_null_status_decodes() {
        let row: MasterReportRow =
            serde_json::from_str(r#"{"ticketNo":"T-9","status":null,"priority":null}"#).unwrap();
        assert_eq!(row.status.label(), "N/A");
        assert_eq!(row.priority.label(), "N/A");
        assert_eq!(row.ticket_no.as_deref(), Some("T-9"));
    }
}
