//! Rules shared by every ticket table: which mutations a ticket still
//! accepts, and how a staff assignment is merged.

use helpdesk_api::models::{StaffRef, Ticket};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketAction {
    Status,
    Priority,
    Remark,
    Assign,
}

impl TicketAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "Update status",
            Self::Priority => "Change priority",
            Self::Remark => "Add remark",
            Self::Assign => "Assign staff",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Remark => "remarks",
            Self::Assign => "assignment",
        }
    }
}

/// Resolved and closed tickets reject every mutation. `Err` is the notice
/// to show; no request may be sent.
pub fn guard_mutation(ticket: &Ticket, action: TicketAction) -> Result<(), String> {
    if ticket.status.is_terminal() {
        return Err(format!(
            "Ticket {} is {} and its {} can no longer be changed.",
            ticket.display_no(),
            ticket.status.label().to_lowercase(),
            action.noun()
        ));
    }
    Ok(())
}

/// Staff selection in the assignment modal.
///
/// The result lists the previously assigned staff first, in their original
/// order, then newly selected staff in the order they were ticked. Unticking
/// a previous assignee removes them; ticking twice is a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentDraft {
    previous: Vec<i64>,
    removed: Vec<i64>,
    added: Vec<i64>,
}

impl AssignmentDraft {
    pub fn new(previous: &[StaffRef]) -> Self {
        let mut ids: Vec<i64> = Vec::with_capacity(previous.len());
        for staff in previous {
            if !ids.contains(&staff.id) {
                ids.push(staff.id);
            }
        }
        Self {
            previous: ids,
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    pub fn is_selected(&self, id: i64) -> bool {
        (self.previous.contains(&id) && !self.removed.contains(&id)) || self.added.contains(&id)
    }

    pub fn toggle(&mut self, id: i64) {
        if self.previous.contains(&id) {
            if let Some(pos) = self.removed.iter().position(|r| *r == id) {
                self.removed.remove(pos);
            } else {
                self.removed.push(id);
            }
        } else if let Some(pos) = self.added.iter().position(|a| *a == id) {
            self.added.remove(pos);
        } else {
            self.added.push(id);
        }
    }

    pub fn merged(&self) -> Vec<i64> {
        self.previous
            .iter()
            .filter(|id| !self.removed.contains(id))
            .chain(self.added.iter())
            .copied()
            .collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Rows whose server name contains `filter`, case-insensitively. An empty
/// filter keeps every row.
pub fn filter_by_server(tickets: &[Ticket], filter: &str) -> Vec<Ticket> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return tickets.to_vec();
    }
    tickets
        .iter()
        .filter(|t| {
            t.server_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_api::models::TicketStatus;

    fn ticket(status: &str, server: Option<&str>) -> Ticket {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "ticketNo": "TCK-1",
            "status": status,
            "serverName": server,
        }))
        .unwrap()
    }

    fn staff(id: i64) -> StaffRef {
        StaffRef {
            id,
            name: format!("S{id}"),
        }
    }

    #[test]
    fn test_terminal_tickets_reject_every_action() {
        for status in ["RESOLVED", "Closed"] {
            let t = ticket(status, None);
            for action in [
                TicketAction::Status,
                TicketAction::Priority,
                TicketAction::Remark,
                TicketAction::Assign,
            ] {
                let notice = guard_mutation(&t, action).unwrap_err();
                assert!(notice.contains("TCK-1"));
            }
        }
        assert!(guard_mutation(&ticket("OPEN", None), TicketAction::Assign).is_ok());
        assert_eq!(ticket("in progress", None).status, TicketStatus::InProgress);
    }

    #[test]
    fn test_merge_keeps_previous_order_then_toggle_order() {
        let mut draft = AssignmentDraft::new(&[staff(5), staff(2)]);
        draft.toggle(9);
        draft.toggle(1);
        draft.toggle(9);
        draft.toggle(9);
        assert_eq!(draft.merged(), vec![5, 2, 1, 9]);
    }

    #[test]
    fn test_untoggled_previous_is_dropped_and_duplicates_removed() {
        let mut draft = AssignmentDraft::new(&[staff(5), staff(2), staff(5)]);
        draft.toggle(5);
        assert!(!draft.is_selected(5));
        assert_eq!(draft.merged(), vec![2]);
        draft.toggle(5);
        assert_eq!(draft.merged(), vec![5, 2]);
        assert!(draft.is_unchanged());
    }

    #[test]
    fn test_server_filter_is_case_insensitive() {
        let rows = vec![
            ticket("OPEN", Some("Alpha Retail")),
            ticket("OPEN", Some("Beta")),
            ticket("OPEN", None),
        ];
        assert_eq!(filter_by_server(&rows, "alpha").len(), 1);
        assert_eq!(filter_by_server(&rows, "  ").len(), 3);
        assert!(filter_by_server(&rows, "gamma").is_empty());
    }
}
