//! Wire models shared by the gateway client and the UI.

mod auth;
mod dashboard;
mod directory;
mod page;
mod report;
mod ticket;

pub use auth::{LoginRequest, LoginResponse};
pub use dashboard::{CountsPatch, DashboardCounts, Notification, NotificationSummary, COUNTER_COUNT};
pub use directory::{FieldErrors, ListQuery, Server, ServerForm, StaffForm, SupportStaff};
pub use page::Page;
pub use report::{MasterReportRow, ReportQuery, ServerReportRow};
pub use ticket::{AssignmentRequest, StaffRef, Ticket, TicketPriority, TicketQuery, TicketStatus};

use serde::{Deserialize, Deserializer};

/// `#[serde(deserialize_with)]` helper: an explicit `null` decodes like a
/// missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
