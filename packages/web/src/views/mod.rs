mod login;
pub use login::{AdminLogin, StaffLogin};

mod layout;
pub use layout::{AdminLayout, StaffLayout};

mod dashboard;
pub use dashboard::Dashboard;

mod tickets;
pub use tickets::Tickets;

mod my_tickets;
pub use my_tickets::MyTickets;

mod servers;
pub use servers::Servers;

mod staff;
pub use staff::StaffMembers;

mod reports;
pub use reports::Reports;

mod lookups;
pub use lookups::Lookups;

mod not_found;
pub use not_found::NotFound;

mod form_field;
pub(crate) use form_field::FormField;
