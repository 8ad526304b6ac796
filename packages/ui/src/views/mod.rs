mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod confirm_dialog;
pub use confirm_dialog::ConfirmDialog;

mod ticket_modal;
pub use ticket_modal::TicketActionModal;

mod ticket_table;
pub use ticket_table::{TicketPanel, TicketTable};
