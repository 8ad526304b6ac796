use dioxus::prelude::*;

use crate::timer::clock_time;

/// Number of toasts kept on screen; older ones scroll off.
pub const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub timestamp: String,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ToastLog {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl ToastLog {
    pub fn push(&mut self, level: ToastLevel, message: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            timestamp: clock_time(),
            level,
            message: message.to_string(),
        });
        if self.entries.len() > MAX_VISIBLE {
            let overflow = self.entries.len() - MAX_VISIBLE;
            self.entries.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|t| t.id != id);
    }
}

pub fn use_toasts() -> Signal<ToastLog> {
    use_context::<Signal<ToastLog>>()
}

pub fn push_toast(log: &mut Signal<ToastLog>, level: ToastLevel, message: &str) {
    match level {
        ToastLevel::Error => tracing::error!("{message}"),
        ToastLevel::Warning => tracing::warn!("{message}"),
        _ => tracing::info!("{message}"),
    }
    log.write().push(level, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_latest_entries() {
        let mut log = ToastLog::default();
        for i in 0..7 {
            log.push(ToastLevel::Info, &format!("message {i}"));
        }
        assert_eq!(log.entries.len(), MAX_VISIBLE);
        assert_eq!(log.entries[0].message, "message 2");
        assert_eq!(log.entries[4].id, 6);
    }

    #[test]
    fn test_dismiss_removes_only_that_toast() {
        let mut log = ToastLog::default();
        let a = log.push(ToastLevel::Success, "Saved");
        let b = log.push(ToastLevel::Error, "Failed");
        log.dismiss(a);
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].id, b);
    }
}
