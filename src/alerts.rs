use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Success,
    Error,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Success => "success",
            AlertStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub status: AlertStatus,
    pub text: String,
}

impl Alert {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: AlertStatus::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            status: AlertStatus::Error,
            text: text.into(),
        }
    }
}

/// Receiver of user-visible notifications, shared by every form.
pub trait AlertSink: Send + Sync {
    fn add_alert(&self, alert: Alert);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedAlert {
    pub id: u64,
    pub alert: Alert,
}

/// In-process alert queue. Display and dismissal belong to whoever drains it.
#[derive(Debug, Default)]
pub struct AlertQueue {
    inner: Mutex<QueueInner>,
}

#[derive(Debug, Default)]
struct QueueInner {
    next_id: u64,
    alerts: VecDeque<QueuedAlert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the queued alerts, oldest first.
    pub fn snapshot(&self) -> Vec<QueuedAlert> {
        self.lock().alerts.iter().cloned().collect()
    }

    /// Remove one alert by id. Returns whether it was still queued.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.alerts.len();
        inner.alerts.retain(|queued| queued.id != id);
        inner.alerts.len() != before
    }

    pub fn drain(&self) -> Vec<QueuedAlert> {
        self.lock().alerts.drain(..).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AlertSink for AlertQueue {
    fn add_alert(&self, alert: Alert) {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        tracing::debug!(id, status = ?alert.status, text = %alert.text, "alert queued");
        inner.alerts.push_back(QueuedAlert { id, alert });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_assigns_increasing_ids_and_dismisses() {
        let queue = AlertQueue::new();
        queue.add_alert(Alert::success("ok"));
        queue.add_alert(Alert::error("fail"));
        let alerts = queue.snapshot();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id, 0);
        assert_eq!(alerts[1].id, 1);

        assert!(queue.dismiss(0));
        assert!(!queue.dismiss(0));
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained[0].alert, Alert::error("fail"));
        assert!(queue.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(Alert::success("Material criado com sucesso!")).unwrap();
        assert_eq!(json["status"], "success");
    }
}
