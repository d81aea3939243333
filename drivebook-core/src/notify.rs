use drivebook_shared::{Notice, NoticeKind, Severity};
use tokio::sync::broadcast;

/// Fan-out for user-visible notices.
///
/// Sending never fails from the caller's point of view: a notice with no
/// subscribers is logged and dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn notify(&self, notice: Notice) -> Notice {
        match notice.severity {
            Severity::Error => tracing::warn!(kind = ?notice.kind, "{}", notice.title),
            _ => tracing::info!(kind = ?notice.kind, "{}", notice.title),
        }
        let _ = self.tx.send(notice.clone());
        notice
    }

    pub fn notify_kind(&self, kind: NoticeKind) -> Notice {
        self.notify(Notice::new(kind))
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.notify_kind(NoticeKind::LessonSelected);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NoticeKind::LessonSelected);
        assert_eq!(received.title, "Lesson selected");
    }

    #[test]
    fn test_notify_without_subscribers_is_fine() {
        let notifier = Notifier::new(0);
        let notice = notifier.notify_kind(NoticeKind::ContactReceived);
        assert_eq!(notice.kind, NoticeKind::ContactReceived);
    }
}
