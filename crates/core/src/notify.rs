use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Banners auto-dismiss this long after they are pushed.
pub const AUTO_DISMISS_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Transient user-facing banners. Notifications stack independently with no
/// dedup; each one can be dismissed by id or ages out on its own.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.active.push(Notification {
            id,
            kind,
            message: message.into(),
            created_at: now,
        });
        id
    }

    /// Removes the notification with the given id; false if it was already
    /// gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Drops aged-out notifications, then returns what is still showing.
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Notification] {
        let cutoff = now - Duration::seconds(AUTO_DISMISS_SECS);
        self.active.retain(|n| n.created_at > cutoff);
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, secs).unwrap()
    }

    #[test]
    fn identical_messages_stack_without_dedup() {
        let mut center = NotificationCenter::new();
        center.push(NotificationKind::Error, "Please fill in all fields", at(0));
        center.push(NotificationKind::Error, "Please fill in all fields", at(1));
        assert_eq!(center.active(at(1)).len(), 2);
    }

    #[test]
    fn dismiss_removes_only_the_given_id() {
        let mut center = NotificationCenter::new();
        let first = center.push(NotificationKind::Success, "done", at(0));
        center.push(NotificationKind::Error, "boom", at(0));

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));

        let remaining = center.active(at(0));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, NotificationKind::Error);
    }

    #[test]
    fn notifications_age_out_after_five_seconds() {
        let mut center = NotificationCenter::new();
        center.push(NotificationKind::Success, "done", at(0));

        assert_eq!(center.active(at(4)).len(), 1);
        assert!(center.active(at(6)).is_empty());
    }
}
