use crate::control::CourseId;
use crate::errors::{ErrorKind, ToggleError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: u64,
    pub course_id: CourseId,
    pub kind: ErrorKind,
    pub message: &'static str,
    pub raised_at: DateTime<Local>,
}

/// Non-blocking replacement for a modal alert. Notices stay until dismissed.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    next_id: Arc<AtomicU64>,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raise(&self, course_id: &CourseId, err: &ToggleError) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let notice = Notice {
            id,
            course_id: course_id.clone(),
            kind: err.kind(),
            message: err.notice_message(),
            raised_at: Local::now(),
        };
        self.notices.lock().await.push(notice);
        id
    }

    pub async fn pending(&self) -> Vec<Notice> {
        self.notices.lock().await.clone()
    }

    pub async fn dismiss(&self, id: u64) -> bool {
        let mut notices = self.notices.lock().await;
        let before = notices.len();
        notices.retain(|notice| notice.id != id);
        notices.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Action;

    #[tokio::test]
    async fn raise_then_dismiss() {
        let board = NoticeBoard::new();
        let course = CourseId::new("CS101").unwrap();
        let err = ToggleError::RemoteRejected {
            action: Action::Enroll,
            status: 403,
        };

        let first = board.raise(&course, &err).await;
        let second = board.raise(&course, &err).await;
        assert_ne!(first, second);

        let pending = board.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].message, "Failed to enroll in course. Please try again.");
        assert_eq!(pending[0].kind, ErrorKind::RemoteRejected);

        assert!(board.dismiss(first).await);
        assert!(!board.dismiss(first).await);
        assert_eq!(board.pending().await.len(), 1);
    }
}
