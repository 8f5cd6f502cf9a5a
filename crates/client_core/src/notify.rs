use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub confirmed: bool,
}

impl Confirmation {
    pub fn confirmed() -> Self {
        Self { confirmed: true }
    }

    pub fn declined() -> Self {
        Self { confirmed: false }
    }
}

/// Surface that asks the user yes/no questions and shows toasts.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Resolves once the user answers; a dismissed prompt counts as declined.
    async fn confirm(&self, title: &str, body: &str) -> Confirmation;
    fn notify(&self, title: &str, body: &str, kind: NoticeKind);
}
