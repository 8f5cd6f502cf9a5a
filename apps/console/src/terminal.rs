use async_trait::async_trait;
use client_core::{Confirmation, NoticeKind, NotificationGateway};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Asks on stderr, reads the answer from stdin, prints notices to stderr.
pub struct TerminalGateway {
    assume_yes: bool,
}

impl TerminalGateway {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn kind_label(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "ok",
        NoticeKind::Error => "error",
        NoticeKind::Warning => "warning",
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl NotificationGateway for TerminalGateway {
    async fn confirm(&self, title: &str, body: &str) -> Confirmation {
        if self.assume_yes {
            return Confirmation::confirmed();
        }

        let mut stderr = io::stderr();
        let prompt = format!("{title} {body} [y/N] ");
        if let Err(err) = stderr.write_all(prompt.as_bytes()).await {
            warn!(error = %err, "failed to write confirmation prompt");
            return Confirmation::declined();
        }
        let _ = stderr.flush().await;

        let mut answer = String::new();
        match BufReader::new(io::stdin()).read_line(&mut answer).await {
            Ok(_) if is_yes(&answer) => Confirmation::confirmed(),
            Ok(_) => Confirmation::declined(),
            Err(err) => {
                warn!(error = %err, "failed to read confirmation answer");
                Confirmation::declined()
            }
        }
    }

    fn notify(&self, title: &str, body: &str, kind: NoticeKind) {
        eprintln!("[{}] {title}: {body}", kind_label(kind));
    }
}
