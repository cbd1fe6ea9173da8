//! Terminal rendering of controller notifications and action outcomes.

use knca_core::{ActionOutcome, DocumentBackend, DocumentManager, Notification, NotificationLevel, SigningAgent};
use thiserror::Error;

use crate::cli::GlobalFlags;

/// An action that did not complete. Its notification has already been
/// printed, so `main` exits without another message.
#[derive(Debug, Error)]
pub enum Halt {
    #[error("{0}")]
    Failed(String),
    #[error("canceled")]
    Canceled,
}

impl Halt {
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Failed(_) => 1,
            Self::Canceled => 2,
        }
    }
}

/// Turn an outcome into a value or a [`Halt`].
pub fn settle<T>(outcome: ActionOutcome<T>) -> Result<T, Halt> {
    match outcome {
        ActionOutcome::Completed(value) => Ok(value),
        ActionOutcome::Canceled => Err(Halt::Canceled),
        ActionOutcome::Failed(message) => Err(Halt::Failed(message)),
    }
}

#[must_use]
pub fn notification_line(notification: &Notification) -> String {
    let mark = match notification.level {
        NotificationLevel::Success => '✓',
        NotificationLevel::Error => '✗',
    };
    format!("{mark} {}", notification.message)
}

/// Print pending notifications to stderr, and the activity log when
/// verbose. Success notifications are suppressed by `--quiet`.
pub fn flush<B, A>(manager: &mut DocumentManager<B, A>, flags: &GlobalFlags)
where
    B: DocumentBackend,
    A: SigningAgent,
{
    if flags.verbose {
        for entry in manager.log().entries() {
            eprintln!("{}", entry.line());
        }
        manager.clear_log();
    }
    for notification in manager.take_notifications() {
        if flags.quiet && notification.level == NotificationLevel::Success {
            continue;
        }
        eprintln!("{}", notification_line(&notification));
    }
}
