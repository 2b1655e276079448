//! User-facing results of store operations.

use serde::Serialize;

/// Severity of a toast shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast message produced by a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// What the caller should show or do after a store operation.
///
/// Operations never return errors; every failure is already folded into
/// an error notification here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    notification: Option<Notification>,
    redirect: Option<String>,
}

impl Outcome {
    /// The operation changed state.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            notification: Some(Notification::success(message)),
            redirect: None,
        }
    }

    /// A business rule refused the operation; state is unchanged.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            notification: Some(Notification::error(message)),
            redirect: None,
        }
    }

    /// The shopper must sign in first.
    #[must_use]
    pub fn sign_in_required(message: impl Into<String>, sign_in_path: &str) -> Self {
        Self {
            notification: Some(Notification::error(message)),
            redirect: Some(sign_in_path.to_owned()),
        }
    }

    /// Nothing to show.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Whether the outcome carries an error toast.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.notification
            .as_ref()
            .is_some_and(|n| n.level == NotificationLevel::Error)
    }

    /// The toast text, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.message.as_str())
    }
}
