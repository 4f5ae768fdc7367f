//! Authentication domain events.

use serde::{Deserialize, Serialize};

/// Events emitted on authentication state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuthEvent {
    /// A user logged in and a session was created.
    LoggedIn {
        /// The identity label of the user.
        username: String,
        /// The session created for this login.
        session_id: String,
    },
    /// A new identity was registered.
    Registered {
        /// The username.
        username: String,
        /// The email address.
        email: String,
    },
    /// All sessions for a user were revoked by an explicit logout.
    LoggedOut {
        /// Number of sessions removed.
        sessions_revoked: usize,
    },
    /// A password reset was requested. Delivery of the reset secret is
    /// the notification service's concern; nothing secret is carried here.
    PasswordResetRequested {
        /// The email address the reset should be delivered to.
        email: String,
    },
    /// A user's password was changed and their sessions revoked.
    PasswordChanged {
        /// Number of sessions removed.
        sessions_revoked: usize,
    },
}

impl AuthEvent {
    /// Dotted event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => "user.logged_in",
            Self::Registered { .. } => "user.registered",
            Self::LoggedOut { .. } => "user.logged_out",
            Self::PasswordResetRequested { .. } => "password.reset_requested",
            Self::PasswordChanged { .. } => "user.password_changed",
        }
    }

    /// Routing key on the event bus.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => "auth.login",
            Self::Registered { .. } => "auth.register",
            Self::LoggedOut { .. } => "auth.logout",
            Self::PasswordResetRequested { .. } => "auth.password_reset",
            Self::PasswordChanged { .. } => "auth.password_changed",
        }
    }
}
