use serde::Serialize;

/// The transient, unauthenticated record of who is "logged in".
///
/// Lives only as long as the process; nothing is written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: Option<String>,
}

impl Session {
    /// Record a username as logged in
    pub fn start(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Forget the current user
    pub fn clear(&mut self) {
        self.username = None;
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.username.is_some()
    }
}
