//! User-facing notices raised by the load, scan and claim flows.

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Expected outcome worth telling the user about
    Info,
    /// Something failed; retrying may help
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub const ALREADY_VISITED: &str = "You've already visited this venue!";
pub const CLAIM_FAILED: &str = "Failed to claim stamp";
pub const LOAD_FAILED: &str = "Failed to load venues";
pub const INVALID_VENUE_URL: &str = "Invalid Venue URL. Please try again.";
pub const VENUE_NOT_FOUND: &str = "Venue not found";

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn already_visited() -> Self {
        Self::info(ALREADY_VISITED)
    }

    pub fn claim_failed() -> Self {
        Self::error(CLAIM_FAILED)
    }

    pub fn load_failed() -> Self {
        Self::error(LOAD_FAILED)
    }

    pub fn venue_not_found() -> Self {
        Self::error(VENUE_NOT_FOUND)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
