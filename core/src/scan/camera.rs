//! Camera stream ownership and acquisition errors.

use thiserror::Error;

/// DOMException name for a refused camera permission.
pub const PERMISSION_DENIED: &str = "NotAllowedError";

/// A live camera stream. `stop` ends every track and must be idempotent.
pub trait CameraStream {
    fn stop(&mut self);
}

/// Camera acquisition failure, carrying the browser's exception name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct CameraError {
    pub name: String,
    pub message: String,
}

impl CameraError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Permission was refused; a page refresh is offered so the browser asks again.
    pub fn is_permission_denied(&self) -> bool {
        self.name == PERMISSION_DENIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remediation_text_includes_name_and_message() {
        let err = CameraError::new(PERMISSION_DENIED, "Permission denied");
        assert_eq!(err.to_string(), "NotAllowedError: Permission denied");
        assert!(err.is_permission_denied());
        assert!(!CameraError::new("NotFoundError", "no camera").is_permission_denied());
    }
}
