/*!
 * Tests for error types
 */

use inexfreq::errors::SessionError;

#[test]
fn test_sessionError_command_shouldDisplayCommandAndMessage() {
    let error = SessionError::Command {
        command: "OPEN inex9".to_string(),
        message: "Database 'inex9' was not found.".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("OPEN inex9"));
    assert!(display.contains("was not found"));
}

#[test]
fn test_sessionError_isRecoverable_shouldOnlyHoldForCommandRejections() {
    let rejected = SessionError::Command {
        command: "XQUERY 1".to_string(),
        message: "Stopped at line 1".to_string(),
    };
    assert!(rejected.is_recoverable());
    assert!(!SessionError::Connection("reset".to_string()).is_recoverable());
    assert!(!SessionError::Authentication("denied".to_string()).is_recoverable());
    assert!(!SessionError::Protocol("bad byte".to_string()).is_recoverable());
}

#[test]
fn test_sessionError_fromIoError_shouldWrapAsConnectionError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error: SessionError = io_error.into();
    let display = format!("{}", error);
    assert!(display.contains("Connection error"));
    assert!(display.contains("refused"));
}
