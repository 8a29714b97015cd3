/*!
 * Error types for the inexfreq application.
 *
 * This module contains the error type for the session client, using the
 * thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while talking to the query server
#[derive(Error, Debug)]
pub enum SessionError {
    /// The server could not be reached or the connection dropped
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected the supplied credentials
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The server sent bytes that do not follow the client protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server processed the command and reported a failure
    #[error("Command '{command}' failed: {message}")]
    Command {
        /// Command as it was sent
        command: String,
        /// Diagnostic text returned by the server
        message: String,
    },
}

impl SessionError {
    /// Whether the session is still usable after this error.
    ///
    /// Only a server-side command rejection leaves the connection intact.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}

impl From<std::io::Error> for SessionError {
    fn from(error: std::io::Error) -> Self {
        Self::Connection(error.to_string())
    }
}
