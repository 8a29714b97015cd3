/*!
 * Session handling for the remote query server.
 *
 * - `protocol`: wire codec and login digest
 * - `client`: TCP session against a running server
 * - `mock`: scripted in-process session for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::SessionError;
use crate::report;

pub mod client;
pub mod mock;
pub mod protocol;

pub use client::ClientSession;
pub use mock::MockSession;

/// What the server sent back for one command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandReport {
    /// Command output (query result, table listing, ...)
    pub result: String,
    /// Free-text diagnostic that accompanies the result
    pub info: String,
}

/// Common trait for query server sessions
///
/// Implementations only provide `execute`; the administrative and query
/// operations are expressed as server commands on top of it.
#[async_trait]
pub trait Session: Send + Debug {
    /// Send one command and wait for its report
    ///
    /// # Returns
    /// * `Err(SessionError::Command { .. })` if the server rejected the command,
    ///   any other error if the connection itself failed
    async fn execute(&mut self, command: &str) -> Result<CommandReport, SessionError>;

    /// Set a server option for the rest of the session
    async fn set_option(&mut self, name: &str, value: &str) -> Result<(), SessionError> {
        self.execute(&format!("SET {} {}", name, value)).await.map(|_| ())
    }

    /// Make `database` the current database context
    async fn open(&mut self, database: &str) -> Result<(), SessionError> {
        self.execute(&format!("OPEN {}", database)).await.map(|_| ())
    }

    /// Release the current database context
    async fn close(&mut self) -> Result<(), SessionError> {
        self.execute("CLOSE").await.map(|_| ())
    }

    /// Run a query against the current database and return the info report
    async fn query(&mut self, text: &str) -> Result<String, SessionError> {
        self.execute(&format!("XQUERY {}", text))
            .await
            .map(|report| report.info)
    }

    /// Names of all databases known to the server
    async fn list_databases(&mut self) -> Result<Vec<String>, SessionError> {
        let report = self.execute("LIST").await?;
        Ok(report::parse_database_list(&report.result))
    }

    /// End the session; no command may follow
    async fn quit(&mut self) -> Result<(), SessionError>;
}
