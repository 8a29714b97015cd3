/*!
 * Scripted session for testing.
 *
 * `MockSession` answers the same commands a real server does, using a table
 * of per-database word answers:
 * - `Count(n)` - report carries `Results   : n Items`
 * - `Unlabelled` - report without the result line
 * - `Reject(msg)` - the server rejects the query
 * - `Disconnect` - the connection drops while the query runs
 *
 * It refuses to open a database while another one is open, so any caller that
 * breaks the one-context rule fails loudly.
 */

use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::SessionError;
use crate::query;
use crate::session::{CommandReport, Session};

/// Scripted answer for one word in one database
#[derive(Debug, Clone, PartialEq)]
pub enum MockAnswer {
    /// Report the given number of items
    Count(u64),
    /// Report text without the result label
    Unlabelled,
    /// Reject the query with a diagnostic
    Reject(String),
    /// Drop the connection
    Disconnect,
}

#[derive(Debug, Clone)]
struct MockDatabase {
    name: String,
    answers: HashMap<String, MockAnswer>,
    openable: bool,
}

/// In-process session driven by scripted answers
#[derive(Debug, Default)]
pub struct MockSession {
    /// Databases in listing order
    databases: Vec<MockDatabase>,
    /// Currently open database
    current: Option<String>,
    /// Every command received, in order
    commands: Vec<String>,
    /// Options set through `SET`
    options: HashMap<String, String>,
    /// Whether `quit` was called
    quit: bool,
}

impl MockSession {
    /// Create an empty mock session with no databases
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a database with the given per-word counts
    pub fn with_database(mut self, name: &str, counts: &[(&str, u64)]) -> Self {
        let answers = counts
            .iter()
            .map(|(word, n)| (word.to_string(), MockAnswer::Count(*n)))
            .collect();
        self.databases.push(MockDatabase {
            name: name.to_string(),
            answers,
            openable: true,
        });
        self
    }

    /// Add a database that is listed but cannot be opened
    pub fn with_unopenable(mut self, name: &str) -> Self {
        self.databases.push(MockDatabase {
            name: name.to_string(),
            answers: HashMap::new(),
            openable: false,
        });
        self
    }

    /// Script a specific answer for a word in an existing database
    pub fn with_answer(mut self, database: &str, word: &str, answer: MockAnswer) -> Self {
        if let Some(db) = self.databases.iter_mut().find(|d| d.name == database) {
            db.answers.insert(word.to_string(), answer);
        }
        self
    }

    /// Script a query rejection for a word in an existing database
    pub fn with_failure(self, database: &str, word: &str, message: &str) -> Self {
        self.with_answer(database, word, MockAnswer::Reject(message.to_string()))
    }

    /// Every command received so far
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Number of queries received so far
    pub fn query_count(&self) -> usize {
        self.commands.iter().filter(|c| c.starts_with("XQUERY ")).count()
    }

    /// Value of an option set through the session
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Currently open database, if any
    pub fn current_database(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether the session was ended
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Build a server-style info report for a query that returned `items` hits
    pub fn info_report(items: u64) -> String {
        format!(
            "Parsing: 0.21 ms\nCompiling: 0.48 ms\nEvaluating: 1.02 ms\nPrinting: 0.06 ms\n\
             Total Time: 1.77 ms\n\nResults   : {} Items\nUpdated   : 0 Items\n\
             Printed   : 0 Bytes\n\nQuery executed in 1.77 ms.",
            items
        )
    }

    /// Build a `LIST` table for the given database names
    pub fn listing(names: &[&str]) -> String {
        let mut table = String::from("Name      Resources  Size     Input Path\n");
        table.push_str("-----------------------------------------\n");
        for name in names {
            table.push_str(&format!("{}  1  4096 B  /data/{}.xml\n", name, name));
        }
        table.push_str(&format!("\n{} database(s).", names.len()));
        table
    }

    fn rejected(command: &str, message: impl Into<String>) -> SessionError {
        SessionError::Command {
            command: command.to_string(),
            message: message.into(),
        }
    }

    fn answer_query(&self, command: &str, text: &str) -> Result<CommandReport, SessionError> {
        let Some(current) = self.current.as_deref() else {
            return Err(Self::rejected(command, "No database opened."));
        };
        let word = query::word_of_contains_query(text).unwrap_or_default();
        let answer = self
            .databases
            .iter()
            .find(|d| d.name == current)
            .and_then(|d| d.answers.get(word))
            .cloned()
            .unwrap_or(MockAnswer::Count(0));

        match answer {
            MockAnswer::Count(n) => Ok(CommandReport {
                result: String::new(),
                info: Self::info_report(n),
            }),
            MockAnswer::Unlabelled => Ok(CommandReport {
                result: String::new(),
                info: "Query executed in 0.5 ms.".to_string(),
            }),
            MockAnswer::Reject(message) => Err(Self::rejected(command, message)),
            MockAnswer::Disconnect => Err(SessionError::Connection(
                "Connection reset by peer".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Session for MockSession {
    async fn execute(&mut self, command: &str) -> Result<CommandReport, SessionError> {
        self.commands.push(command.to_string());

        if self.quit {
            return Err(SessionError::Connection("Session already closed".to_string()));
        }

        let (verb, argument) = command.split_once(' ').unwrap_or((command, ""));
        match verb {
            "SET" => {
                let (name, value) = argument.split_once(' ').unwrap_or((argument, ""));
                self.options.insert(name.to_string(), value.to_string());
                Ok(CommandReport::default())
            }
            "OPEN" => {
                if let Some(open) = &self.current {
                    return Err(SessionError::Protocol(format!(
                        "Database '{}' is still open",
                        open
                    )));
                }
                match self.databases.iter().find(|d| d.name == argument) {
                    Some(db) if db.openable => {
                        self.current = Some(argument.to_string());
                        Ok(CommandReport {
                            result: String::new(),
                            info: format!("Database '{}' was opened.", argument),
                        })
                    }
                    _ => Err(Self::rejected(
                        command,
                        format!("Database '{}' was not found.", argument),
                    )),
                }
            }
            "CLOSE" => {
                self.current = None;
                Ok(CommandReport::default())
            }
            "XQUERY" => self.answer_query(command, argument),
            "LIST" => {
                let names: Vec<&str> = self.databases.iter().map(|d| d.name.as_str()).collect();
                Ok(CommandReport {
                    result: Self::listing(&names),
                    info: String::new(),
                })
            }
            _ => Err(Self::rejected(command, format!("Unknown command: {}", verb))),
        }
    }

    async fn quit(&mut self) -> Result<(), SessionError> {
        self.commands.push("exit".to_string());
        self.current = None;
        self.quit = true;
        Ok(())
    }
}
