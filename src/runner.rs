/*!
 * Query runner for the database × word matrix.
 *
 * For each database the runner opens a context, issues one full-text query
 * per vocabulary word, records the extracted counts and closes the context
 * again. Queries the server rejects are logged and count as zero; only a lost
 * connection stops the run.
 */

use log::{debug, error, warn};

use crate::errors::SessionError;
use crate::frequency::FrequencyTable;
use crate::query;
use crate::report;
use crate::session::Session;

/// Outcome of one (database, word) query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The report carried a result count
    Counted(u64),
    /// The report had no result count line
    Unparsable,
    /// The server rejected the query with this diagnostic
    Failed(String),
}

impl QueryOutcome {
    /// Amount this outcome adds to the word total
    pub fn contribution(&self) -> u64 {
        match self {
            Self::Counted(n) => *n,
            Self::Unparsable | Self::Failed(_) => 0,
        }
    }
}

/// Progress notification sent after every query
#[derive(Debug)]
pub struct QueryProgress<'a> {
    /// 1-based position of the word in the vocabulary
    pub ordinal: usize,
    /// The word that was queried
    pub word: &'a str,
    /// Database the query ran against
    pub database: &'a str,
    /// What the query produced
    pub outcome: &'a QueryOutcome,
}

/// Counters describing a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Databases whose word loop ran
    pub databases_processed: usize,
    /// Databases that could not be opened
    pub databases_skipped: usize,
    /// Queries whose report carried a count
    pub queries_counted: usize,
    /// Queries whose report had no count line
    pub queries_unparsable: usize,
    /// Queries rejected by the server
    pub queries_failed: usize,
}

impl RunSummary {
    /// Total number of queries attempted
    pub fn queries_attempted(&self) -> usize {
        self.queries_counted + self.queries_unparsable + self.queries_failed
    }

    fn record(&mut self, outcome: &QueryOutcome) {
        match outcome {
            QueryOutcome::Counted(_) => self.queries_counted += 1,
            QueryOutcome::Unparsable => self.queries_unparsable += 1,
            QueryOutcome::Failed(_) => self.queries_failed += 1,
        }
    }
}

/// Drives every (database, word) query over one session
pub struct QueryRunner<'s, S: Session + ?Sized> {
    /// Session shared by all queries
    session: &'s mut S,
    /// Totals being accumulated
    table: FrequencyTable,
    /// Counters for the run
    summary: RunSummary,
}

impl<'s, S: Session + ?Sized> QueryRunner<'s, S> {
    /// Create a runner over `session` accumulating into `table`
    pub fn new(session: &'s mut S, table: FrequencyTable) -> Self {
        Self {
            session,
            table,
            summary: RunSummary::default(),
        }
    }

    /// Query every word in every database, in order.
    ///
    /// A database that the server refuses to open is skipped and the run
    /// continues with the next one.
    ///
    /// # Returns
    /// * The final totals and run counters, or the connection error that ended
    ///   the run early
    pub async fn run<F>(
        mut self,
        databases: &[String],
        mut on_progress: F,
    ) -> Result<(FrequencyTable, RunSummary), SessionError>
    where
        F: FnMut(&QueryProgress<'_>),
    {
        for database in databases {
            match self.session.open(database).await {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    error!("Skipping database {}: {}", database, e);
                    self.summary.databases_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }

            self.run_database(database, &mut on_progress).await?;
            self.summary.databases_processed += 1;

            match self.session.close().await {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => warn!("Closing {} failed: {}", database, e),
                Err(e) => return Err(e),
            }
        }

        Ok((self.table, self.summary))
    }

    async fn run_database<F>(&mut self, database: &str, on_progress: &mut F) -> Result<(), SessionError>
    where
        F: FnMut(&QueryProgress<'_>),
    {
        for index in 0..self.table.len() {
            let word = self.table.words()[index].clone();
            let outcome = self.query_word(&word).await?;

            if let QueryOutcome::Failed(diagnostic) = &outcome {
                warn!("Query {} on {} failed: {}", index + 1, database, diagnostic);
            }

            let count = outcome.contribution();
            if count > 0 {
                self.table.accumulate(index, count);
            }
            self.summary.record(&outcome);

            on_progress(&QueryProgress {
                ordinal: index + 1,
                word: &word,
                database,
                outcome: &outcome,
            });
        }
        Ok(())
    }

    async fn query_word(&mut self, word: &str) -> Result<QueryOutcome, SessionError> {
        let text = query::build_contains_query(word);
        match self.session.query(&text).await {
            Ok(info) => Ok(match report::extract_count(&info) {
                Some(n) => QueryOutcome::Counted(n),
                None => {
                    debug!("No result count in report for '{}': {}", word, info);
                    QueryOutcome::Unparsable
                }
            }),
            Err(SessionError::Command { message, .. }) => Ok(QueryOutcome::Failed(message)),
            Err(e) => Err(e),
        }
    }
}
