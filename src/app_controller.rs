use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::frequency::FrequencyTable;
use crate::runner::{QueryOutcome, QueryProgress, QueryRunner, RunSummary};
use crate::session::{ClientSession, Session};

// @module: Application controller for word frequency measurement

/// Main application controller for a measurement run
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a full measurement against the configured server.
    ///
    /// Loads the word list, logs in, runs every query and writes the
    /// frequency file. Any failure before the report is written leaves no
    /// output file behind.
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();

        let words = FileManager::read_word_list(&self.config.harness.words_file)?;

        let mut session = match ClientSession::connect(&self.config.server).await {
            Ok(session) => session,
            Err(e) => {
                error!(
                    "Please start the query server at {} before running a measurement.",
                    self.config.server.address()
                );
                return Err(anyhow::Error::new(e).context("Failed to open session"));
            }
        };

        let result = self.run_with_session(&mut session, words).await;

        if let Err(e) = session.quit().await {
            warn!("Failed to end session with {}: {}", session.address(), e);
        }

        let summary = result?;
        println!("{}", Self::total_time_line(start_time.elapsed()));
        Ok(summary)
    }

    /// Run the measurement over an already established session
    pub async fn run_with_session<S: Session + ?Sized>(
        &self,
        session: &mut S,
        words: Vec<String>,
    ) -> Result<RunSummary> {
        let query_info = if self.config.harness.query_info { "true" } else { "false" };
        session
            .set_option("QUERYINFO", query_info)
            .await
            .context("Failed to configure session")?;

        let databases = self.resolve_databases(session).await?;
        info!("=> {} words on {} databases", words.len(), databases.len());

        let total_queries = (words.len() * databases.len()) as u64;
        let progress_bar = ProgressBar::new(total_queries);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let pb = progress_bar.clone();
        let runner = QueryRunner::new(session, FrequencyTable::new(words));
        let run_result = runner
            .run(&databases, move |progress| {
                pb.set_message(progress.database.to_string());
                pb.suspend(|| info!("{}", Self::describe_progress(progress)));
                pb.inc(1);
            })
            .await;

        // The bar is cleared before any error reaches the logger
        progress_bar.finish_and_clear();
        let (table, summary) = run_result.context("Measurement aborted")?;

        let output_file = &self.config.harness.output_file;
        FileManager::write_frequency_report(output_file, &table.finalize())?;
        info!("Success: {}", output_file);

        if summary.databases_skipped > 0 || summary.queries_failed > 0 || summary.queries_unparsable > 0 {
            warn!(
                "Completed with {} skipped databases, {} failed queries and {} reports without a result count.",
                summary.databases_skipped, summary.queries_failed, summary.queries_unparsable
            );
        }

        Ok(summary)
    }

    /// Databases to scan: the configured ones, or every server database whose
    /// name starts with the configured prefix
    pub async fn resolve_databases<S: Session + ?Sized>(&self, session: &mut S) -> Result<Vec<String>> {
        if !self.config.discovers_databases() {
            return Ok(self.config.harness.databases.clone());
        }

        let prefix = &self.config.harness.database_prefix;
        let databases: Vec<String> = session
            .list_databases()
            .await
            .context("Failed to list databases")?
            .into_iter()
            .filter(|name| name.starts_with(prefix.as_str()))
            .collect();

        if databases.is_empty() {
            warn!("No databases found with prefix '{}'", prefix);
        }
        Ok(databases)
    }

    /// Progress line for one finished query
    pub fn describe_progress(progress: &QueryProgress<'_>) -> String {
        let prefix = format!("Query {} on {}", progress.ordinal, progress.database);
        match progress.outcome {
            QueryOutcome::Counted(n) => format!("{}: {} items", prefix, n),
            QueryOutcome::Unparsable => format!("{}: no item count", prefix),
            QueryOutcome::Failed(_) => format!("{}: failed", prefix),
        }
    }

    /// Elapsed-time summary printed on stdout at the end of every successful run
    pub fn total_time_line(duration: Duration) -> String {
        format!("Total time: {}", Self::format_duration(duration))
    }

    // Format duration in a human-readable format (HH:MM:SS)
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
