/*!
 * # inexfreq - word frequency measurement over a remote query server
 *
 * A Rust library that measures how often each word of a vocabulary occurs
 * across a set of server-side document databases.
 *
 * ## Features
 *
 * - Log in to a query server over its TCP client protocol
 * - Scan explicit databases or discover them by name prefix
 * - Run one full-text "contains" query per word and database
 * - Scrape the hit count from the server's query report
 * - Keep going when single queries or databases fail
 * - Write a `word;total` frequency file in word-list order
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `session`: Server sessions:
 *   - `session::protocol`: Wire codec and login digest
 *   - `session::client`: TCP session
 *   - `session::mock`: Scripted session for tests
 * - `query`: Query text construction
 * - `report`: Extraction of counts and listings from report text
 * - `runner`: The database × word query loop
 * - `frequency`: Per-word totals
 * - `file_utils`: Word list and frequency file I/O
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod frequency;
pub mod query;
pub mod report;
pub mod runner;
pub mod session;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::SessionError;
pub use frequency::FrequencyTable;
pub use runner::{QueryOutcome, QueryRunner, RunSummary};
pub use session::{ClientSession, MockSession, Session};
