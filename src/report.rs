/*!
 * Extraction of structured values from server report text.
 *
 * The server answers with human-oriented diagnostics instead of a structured
 * payload, so values are scraped from fixed textual labels.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Label the server prints in front of the number of result items
pub const RESULT_LABEL: &str = "Results   : ";

static RESULT_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{}([0-9]+) Item", regex::escape(RESULT_LABEL)))
        .expect("result count pattern is valid")
});

/// Extract the item count from a query info report.
///
/// Searches for the first `Results   : <digits> Item` line; surrounding text
/// is ignored and later matches are not considered.
///
/// # Returns
/// * `None` if the label is missing or the number does not fit in a `u64`
pub fn extract_count(report: &str) -> Option<u64> {
    RESULT_COUNT
        .captures(report)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse the table printed by the `LIST` command into database names.
///
/// The table starts with a header row and a dashed separator; each following
/// row begins with the database name. The first blank line ends the table.
pub fn parse_database_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip_while(|line| !is_separator(line))
        .skip(1)
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '-')
}
