/*!
 * Tests for the database × word query runner
 */

use inexfreq::errors::SessionError;
use inexfreq::frequency::FrequencyTable;
use inexfreq::runner::{QueryOutcome, QueryRunner, RunSummary};
use inexfreq::session::mock::MockAnswer;
use inexfreq::MockSession;
use crate::common;

fn dbs(names: &[&str]) -> Vec<String> {
    common::words(names)
}

/// Totals are the per-database sum of reported counts
#[tokio::test]
async fn test_run_withTwoDatabases_shouldSumCountsPerWord() {
    let mut session = common::cat_dog_session();
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    let (table, summary) = runner.run(&dbs(&["inex1", "inex2"]), |_| {}).await.unwrap();

    assert_eq!(table.finalize(), vec![("cat".to_string(), 5), ("dog".to_string(), 5)]);
    assert_eq!(summary.databases_processed, 2);
    assert_eq!(summary.queries_counted, 4);
    assert_eq!(summary.queries_attempted(), 4);
}

/// Each database is opened before and closed after its word loop
#[tokio::test]
async fn test_run_shouldOpenAndCloseEachDatabaseAroundItsQueries() {
    let mut session = common::cat_dog_session();
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    runner.run(&dbs(&["inex2", "inex1"]), |_| {}).await.unwrap();

    let verbs: Vec<&str> = session
        .commands()
        .iter()
        .map(|c| c.split(' ').next().unwrap_or_default())
        .collect();
    assert_eq!(
        verbs,
        vec!["OPEN", "XQUERY", "XQUERY", "CLOSE", "OPEN", "XQUERY", "XQUERY", "CLOSE"]
    );
    assert_eq!(session.commands()[0], "OPEN inex2");
    assert_eq!(session.current_database(), None);
}

/// A rejected query contributes zero and does not stop later queries
#[tokio::test]
async fn test_run_withRejectedQuery_shouldContinueWithNextWordAndDatabase() {
    let mut session = common::cat_dog_session()
        .with_failure("inex1", "cat", "Stopped at line 1, column 40: unexpected token");
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    let mut outcomes = Vec::new();
    let (table, summary) = runner
        .run(&dbs(&["inex1", "inex2"]), |p| {
            outcomes.push((p.ordinal, p.database.to_string(), p.outcome.clone()));
        })
        .await
        .unwrap();

    assert_eq!(table.finalize(), vec![("cat".to_string(), 2), ("dog".to_string(), 5)]);
    assert_eq!(summary.queries_failed, 1);
    assert_eq!(summary.queries_counted, 3);
    assert_eq!(outcomes.len(), 4);
    assert_eq!(
        outcomes[0],
        (1, "inex1".to_string(), QueryOutcome::Failed("Stopped at line 1, column 40: unexpected token".to_string()))
    );
    assert_eq!(outcomes[1], (2, "inex1".to_string(), QueryOutcome::Counted(0)));
}

/// A report without the result label counts as zero and is reported as unparsable
#[tokio::test]
async fn test_run_withUnlabelledReport_shouldContributeZero() {
    let mut session = common::cat_dog_session()
        .with_answer("inex2", "dog", MockAnswer::Unlabelled);
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    let mut unparsable = 0;
    let (table, summary) = runner
        .run(&dbs(&["inex1", "inex2"]), |p| {
            if *p.outcome == QueryOutcome::Unparsable {
                unparsable += 1;
            }
        })
        .await
        .unwrap();

    assert_eq!(table.finalize(), vec![("cat".to_string(), 5), ("dog".to_string(), 0)]);
    assert_eq!(unparsable, 1);
    assert_eq!(summary.queries_unparsable, 1);
}

/// A database that cannot be opened is skipped, the others still run
#[tokio::test]
async fn test_run_withUnopenableDatabase_shouldSkipItAndContinue() {
    let mut session = common::cat_dog_session().with_unopenable("inex3");
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat"])));

    let (table, summary) = runner.run(&dbs(&["inex3", "inex1", "missing"]), |_| {}).await.unwrap();

    assert_eq!(table.finalize(), vec![("cat".to_string(), 3)]);
    assert_eq!(
        summary,
        RunSummary {
            databases_processed: 1,
            databases_skipped: 2,
            queries_counted: 1,
            queries_unparsable: 0,
            queries_failed: 0,
        }
    );
    assert_eq!(session.query_count(), 1);
}

/// A lost connection ends the run with an error
#[tokio::test]
async fn test_run_withDroppedConnection_shouldAbort() {
    let mut session = common::cat_dog_session()
        .with_answer("inex1", "dog", MockAnswer::Disconnect);
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    let result = runner.run(&dbs(&["inex1", "inex2"]), |_| {}).await;

    assert!(matches!(result, Err(SessionError::Connection(_))));
    assert_eq!(session.query_count(), 2);
}

/// No databases means every total stays at zero
#[tokio::test]
async fn test_run_withNoDatabases_shouldLeaveTotalsAtZero() {
    let mut session = MockSession::new();
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["cat", "dog"])));

    let (table, summary) = runner.run(&[], |_| {}).await.unwrap();

    assert_eq!(table.finalize(), vec![("cat".to_string(), 0), ("dog".to_string(), 0)]);
    assert_eq!(summary, RunSummary::default());
    assert!(session.commands().is_empty());
}

/// The word is sent without escaping
#[tokio::test]
async fn test_run_withQuotedWord_shouldSendWordVerbatim() {
    let mut session = MockSession::new().with_database("inex1", &[("o\"brien", 4)]);
    let runner = QueryRunner::new(&mut session, FrequencyTable::new(common::words(&["o\"brien"])));

    let (table, _) = runner.run(&dbs(&["inex1"]), |_| {}).await.unwrap();

    assert_eq!(table.total(0), Some(4));
    assert!(session.commands()[1].contains("contains text \"o\"brien\"]"));
}
