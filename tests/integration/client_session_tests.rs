/*!
 * TCP session tests against an in-process server
 */

use std::fs;
use anyhow::Result;
use tokio::net::TcpListener;
use inexfreq::errors::SessionError;
use inexfreq::query::{build_contains_query, word_of_contains_query};
use inexfreq::{ClientSession, Controller, MockSession, Session};
use crate::common;
use crate::common::fake_server;

fn handler(command: &str) -> Result<(String, String), String> {
    let (verb, argument) = command.split_once(' ').unwrap_or((command, ""));
    match verb {
        "SET" | "CLOSE" => Ok((String::new(), String::new())),
        "OPEN" if argument.starts_with("inex") => Ok((String::new(), format!("Database '{}' was opened.", argument))),
        "OPEN" => Err(format!("Database '{}' was not found.", argument)),
        "LIST" => Ok((MockSession::listing(&["inex1", "other"]), String::new())),
        "XQUERY" => match word_of_contains_query(argument) {
            Some("cat") => Ok(("a.xml\nb.xml\nc.xml".to_string(), MockSession::info_report(3))),
            Some(_) => Ok((String::new(), MockSession::info_report(0))),
            None => Err("Stopped at line 1, column 1: unexpected end of query".to_string()),
        },
        _ => Err(format!("Unknown command: {}", verb)),
    }
}

/// Login with a timestamp greeting and run commands
#[tokio::test]
async fn test_connect_withTimestampGreeting_shouldLoginAndExecute() -> Result<()> {
    let server = fake_server::spawn("1712345678", "admin", "admin", handler).await?;
    let mut session = ClientSession::connect(&server.server_config("admin", "admin")).await?;

    session.open("inex1").await?;
    let info = session.query(&build_contains_query("cat")).await?;
    session.close().await?;
    session.quit().await?;

    assert!(info.contains("Results   : 3 Items"));
    let commands = server.commands.await?;
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[0], "OPEN inex1");
    assert_eq!(commands[3], "exit");
    Ok(())
}

/// Login with a realm:nonce greeting
#[tokio::test]
async fn test_connect_withRealmGreeting_shouldLogin() -> Result<()> {
    let server = fake_server::spawn("BaseX:4711", "reader", "s3cret", handler).await?;
    let mut session = ClientSession::connect(&server.server_config("reader", "s3cret")).await?;

    let report = session.execute("LIST").await?;
    session.quit().await?;

    assert!(report.result.contains("inex1"));
    Ok(())
}

/// Wrong credentials are an authentication error
#[tokio::test]
async fn test_connect_withWrongPassword_shouldFailAuthentication() -> Result<()> {
    let server = fake_server::spawn("1712345678", "admin", "admin", handler).await?;

    let result = ClientSession::connect(&server.server_config("admin", "wrong")).await;

    assert!(matches!(result, Err(SessionError::Authentication(_))));
    Ok(())
}

/// No server listening is a connection error
#[tokio::test]
async fn test_connect_withNoServer_shouldFailConnection() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let mut config = inexfreq::app_config::ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = port;
    let result = ClientSession::connect(&config).await;

    assert!(matches!(result, Err(SessionError::Connection(_))));
    Ok(())
}

/// Rejected commands keep the session usable
#[tokio::test]
async fn test_execute_withRejectedCommand_shouldReturnDiagnosticAndStayUsable() -> Result<()> {
    let server = fake_server::spawn("1712345678", "admin", "admin", handler).await?;
    let mut session = ClientSession::connect(&server.server_config("admin", "admin")).await?;

    let error = session.open("missing").await.unwrap_err();
    let databases = session.list_databases().await?;
    session.quit().await?;

    match error {
        SessionError::Command { command, message } => {
            assert_eq!(command, "OPEN missing");
            assert_eq!(message, "Database 'missing' was not found.");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(databases, common::words(&["inex1", "other"]));
    Ok(())
}

/// Full run against the server writes the frequency file
#[tokio::test]
async fn test_controller_run_againstServer_shouldWriteFrequencyFile() -> Result<()> {
    let server = fake_server::spawn("1712345678", "admin", "admin", handler).await?;
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "words", "cat\ndog\n")?;
    let mut config = common::config_in(temp_dir.path());
    config.server = server.server_config("admin", "admin");
    let output = config.harness.output_file.clone();

    let summary = Controller::with_config(config)?.run().await?;

    assert_eq!(fs::read_to_string(&output)?, "cat;3\ndog;0\n");
    assert_eq!(summary.databases_processed, 1);
    let commands = server.commands.await?;
    assert_eq!(commands[0], "SET QUERYINFO false");
    assert_eq!(commands[1], "LIST");
    assert_eq!(commands[2], "OPEN inex1");
    assert_eq!(commands.last().map(String::as_str), Some("exit"));
    Ok(())
}

/// A refused connection aborts the run before any output
#[tokio::test]
async fn test_controller_run_withNoServer_shouldFailWithoutOutput() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "words", "cat\n")?;
    let mut config = common::config_in(temp_dir.path());
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    let output = config.harness.output_file.clone();

    let result = Controller::with_config(config)?.run().await;

    assert!(result.is_err());
    assert!(!std::path::Path::new(&output).exists());
    Ok(())
}
