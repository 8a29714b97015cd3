use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::app_config::ServerConfig;
use crate::errors::SessionError;
use crate::session::protocol::{self, STATUS_OK};
use crate::session::{CommandReport, Session};

/// Session against a running query server over TCP
#[derive(Debug)]
pub struct ClientSession {
    /// Address the session is connected to
    address: String,
    /// Buffered read half of the socket
    reader: BufReader<OwnedReadHalf>,
    /// Write half of the socket
    writer: OwnedWriteHalf,
}

impl ClientSession {
    /// Connect and log in.
    ///
    /// Fails with `SessionError::Connection` if the server cannot be reached
    /// and with `SessionError::Authentication` if it rejects the credentials.
    pub async fn connect(config: &ServerConfig) -> Result<Self, SessionError> {
        let address = config.address();
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|e| SessionError::Connection(format!("Failed to connect to {}: {}", address, e)))?;
        let (read_half, write_half) = stream.into_split();

        let mut session = Self {
            address,
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        session.login(&config.username, &config.password).await?;

        debug!("Logged in to {} as {}", session.address, config.username);
        Ok(session)
    }

    /// Address this session is connected to
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let greeting = protocol::read_string(&mut self.reader).await?;
        let digest = protocol::login_digest(&greeting, username, password);

        let mut message = protocol::encode_string(username);
        message.extend(protocol::encode_string(&digest));
        self.send(&message).await?;

        if protocol::read_byte(&mut self.reader).await? != STATUS_OK {
            return Err(SessionError::Authentication(format!(
                "Access denied for user '{}'",
                username
            )));
        }
        Ok(())
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Session for ClientSession {
    async fn execute(&mut self, command: &str) -> Result<CommandReport, SessionError> {
        self.send(&protocol::encode_string(command)).await?;

        let result = protocol::read_string(&mut self.reader).await?;
        let info = protocol::read_string(&mut self.reader).await?;
        let status = protocol::read_byte(&mut self.reader).await?;

        if status != STATUS_OK {
            return Err(SessionError::Command {
                command: command.to_string(),
                message: info,
            });
        }

        Ok(CommandReport { result, info })
    }

    async fn quit(&mut self) -> Result<(), SessionError> {
        self.send(&protocol::encode_string("exit")).await?;
        self.writer.shutdown().await?;
        Ok(())
    }
}
