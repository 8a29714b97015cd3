/*!
 * Wire codec for the query server's client protocol.
 *
 * Every string on the wire is UTF-8 followed by a `0x00` terminator. The bytes
 * `0x00` and `0xFF` occurring inside a string are prefixed with `0xFF`.
 *
 * - Login: the server greets with either a timestamp or `realm:nonce`; the
 *   client answers with its user name and an MD5 digest, the server replies
 *   with a single status byte.
 * - Command: the client sends the command string, the server replies with the
 *   result string, the info string and a status byte.
 */

use md5::{Digest, Md5};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::errors::SessionError;

/// String terminator
pub const TERMINATOR: u8 = 0x00;

/// Escape prefix for reserved bytes inside a string
pub const ESCAPE: u8 = 0xFF;

/// Status byte reported for a successful login or command
pub const STATUS_OK: u8 = 0x00;

/// Encode a string for the wire, terminator included
pub fn encode_string(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len() + 1);
    for &b in value.as_bytes() {
        if b == TERMINATOR || b == ESCAPE {
            bytes.push(ESCAPE);
        }
        bytes.push(b);
    }
    bytes.push(TERMINATOR);
    bytes
}

/// Read one terminated string from the stream and undo the escaping
pub async fn read_string<R>(reader: &mut R) -> Result<String, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    let mut bytes = Vec::new();
    loop {
        let b = read_byte(reader).await?;
        match b {
            TERMINATOR => break,
            ESCAPE => bytes.push(read_byte(reader).await?),
            _ => bytes.push(b),
        }
    }

    String::from_utf8(bytes)
        .map_err(|e| SessionError::Protocol(format!("Invalid UTF-8 from server: {}", e)))
}

/// Read a single status byte
pub async fn read_byte<R>(reader: &mut R) -> Result<u8, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    // fill_buf returns an empty slice on EOF, which read_u8 reports as UnexpectedEof
    if reader.fill_buf().await?.is_empty() {
        return Err(SessionError::Connection(
            "Server closed the connection".to_string(),
        ));
    }
    Ok(reader.read_u8().await?)
}

/// Compute the login digest for the server greeting.
///
/// A greeting of the form `realm:nonce` selects the digest scheme
/// `md5(md5(user:realm:password) + nonce)`; any other greeting is treated as
/// a timestamp and selects `md5(md5(password) + timestamp)`.
pub fn login_digest(greeting: &str, username: &str, password: &str) -> String {
    match greeting.split_once(':') {
        Some((realm, nonce)) => {
            let inner = md5_hex(&format!("{}:{}:{}", username, realm, password));
            md5_hex(&format!("{}{}", inner, nonce))
        }
        None => {
            let inner = md5_hex(password);
            md5_hex(&format!("{}{}", inner, greeting))
        }
    }
}

/// Lowercase hex MD5 of a string
pub fn md5_hex(value: &str) -> String {
    let digest = Md5::digest(value.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
