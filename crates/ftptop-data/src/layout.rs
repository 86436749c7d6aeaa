//! Binary layout of the scoreboard file.
//!
//! All integers are little-endian. The file is a fixed header followed by
//! fixed-size record slots:
//!
//! ```text
//! header  (24 bytes)  magic u32 | version u32 | producer pid u32 | reserved [4] | started_at i64
//! record (324 bytes)  pid u32 | user [32] | client addr [80] | server addr [80] | command [128]
//! ```
//!
//! String fields are NUL-terminated within their slot. A slot with pid 0 is
//! vacant.

use ftptop_core::error::ScoreboardError;
use ftptop_core::models::RawSessionRecord;
use thiserror::Error;

pub const SCOREBOARD_MAGIC: u32 = 0xDEAD_BEEF;
/// The only layout version this reader decodes.
pub const SCOREBOARD_VERSION: u32 = 0x0001_0002;

pub const HEADER_LEN: usize = 24;

pub const PID_LEN: usize = 4;
pub const USER_LEN: usize = 32;
pub const CLIENT_ADDR_LEN: usize = 80;
pub const SERVER_ADDR_LEN: usize = 80;
pub const COMMAND_LEN: usize = 128;
pub const RECORD_LEN: usize = PID_LEN + USER_LEN + CLIENT_ADDR_LEN + SERVER_ADDR_LEN + COMMAND_LEN;

const USER_OFFSET: usize = PID_LEN;
const CLIENT_ADDR_OFFSET: usize = USER_OFFSET + USER_LEN;
const SERVER_ADDR_OFFSET: usize = CLIENT_ADDR_OFFSET + CLIENT_ADDR_LEN;
const COMMAND_OFFSET: usize = SERVER_ADDR_OFFSET + SERVER_ADDR_LEN;

/// Decoded scoreboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreboardHeader {
    pub magic: u32,
    pub version: u32,
    /// Pid of the process that created the scoreboard.
    pub producer_pid: u32,
    /// Unix time the producer started.
    pub started_at: i64,
}

impl ScoreboardHeader {
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        Self {
            magic: u32_at(buf, 0),
            version: u32_at(buf, 4),
            producer_pid: u32_at(buf, 8),
            started_at: i64_at(buf, 16),
        }
    }

    /// Check magic first, then version.
    pub fn validate(&self) -> Result<(), ScoreboardError> {
        if self.magic != SCOREBOARD_MAGIC {
            return Err(ScoreboardError::BadMagic { found: self.magic });
        }
        if self.version < SCOREBOARD_VERSION {
            return Err(ScoreboardError::OlderVersion {
                found: self.version,
                supported: SCOREBOARD_VERSION,
            });
        }
        if self.version > SCOREBOARD_VERSION {
            return Err(ScoreboardError::NewerVersion {
                found: self.version,
                supported: SCOREBOARD_VERSION,
            });
        }
        Ok(())
    }
}

/// A record slot that cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed scoreboard record: field `{field}` is not NUL-terminated")]
pub struct MalformedRecord {
    pub field: &'static str,
}

/// Decode one record slot. Vacant slots decode to `None`.
pub fn decode_record(buf: &[u8; RECORD_LEN]) -> Result<Option<RawSessionRecord>, MalformedRecord> {
    let pid = u32_at(buf, 0);
    if pid == 0 {
        return Ok(None);
    }

    Ok(Some(RawSessionRecord {
        pid,
        user: c_str(&buf[USER_OFFSET..CLIENT_ADDR_OFFSET], "user")?,
        client_addr: c_str(&buf[CLIENT_ADDR_OFFSET..SERVER_ADDR_OFFSET], "client_addr")?,
        server_addr: c_str(&buf[SERVER_ADDR_OFFSET..COMMAND_OFFSET], "server_addr")?,
        command: c_str(&buf[COMMAND_OFFSET..RECORD_LEN], "command")?,
    }))
}

/// Encode one record slot. Strings longer than their field are cut so the
/// terminating NUL always fits.
#[cfg(any(test, feature = "test-util"))]
pub fn encode_record(record: &RawSessionRecord) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[..PID_LEN].copy_from_slice(&record.pid.to_le_bytes());
    put_c_str(&mut buf[USER_OFFSET..CLIENT_ADDR_OFFSET], &record.user);
    put_c_str(&mut buf[CLIENT_ADDR_OFFSET..SERVER_ADDR_OFFSET], &record.client_addr);
    put_c_str(&mut buf[SERVER_ADDR_OFFSET..COMMAND_OFFSET], &record.server_addr);
    put_c_str(&mut buf[COMMAND_OFFSET..RECORD_LEN], &record.command);
    buf
}

#[cfg(any(test, feature = "test-util"))]
impl ScoreboardHeader {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&self.producer_pid.to_le_bytes());
        buf[16..24].copy_from_slice(&self.started_at.to_le_bytes());
        buf
    }
}

#[cfg(any(test, feature = "test-util"))]
fn put_c_str(field: &mut [u8], value: &str) {
    let len = value.len().min(field.len() - 1);
    field[..len].copy_from_slice(&value.as_bytes()[..len]);
}

fn c_str(field: &[u8], name: &'static str) -> Result<String, MalformedRecord> {
    let end = field
        .iter()
        .position(|&b| b == 0)
        .ok_or(MalformedRecord { field: name })?;
    Ok(String::from_utf8_lossy(&field[..end]).into_owned())
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn i64_at(buf: &[u8], offset: usize) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    i64::from_le_bytes(bytes)
}
