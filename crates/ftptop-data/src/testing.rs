//! Builder for scoreboard images used by tests.

use std::path::Path;

use ftptop_core::models::RawSessionRecord;

use crate::layout::{
    encode_record, ScoreboardHeader, PID_LEN, RECORD_LEN, SCOREBOARD_MAGIC, SCOREBOARD_VERSION,
};

/// An in-memory scoreboard file.
#[derive(Debug, Clone)]
pub struct ScoreboardImage {
    header: ScoreboardHeader,
    slots: Vec<[u8; RECORD_LEN]>,
}

impl ScoreboardImage {
    /// A valid header with no slots.
    pub fn new() -> Self {
        Self {
            header: ScoreboardHeader {
                magic: SCOREBOARD_MAGIC,
                version: SCOREBOARD_VERSION,
                producer_pid: 1,
                started_at: 0,
            },
            slots: Vec::new(),
        }
    }

    pub fn magic(mut self, magic: u32) -> Self {
        self.header.magic = magic;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.header.version = version;
        self
    }

    /// Append a session with placeholder user and addresses.
    pub fn session(self, pid: u32, command: &str) -> Self {
        self.record(RawSessionRecord {
            pid,
            user: "ftp".to_string(),
            client_addr: "127.0.0.1".to_string(),
            server_addr: "127.0.0.1".to_string(),
            command: command.to_string(),
        })
    }

    pub fn record(mut self, record: RawSessionRecord) -> Self {
        self.slots.push(encode_record(&record));
        self
    }

    /// Append an empty slot.
    pub fn vacant(mut self) -> Self {
        self.slots.push([0u8; RECORD_LEN]);
        self
    }

    /// Append an occupied slot whose string fields lack a terminating NUL.
    pub fn malformed(mut self, pid: u32) -> Self {
        let mut slot = [b'?'; RECORD_LEN];
        slot[..PID_LEN].copy_from_slice(&pid.to_le_bytes());
        self.slots.push(slot);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header.encode().to_vec();
        for slot in &self.slots {
            bytes.extend_from_slice(slot);
        }
        bytes
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }
}

impl Default for ScoreboardImage {
    fn default() -> Self {
        Self::new()
    }
}
