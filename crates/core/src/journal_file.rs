//! JSONL command journal on disk.
//!
//! The first line is a header naming the hold and the starting level. Every
//! following line is one processed command sealed into a SHA-256 chain: each
//! record stores the digest of the previous one, so a dropped, reordered or
//! edited line breaks the chain at that point. Records are flushed as they are
//! written and a file cut off mid-line is reported rather than half-read.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::journal::{CommandJournal, CommandRecord};
use crate::types::{Command, LevelId};

const FORMAT_VERSION: u16 = 1;

/// Digest that precedes the first record.
const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct Header {
    format_version: u16,
    build_id: String,
    hold_hash: u64,
    level: LevelId,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct SealedRecord {
    #[serde(flatten)]
    record: CommandRecord,
    prev_sha256_hex: String,
    sha256_hex: String,
}

/// Position in the chain: the digest of the last sealed record and the
/// sequence number the next one must carry.
#[derive(Debug, Clone)]
struct HashChain {
    head: String,
    next_seq: u64,
}

impl HashChain {
    fn genesis() -> Self {
        Self { head: GENESIS_HASH.to_string(), next_seq: 0 }
    }

    fn digest(record: &CommandRecord, prev: &str) -> Result<String, serde_json::Error> {
        let body = serde_json::to_string(record)?;
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        hasher.update(prev.as_bytes());
        Ok(format!("{:064x}", hasher.finalize()))
    }

    fn seal(&mut self, turn: u32, command: Command) -> Result<SealedRecord, serde_json::Error> {
        let record = CommandRecord { seq: self.next_seq, turn, command };
        let sha256_hex = Self::digest(&record, &self.head)?;
        let prev_sha256_hex = mem::replace(&mut self.head, sha256_hex.clone());
        self.next_seq += 1;
        Ok(SealedRecord { record, prev_sha256_hex, sha256_hex })
    }

    fn verify(
        &mut self,
        line: usize,
        sealed: SealedRecord,
    ) -> Result<CommandRecord, JournalLoadError> {
        if sealed.record.seq != self.next_seq {
            return Err(JournalLoadError::InvalidRecord {
                line,
                message: format!("expected seq {}, found {}", self.next_seq, sealed.record.seq),
            });
        }
        let recomputed = Self::digest(&sealed.record, &self.head)
            .map_err(|e| JournalLoadError::InvalidRecord { line, message: e.to_string() })?;
        if sealed.prev_sha256_hex != self.head || sealed.sha256_hex != recomputed {
            return Err(JournalLoadError::HashChainBroken { line });
        }
        self.head = recomputed;
        self.next_seq += 1;
        Ok(sealed.record)
    }
}

/// Appends processed commands to a journal file.
pub struct JournalWriter {
    out: BufWriter<File>,
    chain: HashChain,
}

impl JournalWriter {
    /// Creates (or truncates) the file at `path` and writes the header.
    pub fn create(path: &Path, level: LevelId, build_id: &str, hold_hash: u64) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer =
            Self { out: BufWriter::new(File::create(path)?), chain: HashChain::genesis() };
        let header = Header {
            format_version: FORMAT_VERSION,
            build_id: build_id.to_string(),
            hold_hash,
            level,
        };
        writer.write_line(&header)?;
        Ok(writer)
    }

    /// Continues a journal previously read with [`load_journal_from_file`].
    pub fn resume(path: &Path, last_sha256_hex: String, next_seq: u64) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            chain: HashChain { head: last_sha256_hex, next_seq },
        })
    }

    pub fn append(&mut self, turn: u32, command: Command) -> io::Result<()> {
        let sealed = self.chain.seal(turn, command).map_err(io::Error::other)?;
        self.write_line(&sealed)
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let json = serde_json::to_string(value).map_err(io::Error::other)?;
        writeln!(self.out, "{json}")?;
        self.out.flush()
    }
}

/// A journal read back from disk plus what a writer needs to keep appending.
#[derive(Debug)]
pub struct LoadedJournal {
    pub journal: CommandJournal,
    pub last_sha256_hex: String,
    pub next_seq: u64,
}

#[derive(Debug, Error)]
pub enum JournalLoadError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("journal file is empty")]
    EmptyFile,
    #[error("invalid journal header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },
    #[error("invalid journal record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    /// The last line has no terminating newline.
    #[error("incomplete journal line at line {line}")]
    IncompleteLine { line: usize },
    #[error("SHA-256 hash chain broken at line {line}")]
    HashChainBroken { line: usize },
}

/// Reads and verifies a whole journal file, failing at the first bad line.
pub fn load_journal_from_file(path: &Path) -> Result<LoadedJournal, JournalLoadError> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.split_inclusive('\n').enumerate().map(|(i, raw)| {
        let line = i + 1;
        raw.strip_suffix('\n')
            .map(|text| (line, text))
            .ok_or(JournalLoadError::IncompleteLine { line })
    });

    let (_, first) = lines.next().ok_or(JournalLoadError::EmptyFile)??;
    let header: Header = serde_json::from_str(first)
        .map_err(|e| JournalLoadError::InvalidHeader { line: 1, message: e.to_string() })?;

    let mut chain = HashChain::genesis();
    let mut records = Vec::new();
    for entry in lines {
        let (line, text) = entry?;
        if text.is_empty() {
            let message = "empty line".to_string();
            return Err(JournalLoadError::InvalidRecord { line, message });
        }
        let sealed: SealedRecord = serde_json::from_str(text)
            .map_err(|e| JournalLoadError::InvalidRecord { line, message: e.to_string() })?;
        records.push(chain.verify(line, sealed)?);
    }

    let journal = CommandJournal {
        format_version: header.format_version,
        build_id: header.build_id,
        hold_hash: header.hold_hash,
        level: header.level,
        records,
    };
    Ok(LoadedJournal { journal, last_sha256_hex: chain.head, next_seq: chain.next_seq })
}

#[cfg(test)]
mod tests;
