//! Map configuration: codecs, backing file, table, mode, policies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{CodecPair, StorageValue};
use crate::log::{LogLevel, LogSink};

/// Connect-time policy, immutable for the life of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Open read/write; create the database file and table if absent.
    #[default]
    Create,
    /// Open without creation rights; every mutating operation is rejected.
    ReadOnly,
    /// Open read/write, then delete all rows of the target table.
    WriteDrop,
    /// Delete any existing file at the path (discarding all tables in it),
    /// then proceed as [`Mode::Create`].
    NewDatabase,
}

/// Table name used when none is configured.
pub const DEFAULT_TABLE: &str = "unnamed";

/// Value object consumed once when a map is opened.
///
/// Setters chain and return the updated configuration; getters are pure.
/// An empty filename selects a uniquely-named ephemeral temp file, the
/// literal `:memory:` an in-memory database.
pub struct Config<K, V, SK = K, SV = V>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    codecs: CodecPair<K, V, SK, SV>,
    filename: String,
    table: String,
    mode: Mode,
    auto_commit: bool,
    log_level: LogLevel,
    log_sink: Option<LogSink>,
    pragmas: Vec<String>,
}

impl<K, V, SK, SV> Config<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    pub fn new(codecs: CodecPair<K, V, SK, SV>) -> Self {
        Self {
            codecs,
            filename: String::new(),
            table: DEFAULT_TABLE.to_string(),
            mode: Mode::default(),
            auto_commit: false,
            log_level: LogLevel::Off,
            log_sink: None,
            pragmas: Vec::new(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Appends a pragma, normalized to a full `PRAGMA ...` statement.
    ///
    /// Accepts either a complete statement or a `flag = value` fragment;
    /// an existing prefix is detected case-insensitively so the keyword is
    /// never doubled. Pragmas replay in insertion order at every connect.
    pub fn with_pragma(mut self, statement: impl Into<String>) -> Self {
        self.pragmas.push(normalize_pragma(statement.into()));
        self
    }

    /// Appends a pragma built from a flag and a value.
    pub fn with_pragma_value(self, flag: &str, value: impl fmt::Display) -> Self {
        self.with_pragma(format!("{} = {}", flag, value))
    }

    pub fn codecs(&self) -> &CodecPair<K, V, SK, SV> {
        &self.codecs
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn log_sink(&self) -> Option<&LogSink> {
        self.log_sink.as_ref()
    }

    pub fn pragmas(&self) -> &[String] {
        &self.pragmas
    }
}

impl<K, V> Config<K, V>
where
    K: StorageValue,
    V: StorageValue,
{
    /// Configuration with identity codecs on both sides.
    pub fn identity() -> Self {
        Self::new(CodecPair::identity())
    }
}

impl Default for Config<String, String> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<K, V, SK, SV> Clone for Config<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn clone(&self) -> Self {
        Self {
            codecs: self.codecs.clone(),
            filename: self.filename.clone(),
            table: self.table.clone(),
            mode: self.mode,
            auto_commit: self.auto_commit,
            log_level: self.log_level,
            log_sink: self.log_sink.clone(),
            pragmas: self.pragmas.clone(),
        }
    }
}

impl<K, V, SK, SV> fmt::Debug for Config<K, V, SK, SV>
where
    K: 'static,
    V: 'static,
    SK: StorageValue,
    SV: StorageValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("filename", &self.filename)
            .field("table", &self.table)
            .field("mode", &self.mode)
            .field("auto_commit", &self.auto_commit)
            .field("log_level", &self.log_level)
            .field("pragmas", &self.pragmas)
            .finish()
    }
}

fn normalize_pragma(statement: String) -> String {
    const PREFIX: &str = "PRAGMA ";
    let has_prefix = statement
        .get(..PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PREFIX));
    if has_prefix {
        statement
    } else {
        format!("{}{}", PREFIX, statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::<String, String>::identity();
        assert_eq!(config.filename(), "");
        assert_eq!(config.table(), DEFAULT_TABLE);
        assert_eq!(config.mode(), Mode::Create);
        assert!(!config.auto_commit());
        assert_eq!(config.log_level(), LogLevel::Off);
        assert!(config.pragmas().is_empty());
    }

    #[test]
    fn setters_chain() {
        let config = Config::<String, String>::identity()
            .with_filename("data.db")
            .with_table("sessions")
            .with_mode(Mode::WriteDrop)
            .with_auto_commit(true)
            .with_log_level(LogLevel::Debug);
        assert_eq!(config.filename(), "data.db");
        assert_eq!(config.table(), "sessions");
        assert_eq!(config.mode(), Mode::WriteDrop);
        assert!(config.auto_commit());
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn pragma_fragment_gets_prefixed() {
        let config = Config::<String, String>::identity()
            .with_pragma("journal_mode = WAL")
            .with_pragma_value("cache_size", 2000);
        assert_eq!(
            config.pragmas(),
            ["PRAGMA journal_mode = WAL", "PRAGMA cache_size = 2000"]
        );
    }

    #[test]
    fn pragma_prefix_is_never_doubled() {
        let config = Config::<String, String>::identity()
            .with_pragma("PRAGMA synchronous = OFF")
            .with_pragma("pragma foreign_keys = ON");
        assert_eq!(
            config.pragmas(),
            ["PRAGMA synchronous = OFF", "pragma foreign_keys = ON"]
        );
    }

    #[test]
    fn pragma_order_is_preserved() {
        let config = Config::<String, String>::identity()
            .with_pragma("a = 1")
            .with_pragma("b = 2")
            .with_pragma("c = 3");
        assert_eq!(
            config.pragmas(),
            ["PRAGMA a = 1", "PRAGMA b = 2", "PRAGMA c = 3"]
        );
    }
}
