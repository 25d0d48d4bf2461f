//! Core building blocks for tablemap:
//! - Codecs: typed encode/decode pairs between application and storage types
//! - Storage marshalling: native-type to SQLite storage-class mapping
//! - Configuration: builder-style value object consumed at map open
//! - Error type and per-instance logging abstraction

pub mod codec;
pub mod config;
pub mod error;
pub mod log;

pub use codec::{CodecPair, KeyCodec, StorageClass, StorageValue, ValueCodec};
pub use config::{Config, Mode, DEFAULT_TABLE};
pub use error::{Result, TableMapError};
pub use log::{LogLevel, LogSink, Logger};
