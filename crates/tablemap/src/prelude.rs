//! tablemap prelude
//!
//! Import this to get all commonly used types:
//!
//! ```
//! use tablemap::prelude::*;
//! ```

pub use crate::{
    table_names, CodecPair, Config, EntryRef, Iter, KeyCodec, KeyIter, LogLevel, Logger, Mode,
    Node, NodeInsert, Result, RowIter, StorageClass, StorageValue, TableMap, TableMapError,
    ValueCodec, ValueIter,
};

// Re-export common external deps
pub use tracing;
