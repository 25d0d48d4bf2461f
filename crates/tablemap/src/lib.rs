//! tablemap: a typed, map-like facade over a single SQLite table.
//!
//! One [`TableMap`] instance owns one connection to one two-column table
//! (`key` PRIMARY KEY, `value`) and exposes associative-container
//! semantics over it:
//! - **Codecs**: arbitrary key/value types encode into natively-stored
//!   integer/real/text/blob columns and decode back on every read
//! - **Lazy iteration**: forward-only scans materialize rows on demand
//!   and memoize them for repeated access
//! - **Modes**: create, read-only, drop-and-recreate, fresh-database
//! - **Transactions**: auto-commit policy plus explicit begin/commit/rollback
//!
//! # Quick Start
//!
//! ```no_run
//! use tablemap::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let map = TableMap::open(Config::default().with_filename("./data.db"))?;
//!
//! map.set(&"a".to_string(), &"1".to_string())?;
//! assert_eq!(map.get(&"a".to_string())?, "1");
//!
//! for row in map.iter()? {
//!     let (key, value) = row?;
//!     println!("{key} = {value}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod iter;
pub mod lazy;
pub mod map;
pub mod node;
pub mod prelude;

// Re-export the core surface
pub use tablemap_core::{
    CodecPair, Config, KeyCodec, LogLevel, LogSink, Logger, Mode, Result, StorageClass,
    StorageValue, TableMapError, ValueCodec, DEFAULT_TABLE,
};

// Re-export main types from this crate
pub use iter::{Iter, KeyIter, RowIter, ValueIter};
pub use lazy::LazyResult;
pub use map::{table_names, EntryRef, TableMap};
pub use node::{Node, NodeInsert};
