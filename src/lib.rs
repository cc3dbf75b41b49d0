//! A simple, embeddable temperature log with trend statistics.
//!
//! It uses <https://github.com/fjall-rs/fjall> as its underlying storage engine.
//! Readings are append-only and keyed by owner and time, so a stats query is a
//! single range scan over one owner's readings.
//!
//! Statistics are computed per calendar bucket:
//!
//! - `day`: today so far, one bucket per hour
//! - `week`: the last 7 calendar days including today, one bucket per day
//!
//! Each bucket carries the average, minimum, maximum and number of readings,
//! and buckets are returned in chronological order. Day and hour boundaries
//! are computed in a single fixed UTC offset (UTC unless configured otherwise).
//!
//! ```
//! # let path = std::path::Path::new(".testy");
//! # if path.try_exists()? {
//! #   std::fs::remove_dir_all(path)?;
//! # }
//! #
//! use templog::{Database, NewReading, OwnerId};
//!
//! let db = Database::new(path, /* cache size in MiB */ 64)?;
//!
//! let owner = OwnerId::try_from("652f1c0e9b1e8a0012345678")?;
//!
//! db.append(&owner, NewReading::new(36.5).note("Morning reading"))?;
//! db.append(&owner, NewReading::new(37.1))?;
//!
//! let stats = db.aggregate(&owner, "day")?;
//! assert_eq!(2, stats.buckets.iter().map(|bucket| bucket.count).sum::<usize>());
//!
//! println!("{}", serde_json::to_string_pretty(&stats).unwrap());
//! #
//! # std::fs::remove_dir_all(path)?;
//! # Ok::<(), templog::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod agg;
mod auth;
mod bucket_key;
mod db;
mod db_builder;
mod error;
mod owner;
mod range;
mod reading;
mod stats;
mod store;
mod time;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use agg::{assemble, Aggregator, BucketAccumulator, BucketSummary, ExactSum, DEFAULT_SCAN_LIMIT};
pub use auth::{authorize, bearer_token, Authenticator, TokenTable};
pub use bucket_key::{BucketKey, Granularity};
pub use db::Database;
pub use db_builder::Builder;
pub use error::{Error, Result};
pub use owner::{OwnerId, MAX_OWNER_ID_LEN};
pub use range::{Range, Window};
pub use reading::{NewReading, Reading, ReadingId};
pub use stats::{Stats, StatsOptions};
pub use store::{LogStore, ReadingLog, ReadingStream};
pub use time::timestamp;

/// Nanoseconds since the Unix epoch
pub type Timestamp = u128;

/// Temperature in degrees Celsius
pub type Value = f64;
