//! Syndicated-feed loader for a personal site.
//!
//! A remote RSS feed is fetched, its `<item>` blocks are extracted and
//! normalized into [`NormalizedRecord`]s, and each successful sync replaces
//! the contents of a shared [`Store`]. Pages read the store; [`rss`] turns it
//! back into the site's own channel.

pub mod config;
pub mod feed;
pub mod rss;
pub mod store;
pub mod sync;

pub use feed::types::{FetchFailure, NormalizedRecord, RawFeedEntry};
pub use store::Store;
pub use sync::{SyncOutcome, SyncPolicy, Synchronizer};
