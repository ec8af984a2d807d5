//! MEMVAULT - In-Process Key-Value Cache with TTL
//!
//! An embedded cache for a single process: a concurrent map of keyed
//! entries with per-entry expiration and a background sweeper that reclaims
//! expired entries. No network protocol, no persistence.
//!
//! Expired entries disappear from reads immediately (lazy expiration);
//! the sweeper removes them from memory on its interval.
//!
//! # Example
//!
//! ```rust,no_run
//! use memvault::{Cache, CacheConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CacheConfig::default()
//!         .with_default_ttl(Duration::from_secs(300))
//!         .with_sweep_interval(Duration::from_secs(60));
//!     let cache = Cache::with_config(config);
//!
//!     cache.set("user:123", "John Doe");
//!     cache.set_with_ttl("session:9", "token", Some(Duration::from_secs(30)));
//!
//!     if let Some(value) = cache.get("user:123") {
//!         println!("User: {}", value);
//!     }
//!
//!     cache.remove("user:123").unwrap();
//!     cache.close();
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::CacheConfig;
pub use error::CacheError;
pub use storage::{Cache, Entry};
