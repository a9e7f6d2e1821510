//! # Magic Link Core
//!
//! An in-memory registry of temporary "magic link" tokens.
//!
//! ## Features
//!
//! - Random UUID v4 tokens bound to a label and a TTL
//! - Expiry checked on every lookup, with access counting
//! - Revocation at any time
//! - Background sweeper that evicts expired links on a fixed interval
//! - Injectable [`Clock`] so time can be controlled in tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use magiclink_core::{Registry, RegistryConfig, Sweeper};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RegistryConfig::default();
//!     let registry = Registry::with_config(config.clone());
//!     let sweeper = Sweeper::new(registry.clone(), config.sweep_interval).spawn();
//!
//!     // Issue a link valid for 30 minutes
//!     let link = registry.create(Some("Acme"), Some(30 * 60_000));
//!
//!     // A viewer opens it
//!     match registry.lookup(&link.token) {
//!         Ok(view) => println!("{} minutes left", view.remaining_minutes()),
//!         Err(e) => println!("cannot open link: {}", e),
//!     }
//!
//!     // The operator changes their mind
//!     registry.revoke(&link.token).ok();
//!
//!     sweeper.stop().await;
//! }
//! ```

mod clock;
mod config;
mod error;
mod link;
mod registry;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RegistryConfig, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use error::LinkError;
pub use link::{round_to_minutes, CreatedLink, LinkView, UNNAMED_LABEL};
pub use registry::{Registry, MAX_TTL_MS};
pub use sweeper::{Sweeper, SweeperHandle};
