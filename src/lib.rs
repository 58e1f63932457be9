//! Convenience wrapper around Amazon Route 53 record management.
//!
//! A [`RecordManager`] resolves a domain to the hosted zone containing it
//! (longest-suffix match against the account's zones) and exposes CRUD over
//! one record type within that zone, taking care of FQDN canonicalization
//! and the TXT quoting/chunking rules.
//!
//! ```no_run
//! use r53dns::{RecordManager, RecordType};
//!
//! # async fn example() -> Result<(), r53dns::ZoneError> {
//! let manager = RecordManager::from_env("example.com", RecordType::A).await?;
//! manager.add("www", "1.2.3.4").await?;
//! assert_eq!(manager.get("www").await?, Some(vec!["1.2.3.4".to_owned()]));
//! manager.remove("www").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod manager;
pub mod record;
pub mod zone;

pub use api::{ApiError, Route53Api};
pub use manager::RecordManager;
pub use record::{RecordType, RecordValues};
pub use zone::{Zone, ZoneClient, ZoneError};
