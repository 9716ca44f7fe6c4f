//! # Tagscout Registry
//!
//! Resolves the most recent tag of a container registry repository.
//!
//! The client talks to the registry v2 distribution API: it exchanges basic
//! credentials for a pull-scoped bearer token, lists the repository's tags,
//! reads each tag's manifest digest and config blob creation time, and ranks
//! the tags by creation time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tagscout_registry::{Credentials, RegistryClient, RegistryConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::new("os/oraclelinux", Credentials::new("user", "pass"));
//!     let client = RegistryClient::new(config)?;
//!
//!     let latest = client.find_latest().await?;
//!     println!("{}", latest.to_json()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Ranking
//!
//! | best \ candidate | timestamped | no timestamp |
//! |------------------|-------------|--------------|
//! | timestamped      | later wins, ties keep best | best kept |
//! | no timestamp     | candidate wins | lexically greater tag wins |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod auth;
mod client;
pub mod config;
mod error;
mod oci;
mod report;
mod select;
pub mod timestamp;

pub use client::{ManifestInfo, RegistryClient};
pub use config::{Credentials, RegistryConfig};
pub use error::RegistryError;
pub use oci::{Descriptor, ImageConfig, Manifest, MediaType, TagList, TokenResponse};
pub use report::LatestTagReport;
pub use select::{should_replace, Selector, TagCandidate};
