// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for Loom event tracking.
//!
//! This crate turns `track`, `sign_up`, and profile calls into records,
//! keeps them in a persistent bounded queue, and delivers them in batches to
//! a collection endpoint.
//!
//! # Features
//!
//! - **Event tracking**: property merging with super and automatic properties
//! - **Identity**: anonymous ids, `identify`, and a one-shot `sign_up`
//! - **Profiles**: set, set-once, unset, increment, append, delete
//! - **Persistent queue**: survives restarts, capped at 10,000 records
//! - **Flush policy**: interval and connectivity gated, never overlapping
//! - **Debug modes**: synchronous server-side validation during development
//!
//! # Example
//!
//! ```ignore
//! use loom_track::{DebugMode, Properties, TrackClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TrackClient::builder()
//!         .server_url("https://collect.example.com/sa")
//!         .debug_mode(DebugMode::Off)
//!         .build()?;
//!
//!     client.register_super_properties(Properties::new().insert("platform", "server"));
//!     client.track("app_started", Properties::new()).await?;
//!     client.sign_up("user_123", Properties::new()).await?;
//!     client.people().increment_one("logins", 1).await?;
//!
//!     client.flush().await?;
//!     client.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod automatic;
mod client;
pub mod config;
pub mod connectivity;
pub mod delivery;
mod error;
pub mod flush;
mod identity;
pub mod queue;
pub mod stats;
pub mod store;
mod super_props;
pub mod transport;

pub use automatic::LIB_VERSION;
pub use client::{People, Receipt, TrackClient, TrackClientBuilder};
pub use config::TrackConfig;
pub use connectivity::{AlwaysOnline, Connectivity, StaticConnectivity};
pub use error::{ConfigError, Result, TrackError};
pub use flush::{FlushOutcome, FlushTrigger, SkipReason};
pub use queue::RecordId;
pub use stats::StatsSnapshot;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use transport::{HttpTransport, PayloadKind, Transport, TransportError};

// Re-export core types for convenience
pub use loom_track_core::{
	AckCode, ConnectionClass, DebugMode, EventRecord, EventType, Properties, PropertyInput,
	PropertyMap, PropertyValue, ValidationError,
};
