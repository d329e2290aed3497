// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracking SDK.

use std::path::PathBuf;

use loom_track_core::ValidationError;
use thiserror::Error;

use crate::store::StoreError;
use crate::transport::TransportError;

/// Result type alias for tracking operations.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors surfaced by [`TrackClient`](crate::TrackClient) operations.
#[derive(Debug, Error)]
pub enum TrackError {
	/// A name, id, or value failed validation; no record was produced.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// `sign_up` was called a second time on this install.
	#[error("user has already signed up")]
	AlreadySignedUp,

	/// The server refused a record during debug validation.
	#[error("debug validation rejected record: {reason}")]
	DebugRejected { reason: String },

	/// The debug validation round trip failed to complete.
	#[error("transport error: {0}")]
	Transport(#[from] TransportError),

	/// The configured storage directory could not be opened.
	#[error("store error: {0}")]
	Store(#[from] StoreError),

	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	/// The client has been shut down.
	#[error("track client has been shut down")]
	ClientShutdown,

	/// The client was built outside a tokio runtime.
	#[error("no tokio runtime available")]
	NoRuntime,

	#[error("invalid server URL: {0}")]
	InvalidServerUrl(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// I/O error reading config file
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Invalid value
	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },
}

impl ConfigError {
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}
