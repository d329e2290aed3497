// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operating modes and capability result types shared by the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Debug level for record validation.
///
/// - `Off`: records are queued and delivered in batches.
/// - `DebugOnly`: every record is validated synchronously by the server and
///   discarded afterwards (never imported, never queued).
/// - `DebugAndTrack`: every record is validated synchronously, then queued
///   and delivered like in `Off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugMode {
	#[default]
	Off,
	DebugOnly,
	DebugAndTrack,
}

impl DebugMode {
	/// Returns true for either debug level.
	pub fn is_enabled(&self) -> bool {
		!matches!(self, DebugMode::Off)
	}

	/// Returns true when validated records should also be queued for import.
	pub fn imports_records(&self) -> bool {
		!matches!(self, DebugMode::DebugOnly)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			DebugMode::Off => "off",
			DebugMode::DebugOnly => "debug_only",
			DebugMode::DebugAndTrack => "debug_and_track",
		}
	}
}

impl fmt::Display for DebugMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DebugMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"off" | "false" | "0" => Ok(DebugMode::Off),
			"debug_only" | "debug-only" => Ok(DebugMode::DebugOnly),
			"debug_and_track" | "debug-and-track" => Ok(DebugMode::DebugAndTrack),
			other => Err(format!("unknown debug mode: {other}")),
		}
	}
}

/// Connection class reported by the host's reachability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionClass {
	Offline,
	Cellular,
	WiFi,
}

impl ConnectionClass {
	/// Returns true when delivery may be attempted.
	pub fn is_online(&self) -> bool {
		!matches!(self, ConnectionClass::Offline)
	}
}

/// Acknowledgement returned by the ingestion endpoint for a delivered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckCode {
	Accepted,
	Rejected(String),
}

impl AckCode {
	pub fn is_accepted(&self) -> bool {
		matches!(self, AckCode::Accepted)
	}
}
