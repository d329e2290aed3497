// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SDK configuration.
//!
//! Values come from (lowest to highest precedence) built-in defaults, an
//! optional TOML file, and `LOOM_TRACK_*` environment variables:
//!
//! ```toml
//! server_url = "https://collect.example.com/sa"
//! debug_mode = "debug_and_track"
//! flush_interval_ms = 15000
//! flush_before_background = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use loom_track_core::DebugMode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delivery::DEFAULT_MAX_BATCH_SIZE;
use crate::error::ConfigError;
use crate::flush::DEFAULT_FLUSH_INTERVAL_MS;
use crate::queue::DEFAULT_QUEUE_CAPACITY;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const ENV_SERVER_URL: &str = "LOOM_TRACK_SERVER_URL";
const ENV_DEBUG_MODE: &str = "LOOM_TRACK_DEBUG_MODE";
const ENV_FLUSH_INTERVAL_MS: &str = "LOOM_TRACK_FLUSH_INTERVAL_MS";
const ENV_FLUSH_BEFORE_BACKGROUND: &str = "LOOM_TRACK_FLUSH_BEFORE_BACKGROUND";
const ENV_STORAGE_DIR: &str = "LOOM_TRACK_STORAGE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
	/// Collection endpoint. Required unless a custom transport is supplied.
	pub server_url: Option<String>,
	pub debug_mode: DebugMode,
	/// Ignored while a debug mode is enabled.
	pub flush_interval_ms: u64,
	pub flush_before_background: bool,
	pub check_bindings_on_active: bool,
	pub max_batch_size: usize,
	pub queue_capacity: usize,
	pub request_timeout_secs: u64,
	/// Defaults to `<data dir>/loom/track`.
	pub storage_dir: Option<PathBuf>,
	/// Reported as `$app_version` when set.
	pub app_version: Option<String>,
}

impl Default for TrackConfig {
	fn default() -> Self {
		Self {
			server_url: None,
			debug_mode: DebugMode::Off,
			flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
			flush_before_background: false,
			check_bindings_on_active: true,
			max_batch_size: DEFAULT_MAX_BATCH_SIZE,
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
			storage_dir: None,
			app_version: None,
		}
	}
}

impl TrackConfig {
	/// Parses a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Self::parse(source, Path::new("<inline>"))
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)?;
		debug!(path = %path.display(), "Loaded track config file");
		Self::parse(&source, path)
	}

	fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source).map_err(|source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		})?;
		config.validate()?;
		Ok(config)
	}

	/// Overlays `LOOM_TRACK_*` environment variables.
	pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
		self.apply_env(|name| std::env::var(name).ok())
	}

	fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

		if let Some(url) = var(ENV_SERVER_URL) {
			self.server_url = Some(url);
		}
		if let Some(mode) = var(ENV_DEBUG_MODE) {
			self.debug_mode = mode
				.parse()
				.map_err(|message: String| ConfigError::invalid_value(ENV_DEBUG_MODE, message))?;
		}
		if let Some(ms) = var(ENV_FLUSH_INTERVAL_MS) {
			self.flush_interval_ms = ms.parse().map_err(|_| {
				ConfigError::invalid_value(ENV_FLUSH_INTERVAL_MS, format!("invalid u64 value '{ms}'"))
			})?;
		}
		if let Some(flag) = var(ENV_FLUSH_BEFORE_BACKGROUND) {
			self.flush_before_background = flag.eq_ignore_ascii_case("true") || flag == "1";
		}
		if let Some(dir) = var(ENV_STORAGE_DIR) {
			self.storage_dir = Some(PathBuf::from(dir));
		}

		self.validate()?;
		Ok(self)
	}

	/// Checks field ranges. The server URL is checked when the client is built.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.flush_interval_ms == 0 {
			return Err(ConfigError::invalid_value("flush_interval_ms", "must be greater than 0"));
		}
		if self.max_batch_size == 0 {
			return Err(ConfigError::invalid_value("max_batch_size", "must be greater than 0"));
		}
		if self.queue_capacity == 0 {
			return Err(ConfigError::invalid_value("queue_capacity", "must be greater than 0"));
		}
		if self.request_timeout_secs == 0 {
			return Err(ConfigError::invalid_value("request_timeout_secs", "must be greater than 0"));
		}
		Ok(())
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// The configured storage directory, or the platform default.
	pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
		self.storage_dir.clone().or_else(default_storage_dir)
	}
}

/// `<data dir>/loom/track`, when the platform has a data directory.
pub fn default_storage_dir() -> Option<PathBuf> {
	dirs::data_dir().map(|dir| dir.join("loom").join("track"))
}

/// Validates an absolute http(s) URL and strips trailing slashes.
pub fn normalize_server_url(url: &str) -> Option<String> {
	let trimmed = url.trim().trim_end_matches('/');
	let parsed = reqwest::Url::parse(trimmed).ok()?;
	if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
		return None;
	}
	Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use tempfile::TempDir;

	fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = TrackConfig::default();
		assert_eq!(config.flush_interval_ms, 60_000);
		assert_eq!(config.queue_capacity, 10_000);
		assert_eq!(config.debug_mode, DebugMode::Off);
		assert!(!config.flush_before_background);
		assert!(config.check_bindings_on_active);
		assert_eq!(config.request_timeout(), Duration::from_secs(30));
	}

	#[test]
	fn test_from_toml_str_partial() {
		let config = TrackConfig::from_toml_str(
			r#"
			server_url = "https://collect.example.com/sa"
			debug_mode = "debug_and_track"
			flush_before_background = true
			"#,
		)
		.unwrap();

		assert_eq!(config.server_url.as_deref(), Some("https://collect.example.com/sa"));
		assert_eq!(config.debug_mode, DebugMode::DebugAndTrack);
		assert!(config.flush_before_background);
		assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
	}

	#[test]
	fn test_from_toml_str_rejects_bad_values() {
		assert!(matches!(
			TrackConfig::from_toml_str("debug_mode = \"loud\""),
			Err(ConfigError::TomlParse { .. })
		));
		assert!(matches!(
			TrackConfig::from_toml_str("queue_capacity = 0"),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_load_from_file() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("track.toml");
		std::fs::write(&path, "flush_interval_ms = 15000\n").unwrap();

		let config = TrackConfig::load(&path).unwrap();
		assert_eq!(config.flush_interval_ms, 15_000);

		assert!(matches!(
			TrackConfig::load(tmp.path().join("missing.toml")),
			Err(ConfigError::Io(_))
		));
	}

	#[test]
	fn test_env_overrides() {
		let config = TrackConfig::default()
			.apply_env(env(&[
				(ENV_SERVER_URL, "http://localhost:8106/sa"),
				(ENV_DEBUG_MODE, "debug-only"),
				(ENV_FLUSH_INTERVAL_MS, "2500"),
				(ENV_FLUSH_BEFORE_BACKGROUND, "1"),
				(ENV_STORAGE_DIR, "/tmp/track"),
			]))
			.unwrap();

		assert_eq!(config.server_url.as_deref(), Some("http://localhost:8106/sa"));
		assert_eq!(config.debug_mode, DebugMode::DebugOnly);
		assert_eq!(config.flush_interval_ms, 2_500);
		assert!(config.flush_before_background);
		assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/track")));
	}

	#[test]
	fn test_env_override_rejects_garbage() {
		let result = TrackConfig::default().apply_env(env(&[(ENV_FLUSH_INTERVAL_MS, "soon")]));
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

		let result = TrackConfig::default().apply_env(env(&[(ENV_DEBUG_MODE, "verbose")]));
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_empty_env_values_are_ignored() {
		let config = TrackConfig::default()
			.apply_env(env(&[(ENV_SERVER_URL, "")]))
			.unwrap();
		assert_eq!(config.server_url, None);
	}

	#[test]
	fn test_normalize_server_url() {
		assert_eq!(
			normalize_server_url("https://collect.example.com/sa/").as_deref(),
			Some("https://collect.example.com/sa")
		);
		assert_eq!(
			normalize_server_url("http://localhost:8106").as_deref(),
			Some("http://localhost:8106")
		);
		assert_eq!(normalize_server_url("ftp://example.com"), None);
		assert_eq!(normalize_server_url("/relative/path"), None);
		assert_eq!(normalize_server_url(""), None);
	}
}
