// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key/value persistence capability and its built-in implementations.
//!
//! The SDK keeps identity, super properties, and queue entries in whatever
//! store the host provides. [`FileStore`] writes one file per key with an
//! atomic rename so a crash never leaves a torn value behind; [`MemoryStore`]
//! is used in tests and as the fallback when no directory is usable.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("invalid store key: {0:?}")]
	InvalidKey(String),

	#[error("store lock poisoned")]
	LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable byte storage keyed by string.
///
/// Keys are restricted to ASCII letters, digits, `.`, `_` and `-`.
pub trait KeyValueStore: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

	fn put(&self, key: &str, value: &[u8]) -> Result<()>;

	/// Removes a key. Removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<()>;
}

fn check_key(key: &str) -> Result<()> {
	let valid = !key.is_empty()
		&& key
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
	if valid {
		Ok(())
	} else {
		Err(StoreError::InvalidKey(key.to_string()))
	}
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
	dir: PathBuf,
}

impl FileStore {
	/// Opens (creating if needed) a store rooted at `dir`.
	pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn path_for(&self, key: &str) -> Result<PathBuf> {
		check_key(key)?;
		Ok(self.dir.join(key))
	}
}

impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
		let path = self.path_for(key)?;
		match fs::read(&path) {
			Ok(bytes) => Ok(Some(bytes)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	fn put(&self, key: &str, value: &[u8]) -> Result<()> {
		let path = self.path_for(key)?;
		let temp_path = path.with_extension("tmp");
		{
			let mut opts = OpenOptions::new();
			opts.create(true).write(true).truncate(true);
			#[cfg(unix)]
			opts.mode(0o600); // Only owner can read/write
			let mut file = opts.open(&temp_path)?;
			file.write_all(value)?;
			file.sync_all()?;
		}
		fs::rename(&temp_path, &path)?;
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		let path = self.path_for(key)?;
		match fs::remove_file(&path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}

/// Process-local store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of every stored entry.
	pub fn snapshot(&self) -> HashMap<String, Vec<u8>> {
		self.entries
			.lock()
			.map(|entries| entries.clone())
			.unwrap_or_default()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
		check_key(key)?;
		let entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
		Ok(entries.get(key).cloned())
	}

	fn put(&self, key: &str, value: &[u8]) -> Result<()> {
		check_key(key)?;
		let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
		entries.insert(key.to_string(), value.to_vec());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		check_key(key)?;
		let mut entries = self.entries.lock().map_err(|_| StoreError::LockPoisoned)?;
		entries.remove(key);
		Ok(())
	}
}
