// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted super properties merged into every track and signup record.

use std::sync::{Arc, Mutex, MutexGuard};

use loom_track_core::{is_valid_property_name, Properties, ValidationError};
use tracing::{debug, warn};

use crate::store::KeyValueStore;

pub(crate) const SUPER_PROPERTIES_KEY: &str = "super_properties";

pub struct SuperProperties {
	store: Arc<dyn KeyValueStore>,
	current: Mutex<Properties>,
}

impl SuperProperties {
	pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
		let current = match store.get(SUPER_PROPERTIES_KEY) {
			Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
				warn!(error = %e, "Discarding unreadable super properties");
				Properties::new()
			}),
			Ok(None) => Properties::new(),
			Err(e) => {
				warn!(error = %e, "Failed to read super properties");
				Properties::new()
			}
		};

		Self {
			store,
			current: Mutex::new(current),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Properties> {
		self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Merges `properties` into the registered set; new values win.
	///
	/// Only keys are checked here. Values are stored as given and validated
	/// when merged into a record. Entries with invalid keys are skipped and
	/// returned.
	pub fn register(&self, properties: Properties) -> Vec<ValidationError> {
		let mut warnings = Vec::new();
		let mut accepted = Properties::new();
		for (key, input) in properties {
			if is_valid_property_name(&key) {
				accepted = accepted.insert(key, input);
			} else {
				let err = ValidationError::InvalidPropertyName(key);
				warn!(error = %err, "Skipping invalid super property");
				warnings.push(err);
			}
		}

		if !accepted.is_empty() {
			let mut current = self.lock();
			let merged = std::mem::take(&mut *current).merge(accepted);
			*current = merged;
			self.persist(&current);
		}
		warnings
	}

	pub fn unregister(&self, key: &str) {
		let mut current = self.lock();
		if current.remove(key).is_some() {
			self.persist(&current);
		}
	}

	pub fn clear(&self) {
		let mut current = self.lock();
		*current = Properties::new();
		self.persist(&current);
	}

	/// Returns a copy of the registered set.
	pub fn snapshot(&self) -> Properties {
		self.lock().clone()
	}

	fn persist(&self, properties: &Properties) {
		let written = serde_json::to_vec(properties)
			.map_err(crate::store::StoreError::from)
			.and_then(|bytes| self.store.put(SUPER_PROPERTIES_KEY, &bytes));
		match written {
			Ok(()) => debug!(count = properties.len(), "Persisted super properties"),
			Err(e) => warn!(error = %e, "Failed to persist super properties"),
		}
	}
}
