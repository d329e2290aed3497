// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The active distinct id and the one-shot signup transition.

use std::sync::{Arc, Mutex, MutexGuard};

use loom_track_core::{validate_distinct_id, Composed};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, TrackError};
use crate::store::KeyValueStore;

pub(crate) const DISTINCT_ID_KEY: &str = "identity.distinct_id";
pub(crate) const SIGNED_UP_KEY: &str = "identity.signed_up";

#[derive(Debug, Default)]
struct IdentityInner {
	distinct_id: Option<String>,
	signed_up: bool,
}

/// Persisted identity: the current distinct id and whether signup happened.
pub struct IdentityState {
	store: Arc<dyn KeyValueStore>,
	inner: Mutex<IdentityInner>,
}

impl IdentityState {
	/// Loads identity from `store`. Unreadable values are treated as absent.
	pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
		let distinct_id = match store.get(DISTINCT_ID_KEY) {
			Ok(Some(bytes)) => String::from_utf8(bytes)
				.ok()
				.filter(|id| validate_distinct_id(id).is_ok()),
			Ok(None) => None,
			Err(e) => {
				warn!(error = %e, "Failed to read distinct_id");
				None
			}
		};
		let signed_up = match store.get(SIGNED_UP_KEY) {
			Ok(Some(bytes)) => bytes.as_slice() == b"true",
			Ok(None) => false,
			Err(e) => {
				warn!(error = %e, "Failed to read signup flag");
				false
			}
		};

		Self {
			store,
			inner: Mutex::new(IdentityInner {
				distinct_id,
				signed_up,
			}),
		}
	}

	fn lock(&self) -> MutexGuard<'_, IdentityInner> {
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Returns the distinct id, generating and persisting an anonymous one on first use.
	pub fn distinct_id_or_generate(&self) -> String {
		let mut inner = self.lock();
		if let Some(id) = &inner.distinct_id {
			return id.clone();
		}
		let id = Uuid::new_v4().to_string();
		debug!(distinct_id = %id, "Generated anonymous distinct_id");
		self.persist(DISTINCT_ID_KEY, id.as_bytes());
		inner.distinct_id = Some(id.clone());
		id
	}

	/// Replaces the distinct id.
	pub fn identify(&self, id: &str) -> Result<()> {
		validate_distinct_id(id)?;
		let mut inner = self.lock();
		self.persist(DISTINCT_ID_KEY, id.as_bytes());
		inner.distinct_id = Some(id.to_string());
		debug!(distinct_id = %id, "Identified");
		Ok(())
	}

	pub fn has_signed_up(&self) -> bool {
		self.lock().signed_up
	}

	/// Performs the signup transition.
	///
	/// `compose` receives the prior distinct id and builds the signup record.
	/// On success the distinct id becomes `new_id` and the signed-up flag is
	/// persisted before this returns, so every record composed afterwards
	/// carries the new id.
	pub fn sign_up<F>(&self, new_id: &str, compose: F) -> Result<Composed>
	where
		F: FnOnce(&str) -> std::result::Result<Composed, loom_track_core::ValidationError>,
	{
		let mut inner = self.lock();
		if inner.signed_up {
			warn!(distinct_id = %new_id, "sign_up called after signup already happened");
			return Err(TrackError::AlreadySignedUp);
		}

		let original_id = match &inner.distinct_id {
			Some(id) => id.clone(),
			None => Uuid::new_v4().to_string(),
		};
		let composed = compose(&original_id)?;

		self.persist(DISTINCT_ID_KEY, new_id.as_bytes());
		self.persist(SIGNED_UP_KEY, b"true");
		inner.distinct_id = Some(new_id.to_string());
		inner.signed_up = true;

		info!(original_id = %original_id, distinct_id = %new_id, "Signed up");
		Ok(composed)
	}

	fn persist(&self, key: &str, value: &[u8]) {
		if let Err(e) = self.store.put(key, value) {
			warn!(key, error = %e, "Failed to persist identity");
		}
	}
}
