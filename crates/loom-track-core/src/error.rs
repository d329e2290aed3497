// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors raised while composing records.

use thiserror::Error;

/// A malformed name or value supplied by the caller.
///
/// These are always recovered locally: a bad property is dropped from the
/// merged map, while a bad event name or profile target means no record is
/// produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("invalid property name: {0:?}")]
	InvalidPropertyName(String),

	#[error("invalid value for property {key:?}: {reason}")]
	InvalidPropertyValue { key: String, reason: String },

	#[error("invalid event name: {0:?}")]
	InvalidEventName(String),

	#[error("invalid distinct_id: {0:?}")]
	InvalidDistinctId(String),

	#[error("increment target {key:?} is not numeric")]
	NonNumericIncrement { key: String },

	#[error("append target {key:?} is not a set of strings")]
	NonStringSetAppend { key: String },

	#[error("profile update carries no valid properties")]
	EmptyProfile,
}

impl ValidationError {
	pub(crate) fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidPropertyValue {
			key: key.into(),
			reason: reason.into(),
		}
	}
}

/// A specialized `Result` type for record composition.
pub type Result<T> = std::result::Result<T, ValidationError>;
