// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Composed event records.
//!
//! A record is built once by the resolver or a profile operation and never
//! mutated afterwards; the queue and delivery client only clone and serialize it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::PropertyMap;

/// Event name carried by signup records.
pub const SIGNUP_EVENT: &str = "$SignUp";

/// The kind of record, serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	Track,
	Signup,
	ProfileSet,
	ProfileSetOnce,
	ProfileUnset,
	ProfileIncrement,
	ProfileAppend,
	ProfileDelete,
}

impl EventType {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::Track => "track",
			EventType::Signup => "signup",
			EventType::ProfileSet => "profile_set",
			EventType::ProfileSetOnce => "profile_set_once",
			EventType::ProfileUnset => "profile_unset",
			EventType::ProfileIncrement => "profile_increment",
			EventType::ProfileAppend => "profile_append",
			EventType::ProfileDelete => "profile_delete",
		}
	}

	/// Returns true for the `profile_*` family.
	pub fn is_profile(&self) -> bool {
		!matches!(self, EventType::Track | EventType::Signup)
	}
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One composed unit of tracked behavior or profile mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
	#[serde(rename = "type")]
	kind: EventType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	event: Option<String>,
	distinct_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	original_id: Option<String>,
	#[serde(default)]
	properties: PropertyMap,
	#[serde(with = "chrono::serde::ts_milliseconds")]
	time: DateTime<Utc>,
}

impl EventRecord {
	/// Creates a `track` record.
	pub fn track(event: impl Into<String>, distinct_id: impl Into<String>, properties: PropertyMap) -> Self {
		Self::build(EventType::Track, Some(event.into()), distinct_id.into(), None, properties)
	}

	/// Creates a `signup` record linking `original_id` to `distinct_id`.
	pub fn signup(
		distinct_id: impl Into<String>,
		original_id: impl Into<String>,
		properties: PropertyMap,
	) -> Self {
		Self::build(
			EventType::Signup,
			Some(SIGNUP_EVENT.to_string()),
			distinct_id.into(),
			Some(original_id.into()),
			properties,
		)
	}

	/// Creates a profile record of the given kind.
	///
	/// `kind` must be one of the `profile_*` types; track and signup records
	/// have their own constructors.
	pub fn profile(kind: EventType, distinct_id: impl Into<String>, properties: PropertyMap) -> Self {
		debug_assert!(kind.is_profile(), "profile() called with {kind}");
		Self::build(kind, None, distinct_id.into(), None, properties)
	}

	fn build(
		kind: EventType,
		event: Option<String>,
		distinct_id: String,
		original_id: Option<String>,
		properties: PropertyMap,
	) -> Self {
		// Millisecond precision is what goes over the wire and into the queue.
		let now = Utc::now();
		let time = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
		Self {
			kind,
			event,
			distinct_id,
			original_id,
			properties,
			time,
		}
	}

	/// Overrides the record timestamp (builder pattern).
	pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
		self.time = time;
		self
	}

	pub fn kind(&self) -> EventType {
		self.kind
	}

	pub fn event(&self) -> Option<&str> {
		self.event.as_deref()
	}

	pub fn distinct_id(&self) -> &str {
		&self.distinct_id
	}

	pub fn original_id(&self) -> Option<&str> {
		self.original_id.as_deref()
	}

	pub fn properties(&self) -> &PropertyMap {
		&self.properties
	}

	pub fn time(&self) -> DateTime<Utc> {
		self.time
	}
}
