// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Composition of track and signup records.

use crate::error::{Result, ValidationError};
use crate::record::EventRecord;
use crate::resolve::resolve;
use crate::validate::{validate_distinct_id, validate_event_name};
use crate::value::{Properties, PropertyMap};

/// A composed record together with the properties that were dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
	pub record: EventRecord,
	pub warnings: Vec<ValidationError>,
}

/// Composes a `track` record for `distinct_id`.
///
/// Fails only when the event name itself is invalid; bad properties become warnings.
pub fn compose_track(
	event: &str,
	distinct_id: &str,
	call_site: &Properties,
	super_properties: &Properties,
	automatic: &PropertyMap,
) -> Result<Composed> {
	validate_event_name(event)?;
	let resolution = resolve(call_site, super_properties, automatic);
	Ok(Composed {
		record: EventRecord::track(event, distinct_id, resolution.properties),
		warnings: resolution.warnings,
	})
}

/// Composes a `signup` record moving `original_id` onto `new_id`.
pub fn compose_signup(
	new_id: &str,
	original_id: &str,
	call_site: &Properties,
	super_properties: &Properties,
	automatic: &PropertyMap,
) -> Result<Composed> {
	validate_distinct_id(new_id)?;
	let resolution = resolve(call_site, super_properties, automatic);
	Ok(Composed {
		record: EventRecord::signup(new_id, original_id, resolution.properties),
		warnings: resolution.warnings,
	})
}
