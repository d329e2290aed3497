// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile operations translated into records.
//!
//! Every operation yields exactly one `profile_*` record carrying a single
//! property map, or a [`ValidationError`] and no record at all. Profile
//! records never carry super or automatic properties.

use crate::compose::Composed;
use crate::error::{Result, ValidationError};
use crate::record::{EventRecord, EventType};
use crate::resolve::{resolve, validate_entry};
use crate::validate::is_valid_property_name;
use crate::value::{Properties, PropertyInput, PropertyMap, PropertyValue};

/// Sets profile properties, overwriting existing values.
pub fn set(distinct_id: &str, properties: &Properties) -> Result<Composed> {
	compose_validated(EventType::ProfileSet, distinct_id, properties)
}

/// Sets profile properties only where they are not already present.
pub fn set_once(distinct_id: &str, properties: &Properties) -> Result<Composed> {
	compose_validated(EventType::ProfileSetOnce, distinct_id, properties)
}

/// Removes a single profile property.
pub fn unset(distinct_id: &str, key: &str) -> Result<EventRecord> {
	if !is_valid_property_name(key) {
		return Err(ValidationError::InvalidPropertyName(key.to_string()));
	}
	let mut properties = PropertyMap::new();
	properties.insert(key.to_string(), PropertyValue::Boolean(true));
	Ok(EventRecord::profile(EventType::ProfileUnset, distinct_id, properties))
}

/// Adds numeric amounts to profile properties.
///
/// Every amount must be numeric; a single non-numeric entry rejects the
/// whole operation.
pub fn increment(distinct_id: &str, amounts: &Properties) -> Result<EventRecord> {
	let mut properties = PropertyMap::new();
	for (key, input) in amounts.iter() {
		let value = validate_entry(key, input)
			.ok()
			.filter(PropertyValue::is_number)
			.ok_or_else(|| ValidationError::NonNumericIncrement { key: key.clone() })?;
		properties.insert(key.clone(), value);
	}
	if properties.is_empty() {
		return Err(ValidationError::EmptyProfile);
	}
	Ok(EventRecord::profile(EventType::ProfileIncrement, distinct_id, properties))
}

/// Appends strings to a set-valued profile property.
pub fn append(distinct_id: &str, key: &str, values: PropertyInput) -> Result<EventRecord> {
	let value = validate_entry(key, &values)?;
	if !value.is_string_set() {
		return Err(ValidationError::NonStringSetAppend {
			key: key.to_string(),
		});
	}
	let mut properties = PropertyMap::new();
	properties.insert(key.to_string(), value);
	Ok(EventRecord::profile(EventType::ProfileAppend, distinct_id, properties))
}

/// Deletes the whole profile.
pub fn delete(distinct_id: &str) -> EventRecord {
	EventRecord::profile(EventType::ProfileDelete, distinct_id, PropertyMap::new())
}

fn compose_validated(kind: EventType, distinct_id: &str, properties: &Properties) -> Result<Composed> {
	let resolution = resolve(properties, &Properties::new(), &PropertyMap::new());
	if resolution.properties.is_empty() {
		return Err(ValidationError::EmptyProfile);
	}
	Ok(Composed {
		record: EventRecord::profile(kind, distinct_id, resolution.properties),
		warnings: resolution.warnings,
	})
}
