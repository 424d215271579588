use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::consts::{DEFAULT_SIMPLIFY_JUST_COALESCE, DEFAULT_SIMPLIFY_THRESHOLD, SIMPLIFY_JUST_COALESCE_PREFERENCE, SIMPLIFY_THRESHOLD_PREFERENCE};
use crate::misc::EditorError;
use crate::utility_traits::PreferenceStore;

/// The user options that drive the simplify command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyPreferences {
	pub threshold: f64,
	pub just_coalesce: bool,
}

impl Default for SimplifyPreferences {
	fn default() -> Self {
		Self {
			threshold: DEFAULT_SIMPLIFY_THRESHOLD,
			just_coalesce: DEFAULT_SIMPLIFY_JUST_COALESCE,
		}
	}
}

impl SimplifyPreferences {
	pub fn load(store: &dyn PreferenceStore) -> Self {
		Self {
			threshold: store.get_double(SIMPLIFY_THRESHOLD_PREFERENCE, DEFAULT_SIMPLIFY_THRESHOLD),
			just_coalesce: store.get_bool(SIMPLIFY_JUST_COALESCE_PREFERENCE, DEFAULT_SIMPLIFY_JUST_COALESCE),
		}
	}

	pub fn store(&self, preferences: &mut MemoryPreferences) {
		preferences.set_double(SIMPLIFY_THRESHOLD_PREFERENCE, self.threshold);
		preferences.set_bool(SIMPLIFY_JUST_COALESCE_PREFERENCE, self.just_coalesce);
	}
}

impl From<SimplifyPreferences> for path_simplify::SimplifyOptions {
	fn from(preferences: SimplifyPreferences) -> Self {
		Self {
			threshold: preferences.threshold,
			just_coalesce: preferences.just_coalesce,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
	Bool(bool),
	Double(f64),
}

/// Preferences kept in memory under slash separated paths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryPreferences {
	values: BTreeMap<String, PreferenceValue>,
}

impl MemoryPreferences {
	pub fn set_double(&mut self, path: &str, value: f64) {
		self.values.insert(path.to_string(), PreferenceValue::Double(value));
	}

	pub fn set_bool(&mut self, path: &str, value: bool) {
		self.values.insert(path.to_string(), PreferenceValue::Bool(value));
	}

	pub fn from_json(json: &str) -> Result<Self, EditorError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn to_json(&self) -> Result<String, EditorError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

impl PreferenceStore for MemoryPreferences {
	fn get_double(&self, path: &str, default: f64) -> f64 {
		match self.values.get(path) {
			Some(PreferenceValue::Double(value)) => *value,
			_ => default,
		}
	}

	fn get_bool(&self, path: &str, default: bool) -> bool {
		match self.values.get(path) {
			Some(PreferenceValue::Bool(value)) => *value,
			_ => default,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn missing_preferences_use_defaults() {
		let preferences = MemoryPreferences::default();
		assert_eq!(SimplifyPreferences::load(&preferences), SimplifyPreferences { threshold: 0.003, just_coalesce: false });
	}

	#[test]
	fn mistyped_preferences_use_defaults() {
		let mut preferences = MemoryPreferences::default();
		preferences.set_bool(SIMPLIFY_THRESHOLD_PREFERENCE, true);
		preferences.set_double(SIMPLIFY_JUST_COALESCE_PREFERENCE, 1.);
		assert_eq!(SimplifyPreferences::load(&preferences), SimplifyPreferences::default());
	}

	#[test]
	fn preferences_round_trip_through_json() {
		let mut preferences = MemoryPreferences::default();
		SimplifyPreferences { threshold: 0.01, just_coalesce: true }.store(&mut preferences);

		let json = preferences.to_json().unwrap();
		assert!(json.contains("\"/options/simplifythreshold/value\": 0.01"));
		let restored = MemoryPreferences::from_json(&json).unwrap();
		assert_eq!(SimplifyPreferences::load(&restored), SimplifyPreferences { threshold: 0.01, just_coalesce: true });
	}

	#[test]
	fn invalid_json_is_reported() {
		assert!(matches!(MemoryPreferences::from_json("{\"/options/simplifythreshold/value\": \"high\"}"), Err(EditorError::Preferences(_))));
	}
}
