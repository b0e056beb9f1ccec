//! `[[preference]]` declarations.

use std::collections::BTreeSet;

use prefs_registry::{PrefError, PreferenceEntry, RegisterEntry};
use serde::Deserialize;

use crate::{ConfigError, Result};

/// One declared preference.
///
/// ```toml
/// [[preference]]
/// key = "volume"
/// type = "int"
/// default = 5
/// ```
///
/// `type` is one of `bool`, `int`, `long`, `float`, `double`, `string`,
/// `string_set` or `json`. A `json` preference accepts any TOML value as its
/// default and is stored as a JSON string payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferenceDecl {
	pub key: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub default: toml::Value,
}

impl PreferenceDecl {
	/// Converts the declaration into a registry entry.
	pub fn to_entry(&self) -> Result<Box<dyn RegisterEntry>> {
		let key = self.key.clone();
		let entry: Box<dyn RegisterEntry> = match self.kind.as_str() {
			"bool" => PreferenceEntry::native(key, self.require(self.default.as_bool(), "a boolean")?).into(),
			"int" => {
				let wide = self.require(self.default.as_integer(), "an integer")?;
				let narrow = i32::try_from(wide).map_err(|_| self.invalid(format!("{wide} does not fit in 32 bits")))?;
				PreferenceEntry::native(key, narrow).into()
			}
			"long" => PreferenceEntry::native(key, self.require(self.default.as_integer(), "an integer")?).into(),
			"float" => {
				let wide = self.number()?;
				let narrow = wide as f32;
				if !narrow.is_finite() {
					return Err(self.invalid(format!("{wide} does not fit in a 32-bit float")));
				}
				PreferenceEntry::native(key, narrow).into()
			}
			"double" => PreferenceEntry::native(key, self.number()?).into(),
			"string" => PreferenceEntry::native(key, self.require(self.default.as_str(), "a string")?.to_string()).into(),
			"string_set" => PreferenceEntry::native(key, self.string_set()?).into(),
			"json" => {
				let value = serde_json::to_value(&self.default).map_err(|e| self.invalid(e.to_string()))?;
				PreferenceEntry::<serde_json::Value>::json(key, value).into()
			}
			other => {
				return Err(PrefError::UnsupportedType {
					key,
					type_name: other.to_string(),
					reason: "no codec for declared type".to_string(),
				}
				.into());
			}
		};
		Ok(entry)
	}

	fn number(&self) -> Result<f64> {
		match &self.default {
			toml::Value::Float(v) if v.is_finite() => Ok(*v),
			toml::Value::Integer(v) => Ok(*v as f64),
			_ => Err(self.invalid("expected a finite number".to_string())),
		}
	}

	fn string_set(&self) -> Result<BTreeSet<String>> {
		let items = self.require(self.default.as_array(), "an array of strings")?;
		items
			.iter()
			.map(|item| {
				item.as_str()
					.map(str::to_string)
					.ok_or_else(|| self.invalid(format!("set item {item} is not a string")))
			})
			.collect()
	}

	fn require<T>(&self, value: Option<T>, what: &str) -> Result<T> {
		value.ok_or_else(|| self.invalid(format!("expected {what}")))
	}

	fn invalid(&self, reason: String) -> ConfigError {
		ConfigError::InvalidDefault {
			key: self.key.clone(),
			kind: self.kind.clone(),
			reason,
		}
	}
}
