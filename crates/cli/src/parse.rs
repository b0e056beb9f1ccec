use std::str::FromStr;

use anyhow::{Context, Result, bail};
use prefs_wire::{WireKind, WireValue};

/// Parses command-line text into the wire variant a binding expects.
pub fn parse_wire(kind: WireKind, text: &str) -> Result<WireValue> {
	let value = match kind {
		WireKind::Bool => match text {
			"true" | "on" | "yes" | "1" => WireValue::Bool(true),
			"false" | "off" | "no" | "0" => WireValue::Bool(false),
			_ => bail!("expected a boolean, got '{text}'"),
		},
		WireKind::Int => WireValue::Int(text.parse().with_context(|| format!("expected a 32-bit integer, got '{text}'"))?),
		WireKind::Long => WireValue::Long(text.parse().with_context(|| format!("expected an integer, got '{text}'"))?),
		WireKind::Float => WireValue::Float(parse_finite(text, f32::is_finite)?),
		WireKind::Double => WireValue::Double(parse_finite(text, f64::is_finite)?),
		WireKind::String => WireValue::String(text.to_string()),
		WireKind::StringSet => WireValue::StringSet(
			text.split(',')
				.map(str::trim)
				.filter(|item| !item.is_empty())
				.map(str::to_string)
				.collect(),
		),
	};
	Ok(value)
}

/// Stores cannot persist infinities or NaN.
fn parse_finite<T>(text: &str, is_finite: fn(T) -> bool) -> Result<T>
where
	T: FromStr + Copy,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	let value: T = text.parse().with_context(|| format!("expected a number, got '{text}'"))?;
	if !is_finite(value) {
		bail!("expected a finite number, got '{text}'");
	}
	Ok(value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_each_kind() {
		assert_eq!(parse_wire(WireKind::Bool, "on").unwrap(), WireValue::Bool(true));
		assert_eq!(parse_wire(WireKind::Int, "8").unwrap(), WireValue::Int(8));
		assert_eq!(parse_wire(WireKind::Long, "-4").unwrap(), WireValue::Long(-4));
		assert_eq!(parse_wire(WireKind::Double, "0.5").unwrap(), WireValue::Double(0.5));
		assert_eq!(parse_wire(WireKind::String, "a, b").unwrap(), WireValue::String("a, b".into()));
		assert_eq!(
			parse_wire(WireKind::StringSet, "fr, en,,en").unwrap(),
			WireValue::StringSet(["en".to_string(), "fr".to_string()].into())
		);
	}

	#[test]
	fn rejects_malformed_numbers() {
		let err = parse_wire(WireKind::Int, "4294967296").unwrap_err();
		assert!(err.to_string().contains("32-bit"), "{err}");
		assert!(parse_wire(WireKind::Bool, "maybe").is_err());
	}

	#[test]
	fn rejects_non_finite_numbers() {
		assert!(parse_wire(WireKind::Float, "inf").is_err());
		assert!(parse_wire(WireKind::Double, "NaN").is_err());
		assert_eq!(parse_wire(WireKind::Float, "1.5").unwrap(), WireValue::Float(1.5));
	}
}
