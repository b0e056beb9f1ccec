use std::collections::BTreeSet;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use super::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Layout {
	columns: u8,
	dense: bool,
	label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(u8, u8, u8);

fn rgb_codec() -> FnCodec<Rgb> {
	FnCodec::new(
		|c| format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2),
		|s| {
			let hex = s.strip_prefix('#').ok_or_else(|| format!("missing '#': {s}"))?;
			if hex.len() != 6 {
				return Err(format!("expected 6 hex digits: {s}"));
			}
			let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
			Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
		},
	)
}

#[test]
fn native_codec_passes_values_through() {
	let codec = NativeCodec::<i32>::new();
	assert_eq!(codec.encode(&5).unwrap(), WireValue::Int(5));
	assert_eq!(codec.decode(&WireValue::Int(8)).unwrap(), 8);
	assert_eq!(codec.wire_kind(), WireKind::Int);
}

#[test]
fn native_codec_rejects_other_variants() {
	let codec = NativeCodec::<i32>::new();
	let err = codec.decode(&WireValue::Long(8)).unwrap_err();
	assert!(matches!(
		err,
		CodecError::KindMismatch {
			expected: WireKind::Int,
			found: WireKind::Long
		}
	));
}

#[test]
fn json_codec_stores_string_payload() {
	let codec = JsonCodec::<Layout>::new();
	let layout = Layout {
		columns: 3,
		dense: true,
		label: "grid".into(),
	};
	let wire = codec.encode(&layout).unwrap();
	assert_eq!(wire.kind(), WireKind::String);
	assert_eq!(wire.as_str(), Some(r#"{"columns":3,"dense":true,"label":"grid"}"#));
}

#[test]
fn json_codec_rejects_malformed_payload() {
	let codec = JsonCodec::<Layout>::new();
	assert!(matches!(
		codec.decode(&WireValue::String("{not json".into())),
		Err(CodecError::Json(_))
	));
	assert!(matches!(
		codec.decode(&WireValue::Int(1)),
		Err(CodecError::KindMismatch { .. })
	));
}

#[test]
fn fn_codec_round_trips_colors() {
	let codec = rgb_codec();
	let wire = codec.encode(&Rgb(0xff, 0x80, 0x00)).unwrap();
	assert_eq!(wire, WireValue::String("#ff8000".into()));
	assert_eq!(codec.decode(&wire).unwrap(), Rgb(0xff, 0x80, 0x00));
}

#[test]
fn fn_codec_reports_decoder_message() {
	let err = rgb_codec().decode(&WireValue::String("red".into())).unwrap_err();
	assert_eq!(err.to_string(), "malformed payload: missing '#': red");
}

#[test]
fn wire_value_serializes_tagged() {
	let json = serde_json::to_string(&WireValue::Int(8)).unwrap();
	assert_eq!(json, r#"{"type":"int","value":8}"#);

	let set: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();
	let back: WireValue = serde_json::from_str(r#"{"type":"string_set","value":["b","a"]}"#).unwrap();
	assert_eq!(back, WireValue::StringSet(set));
}

fn round_trip<T, C>(codec: &C, value: T) -> Result<(), TestCaseError>
where
	T: PartialEq + std::fmt::Debug,
	C: Codec<T>,
{
	let wire = codec.encode(&value).map_err(|e| TestCaseError::fail(e.to_string()))?;
	prop_assert_eq!(wire.kind(), codec.wire_kind());
	let back = codec.decode(&wire).map_err(|e| TestCaseError::fail(e.to_string()))?;
	prop_assert_eq!(back, value);
	Ok(())
}

proptest! {
	/// `decode(encode(v)) == v` for every supported codec.
	#[test]
	fn prop_codecs_round_trip(
		b in any::<bool>(),
		i in any::<i32>(),
		l in any::<i64>(),
		d in -1.0e12f64..1.0e12,
		s in ".*",
		set in proptest::collection::btree_set("[a-z]{0,8}", 0..6),
		columns in any::<u8>(),
		rgb in any::<(u8, u8, u8)>(),
	) {
		round_trip(&NativeCodec::<bool>::new(), b)?;
		round_trip(&NativeCodec::<i32>::new(), i)?;
		round_trip(&NativeCodec::<i64>::new(), l)?;
		round_trip(&NativeCodec::<f64>::new(), d)?;
		round_trip(&NativeCodec::<String>::new(), s.clone())?;
		round_trip(&NativeCodec::<BTreeSet<String>>::new(), set)?;
		round_trip(&JsonCodec::<Layout>::new(), Layout { columns, dense: b, label: s })?;
		round_trip(&rgb_codec(), Rgb(rgb.0, rgb.1, rgb.2))?;
	}
}
