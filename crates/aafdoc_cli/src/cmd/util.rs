use aafdoc::aaf::{MxfObject, MxfValue, StrongRef, Value};
use serde_json::{Map, Value as Json};

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Convert a cooked value into JSON.
pub(crate) fn value_json(value: &Value) -> Json {
	match value {
		Value::Bool(flag) => Json::Bool(*flag),
		Value::I64(number) => Json::from(*number),
		Value::U64(number) => Json::from(*number),
		Value::String(text) => Json::String(text.clone()),
		Value::Enum(label) => Json::String(label.to_string()),
		Value::Bytes(bytes) => Json::from(bytes.len()),
		Value::Array(items) => Json::Array(items.iter().map(value_json).collect()),
		Value::Set(items) => Json::Array(items.iter().map(value_json).collect()),
		Value::Record(record) => {
			let mut out = Map::new();
			for field in &record.fields {
				out.insert(field.name.to_string(), value_json(&field.value));
			}
			Json::Object(out)
		}
		other => Json::String(other.to_string()),
	}
}

/// Convert a decoded MXF field into JSON; references render as instance ids.
pub(crate) fn mxf_value_json(value: &MxfValue) -> Json {
	match value {
		MxfValue::Value(value) => value_json(value),
		MxfValue::Ref(r) => Json::String(r.0.to_string()),
		MxfValue::RefArray(refs) => Json::Array(refs.iter().map(|r| Json::String(r.0.to_string())).collect()),
	}
}

/// Render a decoded MXF field as one line of text.
pub(crate) fn mxf_value_text(value: &MxfValue) -> String {
	match value {
		MxfValue::Value(value) => value.to_string(),
		MxfValue::Ref(r) => r.to_string(),
		MxfValue::RefArray(refs) => format!("[{} refs]", refs.len()),
	}
}

/// Field map of an object as a JSON object keyed by field name.
pub(crate) fn fields_json(obj: &MxfObject) -> Map<String, Json> {
	obj.fields()
		.map(|(field, value)| (field.as_str().to_owned(), mxf_value_json(value)))
		.collect()
}

/// Outgoing references of an object as `(field, target)` pairs in field order.
pub(crate) fn outgoing_refs(obj: &MxfObject) -> Vec<(&'static str, StrongRef)> {
	let mut out = Vec::new();
	for (field, value) in obj.fields() {
		match value {
			MxfValue::Ref(r) => out.push((field.as_str(), *r)),
			MxfValue::RefArray(refs) => out.extend(refs.iter().map(|r| (field.as_str(), *r))),
			MxfValue::Value(_) => {}
		}
	}
	out
}
