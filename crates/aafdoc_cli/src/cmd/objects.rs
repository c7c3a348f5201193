use std::path::PathBuf;

use aafdoc::aaf::{MxfFile, ReadOptions, Result};

use crate::cmd::util::{emit_json, fields_json, mxf_value_text};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Only list objects of this class (case-insensitive).
	#[arg(long)]
	pub class: Option<String>,
	/// Print decoded fields under each object.
	#[arg(long)]
	pub fields: bool,
	/// Keep local sets of unrecognized classes.
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub json: bool,
}

/// List decoded local sets in file order.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		class,
		fields,
		all,
		json,
	} = args;

	let opt = if all { ReadOptions::for_inspection() } else { ReadOptions::default() };
	let file = MxfFile::open_with(&path, &opt)?;
	let selected: Vec<_> = file
		.objects()
		.iter()
		.filter(|obj| class.as_deref().is_none_or(|want| obj.class.as_str().eq_ignore_ascii_case(want)))
		.collect();

	if json {
		let payload = ObjectsJson {
			path: path.display().to_string(),
			count: selected.len(),
			objects: selected
				.iter()
				.map(|obj| ObjectJson {
					class: obj.class.to_string(),
					instance_id: obj.instance_id.to_string(),
					offset: obj.offset,
					fields: fields_json(obj),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("objects: {}", selected.len());
	for obj in selected {
		println!("{:>10}  {:<20} {}", obj.offset, obj.class.to_string(), obj.instance_id);
		if fields {
			for (field, value) in obj.fields() {
				println!("{:>12}{field}: {}", "", mxf_value_text(value));
			}
		}
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct ObjectsJson {
	path: String,
	count: usize,
	objects: Vec<ObjectJson>,
}

#[derive(serde::Serialize)]
struct ObjectJson {
	class: String,
	instance_id: String,
	offset: usize,
	fields: serde_json::Map<String, serde_json::Value>,
}
