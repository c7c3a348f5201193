use std::path::PathBuf;

use aafdoc::aaf::{AafObject, ContentModel, Dictionary, LinkOptions, MxfFile, Result, TypeRegistry, link_file};
use tracing::debug;

use crate::cmd::util::{emit_json, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Container definition assigned to picture descriptors.
	#[arg(long, default_value = "AAFKLV")]
	pub container: String,
	#[arg(long)]
	pub json: bool,
}

/// Link the file's packages into an empty model and report per-package results.
pub fn run(args: Args) -> Result<()> {
	let Args { path, container, json } = args;

	let file = MxfFile::open(&path)?;
	let registry = Dictionary::builtin();
	let mut model = ContentModel::new();
	let opt = LinkOptions { container_def: container };
	let report = link_file(&file, &registry, &mut model, &opt)?;
	debug!(
		linked = report.linked.len(),
		skipped = report.skipped.len(),
		failed = report.failed.len(),
		"link finished"
	);

	let mobs: Vec<_> = report
		.linked
		.iter()
		.filter_map(|mob_id| model.mob(mob_id))
		.map(|mob| summarize(&registry, mob))
		.collect::<Result<_>>()?;

	if json {
		let payload = LinkJson {
			path: path.display().to_string(),
			clean: report.is_clean(),
			linked: report.linked.iter().map(ToString::to_string).collect(),
			skipped: report.skipped.iter().map(ToString::to_string).collect(),
			failed: report
				.failed
				.iter()
				.map(|failure| FailureJson {
					package: failure.package.map(|id| id.to_string()),
					mob_id: failure.mob_id.map(|id| id.to_string()),
					error: failure.error.to_string(),
				})
				.collect(),
			mobs,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("linked: {}", report.linked.len());
	println!("skipped: {}", report.skipped.len());
	println!("failed: {}", report.failed.len());
	for mob in &mobs {
		println!(
			"  {} {} name={} slots={}",
			mob.class,
			mob.mob_id,
			mob.name.as_deref().unwrap_or("-"),
			mob.slots.len()
		);
		for slot in &mob.slots {
			println!("    slot {} {}", slot.slot_id, slot.segment);
		}
	}
	for failure in &report.failed {
		let package = failure.package.map(|id| id.to_string()).unwrap_or_else(|| "?".to_owned());
		println!("  failed {package}: {}", failure.error);
	}

	Ok(())
}

fn summarize(registry: &dyn TypeRegistry, mob: &AafObject) -> Result<MobJson> {
	let mob_id = mob.value(registry, "MobID")?.map(|value| value.to_string()).unwrap_or_default();
	let name = mob.value(registry, "Name")?.and_then(|value| value.as_str().map(str::to_owned));

	let mut slots = Vec::new();
	for slot in mob.children("Slots") {
		let slot_id = mob_slot_id(registry, slot)?;
		let segment = slot.child("Segment").map(|seg| seg.class_name().to_owned()).unwrap_or_default();
		slots.push(SlotJson { slot_id, segment });
	}

	let descriptor = match mob.child("EssenceDescription") {
		Some(desc) => Some(DescriptorJson {
			class: desc.class_name().to_owned(),
			properties: desc
				.properties()
				.iter()
				.filter_map(|prop| {
					let value = mob_property(registry, desc, &prop.name)?;
					Some((prop.name.to_string(), value))
				})
				.collect(),
		}),
		None => None,
	};

	Ok(MobJson {
		class: mob.class_name().to_owned(),
		mob_id,
		name,
		slots,
		descriptor,
	})
}

fn mob_slot_id(registry: &dyn TypeRegistry, slot: &AafObject) -> Result<u64> {
	let slot_id = slot.value(registry, "SlotID")?;
	Ok(slot_id.and_then(|value| value.as_integer()).and_then(|id| u64::try_from(id).ok()).unwrap_or_default())
}

/// Cooked value of a value-typed property; child properties yield `None`.
fn mob_property(registry: &dyn TypeRegistry, obj: &AafObject, name: &str) -> Option<serde_json::Value> {
	obj.value(registry, name).ok().flatten().map(|value| value_json(&value))
}

#[derive(serde::Serialize)]
struct LinkJson {
	path: String,
	clean: bool,
	linked: Vec<String>,
	skipped: Vec<String>,
	failed: Vec<FailureJson>,
	mobs: Vec<MobJson>,
}

#[derive(serde::Serialize)]
struct FailureJson {
	package: Option<String>,
	mob_id: Option<String>,
	error: String,
}

#[derive(serde::Serialize)]
struct MobJson {
	class: String,
	mob_id: String,
	name: Option<String>,
	slots: Vec<SlotJson>,
	descriptor: Option<DescriptorJson>,
}

#[derive(serde::Serialize)]
struct SlotJson {
	slot_id: u64,
	segment: String,
}

#[derive(serde::Serialize)]
struct DescriptorJson {
	class: String,
	properties: serde_json::Map<String, serde_json::Value>,
}
