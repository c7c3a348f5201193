use std::path::PathBuf;

use aafdoc::aaf::{MxfFile, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print partition, operational pattern, primer, and object statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = MxfFile::open(&path)?;
	let pattern = file.operational_pattern().map(|op| op.as_str()).unwrap_or("unrecognized");
	let pattern_label = file.operational_pattern_label().map(|label| label.to_string());
	let counts = file.class_counts();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			partition: file.partition.as_ref().map(|partition| PartitionJson {
				kind: partition.kind.as_str(),
				version: format!("{}.{}", partition.major_version, partition.minor_version),
				kag_size: partition.kag_size,
				header_byte_count: partition.header_byte_count,
				index_byte_count: partition.index_byte_count,
				body_sid: partition.body_sid,
				essence_containers: partition.essence_containers.iter().map(ToString::to_string).collect(),
			}),
			operational_pattern: pattern,
			operational_pattern_label: pattern_label,
			primer_entries: file.primer.len(),
			units: file.stats.units,
			partitions: file.stats.partitions,
			local_sets: file.stats.local_sets,
			unknown_sets: file.stats.unknown_sets,
			objects: file.objects().len(),
			classes: counts
				.iter()
				.map(|&(class, count)| ClassCountJson { class, count })
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	match &file.partition {
		Some(partition) => {
			println!("partition: {}", partition.kind.as_str());
			println!("version: {}.{}", partition.major_version, partition.minor_version);
			println!("kag_size: {}", partition.kag_size);
			println!("header_byte_count: {}", partition.header_byte_count);
			println!("essence_containers: {}", partition.essence_containers.len());
		}
		None => println!("partition: none"),
	}
	println!("operational_pattern: {pattern}");
	println!("operational_pattern_label: {}", pattern_label.as_deref().unwrap_or("-"));
	println!("primer_entries: {}", file.primer.len());
	println!("units: {}", file.stats.units);
	println!("local_sets: {}", file.stats.local_sets);
	println!("unknown_sets: {}", file.stats.unknown_sets);
	println!("objects: {}", file.objects().len());

	println!("classes:");
	for (class, count) in counts {
		println!("  {class}: {count}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	partition: Option<PartitionJson>,
	operational_pattern: &'static str,
	operational_pattern_label: Option<String>,
	primer_entries: usize,
	units: usize,
	partitions: usize,
	local_sets: usize,
	unknown_sets: usize,
	objects: usize,
	classes: Vec<ClassCountJson>,
}

#[derive(serde::Serialize)]
struct PartitionJson {
	kind: &'static str,
	version: String,
	kag_size: u32,
	header_byte_count: u64,
	index_byte_count: u64,
	body_sid: u32,
	essence_containers: Vec<String>,
}

#[derive(serde::Serialize)]
struct ClassCountJson {
	class: &'static str,
	count: usize,
}
