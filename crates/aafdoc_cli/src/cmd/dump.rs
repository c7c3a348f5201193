use std::collections::HashSet;
use std::path::PathBuf;

use aafdoc::aaf::{AafError, Auid, MxfFile, MxfObject, MxfValue, Result, StrongRef};

use crate::cmd::util::{emit_json, fields_json, mxf_value_text, outgoing_refs};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Start from this instance id instead of the preface.
	#[arg(long)]
	pub root: Option<Auid>,
	#[arg(long, default_value_t = 16)]
	pub max_depth: usize,
	#[arg(long)]
	pub json: bool,
}

/// Print the strong-reference tree below the preface.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		root,
		max_depth,
		json,
	} = args;

	let file = MxfFile::open(&path)?;
	let root = match root {
		Some(id) => file.resolve(StrongRef(id)).ok_or(AafError::UnresolvedReference {
			field: "root".to_owned(),
			key: id,
		})?,
		None => file.preface()?,
	};

	let mut walker = Walker {
		file: &file,
		max_depth,
		seen: HashSet::new(),
	};

	if json {
		let tree = walker.node_json(root, 0);
		emit_json(&DumpJson {
			path: path.display().to_string(),
			root: tree,
		});
		return Ok(());
	}

	walker.print(root, None, 0);
	Ok(())
}

struct Walker<'f> {
	file: &'f MxfFile,
	max_depth: usize,
	seen: HashSet<Auid>,
}

impl<'f> Walker<'f> {
	fn print(&mut self, obj: &'f MxfObject, via: Option<&str>, depth: usize) {
		let indent = "  ".repeat(depth);
		let label = via.map(|field| format!("{field}: ")).unwrap_or_default();
		println!("{indent}{label}{} {}", obj.class, obj.instance_id);

		if !self.seen.insert(obj.instance_id) {
			println!("{indent}  (already shown)");
			return;
		}
		for (field, value) in obj.fields() {
			if matches!(value, MxfValue::Value(_)) {
				println!("{indent}  {field} = {}", mxf_value_text(value));
			}
		}
		if depth >= self.max_depth {
			println!("{indent}  (depth limit)");
			return;
		}

		let file = self.file;
		for (field, target) in outgoing_refs(obj) {
			match file.resolve(target) {
				Some(child) => self.print(child, Some(field), depth + 1),
				None => println!("{indent}  {field}: <unresolved {}>", target.0),
			}
		}
	}

	fn node_json(&mut self, obj: &'f MxfObject, depth: usize) -> NodeJson {
		let mut node = NodeJson {
			class: obj.class.to_string(),
			instance_id: obj.instance_id.to_string(),
			fields: fields_json(obj),
			children: Vec::new(),
			repeated: false,
			truncated: false,
		};
		if !self.seen.insert(obj.instance_id) {
			node.fields.clear();
			node.repeated = true;
			return node;
		}
		if depth >= self.max_depth {
			node.truncated = true;
			return node;
		}

		let file = self.file;
		for (field, target) in outgoing_refs(obj) {
			let child = file.resolve(target).map(|child| self.node_json(child, depth + 1));
			node.children.push(EdgeJson {
				field,
				target: target.0.to_string(),
				node: child,
			});
		}
		node
	}
}

#[derive(serde::Serialize)]
struct DumpJson {
	path: String,
	root: NodeJson,
}

#[derive(serde::Serialize)]
struct NodeJson {
	class: String,
	instance_id: String,
	fields: serde_json::Map<String, serde_json::Value>,
	children: Vec<EdgeJson>,
	repeated: bool,
	truncated: bool,
}

#[derive(serde::Serialize)]
struct EdgeJson {
	field: &'static str,
	target: String,
	node: Option<NodeJson>,
}
