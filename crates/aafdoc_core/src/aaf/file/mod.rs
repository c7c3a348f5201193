use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::aaf::klv::{KlvIter, MAX_BER_LENGTH_BYTES, TagIter};
use crate::aaf::primer::{MAX_PRIMER_ENTRIES, Primer};
use crate::aaf::{AafError, Auid, Field, MxfClass, MxfObject, OperationalPattern, PartitionHeader, PartitionKind, Result, StrongRef, Value};

/// Read-time limits and policies.
#[derive(Debug, Clone)]
pub struct ReadOptions {
	/// Primer entry count above which the primer is discarded.
	pub max_primer_entries: u32,
	/// Maximum BER long-form length bytes.
	pub max_ber_length_bytes: usize,
	/// Register local sets whose class is outside the dispatch table.
	pub register_unknown_classes: bool,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self {
			max_primer_entries: MAX_PRIMER_ENTRIES,
			max_ber_length_bytes: MAX_BER_LENGTH_BYTES,
			register_unknown_classes: false,
		}
	}
}

impl ReadOptions {
	/// Preset for listing every local set, including unknown classes.
	pub fn for_inspection() -> Self {
		Self {
			register_unknown_classes: true,
			..Self::default()
		}
	}
}

/// KLV unit counts gathered during the parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitStats {
	/// Total KLV units.
	pub units: usize,
	/// Partition packs of any kind.
	pub partitions: usize,
	/// Local sets seen, registered or not.
	pub local_sets: usize,
	/// Local sets skipped for an unknown class.
	pub unknown_sets: usize,
	/// Non-metadata units such as essence and fill.
	pub other_units: usize,
}

/// Parsed MXF file: object table, primer, and header partition.
#[derive(Debug)]
pub struct MxfFile {
	/// First header partition pack, if any.
	pub partition: Option<PartitionHeader>,
	/// Local tag primer in effect at the end of the parse.
	pub primer: Primer,
	/// Unit counts.
	pub stats: UnitStats,
	objects: Vec<MxfObject>,
	by_id: HashMap<Auid, usize>,
	preface: Option<usize>,
}

impl MxfFile {
	/// Read and parse an MXF file from disk with default options.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(path, &ReadOptions::default())
	}

	/// Read and parse an MXF file from disk.
	pub fn open_with(path: impl AsRef<Path>, opt: &ReadOptions) -> Result<Self> {
		let bytes = fs::read(path)?;
		Self::parse(&bytes, opt)
	}

	/// Parse an in-memory file image in a single pass.
	pub fn parse(bytes: &[u8], opt: &ReadOptions) -> Result<Self> {
		let mut file = Self {
			partition: None,
			primer: Primer::default(),
			stats: UnitStats::default(),
			objects: Vec::new(),
			by_id: HashMap::new(),
			preface: None,
		};

		for unit in KlvIter::with_limit(bytes, 0, opt.max_ber_length_bytes) {
			let unit = unit?;
			file.stats.units += 1;

			if Primer::is_primer_key(&unit.key) {
				file.primer = Primer::parse(unit.value, opt.max_primer_entries);
				debug!(offset = unit.offset, entries = file.primer.len(), "primer pack");
				continue;
			}

			if let Some(kind) = PartitionKind::from_key(&unit.key) {
				file.stats.partitions += 1;
				debug!(offset = unit.offset, kind = kind.as_str(), "partition pack");
				if kind == PartitionKind::Header && file.partition.is_none() {
					file.partition = Some(PartitionHeader::parse(kind, unit.value)?);
				}
				continue;
			}

			if !unit.is_local_set() {
				file.stats.other_units += 1;
				continue;
			}

			file.stats.local_sets += 1;
			let class = match MxfClass::from_key(&unit.key) {
				Some(class) => class,
				None if opt.register_unknown_classes => MxfClass::Other(unit.key),
				None => {
					file.stats.unknown_sets += 1;
					warn!(offset = unit.offset, key = %unit.key, "unknown local set class; skipping");
					for item in TagIter::new(unit.value) {
						item?;
					}
					continue;
				}
			};

			if let Some(obj) = MxfObject::read(class, unit.offset, unit.value, &file.primer)? {
				file.register(obj);
			}
		}

		debug!(objects = file.objects.len(), units = file.stats.units, "parsed mxf");
		Ok(file)
	}

	fn register(&mut self, obj: MxfObject) {
		if let Some(&existing) = self.by_id.get(&obj.instance_id) {
			warn!(
				instance_id = %obj.instance_id,
				offset = obj.offset,
				first_offset = self.objects[existing].offset,
				"duplicate instance id; keeping first"
			);
			return;
		}

		let idx = self.objects.len();
		if obj.class == MxfClass::Preface && self.preface.is_none() {
			self.preface = Some(idx);
		}
		self.by_id.insert(obj.instance_id, idx);
		self.objects.push(obj);
	}

	/// Return all registered objects in file order.
	pub fn objects(&self) -> &[MxfObject] {
		&self.objects
	}

	/// Look up an object by instance id.
	pub fn object(&self, instance_id: &Auid) -> Option<&MxfObject> {
		self.by_id.get(instance_id).map(|idx| &self.objects[*idx])
	}

	/// Return the graph root.
	pub fn preface(&self) -> Result<&MxfObject> {
		self.preface.map(|idx| &self.objects[idx]).ok_or(AafError::MissingPreface)
	}

	/// Resolve a strong reference, or `None` if the target was never registered.
	pub fn resolve(&self, r: StrongRef) -> Option<&MxfObject> {
		self.object(&r.0)
	}

	/// Resolve a required single-reference field.
	///
	/// A missing field reports the nil key; a dangling one reports its target.
	pub fn resolve_field(&self, obj: &MxfObject, field: Field) -> Result<&MxfObject> {
		let target = obj.strong_ref(field).and_then(|r| self.resolve(r));
		target.ok_or_else(|| AafError::UnresolvedReference {
			field: format!("{}.{}", obj.class.as_str(), field.as_str()),
			key: obj.strong_ref(field).map_or(Auid::NIL, |r| r.0),
		})
	}

	/// Lazily resolve each entry of a reference-array field.
	///
	/// A missing field yields nothing; a dangling entry yields an
	/// [`AafError::UnresolvedReference`] item.
	pub fn iter_strong_refs<'f>(&'f self, obj: &'f MxfObject, field: Field) -> impl Iterator<Item = Result<&'f MxfObject>> + 'f {
		obj.ref_array(field).unwrap_or_default().iter().map(move |r| {
			self.resolve(*r).ok_or_else(|| AafError::UnresolvedReference {
				field: format!("{}.{}", obj.class.as_str(), field.as_str()),
				key: r.0,
			})
		})
	}

	/// Resolve the content storage referenced by the preface.
	pub fn content_storage(&self) -> Result<&MxfObject> {
		self.resolve_field(self.preface()?, Field::ContentStorage)
	}

	/// Iterate top-level packages listed by the content storage.
	pub fn packages(&self) -> Result<impl Iterator<Item = Result<&MxfObject>> + '_> {
		let storage = self.content_storage()?;
		Ok(self.iter_strong_refs(storage, Field::Packages))
	}

	/// Return resolved material packages.
	pub fn material_packages(&self) -> Result<Vec<&MxfObject>> {
		self.packages_of(MxfClass::MaterialPackage)
	}

	/// Return resolved source packages.
	pub fn source_packages(&self) -> Result<Vec<&MxfObject>> {
		self.packages_of(MxfClass::SourcePackage)
	}

	fn packages_of(&self, class: MxfClass) -> Result<Vec<&MxfObject>> {
		let mut out = Vec::new();
		for package in self.packages()? {
			let package = package?;
			if package.class == class {
				out.push(package);
			}
		}
		Ok(out)
	}

	/// Operational pattern label: header partition first, preface fallback.
	pub fn operational_pattern_label(&self) -> Option<Auid> {
		if let Some(partition) = &self.partition {
			return Some(partition.operational_pattern);
		}

		match self.preface().ok()?.value(Field::OperationalPattern)? {
			Value::Auid(label) => Some(*label),
			_ => None,
		}
	}

	/// Classified operational pattern, `None` when absent or unrecognized.
	pub fn operational_pattern(&self) -> Option<OperationalPattern> {
		OperationalPattern::classify(&self.operational_pattern_label()?)
	}

	/// Count registered objects per class label, sorted by label.
	pub fn class_counts(&self) -> Vec<(&'static str, usize)> {
		let mut counts: HashMap<&'static str, usize> = HashMap::new();
		for obj in &self.objects {
			*counts.entry(obj.class.as_str()).or_insert(0) += 1;
		}
		let mut out: Vec<_> = counts.into_iter().collect();
		out.sort_unstable();
		out
	}
}

#[cfg(test)]
mod tests;
