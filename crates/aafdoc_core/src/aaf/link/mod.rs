use tracing::{debug, warn};

use crate::aaf::{AafError, AafObject, Auid, ContentModel, Field, MobId, MxfClass, MxfFile, MxfObject, OperationalPattern, Result, TypeRegistry, Value};

/// Link-time policy.
#[derive(Debug, Clone)]
pub struct LinkOptions {
	/// Container definition assigned to picture descriptors.
	pub container_def: String,
}

impl Default for LinkOptions {
	fn default() -> Self {
		Self {
			container_def: "AAFKLV".to_owned(),
		}
	}
}

/// Package that could not be linked.
#[derive(Debug)]
pub struct LinkFailure {
	/// Package instance id, when the package itself resolved.
	pub package: Option<Auid>,
	/// Package mob id, when it was readable.
	pub mob_id: Option<MobId>,
	/// Error that aborted this package.
	pub error: AafError,
}

/// Per-package outcome of one [`link_file`] call.
#[derive(Debug, Default)]
pub struct LinkReport {
	/// Mobs added to the model, in package order.
	pub linked: Vec<MobId>,
	/// Packages whose mob id was already present in the model.
	pub skipped: Vec<MobId>,
	/// Packages that failed; siblings are unaffected.
	pub failed: Vec<LinkFailure>,
}

impl LinkReport {
	/// Return whether every package linked or was skipped.
	pub fn is_clean(&self) -> bool {
		self.failed.is_empty()
	}
}

/// Link every top-level package of an OPAtom file into `model`.
///
/// Fails before touching the model when the file is not OPAtom or has no
/// reachable content storage. After that, failures are collected per package.
pub fn link_file(file: &MxfFile, registry: &dyn TypeRegistry, model: &mut ContentModel, opt: &LinkOptions) -> Result<LinkReport> {
	match file.operational_pattern() {
		Some(OperationalPattern::OpAtom) => {}
		Some(other) => {
			return Err(AafError::UnsupportedOperationalPattern {
				pattern: other.to_string(),
			});
		}
		None => {
			return Err(AafError::UnsupportedOperationalPattern {
				pattern: "unrecognized".to_owned(),
			});
		}
	}

	let linker = Linker { file, registry, opt };
	let mut report = LinkReport::default();

	for package in file.packages()? {
		let package = match package {
			Ok(package) => package,
			Err(error) => {
				warn!(%error, "package reference did not resolve");
				report.failed.push(LinkFailure {
					package: None,
					mob_id: None,
					error,
				});
				continue;
			}
		};

		let mob_id = match package.value(Field::MobId) {
			Some(Value::MobId(mob_id)) => Some(*mob_id),
			_ => None,
		};
		if let Some(mob_id) = mob_id
			&& model.contains_mob(&mob_id)
		{
			debug!(%mob_id, "mob already linked; skipping");
			report.skipped.push(mob_id);
			continue;
		}

		let outcome = linker
			.package(package)
			.and_then(|mob| model.add_mob(registry, mob));
		match (outcome, mob_id) {
			(Ok(true), Some(mob_id)) => {
				debug!(%mob_id, class = package.class.as_str(), "linked package");
				report.linked.push(mob_id);
			}
			(Ok(_), Some(mob_id)) => report.skipped.push(mob_id),
			(Ok(_), None) => {}
			(Err(error), mob_id) => {
				warn!(instance_id = %package.instance_id, %error, "package failed to link");
				report.failed.push(LinkFailure {
					package: Some(package.instance_id),
					mob_id,
					error,
				});
			}
		}
	}

	Ok(report)
}

struct Linker<'a> {
	file: &'a MxfFile,
	registry: &'a dyn TypeRegistry,
	opt: &'a LinkOptions,
}

/// Property name on the AAF side for an MXF field.
fn property_name(field: Field) -> &'static str {
	match field {
		Field::DataDef => "DataDefinition",
		Field::DropFrame => "Drop",
		Field::Descriptor => "EssenceDescription",
		Field::SubDescriptors => "FileDescriptors",
		Field::SoundCompression => "Compression",
		Field::LinkedTrackId => "LinkedSlotID",
		other => other.as_str(),
	}
}

fn required(src: &MxfObject, field: Field) -> Result<&Value> {
	src.value(field).ok_or(AafError::MissingRequiredField {
		class: src.class.as_str(),
		field: field.as_str(),
	})
}

impl Linker<'_> {
	fn new_object(&self, class_name: &str) -> Result<AafObject> {
		AafObject::new(self.registry, class_name)
	}

	fn copy(&self, src: &MxfObject, dst: &mut AafObject, fields: &[Field]) -> Result<()> {
		for field in fields {
			dst.set_value(self.registry, property_name(*field), required(src, *field)?)?;
		}
		Ok(())
	}

	fn copy_present(&self, src: &MxfObject, dst: &mut AafObject, fields: &[Field]) -> Result<()> {
		for field in fields {
			if let Some(value) = src.value(*field) {
				dst.set_value(self.registry, property_name(*field), value)?;
			}
		}
		Ok(())
	}

	fn copy_or(&self, src: &MxfObject, dst: &mut AafObject, field: Field, default: Value) -> Result<()> {
		let value = src.value(field).unwrap_or(&default);
		dst.set_value(self.registry, property_name(field), value)
	}

	fn package(&self, src: &MxfObject) -> Result<AafObject> {
		let class_name = match src.class {
			MxfClass::MaterialPackage => "MasterMob",
			MxfClass::SourcePackage => "SourceMob",
			other => {
				return Err(AafError::UnknownClass {
					key: format!("{other} is not a package"),
				});
			}
		};

		let mut mob = self.new_object(class_name)?;
		self.copy(src, &mut mob, &[Field::MobId])?;
		self.copy_present(src, &mut mob, &[Field::Name, Field::LastModified, Field::CreationTime, Field::UsageCode, Field::AppCode])?;

		for track in self.file.iter_strong_refs(src, Field::Slots) {
			let slot = self.track(track?)?;
			mob.push_child(self.registry, "Slots", slot)?;
		}

		if src.class == MxfClass::SourcePackage && src.has(Field::Descriptor) {
			let descriptor = self.descriptor(self.file.resolve_field(src, Field::Descriptor)?)?;
			mob.set_child(self.registry, property_name(Field::Descriptor), descriptor)?;
		}

		Ok(mob)
	}

	fn track(&self, src: &MxfObject) -> Result<AafObject> {
		if src.class != MxfClass::Track {
			return Err(AafError::UnknownClass {
				key: format!("{} in package slots", src.class),
			});
		}

		let mut slot = self.new_object("TimelineMobSlot")?;
		self.copy(src, &mut slot, &[Field::SlotId, Field::EditRate])?;
		self.copy_present(src, &mut slot, &[Field::SlotName, Field::PhysicalTrackNumber, Field::Origin])?;

		let segment = self.segment(self.file.resolve_field(src, Field::Segment)?)?;
		slot.set_child(self.registry, "Segment", segment)?;
		Ok(slot)
	}

	fn segment(&self, src: &MxfObject) -> Result<AafObject> {
		let out = match src.class {
			MxfClass::Sequence => {
				let mut seq = self.new_object("Sequence")?;
				self.copy(src, &mut seq, &[Field::DataDef, Field::Length])?;
				for component in self.file.iter_strong_refs(src, Field::Components) {
					let component = self.segment(component?)?;
					seq.push_child(self.registry, "Components", component)?;
				}
				seq
			}
			MxfClass::SourceClip => {
				let mut clip = self.new_object("SourceClip")?;
				self.copy(src, &mut clip, &[Field::DataDef])?;
				self.copy_present(src, &mut clip, &[Field::SourceId, Field::SourceMobSlotId, Field::StartTime, Field::Length])?;
				clip
			}
			MxfClass::Timecode => {
				let mut tc = self.new_object("Timecode")?;
				self.copy(src, &mut tc, &[Field::DataDef, Field::Length, Field::Fps, Field::DropFrame])?;
				self.copy_or(src, &mut tc, Field::Start, Value::I64(0))?;
				tc
			}
			MxfClass::Pulldown => {
				let mut pulldown = self.new_object("Pulldown")?;
				self.copy(
					src,
					&mut pulldown,
					&[Field::DataDef, Field::Length, Field::PhaseFrame, Field::PulldownDirection, Field::PulldownKind],
				)?;
				let input = self.segment(self.file.resolve_field(src, Field::InputSegment)?)?;
				pulldown.set_child(self.registry, "InputSegment", input)?;
				pulldown
			}
			MxfClass::Filler => {
				let mut filler = self.new_object("Filler")?;
				self.copy(src, &mut filler, &[Field::DataDef, Field::Length])?;
				filler
			}
			MxfClass::ScopeReference => {
				let mut scope = self.new_object("ScopeReference")?;
				self.copy(src, &mut scope, &[Field::DataDef, Field::Length, Field::RelativeSlot, Field::RelativeScope])?;
				scope
			}
			MxfClass::EssenceGroup => {
				let mut group = self.new_object("EssenceGroup")?;
				self.copy(src, &mut group, &[Field::DataDef, Field::Length])?;
				for choice in self.file.iter_strong_refs(src, Field::Choices) {
					let choice = self.segment(choice?)?;
					group.push_child(self.registry, "Choices", choice)?;
				}
				if src.has(Field::StillFrame) {
					let still = self.segment(self.file.resolve_field(src, Field::StillFrame)?)?;
					group.set_child(self.registry, "StillFrame", still)?;
				}
				group
			}
			other => {
				return Err(AafError::UnknownClass {
					key: format!("{other} as segment"),
				});
			}
		};
		debug!(class = out.class_name(), instance_id = %src.instance_id, "linked component");
		Ok(out)
	}

	fn container_format(&self) -> Result<Value> {
		self.registry
			.lookup_containerdef(&self.opt.container_def)
			.map(Value::Auid)
			.ok_or_else(|| AafError::UnknownType {
				key: format!("container {}", self.opt.container_def),
			})
	}

	fn descriptor(&self, src: &MxfObject) -> Result<AafObject> {
		let mut out = match src.class {
			MxfClass::CdciDescriptor => {
				let mut cdci = self.new_object("CDCIDescriptor")?;
				self.copy(
					src,
					&mut cdci,
					&[
						Field::ComponentWidth,
						Field::HorizontalSubsampling,
						Field::ImageAspectRatio,
						Field::StoredWidth,
						Field::VideoLineMap,
						Field::StoredHeight,
						Field::SampleRate,
						Field::FrameLayout,
					],
				)?;
				self.copy_or(src, &mut cdci, Field::Length, Value::I64(0))?;
				self.copy_present(
					src,
					&mut cdci,
					&[
						Field::FrameSampleSize,
						Field::ResolutionId,
						Field::Compression,
						Field::VerticalSubsampling,
						Field::LinkedTrackId,
					],
				)?;
				cdci.set_value(self.registry, "ContainerFormat", &self.container_format()?)?;
				cdci
			}
			MxfClass::RgbaDescriptor => {
				let mut rgba = self.new_object("RGBADescriptor")?;
				self.copy(
					src,
					&mut rgba,
					&[
						Field::ImageAspectRatio,
						Field::StoredWidth,
						Field::FrameLayout,
						Field::PixelLayout,
						Field::VideoLineMap,
						Field::StoredHeight,
						Field::SampleRate,
						Field::Length,
					],
				)?;
				self.copy_present(src, &mut rgba, &[Field::FrameSampleSize, Field::LinkedTrackId])?;
				rgba.set_value(self.registry, "ContainerFormat", &self.container_format()?)?;
				rgba
			}
			MxfClass::PcmDescriptor => {
				let mut pcm = self.new_object("PCMDescriptor")?;
				self.copy(
					src,
					&mut pcm,
					&[
						Field::BlockAlign,
						Field::AverageBps,
						Field::Channels,
						Field::QuantizationBits,
						Field::AudioSamplingRate,
						Field::SampleRate,
						Field::Length,
					],
				)?;
				self.copy_present(src, &mut pcm, &[Field::Locked, Field::SoundCompression, Field::LinkedTrackId])?;
				pcm
			}
			MxfClass::SoundDescriptor => {
				let mut sound = self.new_object("SoundDescriptor")?;
				self.copy(
					src,
					&mut sound,
					&[
						Field::AudioSamplingRate,
						Field::Channels,
						Field::QuantizationBits,
						Field::SampleRate,
						Field::Length,
					],
				)?;
				self.copy_present(src, &mut sound, &[Field::Locked, Field::SoundCompression, Field::LinkedTrackId])?;
				sound
			}
			MxfClass::MultipleDescriptor => {
				let mut multiple = self.new_object("MultipleDescriptor")?;
				self.copy(src, &mut multiple, &[Field::SampleRate])?;
				self.copy_or(src, &mut multiple, Field::Length, Value::I64(0))?;
				for sub in self.file.iter_strong_refs(src, Field::SubDescriptors) {
					let sub = self.descriptor(sub?)?;
					multiple.push_child(self.registry, property_name(Field::SubDescriptors), sub)?;
				}
				multiple
			}
			MxfClass::ImportDescriptor => self.new_object("ImportDescriptor")?,
			MxfClass::TapeDescriptor => self.new_object("TapeDescriptor")?,
			other => {
				return Err(AafError::UnknownClass {
					key: format!("{other} as essence descriptor"),
				});
			}
		};

		for locator in self.file.iter_strong_refs(src, Field::Locator) {
			let locator = self.locator(locator?)?;
			out.push_child(self.registry, "Locator", locator)?;
		}
		debug!(class = out.class_name(), instance_id = %src.instance_id, "linked descriptor");
		Ok(out)
	}

	fn locator(&self, src: &MxfObject) -> Result<AafObject> {
		if src.class != MxfClass::NetworkLocator {
			return Err(AafError::UnknownClass {
				key: format!("{} as locator", src.class),
			});
		}
		let mut locator = self.new_object("NetworkLocator")?;
		self.copy(src, &mut locator, &[Field::UrlString])?;
		Ok(locator)
	}
}
