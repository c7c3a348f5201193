use std::collections::HashMap;

use tracing::debug;

use crate::aaf::{
	AafError, Auid, ClassDef, MobId, PropertyDef, Result, StoreFormat, TypeDef, TypeKey, TypeKind, TypeRegistry, Value, require_classdef, require_typedef,
};

/// Stored payload of one property.
#[derive(Debug, Clone)]
pub enum PropertyData {
	/// Encoded native bytes.
	Data(Vec<u8>),
	/// Owned child object.
	Child(Box<AafObject>),
	/// Owned children in insertion order.
	Children(Vec<AafObject>),
}

/// Property instance held by an [`AafObject`].
#[derive(Debug, Clone)]
pub struct Property {
	/// Local property id.
	pub pid: u16,
	/// Property name.
	pub name: Box<str>,
	/// Value type.
	pub typedef: Auid,
	/// Stored payload.
	pub data: PropertyData,
}

/// AAF object: a class instance whose properties are encoded through the
/// registry's type definitions.
#[derive(Debug, Clone)]
pub struct AafObject {
	class: Auid,
	class_name: Box<str>,
	properties: Vec<Property>,
}

struct Slot<'r> {
	property: &'r PropertyDef,
	typedef: &'r TypeDef,
	format: StoreFormat,
}

impl AafObject {
	/// Instantiate an empty object of a named class.
	pub fn new(registry: &dyn TypeRegistry, class_name: &str) -> Result<Self> {
		let classdef = require_classdef(registry, class_name)?;
		Ok(Self {
			class: classdef.auid,
			class_name: classdef.name.clone(),
			properties: Vec::new(),
		})
	}

	/// Class identifier.
	pub fn class(&self) -> Auid {
		self.class
	}

	/// Class name.
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	/// Resolve this object's class definition.
	pub fn classdef<'r>(&self, registry: &'r dyn TypeRegistry) -> Result<&'r ClassDef> {
		require_classdef(registry, self.class)
	}

	/// Return whether this object's class is `name` or derives from it.
	pub fn is_a(&self, registry: &dyn TypeRegistry, name: &str) -> bool {
		self.classdef(registry).is_ok_and(|classdef| classdef.is_a(registry, name))
	}

	/// Properties in assignment order.
	pub fn properties(&self) -> &[Property] {
		&self.properties
	}

	fn slot<'r>(&self, registry: &'r dyn TypeRegistry, name: &str) -> Result<Slot<'r>> {
		let property = self
			.classdef(registry)?
			.find_property(registry, name)
			.ok_or_else(|| AafError::UnknownProperty {
				class: self.class_name.to_string(),
				property: name.to_owned(),
			})?;
		let typedef = require_typedef(registry, property.typedef)?;
		let format = typedef.store_format(registry)?;
		Ok(Slot { property, typedef, format })
	}

	fn stored(&self, name: &str) -> Option<&Property> {
		self.properties.iter().find(|prop| prop.name.as_ref() == name)
	}

	fn store(&mut self, property: &PropertyDef, data: PropertyData) {
		let entry = Property {
			pid: property.pid,
			name: property.name.clone(),
			typedef: property.typedef,
			data,
		};
		match self.properties.iter_mut().find(|prop| prop.pid == property.pid) {
			Some(existing) => *existing = entry,
			None => self.properties.push(entry),
		}
	}

	/// Encode and assign a data, weak-reference, or stream property.
	pub fn set_value(&mut self, registry: &dyn TypeRegistry, name: &str, value: &Value) -> Result<()> {
		let slot = self.slot(registry, name)?;
		if matches!(
			slot.format,
			StoreFormat::StrongRef | StoreFormat::StrongRefVector | StoreFormat::StrongRefSet
		) {
			return Err(AafError::mismatch(
				&slot.typedef.name,
				format!("{}.{name} holds objects ({})", self.class_name, slot.format.as_str()),
			));
		}

		if let Some(weak) = weak_element(registry, slot.typedef) {
			self.check_weak_target(registry, name, weak)?;
		}

		let bytes = slot.typedef.encode(registry, value)?;
		self.store(slot.property, PropertyData::Data(bytes));
		Ok(())
	}

	/// The weak reference's target set must resolve from `Root` and end in a
	/// collection of the referenced class.
	fn check_weak_target(&self, registry: &dyn TypeRegistry, name: &str, weak: &TypeDef) -> Result<()> {
		let hops = weak.property_path(registry)?;
		let held = hops
			.last()
			.and_then(|hop| registry.lookup_typedef(TypeKey::Auid(hop.property.typedef)))
			.and_then(|collection| collection.ref_classdef(registry));
		match (held, weak.ref_classdef(registry)) {
			(Some(held), Some(target)) if held.is_a(registry, &target.name) || target.is_a(registry, &held.name) => Ok(()),
			(held, _) => Err(AafError::mismatch(
				&weak.name,
				format!(
					"{}.{name} target set holds {}",
					self.class_name,
					held.map(|class| class.name.as_ref()).unwrap_or("no objects")
				),
			)),
		}
	}

	/// Decode a stored data property, `None` when unset.
	pub fn value(&self, registry: &dyn TypeRegistry, name: &str) -> Result<Option<Value>> {
		let slot = self.slot(registry, name)?;
		match self.stored(name).map(|prop| &prop.data) {
			None => Ok(None),
			Some(PropertyData::Data(bytes)) => slot.typedef.decode(registry, bytes).map(Some),
			Some(_) => Err(AafError::mismatch(&slot.typedef.name, format!("{}.{name} holds objects", self.class_name))),
		}
	}

	/// Raw encoded bytes of a stored data property.
	pub fn raw(&self, name: &str) -> Option<&[u8]> {
		match &self.stored(name)?.data {
			PropertyData::Data(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Return whether a property has been assigned.
	pub fn has(&self, name: &str) -> bool {
		self.stored(name).is_some()
	}

	/// Assign a single strong-reference child.
	pub fn set_child(&mut self, registry: &dyn TypeRegistry, name: &str, child: AafObject) -> Result<()> {
		let slot = self.slot(registry, name)?;
		if slot.format != StoreFormat::StrongRef {
			return Err(self.not_container(slot.typedef, name, "a strong reference"));
		}
		self.check_child(registry, &slot, name, &child)?;
		self.store(slot.property, PropertyData::Child(Box::new(child)));
		Ok(())
	}

	/// Append a child to a strong-reference vector or set.
	pub fn push_child(&mut self, registry: &dyn TypeRegistry, name: &str, child: AafObject) -> Result<()> {
		let slot = self.slot(registry, name)?;
		if !matches!(slot.format, StoreFormat::StrongRefVector | StoreFormat::StrongRefSet) {
			return Err(self.not_container(slot.typedef, name, "a strong reference collection"));
		}
		self.check_child(registry, &slot, name, &child)?;

		if let Some(prop) = self.properties.iter_mut().find(|prop| prop.pid == slot.property.pid)
			&& let PropertyData::Children(children) = &mut prop.data
		{
			children.push(child);
			return Ok(());
		}
		self.store(slot.property, PropertyData::Children(vec![child]));
		Ok(())
	}

	fn not_container(&self, typedef: &TypeDef, name: &str, expected: &str) -> AafError {
		AafError::mismatch(&typedef.name, format!("{}.{name} is not {expected}", self.class_name))
	}

	fn check_child(&self, registry: &dyn TypeRegistry, slot: &Slot<'_>, name: &str, child: &AafObject) -> Result<()> {
		let Some(target) = slot.typedef.ref_classdef(registry) else {
			return Err(AafError::UnknownClass {
				key: format!("reference target of {}", slot.typedef.name),
			});
		};
		if child.is_a(registry, &target.name) {
			return Ok(());
		}
		Err(AafError::mismatch(
			&slot.typedef.name,
			format!("{}.{name} expects {}, got {}", self.class_name, target.name, child.class_name),
		))
	}

	/// Single strong-reference child.
	pub fn child(&self, name: &str) -> Option<&AafObject> {
		match &self.stored(name)?.data {
			PropertyData::Child(child) => Some(child),
			_ => None,
		}
	}

	/// Strong-reference collection children; empty when unset.
	pub fn children(&self, name: &str) -> &[AafObject] {
		match self.stored(name).map(|prop| &prop.data) {
			Some(PropertyData::Children(children)) => children,
			_ => &[],
		}
	}
}

fn weak_element<'r>(registry: &'r dyn TypeRegistry, typedef: &'r TypeDef) -> Option<&'r TypeDef> {
	match &typedef.kind {
		TypeKind::WeakRef { .. } => Some(typedef),
		TypeKind::VarArray { element } | TypeKind::Set { element } | TypeKind::Rename { renamed: element } => {
			weak_element(registry, registry.lookup_typedef(TypeKey::Auid(*element))?)
		}
		_ => None,
	}
}

/// Destination graph for linked mobs, indexed by mob id.
#[derive(Debug, Default)]
pub struct ContentModel {
	mobs: Vec<AafObject>,
	index: HashMap<MobId, usize>,
}

impl ContentModel {
	/// Create an empty model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a mob, keyed by its `MobID` property.
	///
	/// Returns `false` without modifying the model when a mob with the same id
	/// is already present.
	pub fn add_mob(&mut self, registry: &dyn TypeRegistry, mob: AafObject) -> Result<bool> {
		if !mob.is_a(registry, "Mob") {
			return Err(AafError::UnknownClass {
				key: format!("{} is not a Mob", mob.class_name),
			});
		}

		let mob_id = match mob.value(registry, "MobID")? {
			Some(Value::MobId(mob_id)) => mob_id,
			_ => {
				return Err(AafError::MissingRequiredField {
					class: "Mob",
					field: "MobID",
				});
			}
		};

		if self.index.contains_key(&mob_id) {
			return Ok(false);
		}

		debug!(%mob_id, class = mob.class_name(), "adding mob");
		self.index.insert(mob_id, self.mobs.len());
		self.mobs.push(mob);
		Ok(true)
	}

	/// Return whether a mob id is present.
	pub fn contains_mob(&self, mob_id: &MobId) -> bool {
		self.index.contains_key(mob_id)
	}

	/// Look up a mob by id.
	pub fn mob(&self, mob_id: &MobId) -> Option<&AafObject> {
		self.index.get(mob_id).map(|idx| &self.mobs[*idx])
	}

	/// Mobs in insertion order.
	pub fn mobs(&self) -> &[AafObject] {
		&self.mobs
	}

	/// Number of mobs.
	pub fn len(&self) -> usize {
		self.mobs.len()
	}

	/// Return whether the model holds no mobs.
	pub fn is_empty(&self) -> bool {
		self.mobs.is_empty()
	}
}

#[cfg(test)]
mod tests;
