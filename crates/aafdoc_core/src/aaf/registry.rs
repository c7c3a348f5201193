use std::collections::HashMap;
use std::fmt;

use crate::aaf::{AafError, Auid, Result, TypeDef};

/// Lookup key for registry queries: a definition name or its AUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKey<'a> {
	/// Definition name, for example `UInt32`.
	Name(&'a str),
	/// Definition identifier.
	Auid(Auid),
}

impl<'a> From<&'a str> for TypeKey<'a> {
	fn from(value: &'a str) -> Self {
		Self::Name(value)
	}
}

impl From<Auid> for TypeKey<'_> {
	fn from(value: Auid) -> Self {
		Self::Auid(value)
	}
}

impl fmt::Display for TypeKey<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name(name) => f.write_str(name),
			Self::Auid(auid) => write!(f, "{auid}"),
		}
	}
}

/// Source of type, class, and container definitions.
///
/// Codec and link operations call into this boundary; they never populate it.
pub trait TypeRegistry {
	/// Look up a type definition by name or AUID.
	fn lookup_typedef(&self, key: TypeKey<'_>) -> Option<&TypeDef>;
	/// Look up a class definition by name or AUID.
	fn lookup_classdef(&self, key: TypeKey<'_>) -> Option<&ClassDef>;
	/// Look up a container definition AUID by name.
	fn lookup_containerdef(&self, name: &str) -> Option<Auid>;
}

/// Resolve a type definition or fail with [`AafError::UnknownType`].
pub fn require_typedef<'r, 'k>(registry: &'r dyn TypeRegistry, key: impl Into<TypeKey<'k>>) -> Result<&'r TypeDef> {
	let key = key.into();
	registry.lookup_typedef(key).ok_or_else(|| AafError::UnknownType { key: key.to_string() })
}

/// Resolve a class definition or fail with [`AafError::UnknownClass`].
pub fn require_classdef<'r, 'k>(registry: &'r dyn TypeRegistry, key: impl Into<TypeKey<'k>>) -> Result<&'r ClassDef> {
	let key = key.into();
	registry.lookup_classdef(key).ok_or_else(|| AafError::UnknownClass { key: key.to_string() })
}

/// Class definition: identity, parent link, and declared properties.
#[derive(Debug, Clone)]
pub struct ClassDef {
	/// Class identifier.
	pub auid: Auid,
	/// Class name.
	pub name: Box<str>,
	/// Parent class, `None` for hierarchy roots.
	pub parent: Option<Auid>,
	/// Properties declared directly on this class.
	pub properties: Vec<PropertyDef>,
}

/// Property definition declared by a class.
#[derive(Debug, Clone)]
pub struct PropertyDef {
	/// Property identifier.
	pub auid: Auid,
	/// Property name.
	pub name: Box<str>,
	/// Local property id used by native storage and MXF local tags.
	pub pid: u16,
	/// Property value type.
	pub typedef: Auid,
	/// Whether the property may be absent.
	pub optional: bool,
}

impl ClassDef {
	/// Iterate this class and its ancestors, nearest first.
	pub fn lineage<'r>(&'r self, registry: &'r dyn TypeRegistry) -> impl Iterator<Item = &'r ClassDef> + 'r {
		let mut next = Some(self);
		let mut hops = 0_usize;
		std::iter::from_fn(move || {
			let current = next?;
			hops += 1;
			next = match current.parent {
				Some(parent) if parent != current.auid && hops < 64 => registry.lookup_classdef(TypeKey::Auid(parent)),
				_ => None,
			};
			Some(current)
		})
	}

	/// Find a property by name on this class or any ancestor.
	pub fn find_property<'r>(&'r self, registry: &'r dyn TypeRegistry, name: &str) -> Option<&'r PropertyDef> {
		self.lineage(registry)
			.find_map(|class| class.properties.iter().find(|prop| prop.name.as_ref() == name))
	}

	/// Find a property by AUID on this class or any ancestor.
	pub fn find_property_by_auid<'r>(&'r self, registry: &'r dyn TypeRegistry, auid: Auid) -> Option<&'r PropertyDef> {
		self.lineage(registry).find_map(|class| class.properties.iter().find(|prop| prop.auid == auid))
	}

	/// Return whether this class is `name` or derives from it.
	pub fn is_a(&self, registry: &dyn TypeRegistry, name: &str) -> bool {
		self.lineage(registry).any(|class| class.name.as_ref() == name)
	}
}

/// In-memory registry keyed by AUID and by name.
#[derive(Debug, Default)]
pub struct Dictionary {
	typedefs: Vec<TypeDef>,
	typedefs_by_auid: HashMap<Auid, usize>,
	typedefs_by_name: HashMap<Box<str>, usize>,
	classdefs: Vec<ClassDef>,
	classdefs_by_auid: HashMap<Auid, usize>,
	classdefs_by_name: HashMap<Box<str>, usize>,
	containerdefs: HashMap<Box<str>, Auid>,
}

impl Dictionary {
	/// Create an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a type definition, replacing any previous one with the same AUID.
	pub fn insert_typedef(&mut self, typedef: TypeDef) {
		if let Some(&idx) = self.typedefs_by_auid.get(&typedef.auid) {
			self.typedefs_by_name.insert(typedef.name.clone(), idx);
			self.typedefs[idx] = typedef;
			return;
		}

		let idx = self.typedefs.len();
		self.typedefs_by_auid.insert(typedef.auid, idx);
		self.typedefs_by_name.insert(typedef.name.clone(), idx);
		self.typedefs.push(typedef);
	}

	/// Register a class definition, replacing any previous one with the same AUID.
	pub fn insert_classdef(&mut self, classdef: ClassDef) {
		if let Some(&idx) = self.classdefs_by_auid.get(&classdef.auid) {
			self.classdefs_by_name.insert(classdef.name.clone(), idx);
			self.classdefs[idx] = classdef;
			return;
		}

		let idx = self.classdefs.len();
		self.classdefs_by_auid.insert(classdef.auid, idx);
		self.classdefs_by_name.insert(classdef.name.clone(), idx);
		self.classdefs.push(classdef);
	}

	/// Register a container definition.
	pub fn insert_containerdef(&mut self, name: &str, auid: Auid) {
		self.containerdefs.insert(name.into(), auid);
	}

	/// Return all registered type definitions.
	pub fn typedefs(&self) -> &[TypeDef] {
		&self.typedefs
	}

	/// Return all registered class definitions.
	pub fn classdefs(&self) -> &[ClassDef] {
		&self.classdefs
	}
}

impl TypeRegistry for Dictionary {
	fn lookup_typedef(&self, key: TypeKey<'_>) -> Option<&TypeDef> {
		let idx = match key {
			TypeKey::Name(name) => self.typedefs_by_name.get(name)?,
			TypeKey::Auid(auid) => self.typedefs_by_auid.get(&auid)?,
		};
		self.typedefs.get(*idx)
	}

	fn lookup_classdef(&self, key: TypeKey<'_>) -> Option<&ClassDef> {
		let idx = match key {
			TypeKey::Name(name) => self.classdefs_by_name.get(name)?,
			TypeKey::Auid(auid) => self.classdefs_by_auid.get(&auid)?,
		};
		self.classdefs.get(*idx)
	}

	fn lookup_containerdef(&self, name: &str) -> Option<Auid> {
		self.containerdefs.get(name).copied()
	}
}

#[cfg(test)]
mod tests;
