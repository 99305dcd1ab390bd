//! Constant values, objects and data member descriptions.
//!
//! All three arenas intern: equal contents yield equal ids, which is what
//! makes value and description handles comparable by identity.

use mirror_ir::Name;
use mirror_types::Idx;
use rustc_hash::FxHashMap;

use super::{DeclId, DescId, ObjectId, ValueId};
use crate::Handle;

/// Target of a constant pointer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Address {
    Object(ObjectId),
    Function(DeclId),
}

/// A constant of structural type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    /// Integral and enumeration values.
    Int(i128),
    Bool(bool),
    /// Bit pattern of the value as a `f64`, after rounding to its type.
    Float(u64),
    NullPtr,
    Address(Address),
    Info(Handle),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ValueEntry {
    pub ty: Idx,
    pub value: ConstValue,
}

#[derive(Clone, Debug, Default)]
pub struct ValueArena {
    entries: Vec<ValueEntry>,
    map: FxHashMap<ValueEntry, ValueId>,
}

impl ValueArena {
    pub fn intern(&mut self, ty: Idx, value: ConstValue) -> ValueId {
        let entry = ValueEntry { ty, value };
        if let Some(&id) = self.map.get(&entry) {
            return id;
        }
        let id = ValueId::from_len(self.entries.len());
        self.entries.push(entry);
        self.map.insert(entry, id);
        id
    }

    #[inline]
    pub fn get(&self, id: ValueId) -> &ValueEntry {
        &self.entries[id.index()]
    }

    pub fn contains(&self, id: ValueId) -> bool {
        id.index() < self.entries.len()
    }
}

/// How an object came to exist.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjectOrigin {
    /// The complete object of a variable.
    Variable(DeclId),
    /// A member or base subobject.
    Subobject { parent: ObjectId, member: DeclId },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectEntry {
    pub ty: Idx,
    pub origin: ObjectOrigin,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectArena {
    entries: Vec<ObjectEntry>,
    map: FxHashMap<ObjectOrigin, ObjectId>,
}

impl ObjectArena {
    /// The object with the given origin, created on first request.
    pub fn intern(&mut self, ty: Idx, origin: ObjectOrigin) -> ObjectId {
        if let Some(&id) = self.map.get(&origin) {
            return id;
        }
        let id = ObjectId::from_len(self.entries.len());
        self.entries.push(ObjectEntry { ty, origin });
        self.map.insert(origin, id);
        id
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> &ObjectEntry {
        &self.entries[id.index()]
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        id.index() < self.entries.len()
    }
}

/// A description of a non-static data member, as made by
/// `data_member_spec`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataMemberSpec {
    pub ty: Idx,
    pub name: Option<Name>,
    pub align: Option<u64>,
    pub bit_width: Option<u64>,
    pub no_unique_address: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DescArena {
    entries: Vec<DataMemberSpec>,
    map: FxHashMap<DataMemberSpec, DescId>,
}

impl DescArena {
    pub fn intern(&mut self, spec: DataMemberSpec) -> DescId {
        if let Some(&id) = self.map.get(&spec) {
            return id;
        }
        let id = DescId::from_len(self.entries.len());
        self.entries.push(spec);
        self.map.insert(spec, id);
        id
    }

    #[inline]
    pub fn get(&self, id: DescId) -> &DataMemberSpec {
        &self.entries[id.index()]
    }

    pub fn contains(&self, id: DescId) -> bool {
        id.index() < self.entries.len()
    }
}
