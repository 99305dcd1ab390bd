//! The type pool.
//!
//! Every type is interned once; constructors normalize their input so that
//! types the language considers identical (`const` on a reference, `& &&`
//! reference collapsing, cv on an array) share an index.

use rustc_hash::FxHashMap;

use crate::{DeclRef, Idx, Quals, TypeData};

/// Interned storage for all types of a translation unit.
#[derive(Clone, Debug)]
pub struct Pool {
    /// Type data, indexed by `Idx::raw`.
    types: Vec<TypeData>,
    /// Deduplication map.
    map: FxHashMap<TypeData, Idx>,
}

impl Pool {
    /// Create a pool with the fundamental types pre-interned.
    pub fn new() -> Self {
        let mut pool = Pool {
            types: Vec::with_capacity(256),
            map: FxHashMap::default(),
        };
        for data in TypeData::PRIMITIVES {
            pool.push(data);
        }
        debug_assert_eq!(pool.types.len(), Idx::FIRST_DYNAMIC as usize);
        pool
    }

    fn push(&mut self, data: TypeData) -> Idx {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "a translation unit never interns 4 billion types"
        )]
        let idx = Idx::from_raw(self.types.len() as u32);
        self.types.push(data.clone());
        self.map.insert(data, idx);
        idx
    }

    /// Intern raw type data, returning the existing index when present.
    ///
    /// Prefer the named constructors, which normalize their input.
    pub fn intern(&mut self, data: TypeData) -> Idx {
        match self.map.get(&data) {
            Some(&idx) => idx,
            None => self.push(data),
        }
    }

    /// Look up the data of an interned type.
    ///
    /// An index from another pool reads as `void`.
    #[inline]
    pub fn data(&self, idx: Idx) -> &TypeData {
        self.types
            .get(idx.raw() as usize)
            .unwrap_or(&TypeData::Void)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if only the fundamental types are present.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= Idx::FIRST_DYNAMIC as usize
    }

    // === Constructors ===

    pub fn pointer(&mut self, pointee: Idx) -> Idx {
        self.intern(TypeData::Pointer(pointee))
    }

    /// `T&`, collapsing `T& &` and `T&& &` to `T&`.
    pub fn lvalue_ref(&mut self, referee: Idx) -> Idx {
        match *self.data(referee) {
            TypeData::LValueRef(_) => referee,
            TypeData::RValueRef(inner) => self.intern(TypeData::LValueRef(inner)),
            _ => self.intern(TypeData::LValueRef(referee)),
        }
    }

    /// `T&&`, collapsing `T& &&` to `T&` and `T&& &&` to `T&&`.
    pub fn rvalue_ref(&mut self, referee: Idx) -> Idx {
        match *self.data(referee) {
            TypeData::LValueRef(_) | TypeData::RValueRef(_) => referee,
            _ => self.intern(TypeData::RValueRef(referee)),
        }
    }

    pub fn array(&mut self, elem: Idx, len: Option<u64>) -> Idx {
        self.intern(TypeData::Array { elem, len })
    }

    /// Add qualifiers to a type.
    ///
    /// References and functions ignore qualifiers; qualifying an array
    /// qualifies its element type; nested qualifiers merge.
    pub fn qualified(&mut self, ty: Idx, quals: Quals) -> Idx {
        if quals.is_empty() {
            return ty;
        }
        match self.data(ty).clone() {
            TypeData::LValueRef(_) | TypeData::RValueRef(_) | TypeData::Function { .. } => ty,
            TypeData::Array { elem, len } => {
                let elem = self.qualified(elem, quals);
                self.array(elem, len)
            }
            TypeData::Qualified { inner, quals: existing } => self.intern(TypeData::Qualified {
                inner,
                quals: existing | quals,
            }),
            _ => self.intern(TypeData::Qualified { inner: ty, quals }),
        }
    }

    pub fn const_of(&mut self, ty: Idx) -> Idx {
        self.qualified(ty, Quals::CONST)
    }

    pub fn function(&mut self, params: &[Idx], ret: Idx, variadic: bool) -> Idx {
        // Top-level qualifiers on parameters are not part of the function type.
        let params: Box<[Idx]> = params.iter().map(|&p| self.unqualified(p)).collect();
        self.intern(TypeData::Function {
            params,
            ret,
            variadic,
        })
    }

    pub fn member_pointer(&mut self, class: Idx, pointee: Idx) -> Idx {
        self.intern(TypeData::MemberPointer { class, pointee })
    }

    pub fn record(&mut self, decl: DeclRef) -> Idx {
        self.intern(TypeData::Record(decl))
    }

    pub fn enumeration(&mut self, decl: DeclRef) -> Idx {
        self.intern(TypeData::Enum(decl))
    }

    // === Structural Accessors ===

    /// Top-level qualifiers (arrays report their element's qualifiers).
    pub fn quals(&self, ty: Idx) -> Quals {
        match *self.data(ty) {
            TypeData::Qualified { quals, .. } => quals,
            TypeData::Array { elem, .. } => self.quals(elem),
            _ => Quals::empty(),
        }
    }

    /// Strip top-level qualifiers.
    ///
    /// Does not intern: the unqualified type of an array with qualified
    /// elements is returned as-is.
    pub fn unqualified(&self, ty: Idx) -> Idx {
        match *self.data(ty) {
            TypeData::Qualified { inner, .. } => inner,
            _ => ty,
        }
    }

    /// Strip a reference, if any.
    pub fn referee(&self, ty: Idx) -> Idx {
        match *self.data(ty) {
            TypeData::LValueRef(inner) | TypeData::RValueRef(inner) => inner,
            _ => ty,
        }
    }

    /// The declaration behind a class type, ignoring qualifiers.
    pub fn record_decl(&self, ty: Idx) -> Option<DeclRef> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Record(decl) => Some(decl),
            _ => None,
        }
    }

    /// The declaration behind an enumeration type, ignoring qualifiers.
    pub fn enum_decl(&self, ty: Idx) -> Option<DeclRef> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Enum(decl) => Some(decl),
            _ => None,
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
