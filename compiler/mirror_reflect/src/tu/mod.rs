//! The translation unit: everything reflection can observe.
//!
//! Parsing, name lookup and instantiation belong to the surrounding
//! compiler; this module models their products as append-only arenas. The
//! builder methods in [`builder`] play the part of the parser, each
//! declaration taking the next [`ProgramPoint`] in lexical order.

mod builder;
mod decl;
mod ids;
mod layout;
mod lookup;
mod pattern;
mod point;
mod values;

pub use decl::{
    Access, AliasDecl, BaseDecl, ClassDecl, ClassKey, Completion, Constraint, Decl, DeclKind,
    EnumDecl, FieldDecl, FieldPattern, FunctionDecl, FunctionRole, NamespaceDecl, Origin,
    SpecialMember, Specialization, TemplateBody, TemplateDecl, TemplateKind, VariableDecl,
};
pub use ids::{DeclId, DescId, ObjectId, ValueId};
pub use layout::{LayoutError, RecordLayout};
pub use lookup::Lookup;
pub use pattern::{
    ConceptPredicate, ExtentPattern, ParamKind, PatternError, TemplateArg, TemplateParam,
    TypePattern,
};
pub use point::{InjectedPoint, ProgramPoint};
pub use values::{
    Address, ConstValue, DataMemberSpec, DescArena, ObjectArena, ObjectEntry, ObjectOrigin,
    ValueArena, ValueEntry,
};

use mirror_ir::{Name, Span, StringInterner};
use mirror_types::{DeclRef, Idx, Pool, RecordNames};
use rustc_hash::FxHashMap;

use crate::eval::EvaluationContext;

/// All declarations, types and constants of one translation unit.
pub struct TranslationUnit {
    interner: StringInterner,
    pub(crate) pool: Pool,
    decls: Vec<Decl>,
    pub(crate) values: ValueArena,
    pub(crate) objects: ObjectArena,
    pub(crate) descs: DescArena,
    /// Specialization memo: template-id to the specialization it names.
    specializations: FxHashMap<Specialization, DeclId>,
    /// Layouts of complete classes. Completion is monotonic, so entries
    /// never go stale.
    pub(crate) layouts: FxHashMap<DeclId, RecordLayout>,
    cursor: ProgramPoint,
}

impl TranslationUnit {
    pub fn new() -> Self {
        let interner = StringInterner::new();
        let mut unit = TranslationUnit {
            interner,
            pool: Pool::new(),
            decls: Vec::with_capacity(64),
            values: ValueArena::default(),
            objects: ObjectArena::default(),
            descs: DescArena::default(),
            specializations: FxHashMap::default(),
            layouts: FxHashMap::default(),
            cursor: ProgramPoint::START,
        };
        let global = unit.push(Decl {
            name: Name::EMPTY,
            kind: DeclKind::Namespace(NamespaceDecl::default()),
            parent: None,
            point: ProgramPoint::START,
            access: Access::Public,
            span: Span::DUMMY,
            origin: Origin::Source,
        });
        debug_assert_eq!(global, DeclId::GLOBAL);
        unit
    }

    // === Accessors ===

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    pub fn values(&self) -> &ValueArena {
        &self.values
    }

    pub fn objects(&self) -> &ObjectArena {
        &self.objects
    }

    pub fn descs(&self) -> &DescArena {
        &self.descs
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    pub fn contains(&self, id: DeclId) -> bool {
        id.index() < self.decls.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn name(&self, id: DeclId) -> &'static str {
        self.interner.lookup(self.decl(id).name)
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// The current lexical position.
    pub fn cursor(&self) -> ProgramPoint {
        self.cursor
    }

    /// Move the lexical cursor forward and return the new point.
    pub fn advance(&mut self) -> ProgramPoint {
        self.cursor = self.cursor.next();
        self.cursor
    }

    /// Context of a query at the current cursor with nothing injected.
    pub fn ambient_context(&self) -> EvaluationContext {
        EvaluationContext::at(self.cursor.next())
    }

    pub(crate) fn push(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_len(self.decls.len());
        self.decls.push(decl);
        id
    }

    // === Class Queries ===

    pub fn class_decl(&self, id: DeclId) -> Option<&ClassDecl> {
        match &self.decl(id).kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub(crate) fn class_mut(&mut self, id: DeclId) -> Option<&mut ClassDecl> {
        match &mut self.decl_mut(id).kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn enum_decl(&self, id: DeclId) -> Option<&EnumDecl> {
        match &self.decl(id).kind {
            DeclKind::Enum(en) => Some(en),
            _ => None,
        }
    }

    pub fn template(&self, id: DeclId) -> Option<&TemplateDecl> {
        match &self.decl(id).kind {
            DeclKind::Template(template) => Some(template),
            _ => None,
        }
    }

    /// Class declaration behind a (possibly cv-qualified) class type.
    pub fn class_of_type(&self, ty: Idx) -> Option<DeclId> {
        self.pool.record_decl(ty).map(DeclId::from)
    }

    /// Whether `id` is complete as seen from `ctx`.
    pub fn is_complete_in(&self, id: DeclId, ctx: &EvaluationContext) -> bool {
        let state = match &self.decl(id).kind {
            DeclKind::Class(class) => class.state,
            DeclKind::Enum(en) => en.state,
            _ => return false,
        };
        match state {
            Completion::Incomplete => false,
            Completion::Complete { at, injected } => ctx.reaches(at, injected),
        }
    }

    /// Whether a declaration is visible from `ctx`.
    pub fn is_reachable(&self, id: DeclId, ctx: &EvaluationContext) -> bool {
        let decl = self.decl(id);
        ctx.reaches(decl.point, decl.injected_point())
    }

    // === Specializations ===

    pub fn specialization(&self, spec: &Specialization) -> Option<DeclId> {
        self.specializations.get(spec).copied()
    }

    pub(crate) fn record_specialization(&mut self, spec: Specialization, id: DeclId) {
        if let DeclKind::Template(template) = &mut self.decl_mut(spec.template).kind {
            template.specializations.push(id);
        }
        self.specializations.insert(spec, id);
    }

    /// The template-id a declaration was formed from.
    pub fn specialization_of(&self, id: DeclId) -> Option<&Specialization> {
        match &self.decl(id).kind {
            DeclKind::Class(class) => class.specialization.as_ref(),
            DeclKind::TypeAlias(alias) => alias.specialization.as_ref(),
            DeclKind::Variable(var) => var.specialization.as_ref(),
            DeclKind::Function(func) => func.specialization.as_ref(),
            _ => None,
        }
    }

    // === Display ===

    /// `ns::S`, or `ns::array<int, 5>` for specializations.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut out = String::new();
        if let Some(parent) = self.decl(id).parent {
            if parent != DeclId::GLOBAL {
                out.push_str(&self.qualified_name(parent));
                out.push_str("::");
            }
        }
        if let Some(spec) = self.specialization_of(id) {
            out.push_str(self.name(spec.template));
            out.push_str(&self.format_args(&spec.args));
        } else {
            let name = self.name(id);
            if name.is_empty() {
                out.push_str("(anonymous)");
            } else {
                out.push_str(name);
            }
        }
        out
    }

    /// `<int, 5>`.
    pub fn format_args(&self, args: &[TemplateArg]) -> String {
        let parts: Vec<String> = args.iter().map(|&arg| self.format_arg(arg)).collect();
        format!("<{}>", parts.join(", "))
    }

    fn format_arg(&self, arg: TemplateArg) -> String {
        match arg {
            TemplateArg::Type(ty) => self.format_type(ty),
            TemplateArg::Value(value) => self.format_value(value),
            TemplateArg::Template(template) => self.qualified_name(template),
        }
    }

    pub fn format_type(&self, ty: Idx) -> String {
        self.pool.format_type(ty, self)
    }

    pub fn format_value(&self, value: ValueId) -> String {
        let entry = self.values.get(value);
        match entry.value {
            ConstValue::Int(n) => n.to_string(),
            ConstValue::Bool(b) => b.to_string(),
            ConstValue::Float(bits) => f64::from_bits(bits).to_string(),
            ConstValue::NullPtr => "nullptr".to_owned(),
            ConstValue::Address(Address::Function(id)) => format!("&{}", self.qualified_name(id)),
            ConstValue::Address(Address::Object(object)) => {
                format!("&<object {}>", object.raw())
            }
            ConstValue::Info(handle) => format!("^^{handle:?}"),
        }
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordNames for TranslationUnit {
    fn decl_name(&self, decl: DeclRef) -> String {
        let id = DeclId::from(decl);
        if self.contains(id) {
            self.qualified_name(id)
        } else {
            "<foreign>".to_owned()
        }
    }
}

impl std::fmt::Debug for TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("decls", &self.decls.len())
            .field("types", &self.pool.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
