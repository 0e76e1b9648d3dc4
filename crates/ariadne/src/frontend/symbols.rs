//! Symbol arena and symbol handles.
//!
//! A [`SymbolTable`] owns every declaration of one compilation. Queries hold
//! [`Symbol`] handles: a shared pointer to the table, a key into it, and the
//! type arguments of a constructed generic.
//!
//! ## Design
//!
//! - Declared entities live in the arena and are addressed by [`SymbolId`].
//! - Types the compilation never declares (framework types, type
//!   parameters, predefined types) are [`SymbolKey::External`] and carry
//!   only their written name.
//! - Two handles denote the same entity when their original definitions are
//!   the same arena entry. Handles from different tables fall back to the
//!   qualified string form; see [`symbols_match`].

// Symbol counts never approach u32::MAX in a single compilation.
#![allow(clippy::cast_possible_truncation)]

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::Arc;

use crate::types::{DeclKind, LineRange, Modifiers};

/// Index of a declared symbol within its [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a symbol handle points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKey {
    /// An entity declared in the compilation's sources
    Declared(SymbolId),
    /// A type known only by name
    External(Arc<str>),
}

/// A (possibly constructed) reference to a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Referenced type definition
    pub target: SymbolKey,
    /// Type arguments, empty when not constructed
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub(crate) fn external(name: &str) -> Self {
        Self {
            target: SymbolKey::External(Arc::from(name)),
            args: Vec::new(),
        }
    }

    pub(crate) fn declared(id: SymbolId) -> Self {
        Self {
            target: SymbolKey::Declared(id),
            args: Vec::new(),
        }
    }

    /// Name of an external target, if this is one.
    pub(crate) fn external_name(&self) -> Option<&str> {
        match &self.target {
            SymbolKey::External(name) => Some(name),
            SymbolKey::Declared(_) => None,
        }
    }
}

/// Where a symbol is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclSite {
    /// Index of the tree within the compilation
    pub tree: usize,
    /// Byte range of the declaration node
    pub byte_range: Range<usize>,
    /// Lines of the declaration node
    pub lines: LineRange,
}

/// One declared entity.
#[derive(Debug, Clone)]
pub struct SymbolData {
    /// Declaration kind
    pub kind: DeclKind,
    /// Simple name as declared
    pub name: String,
    /// Enclosing type for members and nested types, enclosing method for
    /// parameters.
    pub container: Option<SymbolId>,
    /// Dotted namespace, `""` for the global namespace
    pub namespace: String,
    /// First declaration site (partial types merge into the first fragment)
    pub site: Option<DeclSite>,
    /// Accessibility and modifier keywords
    pub modifiers: Modifiers,
    /// Generic parameter names, in order
    pub type_parameters: Vec<String>,
    /// Base class, if the base list names one
    pub base_type: Option<TypeRef>,
    /// Implemented interfaces, in base list order
    pub interfaces: Vec<TypeRef>,
    /// Field, property and parameter type, or method return type
    pub declared_type: Option<TypeRef>,
    /// Declared type as written
    pub type_text: Option<String>,
    /// Parameter symbols of a method or constructor
    pub parameters: Vec<SymbolId>,
    /// Parameters without a default value
    pub required_parameters: usize,
    /// Last parameter is `params`
    pub variadic: bool,
    /// Members declared directly in a type, in source order
    pub members: Vec<SymbolId>,
    /// Base method an `override` replaces
    pub overridden: Option<SymbolId>,
    pub(crate) qualified: String,
}

impl SymbolData {
    pub(crate) fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            container: None,
            namespace: String::new(),
            site: None,
            modifiers: Modifiers::default(),
            type_parameters: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            declared_type: None,
            type_text: None,
            parameters: Vec::new(),
            required_parameters: 0,
            variadic: false,
            members: Vec::new(),
            overridden: None,
            qualified: String::new(),
        }
    }
}

/// A `using` directive and the byte range it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingScope {
    /// Imported namespace, or alias target
    pub target: String,
    /// Alias name for `using X = Y;`
    pub alias: Option<String>,
    /// A `using static` directive
    pub is_static: bool,
    /// Byte range the directive applies to
    pub scope: Range<usize>,
}

/// Arena of every declaration in one compilation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub(crate) symbols: Vec<SymbolData>,
    /// `(tree index, node id)` of declaration nodes
    pub(crate) by_node: HashMap<(usize, usize), SymbolId>,
    /// Types by `Namespace.Outer.Name`
    pub(crate) types_by_qualified: HashMap<String, SymbolId>,
    /// Types by simple name, in declaration order
    pub(crate) types_by_simple: HashMap<String, Vec<SymbolId>>,
    /// `using` directives, per tree
    pub(crate) usings: Vec<Vec<UsingScope>>,
}

impl SymbolTable {
    /// Entry for a declared symbol.
    ///
    /// Ids only come from this table, so indexing never goes out of bounds.
    #[must_use]
    pub fn get(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> &mut SymbolData {
        &mut self.symbols[id.index()]
    }

    pub(crate) fn push(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(data);
        id
    }

    /// Number of declared symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Declared symbol for a declaration node.
    #[must_use]
    pub fn symbol_for_node(&self, tree: usize, node_id: usize) -> Option<SymbolId> {
        self.by_node.get(&(tree, node_id)).copied()
    }

    /// Type declared under an exact `Namespace.Outer.Name` key.
    #[must_use]
    pub fn type_by_qualified(&self, qualified: &str) -> Option<SymbolId> {
        self.types_by_qualified.get(qualified).copied()
    }

    /// Types with the given simple name, in declaration order.
    #[must_use]
    pub fn types_named(&self, name: &str) -> &[SymbolId] {
        self.types_by_simple.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every declared symbol id.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| SymbolId(i as u32))
    }

    /// Qualified string form of a declared symbol.
    #[must_use]
    pub fn qualified_name(&self, id: SymbolId) -> &str {
        &self.get(id).qualified
    }

    /// Base chain of a declared type, nearest first, stopping at the first
    /// external base or at a cycle.
    pub(crate) fn declared_base_chain(&self, id: SymbolId) -> Vec<TypeRef> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.get(id).base_type.clone();
        while let Some(base) = current {
            current = match base.target {
                SymbolKey::Declared(next) if seen.insert(next) => self.get(next).base_type.clone(),
                _ => None,
            };
            chain.push(base);
        }
        chain
    }

    /// Fill in the qualified string form of every symbol.
    ///
    /// Types first, since member forms embed their container's.
    pub(crate) fn compute_qualified_names(&mut self) {
        for index in 0..self.symbols.len() {
            let id = SymbolId(index as u32);
            let qualified = self.render_qualified(id, 0);
            self.get_mut(id).qualified = qualified;
        }
    }

    fn render_qualified(&self, id: SymbolId, depth: usize) -> String {
        let data = self.get(id);
        let container = data
            .container
            .filter(|_| depth < 32)
            .map(|c| self.render_qualified(c, depth + 1));
        let prefix = match container {
            Some(c) => c,
            None => data.namespace.clone(),
        };
        let join = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            }
        };

        match data.kind {
            DeclKind::Method | DeclKind::Constructor => {
                let params: Vec<_> = data
                    .parameters
                    .iter()
                    .map(|p| compact_type_text(self.get(*p).type_text.as_deref().unwrap_or("?")))
                    .collect();
                let generic = if data.type_parameters.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", data.type_parameters.join(", "))
                };
                format!("{}{generic}({})", join(&data.name), params.join(", "))
            }
            kind if kind.is_type() && !data.type_parameters.is_empty() => {
                format!("{}<{}>", join(&data.name), data.type_parameters.join(", "))
            }
            _ => join(&data.name),
        }
    }
}

/// Type text with insignificant whitespace removed, `, ` between arguments.
pub(crate) fn compact_type_text(text: &str) -> String {
    let squeezed: String = text.split_whitespace().collect();
    squeezed.replace(',', ", ")
}

// ============================================================================
// Symbol handles
// ============================================================================

/// Handle to a declared or external entity.
#[derive(Clone)]
pub struct Symbol {
    table: Arc<SymbolTable>,
    key: SymbolKey,
    type_arguments: Vec<TypeRef>,
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Symbol")
            .field("kind", &self.kind())
            .field("display", &self.display_string())
            .finish()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl Symbol {
    pub(crate) fn declared(table: &Arc<SymbolTable>, id: SymbolId) -> Self {
        Self {
            table: Arc::clone(table),
            key: SymbolKey::Declared(id),
            type_arguments: Vec::new(),
        }
    }

    pub(crate) fn from_type_ref(table: &Arc<SymbolTable>, type_ref: &TypeRef) -> Self {
        Self {
            table: Arc::clone(table),
            key: type_ref.target.clone(),
            type_arguments: type_ref.args.clone(),
        }
    }

    /// Arena key of this handle.
    #[must_use]
    pub fn key(&self) -> &SymbolKey {
        &self.key
    }

    /// Arena entry, for declared symbols.
    #[must_use]
    pub fn data(&self) -> Option<&SymbolData> {
        match &self.key {
            SymbolKey::Declared(id) => Some(self.table.get(*id)),
            SymbolKey::External(_) => None,
        }
    }

    /// Declaration kind; undeclared types are [`DeclKind::ExternalType`].
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        self.data().map_or(DeclKind::ExternalType, |d| d.kind)
    }

    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.key {
            SymbolKey::Declared(id) => &self.table.get(*id).name,
            SymbolKey::External(name) => name,
        }
    }

    /// Enclosing namespace, `""` for externals and the global namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.data().map_or("", |d| d.namespace.as_str())
    }

    /// Modifiers as declared.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.data().map(|d| d.modifiers).unwrap_or_default()
    }

    /// Declaration site, for declared symbols.
    #[must_use]
    pub fn site(&self) -> Option<&DeclSite> {
        self.data().and_then(|d| d.site.as_ref())
    }

    /// The unsubstituted definition: the same entity without type arguments.
    #[must_use]
    pub fn original_definition(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            key: self.key.clone(),
            type_arguments: Vec::new(),
        }
    }

    /// Qualified string form of the original definition.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        match &self.key {
            SymbolKey::Declared(id) => self.table.qualified_name(*id),
            SymbolKey::External(name) => name,
        }
    }

    /// Full type name with type arguments substituted, without any global
    /// qualifier: `Shop.Repository<Shop.Order>`.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.render_with_args(&self.type_arguments)
    }

    fn render_with_args(&self, args: &[TypeRef]) -> String {
        // Arrays keep their element type as an argument but render as written
        if args.is_empty() || self.is_array() {
            return self.qualified_name().to_string();
        }
        let base = match &self.key {
            SymbolKey::Declared(id) => {
                let qualified = self.table.qualified_name(*id);
                qualified.split('<').next().unwrap_or(qualified).to_string()
            }
            SymbolKey::External(name) => name.to_string(),
        };
        let rendered: Vec<_> = args
            .iter()
            .map(|a| Self::from_type_ref(&self.table, a).display_string())
            .collect();
        format!("{base}<{}>", rendered.join(", "))
    }

    /// Whether this is an array type (`T[]`).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(&self.key, SymbolKey::External(name) if name.ends_with(']'))
    }

    /// Type arguments of a constructed generic.
    #[must_use]
    pub fn type_arguments(&self) -> Vec<Self> {
        self.type_arguments
            .iter()
            .map(|a| Self::from_type_ref(&self.table, a))
            .collect()
    }

    /// Type that declares this member or nested type.
    #[must_use]
    pub fn containing_type(&self) -> Option<Self> {
        let data = self.data()?;
        let container = data.container?;
        let container_data = self.table.get(container);
        if container_data.kind.is_type() {
            return Some(Self::declared(&self.table, container));
        }
        // Parameters sit inside a method
        container_data
            .container
            .map(|outer| Self::declared(&self.table, outer))
    }

    /// Containing method of a parameter.
    #[must_use]
    pub fn containing_member(&self) -> Option<Self> {
        let container = self.data()?.container?;
        let kind = self.table.get(container).kind;
        kind.is_callable()
            .then(|| Self::declared(&self.table, container))
    }

    /// Declared base type, if any.
    #[must_use]
    pub fn base_type(&self) -> Option<Self> {
        self.data()?
            .base_type
            .as_ref()
            .map(|b| Self::from_type_ref(&self.table, b))
    }

    /// Base types, nearest first. The implicit `object` root is not included.
    #[must_use]
    pub fn base_chain(&self) -> Vec<Self> {
        match &self.key {
            SymbolKey::Declared(id) if self.table.get(*id).kind.is_type() => self
                .table
                .declared_base_chain(*id)
                .iter()
                .map(|b| Self::from_type_ref(&self.table, b))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Interfaces listed directly on the declaration.
    #[must_use]
    pub fn interfaces(&self) -> Vec<Self> {
        self.data().map_or_else(Vec::new, |d| {
            d.interfaces
                .iter()
                .map(|i| Self::from_type_ref(&self.table, i))
                .collect()
        })
    }

    /// Full interface set: own interfaces, the interfaces they extend, then
    /// those of every base type. Distinct by qualified name.
    #[must_use]
    pub fn all_interfaces(&self) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        let mut seen = HashSet::new();
        let visit = |sym: &Self, out: &mut Vec<Self>, seen: &mut HashSet<String>| {
            let mut stack = sym.interfaces();
            stack.reverse();
            while let Some(iface) = stack.pop() {
                if !seen.insert(iface.qualified_name().to_string()) {
                    continue;
                }
                let mut inherited = iface.interfaces();
                inherited.reverse();
                out.push(iface);
                stack.extend(inherited);
            }
        };
        visit(self, &mut out, &mut seen);
        for base in self.base_chain() {
            visit(&base, &mut out, &mut seen);
        }
        out
    }

    /// Method this `override` replaces.
    #[must_use]
    pub fn overridden_method(&self) -> Option<Self> {
        self.data()?
            .overridden
            .map(|id| Self::declared(&self.table, id))
    }

    /// Members declared directly on this type.
    #[must_use]
    pub fn members(&self) -> Vec<Self> {
        self.data().map_or_else(Vec::new, |d| {
            d.members
                .iter()
                .map(|m| Self::declared(&self.table, *m))
                .collect()
        })
    }

    /// Parameters of a method or constructor, in order.
    #[must_use]
    pub fn parameters(&self) -> Vec<Self> {
        self.data().map_or_else(Vec::new, |d| {
            d.parameters
                .iter()
                .map(|p| Self::declared(&self.table, *p))
                .collect()
        })
    }

    /// Declared type of a field, property or parameter, or a method's
    /// return type.
    #[must_use]
    pub fn declared_type(&self) -> Option<Self> {
        self.data()?
            .declared_type
            .as_ref()
            .map(|t| Self::from_type_ref(&self.table, t))
    }

    /// Declared type as written in source.
    #[must_use]
    pub fn type_text(&self) -> Option<&str> {
        self.data()?.type_text.as_deref()
    }

    pub(crate) fn declared_id(&self) -> Option<SymbolId> {
        match &self.key {
            SymbolKey::Declared(id) => Some(*id),
            SymbolKey::External(_) => None,
        }
    }
}

/// Whether two handles denote the same logical entity.
///
/// Handles into the same table compare by arena identity. Handles from
/// independent tables (another compilation, a re-parse) compare by the
/// qualified string form of their original definitions.
#[must_use]
pub fn symbols_match(a: &Symbol, b: &Symbol) -> bool {
    let (a, b) = (a.original_definition(), b.original_definition());
    if Arc::ptr_eq(&a.table, &b.table) && a.key == b.key {
        return true;
    }
    a.qualified_name() == b.qualified_name()
}
