//! Domain types for ariadne navigation queries.
//!
//! These types represent the query-facing model:
//! - **Syntax vocabulary**: `DeclKind`, `Accessibility`, `Modifiers`, `LineRange`
//! - **Results**: one serializable record per query kind (`UsageResult`,
//!   `CallersResult`, `HierarchyResult`, ...)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Field naming | camelCase on the wire | Records are consumed by agent tooling as JSON |
//! | Line numbers | 1-based `u32` | Matches editor conventions |
//! | Line ranges | `[start, end]` array | Compact, order-preserving |
//! | Optional member details | Skipped when `None` | One `MemberInfo` shape for every member kind |

use serde::Serialize;

// ============================================================================
// Syntax vocabulary
// ============================================================================

/// Inclusive 1-based line range, serialized as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineRange(pub u32, pub u32);

impl LineRange {
    /// First line.
    #[must_use]
    pub fn start(self) -> u32 {
        self.0
    }

    /// Last line.
    #[must_use]
    pub fn end(self) -> u32 {
        self.1
    }

    /// Number of lines covered, counting both ends.
    #[must_use]
    pub fn line_count(self) -> u32 {
        self.1.saturating_sub(self.0) + 1
    }
}

/// Kinds of declarations the frontend records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `class` declaration
    Class,
    /// `struct` declaration
    Struct,
    /// `interface` declaration
    Interface,
    /// `record` declaration
    Record,
    /// `enum` declaration
    Enum,
    /// Method declaration
    Method,
    /// Instance or static constructor
    Constructor,
    /// Property declaration
    Property,
    /// Field declarator
    Field,
    /// Method or constructor parameter
    Parameter,
    /// A type referenced but not declared in the compilation (framework or
    /// package types, type parameters, predefined types).
    ExternalType,
}

impl DeclKind {
    /// Lowercase name used in result records and query filters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::Enum => "enum",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Property => "property",
            Self::Field => "field",
            Self::Parameter => "parameter",
            Self::ExternalType => "external",
        }
    }

    /// Parse a user-supplied kind filter, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "interface" => Some(Self::Interface),
            "record" => Some(Self::Record),
            "enum" => Some(Self::Enum),
            "method" => Some(Self::Method),
            "constructor" => Some(Self::Constructor),
            "property" => Some(Self::Property),
            "field" => Some(Self::Field),
            "parameter" => Some(Self::Parameter),
            _ => None,
        }
    }

    /// Class, struct, interface, record or enum.
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Struct
                | Self::Interface
                | Self::Record
                | Self::Enum
                | Self::ExternalType
        )
    }

    /// Method or constructor.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method | Self::Constructor)
    }
}

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Accessibility {
    /// `public`
    #[serde(rename = "public")]
    Public,
    /// `private`
    #[serde(rename = "private")]
    Private,
    /// `protected internal`
    #[serde(rename = "protected internal")]
    ProtectedInternal,
    /// `protected`
    #[serde(rename = "protected")]
    Protected,
    /// `internal`
    #[serde(rename = "internal")]
    Internal,
}

impl Accessibility {
    /// Keyword form, as written in source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::ProtectedInternal => "protected internal",
            Self::Protected => "protected",
            Self::Internal => "internal",
        }
    }
}

/// A single declaration modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `static`
    Static,
    /// `async`
    Async,
    /// `virtual`
    Virtual,
    /// `override`
    Override,
    /// `abstract`
    Abstract,
    /// `sealed`
    Sealed,
    /// `readonly`
    Readonly,
    /// `partial`
    Partial,
}

impl Modifier {
    /// Map a modifier keyword to its flag. Unknown keywords (`extern`,
    /// `unsafe`, `new`, ...) are not tracked.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Self::Public,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "internal" => Self::Internal,
            "static" => Self::Static,
            "async" => Self::Async,
            "virtual" => Self::Virtual,
            "override" => Self::Override,
            "abstract" => Self::Abstract,
            "sealed" => Self::Sealed,
            "readonly" => Self::Readonly,
            "partial" => Self::Partial,
            _ => return None,
        })
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of modifiers on a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers(u16);

impl Modifiers {
    /// Add a modifier to the set.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Whether the set contains `modifier`.
    #[must_use]
    pub fn has(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Effective accessibility. Members without an explicit keyword are private.
    #[must_use]
    pub fn accessibility(self) -> Accessibility {
        if self.has(Modifier::Public) {
            Accessibility::Public
        } else if self.has(Modifier::Private) {
            Accessibility::Private
        } else if self.has(Modifier::Protected) && self.has(Modifier::Internal) {
            Accessibility::ProtectedInternal
        } else if self.has(Modifier::Protected) {
            Accessibility::Protected
        } else if self.has(Modifier::Internal) {
            Accessibility::Internal
        } else {
            Accessibility::Private
        }
    }
}

// ============================================================================
// Symbol search
// ============================================================================

/// Result of `find_symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSearchResult {
    /// Symbol as queried
    pub symbol_name: String,
    /// The kind filter, or `"any"`.
    pub kind: String,
    /// Matches in workspace order
    pub results: Vec<SymbolLocation>,
}

/// One declaration matched by `find_symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocation {
    /// Path relative to the workspace root
    pub file_path: String,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// `Namespace.Type.Member`
    pub full_name: String,
}

// ============================================================================
// Cross references
// ============================================================================

/// Result of `find_usages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResult {
    /// Symbol as queried
    pub symbol_name: String,
    /// Number of usages
    pub total_usages: usize,
    /// Usage sites in workspace order
    pub usages: Vec<UsageInfo>,
}

/// One reference site of the target symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    /// Path relative to the workspace root
    pub file_path: String,
    /// 1-indexed line
    pub line: u32,
    /// 1-indexed column of the reference
    pub column: u32,
    /// Trimmed source line of the site
    pub context_code: String,
    /// Enclosing member, or `(top-level)`
    pub method_context: String,
}

/// Result of `find_callers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallersResult {
    /// Method as queried
    pub symbol: String,
    /// Call sites in workspace order
    pub callers: Vec<CallerInfo>,
    /// Number of matches
    pub total_count: usize,
}

/// One invocation of the target method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerInfo {
    /// Class containing the call
    pub caller_class: String,
    /// Member containing the call
    pub caller_method: String,
    /// Path relative to the workspace root
    pub file_path: String,
    /// 1-indexed line
    pub line: u32,
    /// Trimmed source line of the site
    pub context_code: String,
}

/// Result of `find_instantiations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationResult {
    /// Type as queried
    pub class_name: String,
    /// Creation sites in workspace order
    pub instantiations: Vec<InstantiationInfo>,
    /// Number of matches
    pub total_count: usize,
}

/// One construction of the target type, explicit or target-typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationInfo {
    /// Path relative to the workspace root
    pub file_path: String,
    /// 1-indexed line
    pub line: u32,
    /// Member containing the site
    pub containing_method: String,
    /// Class containing the site
    pub containing_class: String,
    /// Trimmed source line of the site
    pub context_code: String,
}

// ============================================================================
// Type hierarchy
// ============================================================================

/// Result of `get_hierarchy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyResult {
    /// Type as declared
    pub class_name: String,
    /// File declaring the type
    pub file_path: String,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Base chain by simple name, terminated by `"object"`.
    pub base_types: Vec<String>,
    /// Directly implemented interfaces
    pub interfaces: Vec<String>,
    /// Types deriving from this one, transitively
    pub derived_types: Vec<TypeLocation>,
}

/// A type declaration found by a hierarchy or implementation scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeLocation {
    /// Type name
    pub name: String,
    /// Declaration kind
    pub kind: DeclKind,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Line of the type declaration
    pub line: u32,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
}

/// Result of `find_implementations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationResult {
    /// Interface as queried
    pub interface: String,
    /// Implementing types
    pub implementations: Vec<TypeLocation>,
    /// Number of matches
    pub total_count: usize,
}

// ============================================================================
// Attributes and step definitions
// ============================================================================

/// Result of `find_by_attribute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSearchResult {
    /// Attribute as queried, without the `Attribute` suffix
    pub attribute: String,
    /// Argument filter, if any
    pub pattern: Option<String>,
    /// Matches in workspace order
    pub matches: Vec<AttributeMatch>,
    /// Number of matches
    pub total_count: usize,
}

/// A declaration carrying a matching attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMatch {
    /// Kind of the decorated declaration
    pub member_type: DeclKind,
    /// Member name; parameters are reported as `Method.param`.
    pub name: String,
    /// The full attribute as written, bracketed: `[Obsolete("msg")]`.
    pub attribute_arguments: String,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Line of the attribute list
    pub line: u32,
    /// Class containing the site
    pub containing_class: String,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
}

/// Result of `find_step_definitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinitionResult {
    /// Step text as queried
    pub pattern: String,
    /// Matches in workspace order
    pub matches: Vec<StepDefinition>,
    /// Number of matches
    pub total_count: usize,
}

/// A method bound to a behavior step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// Step keyword as written (`Given`, `When`, ...).
    #[serde(rename = "type")]
    pub step_type: String,
    /// First attribute argument, unescaped.
    pub regex: String,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Class declaring the binding
    pub class_name: String,
    /// Method name
    pub method_name: String,
    /// First line of the method
    pub start_line: u32,
    /// Last line of the method
    pub end_line: u32,
    /// Lines spanned by the method
    pub line_count: u32,
    /// Human-readable area derived from the class name.
    pub scope: String,
}

// ============================================================================
// Dependency surface
// ============================================================================

/// Result of `get_constructor_deps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDepsResult {
    /// Type as queried
    pub class_name: String,
    /// File declaring the class
    pub file_path: String,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Constructors in source order
    pub constructors: Vec<ConstructorInfo>,
}

/// One constructor and its parameter surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorInfo {
    /// Parameters in declaration order
    pub parameters: Vec<ConstructorParameter>,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Declaration header as written
    pub signature: String,
}

/// A constructor parameter with its as-written and qualified type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type as written
    #[serde(rename = "type")]
    pub type_name: String,
    /// Type qualified by its resolved namespace
    pub full_type_name: String,
}

/// Result of `find_interface_consumers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConsumersResult {
    /// Interface as queried
    pub interface: String,
    /// File declaring the interface
    pub defined_in: Option<String>,
    /// Line of the interface declaration
    pub definition_line: Option<u32>,
    /// Implementing types
    pub implementations: Vec<TypeLocation>,
    /// Members that receive the interface
    pub injections: Vec<InjectionSite>,
}

/// Where an injection site receives the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionKind {
    /// Constructor parameter
    ConstructorParameter,
    /// Field declarator
    Field,
    /// Property declaration
    Property,
}

/// A member whose declared type is (or directly contains) the interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionSite {
    /// Class receiving the interface
    pub class_name: String,
    /// Member name
    pub member_name: String,
    /// Kind of the decorated declaration
    pub member_type: InjectionKind,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Line of the member declaration
    pub line: u32,
}

// ============================================================================
// Feature files
// ============================================================================

/// Result of `list_feature_scenarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureScenariosResult {
    /// Root that was scanned
    pub path: String,
    /// Parsed feature files
    pub features: Vec<Feature>,
    /// Totals across all features
    pub summary: FeatureSummary,
}

/// A feature file with its scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Path relative to the scanned root.
    pub file: String,
    /// Text after `Feature:`
    pub name: String,
    /// Scenarios in file order
    pub scenarios: Vec<Scenario>,
}

/// A scenario or scenario outline heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Line of the scenario heading
    pub line: u32,
    /// Heading text after the keyword
    pub name: String,
}

/// Totals across all features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSummary {
    /// Number of feature files with a header
    pub total_features: usize,
    /// Number of scenarios across every feature
    pub total_scenarios: usize,
}

// ============================================================================
// Outline
// ============================================================================

/// A method or constructor parameter as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Type as written
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Result of `list_class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStructure {
    /// Outlined class
    pub class_name: String,
    /// Dotted namespace, empty for the global namespace
    pub namespace: String,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Members in source order
    pub members: Vec<MemberInfo>,
}

/// One member of a class outline. Only the fields meaningful for the
/// member's kind are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    /// Member kind
    pub kind: DeclKind,
    /// Simple name
    pub name: String,
    /// Field or property type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Line of a field or property
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Lines of a method or constructor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
    /// Header of a method or constructor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Field is `readonly`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_readonly: Option<bool>,
    /// Method is `async`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    /// Declared `static`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
    /// Return type as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Parameters of a method or constructor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterInfo>>,
    /// Property has a getter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_getter: Option<bool>,
    /// Property has a setter or init accessor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_setter: Option<bool>,
}

impl MemberInfo {
    /// A member with only the always-present fields set.
    #[must_use]
    pub fn new(kind: DeclKind, name: String, accessibility: Accessibility) -> Self {
        Self {
            kind,
            name,
            type_name: None,
            line: None,
            line_range: None,
            signature: None,
            accessibility,
            is_readonly: None,
            is_async: None,
            is_static: None,
            return_type: None,
            parameters: None,
            has_getter: None,
            has_setter: None,
        }
    }
}

/// Result of `list_classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassListResult {
    /// Namespace as queried
    pub namespace: String,
    /// Number of types listed
    pub total_classes: usize,
    /// Types sorted by name
    pub classes: Vec<ClassInfo>,
}

/// A type declaration listed by namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    /// Type name
    pub name: String,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Declared `static`
    pub is_static: bool,
}

/// Result of `get_namespace_structure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStructureResult {
    /// Project as queried
    pub project_name: String,
    /// Namespaces sorted by name
    pub namespaces: Vec<NamespaceInfo>,
}

/// Types grouped under one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    /// Dotted namespace, or `(global)`
    pub name: String,
    /// Number of types in the namespace
    pub class_count: usize,
    /// Type names sorted
    pub classes: Vec<String>,
}

/// Result of `get_method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResult {
    /// Method name
    pub method_name: String,
    /// Class declaring the method
    pub class_name: String,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Path relative to the workspace root
    pub file_path: String,
    /// Declaration header as written
    pub signature: String,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Method is `async`
    pub is_async: bool,
    /// Return type as written
    pub return_type: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterInfo>,
    /// Full source text of the method
    pub source_code: String,
}

/// Result of `get_methods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodsResult {
    /// Class as queried
    pub class_name: String,
    /// File declaring the class
    pub file_path: String,
    /// Requested methods that were found
    pub methods: Vec<MethodInfo>,
}

/// One method returned by `get_methods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Declaration header as written
    pub signature: String,
    /// Lines spanned by the declaration
    pub line_range: LineRange,
    /// Full source text of the method
    pub source_code: String,
    /// Return type as written
    pub return_type: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterInfo>,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Method is `async`
    pub is_async: bool,
}

/// Result of `check_overridable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // Mirrors the modifier keywords one-to-one
pub struct OverridableResult {
    /// Type as queried
    pub class_name: String,
    /// Method name
    pub method_name: String,
    /// Declared `virtual`
    pub is_virtual: bool,
    /// Declared `override`
    pub is_override: bool,
    /// Declared `abstract`
    pub is_abstract: bool,
    /// Declared `sealed`
    pub is_sealed: bool,
    /// Virtual, abstract or an unsealed override
    pub can_be_overridden: bool,
    /// `Type.Method` of the overridden declaration, for overrides.
    pub base_method: Option<String>,
    /// File declaring the method
    pub file_path: String,
    /// Line of the method declaration
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_range_serializes_as_pair() {
        let json = serde_json::to_string(&LineRange(3, 9)).expect("should serialize");

        assert_eq!(json, "[3,9]");
        assert_eq!(LineRange(3, 9).line_count(), 7);
    }

    #[test]
    fn accessibility_defaults_to_private() {
        assert_eq!(Modifiers::default().accessibility(), Accessibility::Private);
    }

    #[test]
    fn protected_internal_is_recognized() {
        let mut mods = Modifiers::default();
        mods.insert(Modifier::Protected);
        mods.insert(Modifier::Internal);

        assert_eq!(mods.accessibility(), Accessibility::ProtectedInternal);
        assert_eq!(
            serde_json::to_string(&mods.accessibility()).expect("should serialize"),
            "\"protected internal\""
        );
    }

    #[test]
    fn decl_kind_parse_is_case_insensitive() {
        assert_eq!(DeclKind::parse("Class"), Some(DeclKind::Class));
        assert_eq!(DeclKind::parse("METHOD"), Some(DeclKind::Method));
        assert_eq!(DeclKind::parse("widget"), None);
    }

    #[test]
    fn member_info_omits_unset_fields() {
        let member = MemberInfo::new(DeclKind::Field, "_count".into(), Accessibility::Private);
        let json = serde_json::to_value(&member).expect("should serialize");

        assert_eq!(json["kind"], "field");
        assert!(json.get("signature").is_none());
        assert!(json.get("type").is_none());
    }

    #[test]
    fn injection_kind_uses_kebab_case() {
        let json =
            serde_json::to_string(&InjectionKind::ConstructorParameter).expect("should serialize");

        assert_eq!(json, "\"constructor-parameter\"");
    }
}
