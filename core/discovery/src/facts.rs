//! Classification facts produced by the discovery pass.
//!
//! The raw marker-scanning happens once, up front, and produces this closed
//! set of value types. Everything downstream (option discovery, emission)
//! operates on these facts and never re-queries raw declarations.

use enumgen_ast::definitions::TypeRef;
use enumgen_parser::symbols::{AttributeSymbol, ConstructorSymbol, SymbolId};

/// Marker placed on a collection declaration for compiled-unit-only
/// discovery.
pub const COLLECTION_MARKER: &str = "EnumCollection";
/// Marker variant that widens discovery to every referenced module.
pub const GLOBAL_COLLECTION_MARKER: &str = "GlobalEnumCollection";
/// Optional marker on discoverable option declarations.
pub const OPTION_MARKER: &str = "EnumOption";
/// Marker on a base-type property requesting a generated lookup accessor.
pub const LOOKUP_MARKER: &str = "EnumLookup";
/// Known base collection type for the inheritance extraction pattern.
pub const COLLECTION_BASE_TYPE: &str = "EnumCollectionBase";

/// String comparison policy for generated lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NameComparison {
    #[default]
    Ordinal,
    OrdinalIgnoreCase,
}

/// One annotated property on the base type that receives a generated
/// accessor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyLookupInfo {
    pub property_name: String,
    pub property_type: TypeRef,
    /// Accessor method name, `GetBy<Property>` unless overridden.
    pub method_name: String,
    pub allow_multiple: bool,
    /// Nullable accessors return null on a miss; non-nullable ones throw.
    /// Properties named `Name` or `Id` default to throwing.
    pub is_nullable: bool,
    /// Custom equality comparer expression for non-string keys.
    pub comparer: Option<String>,
    pub return_type_override: Option<String>,
}

/// Discovery result describing one collection target.
#[derive(Clone, Debug)]
pub struct EnumTypeInfo {
    /// The collection declaration the markers sit on.
    pub declaration: SymbolId,
    pub declaration_name: String,
    pub namespace: String,
    /// The base/constraint type whose descendants are collected.
    pub base_type: SymbolId,
    pub base_type_name: String,
    pub base_type_fq_name: String,
    /// Name of the synthesized collection type.
    pub collection_name: String,
    pub global: bool,
    pub comparison: NameComparison,
    pub generate_factory_methods: bool,
    pub generate_static_collection: bool,
    pub use_singleton_instances: bool,
    pub generate_generic_wrappers: bool,
    pub return_type_override: Option<String>,
    pub lookups: Vec<PropertyLookupInfo>,
    /// Qualified name of the wrapped fixed enumeration, when wrapper
    /// generation is requested and an enum-typed constructor parameter on
    /// the base type identifies it.
    pub wrapped_enum_fq_name: Option<String>,
    /// Members of that enumeration, in declaration order.
    pub wrapped_enum_members: Vec<String>,
}

/// One discovered concrete option declaration.
#[derive(Clone, Debug)]
pub struct EnumValueInfo {
    pub symbol: SymbolId,
    pub name: String,
    pub fq_name: String,
    pub namespace: String,
    /// Declared constructors, recorded even when none is parameterless so
    /// emission can pick the shape it needs.
    pub constructors: Vec<ConstructorSymbol>,
}

impl EnumValueInfo {
    #[must_use]
    pub fn has_parameterless_constructor(&self) -> bool {
        self.constructors.is_empty()
            || self.constructors.iter().any(ConstructorSymbol::is_parameterless)
    }
}

/// A collection declaration together with its discovered option set, in
/// traversal order.
#[derive(Clone, Debug)]
pub struct DiscoveredCollection {
    pub info: EnumTypeInfo,
    pub options: Vec<EnumValueInfo>,
}

/// Strips the quotes off a `"literal"` attribute argument.
#[must_use]
pub fn string_arg(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

#[must_use]
pub fn bool_arg(raw: &str) -> bool {
    raw.trim() == "true"
}

/// Reads the shared marker configuration off a collection attribute.
#[must_use]
pub fn comparison_from(attribute: &AttributeSymbol) -> NameComparison {
    if attribute.named_arg("IgnoreCase").is_some_and(bool_arg) {
        NameComparison::OrdinalIgnoreCase
    } else {
        NameComparison::Ordinal
    }
}
