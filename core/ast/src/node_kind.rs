//! Closed set of syntax-node kind tags.
//!
//! Backends map their grammar's raw kind strings into this enum so that
//! everything downstream (conversion, discovery) matches on a closed set
//! instead of comparing strings. Kinds with no dedicated variant are kept
//! verbatim in [`NodeKind::Other`].

use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    CompilationUnit,
    NamespaceDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    StructDeclaration,
    RecordDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    MethodDeclaration,
    PropertyDeclaration,
    FieldDeclaration,
    ConstructorDeclaration,
    ParameterList,
    Parameter,
    AttributeList,
    Attribute,
    BaseList,
    TypeParameterList,
    TypeParameter,
    TypeParameterConstraintsClause,
    UsingDirective,
    Identifier,
    QualifiedName,
    GenericName,
    Error,
    Other(String),
}

impl NodeKind {
    /// Maps a raw grammar kind string to a kind tag.
    #[must_use]
    pub fn from_grammar(kind: &str) -> Self {
        match kind {
            "compilation_unit" => NodeKind::CompilationUnit,
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                NodeKind::NamespaceDeclaration
            }
            "class_declaration" => NodeKind::ClassDeclaration,
            "interface_declaration" => NodeKind::InterfaceDeclaration,
            "struct_declaration" => NodeKind::StructDeclaration,
            "record_declaration" => NodeKind::RecordDeclaration,
            "enum_declaration" => NodeKind::EnumDeclaration,
            "enum_member_declaration" => NodeKind::EnumMemberDeclaration,
            "method_declaration" => NodeKind::MethodDeclaration,
            "property_declaration" => NodeKind::PropertyDeclaration,
            "field_declaration" => NodeKind::FieldDeclaration,
            "constructor_declaration" => NodeKind::ConstructorDeclaration,
            "parameter_list" => NodeKind::ParameterList,
            "parameter" => NodeKind::Parameter,
            "attribute_list" => NodeKind::AttributeList,
            "attribute" => NodeKind::Attribute,
            "base_list" => NodeKind::BaseList,
            "type_parameter_list" => NodeKind::TypeParameterList,
            "type_parameter" => NodeKind::TypeParameter,
            "type_parameter_constraints_clause" => NodeKind::TypeParameterConstraintsClause,
            "using_directive" => NodeKind::UsingDirective,
            "identifier" => NodeKind::Identifier,
            "qualified_name" => NodeKind::QualifiedName,
            "generic_name" => NodeKind::GenericName,
            "ERROR" => NodeKind::Error,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Returns true for kinds that declare a named type.
    #[must_use]
    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::StructDeclaration
                | NodeKind::RecordDeclaration
                | NodeKind::EnumDeclaration
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Other(raw) => write!(f, "{raw}"),
            known => write!(f, "{known:?}"),
        }
    }
}
