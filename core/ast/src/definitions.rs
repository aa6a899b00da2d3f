//! The immutable Definition Model.
//!
//! Value objects describing declarations: compilation units, namespaces,
//! types, members, parameters, and attributes. All of them are snapshots
//! produced by the builder states in [`crate::builder`] and never change
//! after construction; the structs are `#[non_exhaustive]` so direct
//! construction outside this crate is impossible.
//!
//! Composition is ownership-down: a class owns its member list. The upward
//! edge is the id route recorded in [`crate::arena::DefinitionArena`] when a
//! builder registers the finished value.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::node::Location;

/// Declaration access level. `Private` is the C# default for members,
/// `Internal` for top-level types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    #[default]
    Private,
    ProtectedInternal,
    PrivateProtected,
}

impl Visibility {
    /// Maps a modifier keyword to a visibility, if it is one.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "internal" => Some(Visibility::Internal),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    /// Source-level keyword spelling.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::PrivateProtected => "private protected",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Modifier {
    Abstract,
    Static,
    Sealed,
    Partial,
    Virtual,
    Override,
    Readonly,
    Const,
    Async,
}

impl Modifier {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "abstract" => Some(Modifier::Abstract),
            "static" => Some(Modifier::Static),
            "sealed" => Some(Modifier::Sealed),
            "partial" => Some(Modifier::Partial),
            "virtual" => Some(Modifier::Virtual),
            "override" => Some(Modifier::Override),
            "readonly" => Some(Modifier::Readonly),
            "const" => Some(Modifier::Const),
            "async" => Some(Modifier::Async),
            _ => None,
        }
    }
}

/// A (possibly generic) reference to a type by name. `type_args` is empty
/// for non-generic references; `name` never carries the argument list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub type_args: Vec<TypeRef>,
    pub is_nullable: bool,
}

impl TypeRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            is_nullable: false,
        }
    }

    #[must_use]
    pub fn generic(name: impl Into<String>, type_args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_args,
            is_nullable: false,
        }
    }

    /// The unbound identity of this reference: the name without type
    /// arguments plus the generic arity. `List<int>` and `List<string>`
    /// share `("List", 1)`.
    #[must_use]
    pub fn unbound_identity(&self) -> (String, usize) {
        (self.name.clone(), self.type_args.len())
    }

    /// Short name without any namespace qualification.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        if self.is_nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// One attribute (marker annotation) applied to a declaration. Arguments
/// are kept as raw expression text; named arguments are keyed by name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct AttributeDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub positional_args: Vec<String>,
    pub named_args: FxHashMap<String, String>,
}

impl AttributeDefinition {
    /// Attribute names match with or without the conventional suffix, so
    /// `[EnumCollection]` and `[EnumCollectionAttribute]` are the same marker.
    #[must_use]
    pub fn matches_name(&self, marker: &str) -> bool {
        let short = self.name.rsplit('.').next().unwrap_or(&self.name);
        short == marker || short.strip_suffix("Attribute") == Some(marker)
    }

    #[must_use]
    pub fn named_arg(&self, key: &str) -> Option<&str> {
        self.named_args.get(key).map(String::as_str)
    }
}

/// A generic type parameter together with its constraint list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeParameterDefinition {
    pub name: String,
    pub constraints: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct ParameterDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub parameter_type: TypeRef,
    pub default_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct MethodDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub return_type: TypeRef,
    pub parameters: Vec<Arc<ParameterDefinition>>,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub attributes: Vec<Arc<AttributeDefinition>>,
    pub documentation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct PropertyDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub property_type: TypeRef,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub has_getter: bool,
    pub has_setter: bool,
    pub attributes: Vec<Arc<AttributeDefinition>>,
    pub documentation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct FieldDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub field_type: TypeRef,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub initializer: Option<String>,
    pub attributes: Vec<Arc<AttributeDefinition>>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct ConstructorDefinition {
    pub id: u32,
    pub location: Location,
    /// Constructors are named after their declaring type.
    pub name: String,
    pub parameters: Vec<Arc<ParameterDefinition>>,
    pub visibility: Visibility,
    pub attributes: Vec<Arc<AttributeDefinition>>,
}

/// Owned member list entry of a class or interface.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MemberDefinition {
    Method(Arc<MethodDefinition>),
    Property(Arc<PropertyDefinition>),
    Field(Arc<FieldDefinition>),
    Constructor(Arc<ConstructorDefinition>),
    NestedClass(Arc<ClassDefinition>),
    NestedInterface(Arc<InterfaceDefinition>),
    NestedEnum(Arc<EnumDefinition>),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct ClassDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub base_types: Vec<TypeRef>,
    pub type_parameters: Vec<TypeParameterDefinition>,
    pub attributes: Vec<Arc<AttributeDefinition>>,
    pub members: Vec<MemberDefinition>,
    pub documentation: Option<String>,
}

impl ClassDefinition {
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Arc<PropertyDefinition>> {
        self.members.iter().filter_map(|member| match member {
            MemberDefinition::Property(prop) => Some(prop),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Arc<ConstructorDefinition>> {
        self.members.iter().filter_map(|member| match member {
            MemberDefinition::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct InterfaceDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub visibility: Visibility,
    pub base_types: Vec<TypeRef>,
    pub type_parameters: Vec<TypeParameterDefinition>,
    pub attributes: Vec<Arc<AttributeDefinition>>,
    pub members: Vec<MemberDefinition>,
    pub documentation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EnumMemberDefinition {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct EnumDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub visibility: Visibility,
    pub attributes: Vec<Arc<AttributeDefinition>>,
    pub members: Vec<EnumMemberDefinition>,
}

/// Top-level declaration entry of a namespace or compilation unit.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NamespaceMember {
    Namespace(Arc<NamespaceDefinition>),
    Class(Arc<ClassDefinition>),
    Interface(Arc<InterfaceDefinition>),
    Enum(Arc<EnumDefinition>),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct NamespaceDefinition {
    pub id: u32,
    pub location: Location,
    pub name: String,
    pub members: Vec<NamespaceMember>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct CompilationUnitDefinition {
    pub id: u32,
    pub location: Location,
    pub file_path: String,
    pub usings: Vec<String>,
    pub members: Vec<NamespaceMember>,
}

/// Arena storage wrapper over every definition kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionNode {
    CompilationUnit(Arc<CompilationUnitDefinition>),
    Namespace(Arc<NamespaceDefinition>),
    Class(Arc<ClassDefinition>),
    Interface(Arc<InterfaceDefinition>),
    Enum(Arc<EnumDefinition>),
    Method(Arc<MethodDefinition>),
    Property(Arc<PropertyDefinition>),
    Field(Arc<FieldDefinition>),
    Constructor(Arc<ConstructorDefinition>),
    Parameter(Arc<ParameterDefinition>),
    Attribute(Arc<AttributeDefinition>),
}

impl DefinitionNode {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            DefinitionNode::CompilationUnit(node) => node.id,
            DefinitionNode::Namespace(node) => node.id,
            DefinitionNode::Class(node) => node.id,
            DefinitionNode::Interface(node) => node.id,
            DefinitionNode::Enum(node) => node.id,
            DefinitionNode::Method(node) => node.id,
            DefinitionNode::Property(node) => node.id,
            DefinitionNode::Field(node) => node.id,
            DefinitionNode::Constructor(node) => node.id,
            DefinitionNode::Parameter(node) => node.id,
            DefinitionNode::Attribute(node) => node.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            DefinitionNode::CompilationUnit(node) => Some(node.file_path.as_str()),
            DefinitionNode::Namespace(node) => Some(node.name.as_str()),
            DefinitionNode::Class(node) => Some(node.name.as_str()),
            DefinitionNode::Interface(node) => Some(node.name.as_str()),
            DefinitionNode::Enum(node) => Some(node.name.as_str()),
            DefinitionNode::Method(node) => Some(node.name.as_str()),
            DefinitionNode::Property(node) => Some(node.name.as_str()),
            DefinitionNode::Field(node) => Some(node.name.as_str()),
            DefinitionNode::Constructor(node) => Some(node.name.as_str()),
            DefinitionNode::Parameter(node) => Some(node.name.as_str()),
            DefinitionNode::Attribute(node) => Some(node.name.as_str()),
        }
    }
}
