//! Builder states for the Definition Model.
//!
//! Every definition value is produced through a matching builder. A builder
//! is a plain cloneable state: each configuration call consumes the state and
//! returns the updated one, so branching a partially-configured builder is an
//! explicit `clone()` and two builds never share structure. `build` snapshots
//! the state into the immutable definition, registers it in the arena under
//! its parent id, and returns the shared handle.
//!
//! Node IDs are assigned from a process-wide atomic counter, sequential in
//! build order. Zero is reserved for "no parent".

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::arena::DefinitionArena;
use crate::definitions::{
    AttributeDefinition, ClassDefinition, CompilationUnitDefinition, ConstructorDefinition,
    DefinitionNode, EnumDefinition, EnumMemberDefinition, FieldDefinition, InterfaceDefinition,
    MemberDefinition, MethodDefinition, Modifier, NamespaceDefinition, NamespaceMember,
    ParameterDefinition, PropertyDefinition, TypeParameterDefinition, TypeRef, Visibility,
};
use crate::node::Location;

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

fn next_node_id() -> u32 {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug, Default)]
pub struct AttributeBuilder {
    name: String,
    location: Location,
    positional_args: Vec<String>,
    named_args: FxHashMap<String, String>,
}

impl AttributeBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn positional_arg(mut self, value: impl Into<String>) -> Self {
        self.positional_args.push(value.into());
        self
    }

    #[must_use]
    pub fn named_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.named_args.insert(key.into(), value.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<AttributeDefinition> {
        let definition = Arc::new(AttributeDefinition {
            id: next_node_id(),
            location: self.location,
            name: self.name,
            positional_args: self.positional_args,
            named_args: self.named_args,
        });
        arena.add_node(DefinitionNode::Attribute(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct ParameterBuilder {
    name: String,
    location: Location,
    parameter_type: TypeRef,
    default_value: Option<String>,
}

impl ParameterBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            parameter_type,
            default_value: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<ParameterDefinition> {
        let definition = Arc::new(ParameterDefinition {
            id: next_node_id(),
            location: self.location,
            name: self.name,
            parameter_type: self.parameter_type,
            default_value: self.default_value,
        });
        arena.add_node(DefinitionNode::Parameter(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct MethodBuilder {
    name: String,
    location: Location,
    return_type: TypeRef,
    parameters: Vec<ParameterBuilder>,
    visibility: Visibility,
    modifiers: Vec<Modifier>,
    attributes: Vec<AttributeBuilder>,
    documentation: Option<String>,
}

impl MethodBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            return_type,
            parameters: Vec::new(),
            visibility: Visibility::default(),
            modifiers: Vec::new(),
            attributes: Vec::new(),
            documentation: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterBuilder) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.documentation = Some(text.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<MethodDefinition> {
        let id = next_node_id();
        let parameters = self
            .parameters
            .into_iter()
            .map(|parameter| parameter.build(arena, id))
            .collect();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let definition = Arc::new(MethodDefinition {
            id,
            location: self.location,
            name: self.name,
            return_type: self.return_type,
            parameters,
            visibility: self.visibility,
            modifiers: self.modifiers,
            attributes,
            documentation: self.documentation,
        });
        arena.add_node(DefinitionNode::Method(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct PropertyBuilder {
    name: String,
    location: Location,
    property_type: TypeRef,
    visibility: Visibility,
    modifiers: Vec<Modifier>,
    has_getter: bool,
    has_setter: bool,
    attributes: Vec<AttributeBuilder>,
    documentation: Option<String>,
}

impl PropertyBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, property_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            property_type,
            visibility: Visibility::default(),
            modifiers: Vec::new(),
            has_getter: true,
            has_setter: false,
            attributes: Vec::new(),
            documentation: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn accessors(mut self, has_getter: bool, has_setter: bool) -> Self {
        self.has_getter = has_getter;
        self.has_setter = has_setter;
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.documentation = Some(text.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<PropertyDefinition> {
        let id = next_node_id();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let definition = Arc::new(PropertyDefinition {
            id,
            location: self.location,
            name: self.name,
            property_type: self.property_type,
            visibility: self.visibility,
            modifiers: self.modifiers,
            has_getter: self.has_getter,
            has_setter: self.has_setter,
            attributes,
            documentation: self.documentation,
        });
        arena.add_node(DefinitionNode::Property(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct FieldBuilder {
    name: String,
    location: Location,
    field_type: TypeRef,
    visibility: Visibility,
    modifiers: Vec<Modifier>,
    initializer: Option<String>,
    attributes: Vec<AttributeBuilder>,
}

impl FieldBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            field_type,
            visibility: Visibility::default(),
            modifiers: Vec::new(),
            initializer: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn initializer(mut self, text: impl Into<String>) -> Self {
        self.initializer = Some(text.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<FieldDefinition> {
        let id = next_node_id();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let definition = Arc::new(FieldDefinition {
            id,
            location: self.location,
            name: self.name,
            field_type: self.field_type,
            visibility: self.visibility,
            modifiers: self.modifiers,
            initializer: self.initializer,
            attributes,
        });
        arena.add_node(DefinitionNode::Field(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct ConstructorBuilder {
    name: String,
    location: Location,
    parameters: Vec<ParameterBuilder>,
    visibility: Visibility,
    attributes: Vec<AttributeBuilder>,
}

impl ConstructorBuilder {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            name: type_name.into(),
            location: Location::default(),
            parameters: Vec::new(),
            visibility: Visibility::default(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterBuilder) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<ConstructorDefinition> {
        let id = next_node_id();
        let parameters = self
            .parameters
            .into_iter()
            .map(|parameter| parameter.build(arena, id))
            .collect();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let definition = Arc::new(ConstructorDefinition {
            id,
            location: self.location,
            name: self.name,
            parameters,
            visibility: self.visibility,
            attributes,
        });
        arena.add_node(DefinitionNode::Constructor(definition.clone()), parent_id);
        definition
    }
}

/// Pending member of a class or interface builder.
#[derive(Clone, Debug)]
pub enum MemberBuilder {
    Method(MethodBuilder),
    Property(PropertyBuilder),
    Field(FieldBuilder),
    Constructor(ConstructorBuilder),
    NestedClass(Box<ClassBuilder>),
    NestedInterface(Box<InterfaceBuilder>),
    NestedEnum(EnumBuilder),
}

impl MemberBuilder {
    fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> MemberDefinition {
        match self {
            MemberBuilder::Method(builder) => {
                MemberDefinition::Method(builder.build(arena, parent_id))
            }
            MemberBuilder::Property(builder) => {
                MemberDefinition::Property(builder.build(arena, parent_id))
            }
            MemberBuilder::Field(builder) => {
                MemberDefinition::Field(builder.build(arena, parent_id))
            }
            MemberBuilder::Constructor(builder) => {
                MemberDefinition::Constructor(builder.build(arena, parent_id))
            }
            MemberBuilder::NestedClass(builder) => {
                MemberDefinition::NestedClass(builder.build(arena, parent_id))
            }
            MemberBuilder::NestedInterface(builder) => {
                MemberDefinition::NestedInterface(builder.build(arena, parent_id))
            }
            MemberBuilder::NestedEnum(builder) => {
                MemberDefinition::NestedEnum(builder.build(arena, parent_id))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassBuilder {
    name: String,
    location: Location,
    visibility: Visibility,
    modifiers: Vec<Modifier>,
    base_types: Vec<TypeRef>,
    type_parameters: Vec<TypeParameterDefinition>,
    attributes: Vec<AttributeBuilder>,
    members: Vec<MemberBuilder>,
    documentation: Option<String>,
}

impl ClassBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            visibility: Visibility::Internal,
            modifiers: Vec::new(),
            base_types: Vec::new(),
            type_parameters: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            documentation: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn base_type(mut self, base: TypeRef) -> Self {
        self.base_types.push(base);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, name: impl Into<String>, constraints: Vec<TypeRef>) -> Self {
        self.type_parameters.push(TypeParameterDefinition {
            name: name.into(),
            constraints,
        });
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberBuilder) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.documentation = Some(text.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<ClassDefinition> {
        let id = next_node_id();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let members = self
            .members
            .into_iter()
            .map(|member| member.build(arena, id))
            .collect();
        let definition = Arc::new(ClassDefinition {
            id,
            location: self.location,
            name: self.name,
            visibility: self.visibility,
            modifiers: self.modifiers,
            base_types: self.base_types,
            type_parameters: self.type_parameters,
            attributes,
            members,
            documentation: self.documentation,
        });
        arena.add_node(DefinitionNode::Class(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct InterfaceBuilder {
    name: String,
    location: Location,
    visibility: Visibility,
    base_types: Vec<TypeRef>,
    type_parameters: Vec<TypeParameterDefinition>,
    attributes: Vec<AttributeBuilder>,
    members: Vec<MemberBuilder>,
    documentation: Option<String>,
}

impl InterfaceBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            visibility: Visibility::Internal,
            base_types: Vec::new(),
            type_parameters: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            documentation: None,
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn base_type(mut self, base: TypeRef) -> Self {
        self.base_types.push(base);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, name: impl Into<String>, constraints: Vec<TypeRef>) -> Self {
        self.type_parameters.push(TypeParameterDefinition {
            name: name.into(),
            constraints,
        });
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberBuilder) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn documentation(mut self, text: impl Into<String>) -> Self {
        self.documentation = Some(text.into());
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<InterfaceDefinition> {
        let id = next_node_id();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let members = self
            .members
            .into_iter()
            .map(|member| member.build(arena, id))
            .collect();
        let definition = Arc::new(InterfaceDefinition {
            id,
            location: self.location,
            name: self.name,
            visibility: self.visibility,
            base_types: self.base_types,
            type_parameters: self.type_parameters,
            attributes,
            members,
            documentation: self.documentation,
        });
        arena.add_node(DefinitionNode::Interface(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug)]
pub struct EnumBuilder {
    name: String,
    location: Location,
    visibility: Visibility,
    attributes: Vec<AttributeBuilder>,
    members: Vec<EnumMemberDefinition>,
}

impl EnumBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            visibility: Visibility::Internal,
            attributes: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeBuilder) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.members.push(EnumMemberDefinition {
            name: name.into(),
            value,
        });
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<EnumDefinition> {
        let id = next_node_id();
        let attributes = self
            .attributes
            .into_iter()
            .map(|attribute| attribute.build(arena, id))
            .collect();
        let definition = Arc::new(EnumDefinition {
            id,
            location: self.location,
            name: self.name,
            visibility: self.visibility,
            attributes,
            members: self.members,
        });
        arena.add_node(DefinitionNode::Enum(definition.clone()), parent_id);
        definition
    }
}

/// Pending top-level member of a namespace or compilation-unit builder.
#[derive(Clone, Debug)]
pub enum NamespaceMemberBuilder {
    Namespace(Box<NamespaceBuilder>),
    Class(ClassBuilder),
    Interface(InterfaceBuilder),
    Enum(EnumBuilder),
}

impl NamespaceMemberBuilder {
    fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> NamespaceMember {
        match self {
            NamespaceMemberBuilder::Namespace(builder) => {
                NamespaceMember::Namespace(builder.build(arena, parent_id))
            }
            NamespaceMemberBuilder::Class(builder) => {
                NamespaceMember::Class(builder.build(arena, parent_id))
            }
            NamespaceMemberBuilder::Interface(builder) => {
                NamespaceMember::Interface(builder.build(arena, parent_id))
            }
            NamespaceMemberBuilder::Enum(builder) => {
                NamespaceMember::Enum(builder.build(arena, parent_id))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct NamespaceBuilder {
    name: String,
    location: Location,
    members: Vec<NamespaceMemberBuilder>,
}

impl NamespaceBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Location::default(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn member(mut self, member: NamespaceMemberBuilder) -> Self {
        self.members.push(member);
        self
    }

    pub fn build(self, arena: &mut DefinitionArena, parent_id: u32) -> Arc<NamespaceDefinition> {
        let id = next_node_id();
        let members = self
            .members
            .into_iter()
            .map(|member| member.build(arena, id))
            .collect();
        let definition = Arc::new(NamespaceDefinition {
            id,
            location: self.location,
            name: self.name,
            members,
        });
        arena.add_node(DefinitionNode::Namespace(definition.clone()), parent_id);
        definition
    }
}

#[derive(Clone, Debug, Default)]
pub struct CompilationUnitBuilder {
    file_path: String,
    location: Location,
    usings: Vec<String>,
    members: Vec<NamespaceMemberBuilder>,
}

impl CompilationUnitBuilder {
    #[must_use]
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    #[must_use]
    pub fn member(mut self, member: NamespaceMemberBuilder) -> Self {
        self.members.push(member);
        self
    }

    /// Builds the whole unit, returning the root definition together with
    /// the arena holding every registered node.
    pub fn build(self) -> (Arc<CompilationUnitDefinition>, DefinitionArena) {
        let mut arena = DefinitionArena::default();
        let id = next_node_id();
        let members = self
            .members
            .into_iter()
            .map(|member| member.build(&mut arena, id))
            .collect();
        let definition = Arc::new(CompilationUnitDefinition {
            id,
            location: self.location,
            file_path: self.file_path,
            usings: self.usings,
            members,
        });
        arena.add_node(DefinitionNode::CompilationUnit(definition.clone()), 0);
        (definition, arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_builder_snapshots_into_immutable_definition() {
        let builder = ClassBuilder::new("Color")
            .visibility(Visibility::Public)
            .modifier(Modifier::Abstract)
            .member(MemberBuilder::Property(
                PropertyBuilder::new("Hex", TypeRef::named("string"))
                    .visibility(Visibility::Public),
            ));
        let unit = CompilationUnitBuilder::new("Color.cs")
            .member(NamespaceMemberBuilder::Class(builder));
        let (definition, arena) = unit.build();
        assert_eq!(definition.members.len(), 1);
        let NamespaceMember::Class(class) = &definition.members[0] else {
            panic!("expected a class member");
        };
        assert!(class.is_abstract());
        assert_eq!(class.properties().count(), 1);
        // Arena routes class -> unit and property -> class.
        assert_eq!(arena.find_parent_node(class.id), Some(definition.id));
        let property = class.properties().next().unwrap();
        assert_eq!(arena.find_parent_node(property.id), Some(class.id));
    }

    #[test]
    fn branching_a_builder_state_yields_independent_values() {
        let base = ClassBuilder::new("Option").visibility(Visibility::Public);
        let left = base.clone().modifier(Modifier::Abstract);
        let right = base.modifier(Modifier::Sealed);

        let (left_unit, _) = CompilationUnitBuilder::new("a.cs")
            .member(NamespaceMemberBuilder::Class(left))
            .build();
        let (right_unit, _) = CompilationUnitBuilder::new("b.cs")
            .member(NamespaceMemberBuilder::Class(right))
            .build();

        let NamespaceMember::Class(left_class) = &left_unit.members[0] else {
            panic!("expected class");
        };
        let NamespaceMember::Class(right_class) = &right_unit.members[0] else {
            panic!("expected class");
        };
        assert!(left_class.modifiers.contains(&Modifier::Abstract));
        assert!(!left_class.modifiers.contains(&Modifier::Sealed));
        assert!(right_class.modifiers.contains(&Modifier::Sealed));
        assert_ne!(left_class.id, right_class.id);
    }

    #[test]
    fn node_ids_are_unique_across_builds() {
        let (first, _) = CompilationUnitBuilder::new("a.cs").build();
        let (second, _) = CompilationUnitBuilder::new("a.cs").build();
        assert_ne!(first.id, second.id);
    }
}
