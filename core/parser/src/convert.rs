//! CST to Definition Model conversion for the C# backend.
//!
//! Walks the tree-sitter tree by kind and field name, accumulates builder
//! states, and snapshots them into the immutable model. Syntax errors are
//! not this layer's business (ERROR subtrees are skipped); a recognizable
//! declaration with an impossible shape is a conversion fault and aborts
//! the whole conversion.

use tree_sitter::Node;

use enumgen_ast::builder::{
    AttributeBuilder, ClassBuilder, CompilationUnitBuilder, ConstructorBuilder, EnumBuilder,
    FieldBuilder, InterfaceBuilder, MemberBuilder, MethodBuilder, NamespaceBuilder,
    NamespaceMemberBuilder, ParameterBuilder, PropertyBuilder,
};
use enumgen_ast::definitions::{Modifier, TypeRef, Visibility};
use enumgen_ast::errors::DefinitionError;

use crate::backend::ParsedUnit;
use crate::csharp::{node_location, node_text};
use crate::errors::ParseError;

pub(crate) fn convert_unit(
    root: Node,
    code: &[u8],
    file_path: &str,
) -> Result<ParsedUnit, ParseError> {
    let mut builder = CompilationUnitBuilder::new(file_path).location(node_location(root, file_path));
    // A file-scoped namespace (`namespace N;`) owns every declaration that
    // follows it, even though the grammar leaves those as siblings.
    let mut file_scoped: Option<NamespaceBuilder> = None;
    for child in named_children(root) {
        match child.kind() {
            "using_directive" => {
                if let Some(target) = using_target(child, code) {
                    builder = builder.using(target);
                }
            }
            "file_scoped_namespace_declaration" => {
                if let Some(finished) = file_scoped.take() {
                    builder = builder.member(NamespaceMemberBuilder::Namespace(Box::new(finished)));
                }
                file_scoped = Some(convert_namespace(child, code, file_path)?);
            }
            "ERROR" | "comment" | "global_attribute_list" | "preproc_if" | "preproc_endif" => {}
            _ => {
                if let Some(member) = convert_namespace_member(child, code, file_path)? {
                    match file_scoped {
                        Some(namespace) => file_scoped = Some(namespace.member(member)),
                        None => builder = builder.member(member),
                    }
                }
            }
        }
    }
    if let Some(finished) = file_scoped {
        builder = builder.member(NamespaceMemberBuilder::Namespace(Box::new(finished)));
    }
    let (unit, arena) = builder.build();
    Ok(ParsedUnit { unit, arena })
}

fn convert_namespace_member(
    node: Node,
    code: &[u8],
    file: &str,
) -> Result<Option<NamespaceMemberBuilder>, ParseError> {
    let member = match node.kind() {
        "namespace_declaration" | "file_scoped_namespace_declaration" => Some(
            NamespaceMemberBuilder::Namespace(Box::new(convert_namespace(node, code, file)?)),
        ),
        "class_declaration" | "struct_declaration" | "record_declaration" => Some(
            NamespaceMemberBuilder::Class(convert_class(node, code, file)?),
        ),
        "interface_declaration" => Some(NamespaceMemberBuilder::Interface(convert_interface(
            node, code, file,
        )?)),
        "enum_declaration" => Some(NamespaceMemberBuilder::Enum(convert_enum(node, code, file)?)),
        // Delegates, global statements and the rest carry no declarations we
        // model; they are skipped, not faulted.
        _ => None,
    };
    Ok(member)
}

fn convert_namespace(
    node: Node,
    code: &[u8],
    file: &str,
) -> Result<NamespaceBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let mut builder =
        NamespaceBuilder::new(node_text(name_node, code)).location(node_location(node, file));
    let members: Vec<Node> = node.child_by_field_name("body").map_or_else(
        || {
            // File-scoped namespaces own the rest of the file directly.
            named_children(node)
                .into_iter()
                .filter(|child| child.id() != name_node.id())
                .collect()
        },
        named_children,
    );
    for child in members {
        if let Some(member) = convert_namespace_member(child, code, file)? {
            builder = builder.member(member);
        }
    }
    Ok(builder)
}

fn convert_class(node: Node, code: &[u8], file: &str) -> Result<ClassBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let type_name = node_text(name_node, code).to_string();
    let mut builder = ClassBuilder::new(&type_name).location(node_location(node, file));

    let (visibility, modifiers) = read_modifiers(node, code, Visibility::Internal);
    builder = builder.visibility(visibility);
    for modifier in modifiers {
        builder = builder.modifier(modifier);
    }
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    for base in read_base_list(node, code) {
        builder = builder.base_type(base);
    }
    for (param, constraints) in read_type_parameters(node, code) {
        builder = builder.type_parameter(param, constraints);
    }
    if let Some(doc) = leading_doc(node, code) {
        builder = builder.documentation(doc);
    }

    if let Some(body) = node.child_by_field_name("body") {
        for child in named_children(body) {
            if let Some(member) = convert_type_member(child, &type_name, code, file)? {
                builder = builder.member(member);
            }
        }
    }
    Ok(builder)
}

fn convert_interface(node: Node, code: &[u8], file: &str) -> Result<InterfaceBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let type_name = node_text(name_node, code).to_string();
    let mut builder = InterfaceBuilder::new(&type_name).location(node_location(node, file));

    let (visibility, _) = read_modifiers(node, code, Visibility::Internal);
    builder = builder.visibility(visibility);
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    for base in read_base_list(node, code) {
        builder = builder.base_type(base);
    }
    for (param, constraints) in read_type_parameters(node, code) {
        builder = builder.type_parameter(param, constraints);
    }
    if let Some(doc) = leading_doc(node, code) {
        builder = builder.documentation(doc);
    }

    if let Some(body) = node.child_by_field_name("body") {
        for child in named_children(body) {
            if let Some(member) = convert_type_member(child, &type_name, code, file)? {
                builder = builder.member(member);
            }
        }
    }
    Ok(builder)
}

fn convert_enum(node: Node, code: &[u8], file: &str) -> Result<EnumBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let mut builder =
        EnumBuilder::new(node_text(name_node, code)).location(node_location(node, file));
    let (visibility, _) = read_modifiers(node, code, Visibility::Internal);
    builder = builder.visibility(visibility);
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    if let Some(body) = node.child_by_field_name("body") {
        for child in named_children(body) {
            if child.kind() != "enum_member_declaration" {
                continue;
            }
            let member_name = require_child(child, "name", code, file)?;
            let value = child
                .child_by_field_name("value")
                .or_else(|| find_child(child, "equals_value_clause"))
                .map(|value_node| {
                    node_text(value_node, code)
                        .trim_start_matches('=')
                        .trim()
                        .to_string()
                });
            builder = builder.member(node_text(member_name, code), value);
        }
    }
    Ok(builder)
}

fn convert_type_member(
    node: Node,
    declaring_type: &str,
    code: &[u8],
    file: &str,
) -> Result<Option<MemberBuilder>, ParseError> {
    let member = match node.kind() {
        "method_declaration" => Some(MemberBuilder::Method(convert_method(node, code, file)?)),
        "property_declaration" => {
            Some(MemberBuilder::Property(convert_property(node, code, file)?))
        }
        "field_declaration" => convert_field(node, code, file)?.map(MemberBuilder::Field),
        "constructor_declaration" => Some(MemberBuilder::Constructor(convert_constructor(
            node,
            declaring_type,
            code,
            file,
        )?)),
        "class_declaration" | "struct_declaration" | "record_declaration" => Some(
            MemberBuilder::NestedClass(Box::new(convert_class(node, code, file)?)),
        ),
        "interface_declaration" => Some(MemberBuilder::NestedInterface(Box::new(
            convert_interface(node, code, file)?,
        ))),
        "enum_declaration" => Some(MemberBuilder::NestedEnum(convert_enum(node, code, file)?)),
        _ => None,
    };
    Ok(member)
}

fn convert_method(node: Node, code: &[u8], file: &str) -> Result<MethodBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let return_type = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
        .map_or_else(|| TypeRef::named("void"), |n| convert_type_ref(n, code));
    let mut builder = MethodBuilder::new(node_text(name_node, code), return_type)
        .location(node_location(node, file));

    let (visibility, modifiers) = read_modifiers(node, code, Visibility::Private);
    builder = builder.visibility(visibility);
    for modifier in modifiers {
        builder = builder.modifier(modifier);
    }
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    for parameter in read_parameters(node, code, file)? {
        builder = builder.parameter(parameter);
    }
    if let Some(doc) = leading_doc(node, code) {
        builder = builder.documentation(doc);
    }
    Ok(builder)
}

fn convert_property(node: Node, code: &[u8], file: &str) -> Result<PropertyBuilder, ParseError> {
    let name_node = require_child(node, "name", code, file)?;
    let property_type = node
        .child_by_field_name("type")
        .map_or_else(|| TypeRef::named("object"), |n| convert_type_ref(n, code));
    let mut builder = PropertyBuilder::new(node_text(name_node, code), property_type)
        .location(node_location(node, file));

    let (visibility, modifiers) = read_modifiers(node, code, Visibility::Private);
    builder = builder.visibility(visibility);
    for modifier in modifiers {
        builder = builder.modifier(modifier);
    }
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }

    // Accessor shape: an accessor list spells get/set out; an
    // expression body (`=> ...`) is getter-only.
    if let Some(accessors) = find_child(node, "accessor_list") {
        let text = node_text(accessors, code);
        builder = builder.accessors(text.contains("get"), text.contains("set") || text.contains("init"));
    } else if find_child(node, "arrow_expression_clause").is_some() {
        builder = builder.accessors(true, false);
    }
    if let Some(doc) = leading_doc(node, code) {
        builder = builder.documentation(doc);
    }
    Ok(builder)
}

fn convert_field(
    node: Node,
    code: &[u8],
    file: &str,
) -> Result<Option<FieldBuilder>, ParseError> {
    let Some(declaration) = find_child(node, "variable_declaration") else {
        return Ok(None);
    };
    let field_type = declaration
        .child_by_field_name("type")
        .or_else(|| named_children(declaration).into_iter().next())
        .map_or_else(|| TypeRef::named("object"), |n| convert_type_ref(n, code));
    let Some(declarator) = find_child(declaration, "variable_declarator") else {
        return Err(DefinitionError::MissingChild {
            kind: "field_declaration".to_string(),
            file: file.to_string(),
            expected: "variable_declarator".to_string(),
        }
        .into());
    };
    let name = declarator
        .child_by_field_name("name")
        .or_else(|| named_children(declarator).into_iter().next())
        .map(|n| node_text(n, code).to_string())
        .ok_or_else(|| DefinitionError::MissingChild {
            kind: "variable_declarator".to_string(),
            file: file.to_string(),
            expected: "name".to_string(),
        })?;

    let mut builder =
        FieldBuilder::new(name, field_type).location(node_location(node, file));
    let (visibility, modifiers) = read_modifiers(node, code, Visibility::Private);
    builder = builder.visibility(visibility);
    for modifier in modifiers {
        builder = builder.modifier(modifier);
    }
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    if let Some(initializer) = find_child(declarator, "equals_value_clause") {
        builder = builder.initializer(
            node_text(initializer, code)
                .trim_start_matches('=')
                .trim()
                .to_string(),
        );
    }
    Ok(Some(builder))
}

fn convert_constructor(
    node: Node,
    declaring_type: &str,
    code: &[u8],
    file: &str,
) -> Result<ConstructorBuilder, ParseError> {
    let mut builder = ConstructorBuilder::new(declaring_type).location(node_location(node, file));
    let (visibility, _) = read_modifiers(node, code, Visibility::Private);
    builder = builder.visibility(visibility);
    for attribute in read_attributes(node, code, file) {
        builder = builder.attribute(attribute);
    }
    for parameter in read_parameters(node, code, file)? {
        builder = builder.parameter(parameter);
    }
    Ok(builder)
}

fn read_parameters(
    node: Node,
    code: &[u8],
    file: &str,
) -> Result<Vec<ParameterBuilder>, ParseError> {
    let Some(list) = node.child_by_field_name("parameters") else {
        return Ok(Vec::new());
    };
    let mut parameters = Vec::new();
    for child in named_children(list) {
        if child.kind() != "parameter" {
            continue;
        }
        let name = child
            .child_by_field_name("name")
            .map(|n| node_text(n, code).to_string())
            .ok_or_else(|| DefinitionError::MissingChild {
                kind: "parameter".to_string(),
                file: file.to_string(),
                expected: "name".to_string(),
            })?;
        let parameter_type = child
            .child_by_field_name("type")
            .map_or_else(|| TypeRef::named("object"), |n| convert_type_ref(n, code));
        let mut parameter = ParameterBuilder::new(name, parameter_type)
            .location(node_location(child, file));
        if let Some(default) = find_child(child, "equals_value_clause") {
            parameter = parameter.default_value(
                node_text(default, code)
                    .trim_start_matches('=')
                    .trim()
                    .to_string(),
            );
        }
        parameters.push(parameter);
    }
    Ok(parameters)
}

/// Modifier keywords split into a visibility and the remaining modifiers.
fn read_modifiers(node: Node, code: &[u8], default: Visibility) -> (Visibility, Vec<Modifier>) {
    let mut visibility = default;
    let mut saw_protected = false;
    let mut saw_internal = false;
    let mut modifiers = Vec::new();
    for child in named_children(node) {
        if child.kind() != "modifier" {
            continue;
        }
        let keyword = node_text(child, code);
        match keyword {
            "protected" => saw_protected = true,
            "internal" => saw_internal = true,
            _ => {
                if let Some(parsed) = Visibility::from_keyword(keyword) {
                    visibility = parsed;
                } else if let Some(modifier) = Modifier::from_keyword(keyword) {
                    modifiers.push(modifier);
                }
            }
        }
    }
    match (saw_protected, saw_internal) {
        (true, true) => visibility = Visibility::ProtectedInternal,
        (true, false) => visibility = Visibility::Protected,
        (false, true) => visibility = Visibility::Internal,
        (false, false) => {}
    }
    (visibility, modifiers)
}

fn read_attributes(node: Node, code: &[u8], file: &str) -> Vec<AttributeBuilder> {
    let mut attributes = Vec::new();
    for list in named_children(node) {
        if list.kind() != "attribute_list" {
            continue;
        }
        for attribute in named_children(list) {
            if attribute.kind() != "attribute" {
                continue;
            }
            let name = attribute
                .child_by_field_name("name")
                .map(|n| node_text(n, code).to_string())
                .unwrap_or_default();
            let mut builder =
                AttributeBuilder::new(name).location(node_location(attribute, file));
            if let Some(arguments) = find_child(attribute, "attribute_argument_list") {
                for argument in named_children(arguments) {
                    let raw = node_text(argument, code).trim().to_string();
                    match split_named_argument(&raw) {
                        Some((key, value)) => builder = builder.named_arg(key, value),
                        None => builder = builder.positional_arg(raw),
                    }
                }
            }
            attributes.push(builder);
        }
    }
    attributes
}

/// Splits `Key = value` argument text. The left side must be a bare
/// identifier, so `"a=b"` string payloads stay positional.
fn split_named_argument(raw: &str) -> Option<(String, String)> {
    let (left, right) = raw.split_once('=')?;
    let key = left.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        || key.chars().next().is_some_and(|c| c.is_ascii_digit())
    {
        return None;
    }
    Some((key.to_string(), right.trim().to_string()))
}

fn read_base_list(node: Node, code: &[u8]) -> Vec<TypeRef> {
    let base_list = node
        .child_by_field_name("bases")
        .or_else(|| find_child(node, "base_list"));
    let Some(base_list) = base_list else {
        return Vec::new();
    };
    named_children(base_list)
        .into_iter()
        .filter(|child| is_type_node(child.kind()))
        .map(|child| convert_type_ref(child, code))
        .collect()
}

fn read_type_parameters(node: Node, code: &[u8]) -> Vec<(String, Vec<TypeRef>)> {
    let mut parameters: Vec<(String, Vec<TypeRef>)> = Vec::new();
    if let Some(list) = node
        .child_by_field_name("type_parameters")
        .or_else(|| find_child(node, "type_parameter_list"))
    {
        for parameter in named_children(list) {
            if parameter.kind() == "type_parameter" {
                let name = parameter
                    .child_by_field_name("name")
                    .map_or_else(|| node_text(parameter, code), |n| node_text(n, code));
                parameters.push((name.to_string(), Vec::new()));
            }
        }
    }
    for clause in named_children(node) {
        if clause.kind() != "type_parameter_constraints_clause" {
            continue;
        }
        let children = named_children(clause);
        let Some(target) = children.first() else {
            continue;
        };
        let target_name = node_text(*target, code).to_string();
        let constraints: Vec<TypeRef> = children
            .iter()
            .skip(1)
            .filter_map(|constraint| find_type_node(*constraint))
            .map(|type_node| convert_type_ref(type_node, code))
            .collect();
        if let Some(entry) = parameters.iter_mut().find(|(name, _)| *name == target_name) {
            entry.1 = constraints;
        } else {
            parameters.push((target_name, constraints));
        }
    }
    parameters
}

fn using_target(node: Node, code: &[u8]) -> Option<String> {
    named_children(node)
        .into_iter()
        .find(|child| {
            matches!(
                child.kind(),
                "qualified_name" | "identifier" | "alias_qualified_name"
            )
        })
        .map(|target| node_text(target, code).to_string())
}

pub(crate) fn convert_type_ref(node: Node, code: &[u8]) -> TypeRef {
    match node.kind() {
        "generic_name" => {
            let name = named_children(node)
                .into_iter()
                .find(|child| child.kind() == "identifier")
                .map_or_else(String::new, |n| node_text(n, code).to_string());
            let args = find_child(node, "type_argument_list")
                .map(|list| {
                    named_children(list)
                        .into_iter()
                        .filter(|child| is_type_node(child.kind()))
                        .map(|child| convert_type_ref(child, code))
                        .collect()
                })
                .unwrap_or_default();
            TypeRef::generic(name, args)
        }
        "nullable_type" => {
            let inner = named_children(node)
                .into_iter()
                .next()
                .map_or_else(|| TypeRef::named("object"), |n| convert_type_ref(n, code));
            TypeRef {
                is_nullable: true,
                ..inner
            }
        }
        _ => TypeRef::named(compact_text(node_text(node, code))),
    }
}

fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "qualified_name"
            | "generic_name"
            | "predefined_type"
            | "nullable_type"
            | "array_type"
            | "alias_qualified_name"
    )
}

fn find_type_node(node: Node) -> Option<Node> {
    if is_type_node(node.kind()) {
        return Some(node);
    }
    for child in named_children(node) {
        if let Some(found) = find_type_node(child) {
            return Some(found);
        }
    }
    None
}

fn leading_doc(node: Node, code: &[u8]) -> Option<String> {
    let mut lines = Vec::new();
    let mut current = node.prev_named_sibling();
    while let Some(sibling) = current {
        if sibling.kind() != "comment" {
            break;
        }
        let text = node_text(sibling, code).trim().to_string();
        if !text.starts_with("///") {
            break;
        }
        lines.push(text.trim_start_matches('/').trim().to_string());
        current = sibling.prev_named_sibling();
    }
    if lines.is_empty() {
        None
    } else {
        lines.reverse();
        Some(lines.join("\n"))
    }
}

fn compact_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("")
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn find_child<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    named_children(node).into_iter().find(|n| n.kind() == kind)
}

fn require_child<'tree>(
    node: Node<'tree>,
    field: &str,
    _code: &[u8],
    file: &str,
) -> Result<Node<'tree>, ParseError> {
    node.child_by_field_name(field)
        .ok_or_else(|| {
            let position = node.start_position();
            DefinitionError::UnexpectedNode {
                kind: node.kind().to_string(),
                file: file.to_string(),
                line: u32::try_from(position.row).unwrap_or(u32::MAX),
                column: u32::try_from(position.column).unwrap_or(u32::MAX),
            }
            .into()
        })
}
