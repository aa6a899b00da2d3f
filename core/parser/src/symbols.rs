//! Symbol table of the program model.
//!
//! Flat table of every type declaration visible to a compilation: the
//! compiled unit's own declarations (module 0) plus everything loaded from
//! referenced module indexes. Resolution is by qualified name first, short
//! name second, generic-arity aware, preferring the referring module, then
//! the compiled unit, then references in load order.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use enumgen_ast::definitions::{
    AttributeDefinition, ClassDefinition, CompilationUnitDefinition, InterfaceDefinition,
    MemberDefinition, Modifier, NamespaceMember, TypeRef, Visibility,
};

/// Identity of one type declaration within a symbol table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Identity of the module a symbol came from. Zero is the compiled unit
/// itself; references get 1.. in load order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub const LOCAL: ModuleId = ModuleId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TypeSymbolKind {
    Class,
    Interface,
    Enum,
}

/// Attribute data carried on symbols; mirrors `AttributeDefinition` minus
/// node identity so it can round-trip through a module index.
#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct AttributeSymbol {
    pub name: String,
    pub positional_args: Vec<String>,
    pub named_args: FxHashMap<String, String>,
}

impl AttributeSymbol {
    #[must_use]
    pub fn matches_name(&self, marker: &str) -> bool {
        let short = self.name.rsplit('.').next().unwrap_or(&self.name);
        short == marker || short.strip_suffix("Attribute") == Some(marker)
    }

    #[must_use]
    pub fn named_arg(&self, key: &str) -> Option<&str> {
        self.named_args.get(key).map(String::as_str)
    }

    fn from_definition(definition: &AttributeDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            positional_args: definition.positional_args.clone(),
            named_args: definition.named_args.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    pub property_type: TypeRef,
    pub attributes: Vec<AttributeSymbol>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub parameter_type: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConstructorSymbol {
    pub visibility: Visibility,
    pub parameters: Vec<ParameterSymbol>,
}

impl ConstructorSymbol {
    #[must_use]
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeParameterSymbol {
    pub name: String,
    pub constraints: Vec<TypeRef>,
}

/// One type declaration. `base_types` keeps the raw source references (with
/// generic arguments); `resolved_base`/`resolved_interfaces` are filled by
/// [`SymbolTable::link_bases`].
#[derive(Clone, Debug)]
pub struct TypeSymbol {
    pub id: SymbolId,
    pub module: ModuleId,
    pub name: String,
    pub namespace: String,
    pub fq_name: String,
    pub kind: TypeSymbolKind,
    pub is_abstract: bool,
    pub is_static: bool,
    pub type_parameters: Vec<TypeParameterSymbol>,
    pub base_types: Vec<TypeRef>,
    pub resolved_base: Option<SymbolId>,
    pub resolved_interfaces: Vec<SymbolId>,
    pub attributes: Vec<AttributeSymbol>,
    pub properties: Vec<PropertySymbol>,
    pub constructors: Vec<ConstructorSymbol>,
    pub enum_members: Vec<String>,
    pub nesting_parent: Option<SymbolId>,
}

impl TypeSymbol {
    #[must_use]
    pub fn generic_arity(&self) -> usize {
        self.type_parameters.len()
    }

    #[must_use]
    pub fn has_attribute(&self, marker: &str) -> bool {
        self.attributes.iter().any(|attr| attr.matches_name(marker))
    }

    #[must_use]
    pub fn attribute(&self, marker: &str) -> Option<&AttributeSymbol> {
        self.attributes.iter().find(|attr| attr.matches_name(marker))
    }
}

#[derive(Default, Clone, Debug)]
pub struct SymbolTable {
    types: Vec<TypeSymbol>,
    by_fq: FxHashMap<String, Vec<SymbolId>>,
    by_short: FxHashMap<String, Vec<SymbolId>>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.types.get(id.0 as usize)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.types.iter()
    }

    /// Declarations belonging to one module, in registration (traversal)
    /// order: namespaces before the nested types they contain.
    pub fn types_of_module(&self, module: ModuleId) -> impl Iterator<Item = &TypeSymbol> {
        self.types.iter().filter(move |t| t.module == module)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn insert(&mut self, mut symbol: TypeSymbol) -> SymbolId {
        let id = SymbolId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
        symbol.id = id;
        self.by_fq
            .entry(symbol.fq_name.clone())
            .or_default()
            .push(id);
        self.by_short
            .entry(symbol.name.clone())
            .or_default()
            .push(id);
        self.types.push(symbol);
        id
    }

    /// Registers every type declaration of a converted compilation unit.
    pub fn add_unit(&mut self, unit: &CompilationUnitDefinition, module: ModuleId) {
        for member in &unit.members {
            self.add_namespace_member(member, "", None, module);
        }
    }

    fn add_namespace_member(
        &mut self,
        member: &NamespaceMember,
        namespace: &str,
        nesting_parent: Option<SymbolId>,
        module: ModuleId,
    ) {
        match member {
            NamespaceMember::Namespace(ns) => {
                let nested = if namespace.is_empty() {
                    ns.name.clone()
                } else {
                    format!("{namespace}.{}", ns.name)
                };
                for child in &ns.members {
                    self.add_namespace_member(child, &nested, None, module);
                }
            }
            NamespaceMember::Class(class) => {
                self.add_class(class, namespace, nesting_parent, module);
            }
            NamespaceMember::Interface(interface) => {
                self.add_interface(interface, namespace, nesting_parent, module);
            }
            NamespaceMember::Enum(enumeration) => {
                let fq = qualify(namespace, nesting_parent.and_then(|p| self.get(p)), &enumeration.name);
                self.insert(TypeSymbol {
                    id: SymbolId(0),
                    module,
                    name: enumeration.name.clone(),
                    namespace: namespace.to_string(),
                    fq_name: fq,
                    kind: TypeSymbolKind::Enum,
                    is_abstract: false,
                    is_static: false,
                    type_parameters: Vec::new(),
                    base_types: Vec::new(),
                    resolved_base: None,
                    resolved_interfaces: Vec::new(),
                    attributes: enumeration
                        .attributes
                        .iter()
                        .map(|a| AttributeSymbol::from_definition(a))
                        .collect(),
                    properties: Vec::new(),
                    constructors: Vec::new(),
                    enum_members: enumeration.members.iter().map(|m| m.name.clone()).collect(),
                    nesting_parent,
                });
            }
        }
    }

    fn add_class(
        &mut self,
        class: &Arc<ClassDefinition>,
        namespace: &str,
        nesting_parent: Option<SymbolId>,
        module: ModuleId,
    ) {
        let fq = qualify(namespace, nesting_parent.and_then(|p| self.get(p)), &class.name);
        let id = self.insert(TypeSymbol {
            id: SymbolId(0),
            module,
            name: class.name.clone(),
            namespace: namespace.to_string(),
            fq_name: fq,
            kind: TypeSymbolKind::Class,
            is_abstract: class.modifiers.contains(&Modifier::Abstract),
            is_static: class.modifiers.contains(&Modifier::Static),
            type_parameters: class
                .type_parameters
                .iter()
                .map(|tp| TypeParameterSymbol {
                    name: tp.name.clone(),
                    constraints: tp.constraints.clone(),
                })
                .collect(),
            base_types: class.base_types.clone(),
            resolved_base: None,
            resolved_interfaces: Vec::new(),
            attributes: class
                .attributes
                .iter()
                .map(|a| AttributeSymbol::from_definition(a))
                .collect(),
            properties: class
                .properties()
                .map(|p| PropertySymbol {
                    name: p.name.clone(),
                    property_type: p.property_type.clone(),
                    attributes: p
                        .attributes
                        .iter()
                        .map(|a| AttributeSymbol::from_definition(a))
                        .collect(),
                })
                .collect(),
            constructors: class
                .constructors()
                .map(|c| ConstructorSymbol {
                    visibility: c.visibility,
                    parameters: c
                        .parameters
                        .iter()
                        .map(|p| ParameterSymbol {
                            name: p.name.clone(),
                            parameter_type: p.parameter_type.clone(),
                        })
                        .collect(),
                })
                .collect(),
            enum_members: Vec::new(),
            nesting_parent,
        });
        for member in &class.members {
            match member {
                MemberDefinition::NestedClass(nested) => {
                    self.add_class(nested, namespace, Some(id), module);
                }
                MemberDefinition::NestedInterface(nested) => {
                    self.add_interface(nested, namespace, Some(id), module);
                }
                MemberDefinition::NestedEnum(nested) => {
                    self.add_namespace_member(
                        &NamespaceMember::Enum(nested.clone()),
                        namespace,
                        Some(id),
                        module,
                    );
                }
                _ => {}
            }
        }
    }

    fn add_interface(
        &mut self,
        interface: &Arc<InterfaceDefinition>,
        namespace: &str,
        nesting_parent: Option<SymbolId>,
        module: ModuleId,
    ) {
        let fq = qualify(
            namespace,
            nesting_parent.and_then(|p| self.get(p)),
            &interface.name,
        );
        self.insert(TypeSymbol {
            id: SymbolId(0),
            module,
            name: interface.name.clone(),
            namespace: namespace.to_string(),
            fq_name: fq,
            kind: TypeSymbolKind::Interface,
            is_abstract: true,
            is_static: false,
            type_parameters: interface
                .type_parameters
                .iter()
                .map(|tp| TypeParameterSymbol {
                    name: tp.name.clone(),
                    constraints: tp.constraints.clone(),
                })
                .collect(),
            base_types: interface.base_types.clone(),
            resolved_base: None,
            resolved_interfaces: Vec::new(),
            attributes: interface
                .attributes
                .iter()
                .map(|a| AttributeSymbol::from_definition(a))
                .collect(),
            properties: Vec::new(),
            constructors: Vec::new(),
            enum_members: Vec::new(),
            nesting_parent,
        });
    }

    /// Resolves a type reference as seen from `from_module`.
    #[must_use]
    pub fn resolve(&self, reference: &TypeRef, from_module: ModuleId) -> Option<SymbolId> {
        let short = reference.short_name();
        let mut candidates: Vec<SymbolId> = self
            .by_fq
            .get(&reference.name)
            .cloned()
            .unwrap_or_default();
        if candidates.is_empty() {
            candidates = self.by_short.get(short).cloned().unwrap_or_default();
        }
        if candidates.is_empty() {
            return None;
        }
        let arity_matches: Vec<SymbolId> = candidates
            .iter()
            .copied()
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|s| s.generic_arity() == reference.type_args.len())
            })
            .collect();
        let pool = if arity_matches.is_empty() {
            candidates
        } else {
            arity_matches
        };
        pool.iter()
            .copied()
            .min_by_key(|id| {
                let module = self.get(*id).map_or(ModuleId(u32::MAX), |s| s.module);
                // Referring module first, then the compiled unit, then
                // references in load order.
                let rank = if module == from_module {
                    0
                } else if module == ModuleId::LOCAL {
                    1
                } else {
                    2 + module.0
                };
                (rank, id.0)
            })
    }

    /// Links every symbol's base class and interfaces. Returns the
    /// references that stayed unresolved, for diagnostics.
    pub fn link_bases(&mut self) -> Vec<(SymbolId, TypeRef)> {
        let mut unresolved = Vec::new();
        for index in 0..self.types.len() {
            let (id, module, bases) = {
                let symbol = &self.types[index];
                (symbol.id, symbol.module, symbol.base_types.clone())
            };
            let mut resolved_base = None;
            let mut resolved_interfaces = Vec::new();
            for base_ref in &bases {
                match self.resolve(base_ref, module) {
                    Some(target) => {
                        let target_kind = self.get(target).map(|s| s.kind);
                        if target_kind == Some(TypeSymbolKind::Interface) {
                            resolved_interfaces.push(target);
                        } else if resolved_base.is_none() && target != id {
                            resolved_base = Some(target);
                        }
                    }
                    None => unresolved.push((id, base_ref.clone())),
                }
            }
            self.types[index].resolved_base = resolved_base;
            self.types[index].resolved_interfaces = resolved_interfaces;
        }
        unresolved
    }

    /// The base-class chain starting at (and excluding) `id`, cycle-guarded.
    #[must_use]
    pub fn base_chain(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut seen = vec![id];
        let mut current = self.get(id).and_then(|s| s.resolved_base);
        while let Some(base) = current {
            if seen.contains(&base) {
                break;
            }
            chain.push(base);
            seen.push(base);
            current = self.get(base).and_then(|s| s.resolved_base);
        }
        chain
    }

    /// Whether `id`'s inheritance chain reaches `base` by declaration
    /// identity.
    #[must_use]
    pub fn derives_from(&self, id: SymbolId, base: SymbolId) -> bool {
        self.base_chain(id).contains(&base)
    }
}

fn qualify(namespace: &str, nesting_parent: Option<&TypeSymbol>, name: &str) -> String {
    match nesting_parent {
        Some(parent) => format!("{}.{name}", parent.fq_name),
        None if namespace.is_empty() => name.to_string(),
        None => format!("{namespace}.{name}"),
    }
}
