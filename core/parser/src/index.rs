//! Module index: the serializable export surface of a compilation.
//!
//! A module index is what this system uses as a "reference binary": a JSON
//! artifact listing every public shape another compilation needs for
//! cross-module discovery — bases, abstractness, attributes, lookup
//! properties, and constructors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use enumgen_ast::definitions::TypeRef;

use crate::errors::CompilationError;
use crate::symbols::{
    AttributeSymbol, ConstructorSymbol, ModuleId, PropertySymbol, SymbolId, SymbolTable,
    TypeParameterSymbol, TypeSymbol, TypeSymbolKind,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexedType {
    pub name: String,
    pub namespace: String,
    pub fq_name: String,
    pub kind: TypeSymbolKind,
    pub is_abstract: bool,
    pub is_static: bool,
    pub type_parameters: Vec<TypeParameterSymbol>,
    pub base_types: Vec<TypeRef>,
    pub attributes: Vec<AttributeSymbol>,
    pub properties: Vec<PropertySymbol>,
    pub constructors: Vec<ConstructorSymbol>,
    pub enum_members: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleIndex {
    pub name: String,
    pub types: Vec<IndexedType>,
}

impl ModuleIndex {
    /// Captures the export surface of one module of a symbol table.
    #[must_use]
    pub fn capture(name: &str, symbols: &SymbolTable, module: ModuleId) -> Self {
        let types = symbols
            .types_of_module(module)
            .map(|symbol| IndexedType {
                name: symbol.name.clone(),
                namespace: symbol.namespace.clone(),
                fq_name: symbol.fq_name.clone(),
                kind: symbol.kind,
                is_abstract: symbol.is_abstract,
                is_static: symbol.is_static,
                type_parameters: symbol.type_parameters.clone(),
                base_types: symbol.base_types.clone(),
                attributes: symbol.attributes.clone(),
                properties: symbol.properties.clone(),
                constructors: symbol.constructors.clone(),
                enum_members: symbol.enum_members.clone(),
            })
            .collect();
        Self {
            name: name.to_string(),
            types,
        }
    }

    /// Loads an index from a JSON file.
    ///
    /// # Errors
    ///
    /// `ReferenceRead` when the file cannot be read, `ReferenceDecode` when
    /// it is not a valid index.
    pub fn load(path: &Path) -> Result<Self, CompilationError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            CompilationError::ReferenceRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&text).map_err(|source| CompilationError::ReferenceDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the index as pretty JSON.
    ///
    /// # Errors
    ///
    /// `IndexWrite` on serialization or IO failure.
    pub fn write(&self, path: &Path) -> Result<(), CompilationError> {
        let text = serde_json::to_string_pretty(self).map_err(|err| {
            CompilationError::IndexWrite {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        std::fs::write(path, text).map_err(|err| CompilationError::IndexWrite {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Loads every indexed type into the symbol table under `module`.
    pub fn load_into(&self, symbols: &mut SymbolTable, module: ModuleId) {
        for entry in &self.types {
            symbols.insert(TypeSymbol {
                id: SymbolId(0),
                module,
                name: entry.name.clone(),
                namespace: entry.namespace.clone(),
                fq_name: entry.fq_name.clone(),
                kind: entry.kind,
                is_abstract: entry.is_abstract,
                is_static: entry.is_static,
                type_parameters: entry.type_parameters.clone(),
                base_types: entry.base_types.clone(),
                resolved_base: None,
                resolved_interfaces: Vec::new(),
                attributes: entry.attributes.clone(),
                properties: entry.properties.clone(),
                constructors: entry.constructors.clone(),
                enum_members: entry.enum_members.clone(),
                nesting_parent: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_json() {
        let index = ModuleIndex {
            name: "fruits".to_string(),
            types: vec![IndexedType {
                name: "Apple".to_string(),
                namespace: "Fruits".to_string(),
                fq_name: "Fruits.Apple".to_string(),
                kind: TypeSymbolKind::Class,
                is_abstract: false,
                is_static: false,
                type_parameters: vec![],
                base_types: vec![TypeRef::named("Fruit")],
                attributes: vec![],
                properties: vec![],
                constructors: vec![],
                enum_members: vec![],
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fruits.index.json");
        index.write(&path).unwrap();
        let loaded = ModuleIndex::load(&path).unwrap();
        assert_eq!(loaded.name, "fruits");
        assert_eq!(loaded.types.len(), 1);
        assert_eq!(loaded.types[0].base_types[0].name, "Fruit");
    }
}
