//! The four-shape collection emitter.
//!
//! Shapes are mutually exclusive and picked from the marker flags in
//! precedence order: factory, singleton, explicit static, service. The
//! static and singleton shapes cache instances and build one dictionary per
//! lookup in the initializer; the factory shape materializes fresh instances
//! on every call and therefore keeps its lookups as linear scans.

use enumgen_ast::definitions::TypeRef;
use enumgen_discovery::{
    DiscoveredCollection, EnumTypeInfo, EnumValueInfo, NameComparison, PropertyLookupInfo,
};

use crate::errors::EmitError;
use crate::wrappers::emit_wrapper_units;
use crate::GeneratedUnit;

const INDENT: &str = "    ";
const EMPTY_SENTINEL: &str = "Empty";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationShape {
    Static,
    Singleton,
    Factory,
    Service,
}

impl GenerationShape {
    #[must_use]
    pub fn for_collection(info: &EnumTypeInfo) -> Self {
        if info.generate_factory_methods {
            Self::Factory
        } else if info.use_singleton_instances {
            Self::Singleton
        } else if info.generate_static_collection {
            Self::Static
        } else {
            Self::Service
        }
    }

    fn caches_instances(self) -> bool {
        !matches!(self, Self::Factory)
    }

    /// Static and factory shapes live on a static class; singleton and
    /// service shapes are instance surfaces.
    fn is_static_surface(self) -> bool {
        matches!(self, Self::Static | Self::Factory)
    }
}

#[derive(Debug)]
pub struct CollectionEmitter<'a> {
    collection: &'a DiscoveredCollection,
    shape: GenerationShape,
}

impl<'a> CollectionEmitter<'a> {
    #[must_use]
    pub fn new(collection: &'a DiscoveredCollection) -> Self {
        Self {
            collection,
            shape: GenerationShape::for_collection(&collection.info),
        }
    }

    #[must_use]
    pub fn shape(&self) -> GenerationShape {
        self.shape
    }

    /// Emits the collection unit plus any wrapper units.
    pub fn emit(&self) -> Result<Vec<GeneratedUnit>, EmitError> {
        let mut units = vec![self.emit_collection()?];
        units.extend(emit_wrapper_units(&self.collection.info));
        Ok(units)
    }

    fn emit_collection(&self) -> Result<GeneratedUnit, EmitError> {
        let info = &self.collection.info;
        let body = self.emit_class()?;

        let mut lines = file_header();
        lines.push("using System;".to_string());
        lines.push("using System.Collections.Generic;".to_string());
        lines.push("using System.Linq;".to_string());
        lines.push(String::new());
        lines.extend(in_namespace(&info.namespace, body));

        Ok(GeneratedUnit {
            file_name: format!("{}.g.cs", info.collection_name),
            text: join_lines(&lines),
        })
    }

    fn emit_class(&self) -> Result<Vec<String>, EmitError> {
        let info = &self.collection.info;
        let mut body = Vec::new();

        match self.shape {
            GenerationShape::Static => {
                body.extend(self.cached_fields(true));
                body.push(String::new());
                body.extend(self.cached_initializer(
                    &format!("static {}()", info.collection_name),
                )?);
                body.extend(self.cached_surface(true));
            }
            GenerationShape::Singleton => {
                body.push(format!(
                    "private static readonly Lazy<{0}> _instance = new Lazy<{0}>(() => new {0}());",
                    info.collection_name
                ));
                body.push(String::new());
                body.push(format!(
                    "public static {0} Instance => _instance.Value;",
                    info.collection_name
                ));
                body.push(String::new());
                body.extend(self.cached_fields(false));
                body.push(String::new());
                body.extend(self.cached_initializer(
                    &format!("private {}()", info.collection_name),
                )?);
                body.extend(self.cached_surface(false));
            }
            GenerationShape::Service => {
                body.extend(self.cached_fields(false));
                body.push(String::new());
                body.extend(self.cached_initializer(
                    &format!("public {}()", info.collection_name),
                )?);
                body.extend(self.cached_surface(false));
            }
            GenerationShape::Factory => {
                body.extend(self.factory_body()?);
            }
        }

        let header = if self.shape.is_static_surface() {
            format!("public static class {}", info.collection_name)
        } else {
            format!("public sealed class {}", info.collection_name)
        };
        Ok(block(&header, body))
    }

    // Fields for the instance-caching shapes.
    fn cached_fields(&self, statics: bool) -> Vec<String> {
        let info = &self.collection.info;
        let element = element_type(info);
        let keyword = if statics { "static " } else { "" };
        let mut lines = vec![format!(
            "private {keyword}readonly {element}[] _all;"
        )];
        for lookup in &info.lookups {
            lines.push(format!(
                "private {keyword}readonly {};",
                map_field_declaration(lookup, &element)
            ));
        }
        lines
    }

    fn cached_initializer(&self, signature: &str) -> Result<Vec<String>, EmitError> {
        let info = &self.collection.info;
        let element = element_type(info);

        let mut body = vec![format!("_all = new {element}[]")];
        body.push("{".to_string());
        for option in &self.collection.options {
            body.push(format!("{INDENT}{},", self.instantiation(option)?));
        }
        body.push("};".to_string());

        for lookup in &info.lookups {
            body.push(String::new());
            body.extend(map_initializer(info, lookup, &element));
        }

        let mut lines = block(signature, body);
        lines.push(String::new());
        Ok(lines)
    }

    fn cached_surface(&self, statics: bool) -> Vec<String> {
        let info = &self.collection.info;
        let element = element_type(info);
        let keyword = if statics { "static " } else { "" };
        let mut lines = Vec::new();

        lines.push(format!(
            "public {keyword}IReadOnlyList<{element}> All() => _all;"
        ));
        lines.push(String::new());
        lines.push(format!("public {keyword}int Count => _all.Length;"));
        lines.push(String::new());
        lines.push(format!("public {keyword}bool Any() => _all.Length > 0;"));
        lines.push(String::new());
        lines.push(format!("public {keyword}{element} Empty() =>"));
        lines.push(format!(
            "{INDENT}{} ?? ({});",
            sentinel_scan("_all"),
            empty_fallback(&info.collection_name, "_all[0]", "_all.Length")
        ));
        lines.push(String::new());
        lines.push(format!(
            "public {keyword}{element} GetByIndex(int index) => _all[index];"
        ));

        for lookup in &info.lookups {
            lines.push(String::new());
            lines.extend(dictionary_accessors(lookup, &element, keyword));
        }
        lines
    }

    fn factory_body(&self) -> Result<Vec<String>, EmitError> {
        let info = &self.collection.info;
        let element = element_type(info);

        let mut lines = vec![format!(
            "private static readonly Func<{element}>[] _factories = new Func<{element}>[]"
        )];
        lines.push("{".to_string());
        for option in &self.collection.options {
            lines.push(format!("{INDENT}() => {},", self.instantiation(option)?));
        }
        lines.push("};".to_string());
        lines.push(String::new());

        lines.push(format!(
            "public static IEnumerable<{element}> All() => _factories.Select(f => f());"
        ));
        lines.push(String::new());
        lines.push("public static int Count => _factories.Length;".to_string());
        lines.push(String::new());
        lines.push("public static bool Any() => _factories.Length > 0;".to_string());
        lines.push(String::new());
        lines.push(format!("public static {element} Empty() =>"));
        lines.push(format!(
            "{INDENT}{} ?? ({});",
            sentinel_scan("All()"),
            empty_fallback(&info.collection_name, "_factories[0]()", "_factories.Length")
        ));
        lines.push(String::new());
        lines.push(format!(
            "public static {element} GetByIndex(int index) => _factories[index]();"
        ));

        // No shared instances to key a dictionary on, so every lookup is a
        // scan over a freshly materialized sequence.
        for lookup in &info.lookups {
            lines.push(String::new());
            lines.extend(scan_accessors(info, lookup, &element));
        }
        Ok(lines)
    }

    fn instantiation(&self, option: &EnumValueInfo) -> Result<String, EmitError> {
        if option.has_parameterless_constructor() {
            Ok(format!("new {}()", option.fq_name))
        } else {
            Err(EmitError::NoUsableConstructor {
                collection: self.collection.info.collection_name.clone(),
                option: option.fq_name.clone(),
            })
        }
    }
}

fn file_header() -> Vec<String> {
    vec![
        "// <auto-generated />".to_string(),
        "#nullable enable".to_string(),
        String::new(),
    ]
}

fn join_lines(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn indent_block(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                line
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect()
}

fn block(header: &str, body: Vec<String>) -> Vec<String> {
    let mut lines = vec![header.to_string(), "{".to_string()];
    lines.extend(indent_block(body));
    lines.push("}".to_string());
    lines
}

pub(crate) fn in_namespace(namespace: &str, body: Vec<String>) -> Vec<String> {
    if namespace.is_empty() {
        body
    } else {
        block(&format!("namespace {namespace}"), body)
    }
}

pub(crate) fn element_type(info: &EnumTypeInfo) -> String {
    info.return_type_override
        .clone()
        .unwrap_or_else(|| info.base_type_fq_name.clone())
}

fn is_string_type(reference: &TypeRef) -> bool {
    matches!(reference.short_name(), "string" | "String")
}

fn accessor_element<'a>(lookup: &'a PropertyLookupInfo, element: &'a str) -> &'a str {
    lookup.return_type_override.as_deref().unwrap_or(element)
}

fn key_type(lookup: &PropertyLookupInfo) -> String {
    lookup.property_type.to_string()
}

fn field_name(lookup: &PropertyLookupInfo) -> String {
    format!("_by{}", lookup.property_name)
}

fn string_comparer(comparison: NameComparison) -> &'static str {
    match comparison {
        NameComparison::Ordinal => "StringComparer.Ordinal",
        NameComparison::OrdinalIgnoreCase => "StringComparer.OrdinalIgnoreCase",
    }
}

fn string_comparison(comparison: NameComparison) -> &'static str {
    match comparison {
        NameComparison::Ordinal => "StringComparison.Ordinal",
        NameComparison::OrdinalIgnoreCase => "StringComparison.OrdinalIgnoreCase",
    }
}

fn map_field_declaration(lookup: &PropertyLookupInfo, element: &str) -> String {
    let key = key_type(lookup);
    let element = accessor_element(lookup, element);
    let name = field_name(lookup);
    if lookup.allow_multiple {
        format!("Dictionary<{key}, List<{element}>> {name}")
    } else {
        format!("Dictionary<{key}, {element}> {name}")
    }
}

/// Dictionary construction for one lookup inside the initializer.
fn map_initializer(
    info: &EnumTypeInfo,
    lookup: &PropertyLookupInfo,
    element: &str,
) -> Vec<String> {
    let key = key_type(lookup);
    let element = accessor_element(lookup, element);
    let name = field_name(lookup);
    let property = &lookup.property_name;

    let comparer = if is_string_type(&lookup.property_type) {
        Some(string_comparer(info.comparison).to_string())
    } else {
        lookup.comparer.clone()
    };
    let comparer_arg = comparer.map_or_else(String::new, |c| format!("({c})"));

    let mut lines = Vec::new();
    if lookup.allow_multiple {
        lines.push(format!(
            "{name} = new Dictionary<{key}, List<{element}>>{comparer_arg};"
        ));
        let mut body = vec![format!(
            "if (!{name}.TryGetValue(item.{property}, out var group))"
        )];
        body.push("{".to_string());
        body.push(format!("{INDENT}group = new List<{element}>();"));
        body.push(format!("{INDENT}{name}[item.{property}] = group;"));
        body.push("}".to_string());
        body.push("group.Add(item);".to_string());
        lines.extend(block("foreach (var item in _all)", body));
    } else {
        lines.push(format!(
            "{name} = new Dictionary<{key}, {element}>{comparer_arg};"
        ));
        lines.extend(block(
            "foreach (var item in _all)",
            vec![format!("{name}[item.{property}] = item;")],
        ));
    }
    lines
}

/// O(1) accessors for the instance-caching shapes.
fn dictionary_accessors(
    lookup: &PropertyLookupInfo,
    element: &str,
    keyword: &str,
) -> Vec<String> {
    let key = key_type(lookup);
    let element = accessor_element(lookup, element);
    let name = field_name(lookup);
    let method = &lookup.method_name;

    let mut lines = Vec::new();
    if lookup.allow_multiple {
        lines.push(format!(
            "public {keyword}IReadOnlyList<{element}> {method}({key} value) =>"
        ));
        lines.push(format!(
            "{INDENT}{name}.TryGetValue(value, out var group) ? (IReadOnlyList<{element}>)group : Array.Empty<{element}>();"
        ));
        return lines;
    }

    if lookup.is_nullable {
        lines.push(format!(
            "public {keyword}{element}? {method}({key} value) =>"
        ));
        lines.push(format!(
            "{INDENT}{name}.TryGetValue(value, out var found) ? found : null;"
        ));
    } else {
        lines.push(format!(
            "public {keyword}{element} {method}({key} value) => {name}[value];"
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "public {keyword}bool Try{method}({key} value, out {element}? result) =>"
    ));
    lines.push(format!("{INDENT}{name}.TryGetValue(value, out result);"));
    lines
}

/// Linear-scan accessors for the factory shape.
fn scan_accessors(
    info: &EnumTypeInfo,
    lookup: &PropertyLookupInfo,
    element: &str,
) -> Vec<String> {
    let key = key_type(lookup);
    let element = accessor_element(lookup, element);
    let method = &lookup.method_name;
    let property = &lookup.property_name;

    let predicate = if is_string_type(&lookup.property_type) {
        format!(
            "string.Equals(x.{property}, value, {})",
            string_comparison(info.comparison)
        )
    } else if let Some(comparer) = &lookup.comparer {
        format!("({comparer}).Equals(x.{property}, value)")
    } else {
        format!("Equals(x.{property}, value)")
    };

    let mut lines = Vec::new();
    if lookup.allow_multiple {
        lines.push(format!(
            "public static IReadOnlyList<{element}> {method}({key} value) =>"
        ));
        lines.push(format!("{INDENT}All().Where(x => {predicate}).ToList();"));
        return lines;
    }

    if lookup.is_nullable {
        lines.push(format!("public static {element}? {method}({key} value) =>"));
        lines.push(format!("{INDENT}All().FirstOrDefault(x => {predicate});"));
    } else {
        lines.push(format!("public static {element} {method}({key} value) =>"));
        lines.push(format!("{INDENT}All().First(x => {predicate});"));
    }
    lines.push(String::new());
    lines.extend(block(
        &format!("public static bool Try{method}({key} value, out {element}? result)"),
        vec![
            format!("result = All().FirstOrDefault(x => {predicate});"),
            "return result != null;".to_string(),
        ],
    ));
    lines
}

fn sentinel_scan(sequence: &str) -> String {
    format!(
        "{sequence}.FirstOrDefault(x => x.GetType().Name.IndexOf(\"{EMPTY_SENTINEL}\", StringComparison.OrdinalIgnoreCase) >= 0)"
    )
}

fn empty_fallback(collection: &str, first: &str, length: &str) -> String {
    format!(
        "{length} > 0 ? {first} : throw new InvalidOperationException(\"{collection} has no options.\")"
    )
}

#[cfg(test)]
mod tests {
    use enumgen_parser::symbols::SymbolId;
    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(name: &str, nullable: bool, multiple: bool) -> PropertyLookupInfo {
        PropertyLookupInfo {
            property_name: name.to_string(),
            property_type: TypeRef::named("string"),
            method_name: format!("GetBy{name}"),
            allow_multiple: multiple,
            is_nullable: nullable,
            comparer: None,
            return_type_override: None,
        }
    }

    fn info(shape_flags: (bool, bool, bool)) -> EnumTypeInfo {
        let (factory, statics, singleton) = shape_flags;
        EnumTypeInfo {
            declaration: SymbolId(1),
            declaration_name: "ColorCollection".to_string(),
            namespace: "Paint".to_string(),
            base_type: SymbolId(2),
            base_type_name: "Color".to_string(),
            base_type_fq_name: "Paint.Color".to_string(),
            collection_name: "Colors".to_string(),
            global: false,
            comparison: NameComparison::OrdinalIgnoreCase,
            generate_factory_methods: factory,
            generate_static_collection: statics,
            use_singleton_instances: singleton,
            generate_generic_wrappers: false,
            return_type_override: None,
            lookups: vec![lookup("Hex", true, false)],
            wrapped_enum_fq_name: None,
            wrapped_enum_members: Vec::new(),
        }
    }

    fn option(name: &str) -> EnumValueInfo {
        EnumValueInfo {
            symbol: SymbolId(10),
            name: name.to_string(),
            fq_name: format!("Paint.{name}"),
            namespace: "Paint".to_string(),
            constructors: Vec::new(),
        }
    }

    fn collection(shape_flags: (bool, bool, bool)) -> DiscoveredCollection {
        DiscoveredCollection {
            info: info(shape_flags),
            options: vec![option("Red"), option("Green")],
        }
    }

    #[test]
    fn shape_precedence_is_factory_singleton_static_service() {
        assert_eq!(
            GenerationShape::for_collection(&info((true, true, true))),
            GenerationShape::Factory
        );
        assert_eq!(
            GenerationShape::for_collection(&info((false, true, true))),
            GenerationShape::Singleton
        );
        assert_eq!(
            GenerationShape::for_collection(&info((false, true, false))),
            GenerationShape::Static
        );
        assert_eq!(
            GenerationShape::for_collection(&info((false, false, false))),
            GenerationShape::Service
        );
    }

    #[test]
    fn static_shape_builds_array_and_dictionary_once() {
        let collection = collection((false, true, false));
        let units = CollectionEmitter::new(&collection).emit().unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].file_name, "Colors.g.cs");
        let text = &units[0].text;
        assert!(text.contains("public static class Colors"));
        assert!(text.contains("static Colors()"));
        assert!(text.contains("new Paint.Red(),"));
        assert!(text.contains("_byHex = new Dictionary<string, Paint.Color>(StringComparer.OrdinalIgnoreCase);"));
        assert!(text.contains("public static Paint.Color? GetByHex(string value) =>"));
        assert!(text.contains("public static bool TryGetByHex(string value, out Paint.Color? result) =>"));
        assert!(text.contains("namespace Paint"));
    }

    #[test]
    fn singleton_shape_has_lazy_instance_and_private_constructor() {
        let collection = collection((false, false, true));
        let units = CollectionEmitter::new(&collection).emit().unwrap();
        let text = &units[0].text;
        assert!(text.contains("public static Colors Instance => _instance.Value;"));
        assert!(text.contains("private Colors()"));
        assert!(text.contains("public IReadOnlyList<Paint.Color> All() => _all;"));
    }

    #[test]
    fn service_shape_exposes_public_constructor() {
        let collection = collection((false, false, false));
        let units = CollectionEmitter::new(&collection).emit().unwrap();
        let text = &units[0].text;
        assert!(text.contains("public Colors()"));
        assert!(!text.contains("Lazy<Colors>"));
    }

    #[test]
    fn factory_shape_scans_fresh_instances() {
        let collection = collection((true, false, false));
        let units = CollectionEmitter::new(&collection).emit().unwrap();
        let text = &units[0].text;
        assert!(text.contains("Func<Paint.Color>[] _factories"));
        assert!(text.contains("() => new Paint.Red(),"));
        assert!(text.contains("All() => _factories.Select(f => f());"));
        assert!(text.contains(
            "All().FirstOrDefault(x => string.Equals(x.Hex, value, StringComparison.OrdinalIgnoreCase));"
        ));
        assert!(!text.contains("Dictionary<"), "factory mode must not cache");
    }

    #[test]
    fn name_lookup_throws_instead_of_returning_null() {
        let mut c = collection((false, true, false));
        c.info.lookups = vec![lookup("Name", false, false)];
        let units = CollectionEmitter::new(&c).emit().unwrap();
        let text = &units[0].text;
        assert!(text.contains("public static Paint.Color GetByName(string value) => _byName[value];"));
    }

    #[test]
    fn multi_value_lookup_groups_into_lists() {
        let mut c = collection((false, true, false));
        c.info.lookups = vec![lookup("Tag", true, true)];
        let units = CollectionEmitter::new(&c).emit().unwrap();
        let text = &units[0].text;
        assert!(text.contains("Dictionary<string, List<Paint.Color>> _byTag"));
        assert!(text.contains("public static IReadOnlyList<Paint.Color> GetByTag(string value) =>"));
        assert!(!text.contains("TryGetByTag"));
    }

    #[test]
    fn option_without_parameterless_constructor_faults_the_collection() {
        use enumgen_parser::symbols::{ConstructorSymbol, ParameterSymbol};
        use enumgen_ast::definitions::Visibility;

        let mut c = collection((false, true, false));
        c.options[0].constructors = vec![ConstructorSymbol {
            visibility: Visibility::Public,
            parameters: vec![ParameterSymbol {
                name: "hex".to_string(),
                parameter_type: TypeRef::named("string"),
            }],
        }];
        let error = CollectionEmitter::new(&c).emit().unwrap_err();
        assert!(matches!(error, EmitError::NoUsableConstructor { .. }));
    }

    #[test]
    fn empty_namespace_emits_top_level_type() {
        let mut c = collection((false, true, false));
        c.info.namespace = String::new();
        let units = CollectionEmitter::new(&c).emit().unwrap();
        assert!(!units[0].text.contains("namespace"));
        assert!(units[0].text.starts_with("// <auto-generated />"));
    }
}
