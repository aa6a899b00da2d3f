//! The two-pass discovery algorithm.
//!
//! Pass one scans every type declaration of the compiled unit for collection
//! markers and extracts the base type (generic-constraint pattern first,
//! then the known-base-collection inheritance pattern). Pass two walks the
//! compiled unit — and, for global collections, every referenced module —
//! collecting concrete declarations whose inheritance chain reaches the base
//! by declaration identity.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use enumgen_parser::compilation::Compilation;
use enumgen_parser::symbols::{
    AttributeSymbol, ModuleId, SymbolId, SymbolTable, TypeSymbol, TypeSymbolKind,
};

use crate::cache::DiscoveryCache;
use crate::facts::{
    bool_arg, comparison_from, string_arg, DiscoveredCollection, EnumTypeInfo, EnumValueInfo,
    PropertyLookupInfo, COLLECTION_BASE_TYPE, COLLECTION_MARKER, GLOBAL_COLLECTION_MARKER,
    LOOKUP_MARKER, OPTION_MARKER,
};

/// One classified collection declaration, before base extraction.
struct CollectionFact {
    declaration: SymbolId,
    global: bool,
    attribute: AttributeSymbol,
}

pub struct DiscoveryEngine;

impl DiscoveryEngine {
    /// Runs discovery over an immutable program model with a fresh cache.
    #[must_use]
    pub fn discover(compilation: &Compilation) -> Vec<DiscoveredCollection> {
        let mut cache = DiscoveryCache::new();
        Self::discover_with_cache(compilation, &mut cache)
    }

    /// Runs discovery reusing the caller's per-invocation cache.
    #[must_use]
    pub fn discover_with_cache(
        compilation: &Compilation,
        cache: &mut DiscoveryCache,
    ) -> Vec<DiscoveredCollection> {
        let symbols = compilation.symbols();
        let facts = classify(symbols);
        let module_count = compilation.reference_names().len();

        let mut results = Vec::new();
        for fact in facts {
            let Some(declaration) = symbols.get(fact.declaration) else {
                continue;
            };
            let Some(base_id) = extract_base_type(symbols, declaration) else {
                // No constraint and no known base collection ancestor: this
                // declaration yields nothing, by design.
                debug!(declaration = %declaration.fq_name, "collection marker without base type, skipped");
                continue;
            };
            let Some(base) = symbols.get(base_id) else {
                warn!(declaration = %declaration.fq_name, "base type symbol vanished, skipping collection");
                continue;
            };

            let options = discover_options(symbols, base_id, fact.global, module_count, cache);
            let info = build_type_info(symbols, declaration, base, &fact);
            results.push(DiscoveredCollection { info, options });
        }
        warn_unclaimed_options(symbols, &results);
        results
    }
}

/// The option marker is advisory; discovery runs off the inheritance chain.
/// A marked type no collection claims is an authoring mistake worth flagging.
fn warn_unclaimed_options(symbols: &SymbolTable, results: &[DiscoveredCollection]) {
    let claimed: FxHashSet<SymbolId> = results
        .iter()
        .flat_map(|collection| collection.options.iter().map(|option| option.symbol))
        .collect();
    for symbol in symbols.types_of_module(ModuleId::LOCAL) {
        if symbol.attribute(OPTION_MARKER).is_some() && !claimed.contains(&symbol.id) {
            warn!(declaration = %symbol.fq_name, "option marker on a type no collection claims");
        }
    }
}

fn classify(symbols: &SymbolTable) -> Vec<CollectionFact> {
    let mut facts = Vec::new();
    for symbol in symbols.types_of_module(ModuleId::LOCAL) {
        if let Some(attribute) = symbol.attribute(GLOBAL_COLLECTION_MARKER) {
            facts.push(CollectionFact {
                declaration: symbol.id,
                global: true,
                attribute: attribute.clone(),
            });
        } else if let Some(attribute) = symbol.attribute(COLLECTION_MARKER) {
            facts.push(CollectionFact {
                declaration: symbol.id,
                global: false,
                attribute: attribute.clone(),
            });
        }
    }
    facts
}

/// Base-type extraction: a generic type-parameter constraint wins; failing
/// that, the generic argument of `EnumCollectionBase<T>` anywhere in the
/// declaration's inheritance chain.
fn extract_base_type(symbols: &SymbolTable, declaration: &TypeSymbol) -> Option<SymbolId> {
    for parameter in &declaration.type_parameters {
        for constraint in &parameter.constraints {
            if let Some(resolved) = symbols.resolve(constraint, declaration.module) {
                if symbols.get(resolved).is_some_and(|s| s.kind == TypeSymbolKind::Class) {
                    return Some(resolved);
                }
            }
        }
    }

    let mut chain = vec![declaration.id];
    chain.extend(symbols.base_chain(declaration.id));
    for link in chain {
        let symbol = symbols.get(link)?;
        for base_ref in &symbol.base_types {
            if base_ref.short_name() == COLLECTION_BASE_TYPE && base_ref.type_args.len() == 1 {
                return symbols.resolve(&base_ref.type_args[0], symbol.module);
            }
        }
    }
    None
}

// Counts past u32::MAX saturate; they must never collapse to zero.
fn reference_module_bound(reference_count: usize) -> u32 {
    u32::try_from(reference_count).unwrap_or(u32::MAX)
}

fn discover_options(
    symbols: &SymbolTable,
    base: SymbolId,
    global: bool,
    reference_count: usize,
    cache: &mut DiscoveryCache,
) -> Vec<EnumValueInfo> {
    let mut modules = vec![ModuleId::LOCAL];
    if global {
        modules.extend((1..=reference_module_bound(reference_count)).map(ModuleId));
    }

    let mut seen: FxHashSet<SymbolId> = FxHashSet::default();
    let mut options = Vec::new();
    for module in modules {
        let derived = cache.derived_in_module(module, base, || {
            symbols
                .types_of_module(module)
                .filter(|candidate| {
                    candidate.kind == TypeSymbolKind::Class
                        && !candidate.is_abstract
                        && symbols.derives_from(candidate.id, base)
                })
                .map(|candidate| candidate.id)
                .collect()
        });
        for id in derived {
            if !seen.insert(id) {
                continue;
            }
            if let Some(symbol) = symbols.get(id) {
                options.push(EnumValueInfo {
                    symbol: id,
                    name: symbol.name.clone(),
                    fq_name: symbol.fq_name.clone(),
                    namespace: symbol.namespace.clone(),
                    constructors: symbol.constructors.clone(),
                });
            }
        }
    }
    options
}

fn build_type_info(
    symbols: &SymbolTable,
    declaration: &TypeSymbol,
    base: &TypeSymbol,
    fact: &CollectionFact,
) -> EnumTypeInfo {
    let attribute = &fact.attribute;
    let collection_name = attribute
        .named_arg("CollectionName")
        .map_or_else(|| declaration.name.clone(), string_arg);
    let generate_generic_wrappers = attribute
        .named_arg("GenerateGenericWrappers")
        .is_some_and(bool_arg);
    let wrapped_enum = if generate_generic_wrappers {
        wrapped_enum(symbols, base)
    } else {
        None
    };

    EnumTypeInfo {
        declaration: declaration.id,
        declaration_name: declaration.name.clone(),
        namespace: declaration.namespace.clone(),
        base_type: base.id,
        base_type_name: base.name.clone(),
        base_type_fq_name: base.fq_name.clone(),
        collection_name,
        global: fact.global,
        comparison: comparison_from(attribute),
        generate_factory_methods: attribute
            .named_arg("GenerateFactoryMethods")
            .is_some_and(bool_arg),
        generate_static_collection: attribute
            .named_arg("GenerateStaticCollection")
            .is_some_and(bool_arg),
        use_singleton_instances: attribute
            .named_arg("UseSingletonInstances")
            .is_some_and(bool_arg),
        generate_generic_wrappers,
        return_type_override: attribute.named_arg("ReturnType").map(string_arg),
        lookups: extract_lookups(symbols, base.id),
        wrapped_enum_fq_name: wrapped_enum.as_ref().map(|(fq, _)| fq.clone()),
        wrapped_enum_members: wrapped_enum.map(|(_, members)| members).unwrap_or_default(),
    }
}

/// Collects every lookup-annotated property along the base type's full
/// inheritance chain. A derived redeclaration shadows its ancestor's.
fn extract_lookups(symbols: &SymbolTable, base: SymbolId) -> Vec<PropertyLookupInfo> {
    let mut chain = vec![base];
    chain.extend(symbols.base_chain(base));

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut lookups = Vec::new();
    for link in chain {
        let Some(symbol) = symbols.get(link) else {
            continue;
        };
        for property in &symbol.properties {
            let Some(marker) = property
                .attributes
                .iter()
                .find(|attr| attr.matches_name(LOOKUP_MARKER))
            else {
                continue;
            };
            if !seen.insert(property.name.clone()) {
                continue;
            }
            let default_nullable =
                property.name != "Name" && property.name != "Id";
            lookups.push(PropertyLookupInfo {
                property_name: property.name.clone(),
                property_type: property.property_type.clone(),
                method_name: marker
                    .named_arg("MethodName")
                    .map_or_else(|| format!("GetBy{}", property.name), string_arg),
                allow_multiple: marker.named_arg("AllowMultiple").is_some_and(bool_arg),
                is_nullable: marker
                    .named_arg("Nullable")
                    .map_or(default_nullable, bool_arg),
                comparer: marker.named_arg("Comparer").map(string_arg),
                return_type_override: marker.named_arg("ReturnType").map(string_arg),
            });
        }
    }
    lookups
}

/// The wrapped fixed enumeration for generic-wrapper mode: the first
/// enum-typed constructor parameter on the base type identifies it.
fn wrapped_enum(symbols: &SymbolTable, base: &TypeSymbol) -> Option<(String, Vec<String>)> {
    for constructor in &base.constructors {
        for parameter in &constructor.parameters {
            if let Some(resolved) = symbols.resolve(&parameter.parameter_type, base.module) {
                if let Some(symbol) = symbols.get(resolved) {
                    if symbol.kind == TypeSymbolKind::Enum {
                        return Some((symbol.fq_name.clone(), symbol.enum_members.clone()));
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use enumgen_parser::backend::ParserBackend;
    use enumgen_parser::compilation::Compilation;
    use enumgen_parser::csharp::CSharpBackend;

    use super::*;
    use crate::facts::NameComparison;

    fn backend() -> Arc<dyn ParserBackend> {
        Arc::new(CSharpBackend::new())
    }

    fn compile(source: &str) -> Compilation {
        compile_with_refs(source, &[])
    }

    fn compile_with_refs(source: &str, references: &[PathBuf]) -> Compilation {
        Compilation::new(
            "test",
            &[("test.cs".to_string(), source.to_string())],
            references,
            &backend(),
        )
        .expect("compilation should build")
    }

    const COLORS: &str = r##"
namespace Paint
{
    public abstract class Color
    {
        [EnumLookup]
        public string Hex { get; }
        public Color(string hex) { Hex = hex; }
    }

    public class Red : Color { public Red() : base("#ff0000") { } }
    public class Green : Color { public Green() : base("#00ff00") { } }
    public class Blue : Color { public Blue() : base("#0000ff") { } }
    public abstract class Pastel : Color { }

    [EnumCollection(CollectionName = "Colors", IgnoreCase = true)]
    public class ColorCollection : EnumCollectionBase<Color> { }

    public class EnumCollectionBase<T> { }
}
"##;

    #[test]
    fn inheritance_pattern_discovers_concrete_descendants() {
        let compilation = compile(COLORS);
        let discovered = DiscoveryEngine::discover(&compilation);
        assert_eq!(discovered.len(), 1);
        let collection = &discovered[0];
        assert_eq!(collection.info.collection_name, "Colors");
        assert_eq!(collection.info.base_type_name, "Color");
        assert_eq!(collection.info.comparison, NameComparison::OrdinalIgnoreCase);
        let names: Vec<&str> = collection.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn abstract_descendants_are_excluded() {
        let compilation = compile(COLORS);
        let discovered = DiscoveryEngine::discover(&compilation);
        assert!(discovered[0].options.iter().all(|o| o.name != "Pastel"));
    }

    #[test]
    fn option_marker_is_advisory_and_orphans_stay_out() {
        let compilation = compile(
            r#"
namespace Paint
{
    public abstract class Color { }

    [EnumOption]
    public class Red : Color { }
    public class Green : Color { }

    [EnumOption]
    public class Stray { }

    [EnumCollection]
    public class ColorCollection : EnumCollectionBase<Color> { }

    public class EnumCollectionBase<T> { }
}
"#,
        );
        let discovered = DiscoveryEngine::discover(&compilation);
        assert_eq!(discovered.len(), 1);
        let names: Vec<&str> = discovered[0].options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green"], "marked and unmarked options alike");
        assert!(!names.contains(&"Stray"), "an unclaimed marked type is only warned about");
    }

    #[test]
    fn constraint_pattern_extracts_base_from_type_parameter() {
        let compilation = compile(
            r#"
public abstract class Fruit { }
public class Apple : Fruit { }

[EnumCollection]
public class FruitSet<T> where T : Fruit { }
"#,
        );
        let discovered = DiscoveryEngine::discover(&compilation);
        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].info.base_type_name, "Fruit");
        assert_eq!(discovered[0].options.len(), 1);
        assert_eq!(discovered[0].options[0].name, "Apple");
    }

    #[test]
    fn marker_without_base_shape_is_silently_skipped() {
        let compilation = compile(
            r"
[EnumCollection]
public class Orphan { }
",
        );
        assert!(DiscoveryEngine::discover(&compilation).is_empty());
    }

    #[test]
    fn lookup_extraction_walks_the_inheritance_chain() {
        let compilation = compile(
            r#"
public abstract class Entity
{
    [EnumLookup]
    public string Id { get; }
}
public abstract class Animal : Entity
{
    [EnumLookup(AllowMultiple = true)]
    public string Habitat { get; }
}
public class Wolf : Animal { }

[EnumCollection]
public class Animals : EnumCollectionBase<Animal> { }
public class EnumCollectionBase<T> { }
"#,
        );
        let discovered = DiscoveryEngine::discover(&compilation);
        let lookups = &discovered[0].info.lookups;
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[0].property_name, "Habitat");
        assert!(lookups[0].allow_multiple);
        assert!(lookups[0].is_nullable);
        assert_eq!(lookups[1].property_name, "Id");
        assert!(!lookups[1].is_nullable, "Id defaults to throwing");
        assert_eq!(lookups[1].method_name, "GetById");
    }

    #[test]
    fn discovery_is_idempotent_over_the_same_model() {
        let compilation = compile(COLORS);
        let first = DiscoveryEngine::discover(&compilation);
        let second = DiscoveryEngine::discover(&compilation);
        let ids = |run: &[DiscoveredCollection]| -> Vec<Vec<SymbolId>> {
            run.iter()
                .map(|c| c.options.iter().map(|o| o.symbol).collect())
                .collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn global_marker_widens_discovery_to_references() {
        let lib = compile(
            r"
namespace Paint { public abstract class Color { }
public class Magenta : Color { } }
",
        );
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("paint.index.json");
        lib.write_index(&index_path).unwrap();

        let local_source = r"
namespace App {
[GlobalEnumCollection]
public class AllColors : EnumCollectionBase<Paint.Color> { }
public class EnumCollectionBase<T> { }
public class Cyan : Paint.Color { }
}
";
        let global = compile_with_refs(local_source, std::slice::from_ref(&index_path));
        let discovered = DiscoveryEngine::discover(&global);
        let names: Vec<&str> = discovered[0].options.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"Cyan"));
        assert!(names.contains(&"Magenta"), "referenced option joins the set");

        // Switching the marker back to local drops the referenced option
        // without touching the source program.
        let local_only = compile_with_refs(
            &local_source.replace("GlobalEnumCollection", "EnumCollection"),
            std::slice::from_ref(&index_path),
        );
        let discovered = DiscoveryEngine::discover(&local_only);
        let names: Vec<&str> = discovered[0].options.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"Cyan"));
        assert!(!names.contains(&"Magenta"));
    }

    #[test]
    fn reference_module_bound_saturates_instead_of_collapsing() {
        assert_eq!(reference_module_bound(0), 0);
        assert_eq!(reference_module_bound(2), 2);
        assert_eq!(reference_module_bound(usize::MAX), u32::MAX);
    }

    #[test]
    fn local_discovery_is_subset_of_global() {
        let lib = compile("namespace P { public abstract class B { } public class X : B { } }");
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("p.index.json");
        lib.write_index(&index_path).unwrap();

        let source = r"
namespace A {
[GlobalEnumCollection]
public class Bs : EnumCollectionBase<P.B> { }
public class EnumCollectionBase<T> { }
public class Y : P.B { }
}
";
        let global = compile_with_refs(source, std::slice::from_ref(&index_path));
        let local = compile_with_refs(
            &source.replace("GlobalEnumCollection", "EnumCollection"),
            std::slice::from_ref(&index_path),
        );
        let global_names: Vec<String> = DiscoveryEngine::discover(&global)[0]
            .options
            .iter()
            .map(|o| o.fq_name.clone())
            .collect();
        let local_names: Vec<String> = DiscoveryEngine::discover(&local)[0]
            .options
            .iter()
            .map(|o| o.fq_name.clone())
            .collect();
        assert!(local_names.iter().all(|n| global_names.contains(n)));
    }
}
