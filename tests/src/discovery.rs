//! Discovery properties across compilations and references.

use enumgen_discovery::DiscoveryEngine;

use crate::utils::{compile, compile_with_refs, write_index, COLOR_SOURCE};

#[test]
fn every_non_abstract_descendant_is_discovered_exactly_once() {
    let source = r"
namespace Zoo
{
    public abstract class Animal { }
    public class Wolf : Animal { }
    public abstract class Feline : Animal { }
    public class Cat : Feline { }
    public class Lion : Feline { }

    [EnumCollection]
    public class Animals : EnumCollectionBase<Animal> { }
    public class EnumCollectionBase<T> { }
}
";
    let compilation = compile(&[("zoo.cs", source)]);
    let discovered = DiscoveryEngine::discover(&compilation);
    assert_eq!(discovered.len(), 1);

    let mut names: Vec<&str> = discovered[0]
        .options
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(names.len(), 3, "deep descendants included, abstracts not");
    names.sort_unstable();
    assert_eq!(names, vec!["Cat", "Lion", "Wolf"]);
}

#[test]
fn discovery_order_is_stable_across_runs() {
    let compilation = compile(&[("colors.cs", COLOR_SOURCE)]);
    let first: Vec<String> = DiscoveryEngine::discover(&compilation)[0]
        .options
        .iter()
        .map(|o| o.fq_name.clone())
        .collect();
    for _ in 0..3 {
        let again: Vec<String> = DiscoveryEngine::discover(&compilation)[0]
            .options
            .iter()
            .map(|o| o.fq_name.clone())
            .collect();
        assert_eq!(first, again);
    }
    assert_eq!(first, vec!["Paint.Red", "Paint.Green", "Paint.Blue"]);
}

#[test]
fn local_discovery_is_a_subset_of_global_over_the_same_sources() {
    let library = &[(
        "lib.cs",
        "namespace Lib { public abstract class Shape { } public class Circle : Shape { } }",
    )];
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("lib.index.json");
    write_index(library, &index);

    let app = r"
namespace App
{
    [GlobalEnumCollection]
    public class Shapes : EnumCollectionBase<Lib.Shape> { }
    public class EnumCollectionBase<T> { }
    public class Square : Lib.Shape { }
}
";
    let refs = vec![index];
    let global = compile_with_refs(&[("app.cs", app)], &refs);
    let local_source = app.replace("GlobalEnumCollection", "EnumCollection");
    let local = compile_with_refs(&[("app.cs", &local_source)], &refs);

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

    assert!(local_names.iter().all(|name| global_names.contains(name)));
    assert!(global_names.contains(&"Lib.Circle".to_string()));
    assert!(!local_names.contains(&"Lib.Circle".to_string()));
}
