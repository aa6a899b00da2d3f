//! Full pipeline scenarios over the emitted text.

use enumgen_discovery::DiscoveryEngine;
use enumgen_emit::CollectionEmitter;

use crate::utils::{compile, COLOR_SOURCE};

#[test]
fn color_collection_scenario() {
    let compilation = compile(&[("colors.cs", COLOR_SOURCE)]);
    let units = enumgen::generate(&compilation);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].file_name, "Colors.g.cs");

    let text = &units[0].text;
    assert!(text.starts_with("// <auto-generated />"));
    assert!(text.contains("namespace Paint"));
    assert!(text.contains("public static class Colors"));
    for option in ["Red", "Green", "Blue"] {
        assert!(text.contains(&format!("new Paint.{option}(),")));
    }
    assert!(text.contains("_byHex = new Dictionary<string, Paint.Color>(StringComparer.OrdinalIgnoreCase);"));
    assert!(text.contains("public static Paint.Color? GetByHex(string value) =>"));
    assert!(text.contains("public static Paint.Color GetByIndex(int index) => _all[index];"));
    assert!(text.contains("public static Paint.Color Empty() =>"));
}

// The static dictionary is built from exactly the array a linear scan would
// walk, so key-for-key the two agree by construction. The test pins that
// construction.
#[test]
fn static_lookup_is_populated_from_the_scanned_array() {
    let compilation = compile(&[("colors.cs", COLOR_SOURCE)]);
    let text = enumgen::generate(&compilation).remove(0).text;

    let array_at = text.find("_all = new Paint.Color[]").unwrap();
    let map_at = text.find("_byHex = new Dictionary").unwrap();
    assert!(array_at < map_at, "array is materialized before the map");
    assert!(text.contains("foreach (var item in _all)"));
    assert!(text.contains("_byHex[item.Hex] = item;"));
}

#[test]
fn factory_mode_keeps_linear_scans_and_fresh_instances() {
    let source = COLOR_SOURCE.replace(
        "GenerateStaticCollection = true",
        "GenerateFactoryMethods = true",
    );
    let compilation = compile(&[("colors.cs", &source)]);
    let text = enumgen::generate(&compilation).remove(0).text;

    assert!(text.contains("Func<Paint.Color>[] _factories"));
    assert!(!text.contains("Dictionary<"));
    assert!(text.contains("All().FirstOrDefault(x => string.Equals(x.Hex, value, StringComparison.OrdinalIgnoreCase));"));
}

#[test]
fn empty_prefers_the_sentinel_named_option() {
    let source = r#"
namespace App
{
    public abstract class Status { }
    public class Active : Status { }
    public class EmptyStatus : Status { }

    [EnumCollection(GenerateStaticCollection = true)]
    public class Statuses : EnumCollectionBase<Status> { }
    public class EnumCollectionBase<T> { }
}
"#;
    let compilation = compile(&[("status.cs", source)]);
    let text = enumgen::generate(&compilation).remove(0).text;
    assert!(text.contains(
        "x.GetType().Name.IndexOf(\"Empty\", StringComparison.OrdinalIgnoreCase) >= 0"
    ));
    assert!(text.contains("new App.EmptyStatus(),"));
}

#[test]
fn generation_is_idempotent() {
    let compilation = compile(&[("colors.cs", COLOR_SOURCE)]);
    let first = enumgen::generate(&compilation);
    let second = enumgen::generate(&compilation);
    assert_eq!(first, second);
}

#[test]
fn generic_wrappers_emit_one_unit_per_enum_member() {
    let source = r"
namespace Cards
{
    public enum SuitKind { Hearts, Spades }

    public abstract class Suit
    {
        public Suit(SuitKind kind) { }
    }

    [EnumCollection(GenerateGenericWrappers = true)]
    public class Suits : EnumCollectionBase<Suit> { }
    public class EnumCollectionBase<T> { }
}
";
    let compilation = compile(&[("cards.cs", source)]);
    let discovered = DiscoveryEngine::discover(&compilation);
    assert_eq!(discovered.len(), 1);

    let units = CollectionEmitter::new(&discovered[0]).emit().unwrap();
    let names: Vec<&str> = units.iter().map(|u| u.file_name.as_str()).collect();
    assert!(names.contains(&"Suits.g.cs"));
    assert!(names.contains(&"Suit_Hearts.g.cs"));
    assert!(names.contains(&"Suit_Spades.g.cs"));

    let hearts = units
        .iter()
        .find(|u| u.file_name == "Suit_Hearts.g.cs")
        .unwrap();
    assert!(hearts.text.contains("public sealed class Suit_Hearts : Cards.Suit"));
    assert!(hearts.text.contains(": base(Cards.SuitKind.Hearts)"));
}
