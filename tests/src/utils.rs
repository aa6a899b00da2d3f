use std::path::{Path, PathBuf};

use enumgen_parser::compilation::Compilation;

pub(crate) fn compile(sources: &[(&str, &str)]) -> Compilation {
    compile_with_refs(sources, &[])
}

pub(crate) fn compile_with_refs(
    sources: &[(&str, &str)],
    references: &[PathBuf],
) -> Compilation {
    let owned: Vec<(String, String)> = sources
        .iter()
        .map(|(path, text)| ((*path).to_string(), (*text).to_string()))
        .collect();
    enumgen::compile("test", &owned, references).expect("compilation should build")
}

pub(crate) fn write_index(sources: &[(&str, &str)], path: &Path) {
    compile(sources).write_index(path).expect("index write");
}

/// The recurring color scenario: an abstract base with one annotated lookup
/// property, three concrete options, and one local static collection.
pub(crate) const COLOR_SOURCE: &str = r#"
namespace Paint
{
    public abstract class Color
    {
        [EnumLookup]
        public string Hex { get; }

        public string Name { get; }
    }

    public class Red : Color { }
    public class Green : Color { }
    public class Blue : Color { }

    [EnumCollection(CollectionName = "Colors", GenerateStaticCollection = true, IgnoreCase = true)]
    public class ColorCollection : EnumCollectionBase<Color> { }

    public class EnumCollectionBase<T> { }
}
"#;
