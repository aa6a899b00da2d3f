use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SOURCE: &str = r#"
namespace Paint
{
    public abstract class Color
    {
        [EnumLookup]
        public string Hex { get; }
    }

    public class Red : Color { }

    [EnumCollection(CollectionName = "Colors", GenerateStaticCollection = true)]
    public class ColorCollection : EnumCollectionBase<Color> { }

    public class EnumCollectionBase<T> { }
}
"#;

#[test]
fn generate_writes_a_unit_per_collection() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("src/colors.cs").write_str(SOURCE).unwrap();
    let out = dir.child("out");

    Command::cargo_bin("enumgen")
        .unwrap()
        .args(["generate"])
        .arg(dir.child("src").path())
        .arg("--out")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Colors.g.cs"));

    out.child("Colors.g.cs")
        .assert(predicate::str::contains("public static class Colors"));
}

#[test]
fn check_fails_on_syntax_errors() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("broken.cs")
        .write_str("public class { }")
        .unwrap();

    Command::cargo_bin("enumgen")
        .unwrap()
        .args(["check"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn index_round_trips_as_a_reference() {
    let lib = assert_fs::TempDir::new().unwrap();
    lib.child("color.cs")
        .write_str("namespace Paint { public abstract class Color { } public class Blue : Color { } }")
        .unwrap();
    let index = lib.child("paint.index.json");

    Command::cargo_bin("enumgen")
        .unwrap()
        .args(["index"])
        .arg(lib.path())
        .arg("-o")
        .arg(index.path())
        .assert()
        .success();

    let app = assert_fs::TempDir::new().unwrap();
    app.child("app.cs")
        .write_str(
            "namespace App { [GlobalEnumCollection] public class AllColors : EnumCollectionBase<Paint.Color> { } public class EnumCollectionBase<T> { } }",
        )
        .unwrap();
    let out = app.child("out");

    Command::cargo_bin("enumgen")
        .unwrap()
        .args(["generate"])
        .arg(app.path())
        .arg("--out")
        .arg(out.path())
        .arg("--reference")
        .arg(index.path())
        .assert()
        .success();

    out.child("AllColors.g.cs")
        .assert(predicate::str::contains("new Paint.Blue(),"));
}

#[test]
fn missing_path_is_an_error() {
    Command::cargo_bin("enumgen")
        .unwrap()
        .args(["check", "/nonexistent/enumgen-test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}
