//! Generic-wrapper emission.
//!
//! When a collection requests generic wrapping and its base type wraps a
//! fixed enumeration, every enumeration member gets its own sealed subclass
//! unit, `<Base>_<Member>.g.cs`, whose constructor forwards the member to
//! the base constructor.

use enumgen_discovery::EnumTypeInfo;

use crate::collection_emitter::in_namespace;
use crate::GeneratedUnit;

pub fn emit_wrapper_units(info: &EnumTypeInfo) -> Vec<GeneratedUnit> {
    if !info.generate_generic_wrappers || info.wrapped_enum_members.is_empty() {
        return Vec::new();
    }
    let Some(enum_fq) = info.wrapped_enum_fq_name.as_deref() else {
        return Vec::new();
    };

    info.wrapped_enum_members
        .iter()
        .map(|member| wrapper_unit(info, enum_fq, member))
        .collect()
}

fn wrapper_unit(info: &EnumTypeInfo, enum_fq: &str, member: &str) -> GeneratedUnit {
    let type_name = format!("{}_{member}", info.base_type_name);
    let body = vec![
        format!("public sealed class {type_name} : {}", info.base_type_fq_name),
        "{".to_string(),
        format!("    public {type_name}()"),
        format!("        : base({enum_fq}.{member})"),
        "    {".to_string(),
        "    }".to_string(),
        "}".to_string(),
    ];

    let mut lines = vec![
        "// <auto-generated />".to_string(),
        "#nullable enable".to_string(),
        String::new(),
    ];
    lines.extend(in_namespace(&info.namespace, body));

    let mut text = lines.join("\n");
    text.push('\n');
    GeneratedUnit {
        file_name: format!("{type_name}.g.cs"),
        text,
    }
}
