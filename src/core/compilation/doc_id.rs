//! Documentation IDs and documentation-comment XML, in the format the C#
//! compiler emits (`P:NS.Strings.Greeting`, `M:NS.Strings.Format(System.Object)`).

use quick_xml::escape::escape;

/// Map a C# type as written to its documentation-ID spelling.
///
/// Keyword types become their `System.*` names and generic arguments use
/// braces. Type parameters and non-keyword value types are kept as written,
/// since resolving them needs binding information this front end does not have.
pub fn doc_type_name(written: &str) -> String {
    let ty: String = written.chars().filter(|c| !c.is_whitespace()).collect();
    let ty = ty.strip_prefix("global::").unwrap_or(&ty);

    if let Some(element) = ty.strip_suffix("[]") {
        return format!("{}[]", doc_type_name(element));
    }

    if let Some(inner) = ty.strip_suffix('?') {
        let inner_name = doc_type_name(inner);
        return if is_value_keyword(inner) {
            format!("System.Nullable{{{}}}", inner_name)
        } else {
            inner_name
        };
    }

    if let (Some(open), true) = (ty.find('<'), ty.ends_with('>')) {
        let args: Vec<String> = split_top_level(&ty[open + 1..ty.len() - 1])
            .into_iter()
            .map(doc_type_name)
            .collect();
        return format!("{}{{{}}}", &ty[..open], args.join(","));
    }

    keyword_type(ty).unwrap_or(ty).to_string()
}

fn keyword_type(ty: &str) -> Option<&'static str> {
    let name = match ty {
        "object" => "System.Object",
        "string" => "System.String",
        "bool" => "System.Boolean",
        "byte" => "System.Byte",
        "sbyte" => "System.SByte",
        "char" => "System.Char",
        "decimal" => "System.Decimal",
        "double" => "System.Double",
        "float" => "System.Single",
        "int" => "System.Int32",
        "uint" => "System.UInt32",
        "long" => "System.Int64",
        "ulong" => "System.UInt64",
        "short" => "System.Int16",
        "ushort" => "System.UInt16",
        "nint" => "System.IntPtr",
        "nuint" => "System.UIntPtr",
        "void" => "System.Void",
        _ => return None,
    };
    Some(name)
}

fn is_value_keyword(ty: &str) -> bool {
    !matches!(ty, "object" | "string") && keyword_type(ty).is_some()
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Build the documentation XML for one member from its `///` lines (with the
/// slashes already stripped). No lines means no documentation: empty string.
pub fn documentation_xml(documentation_id: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut xml = format!("<member name=\"{}\">\n", escape(documentation_id));
    for line in lines {
        let body = line.get(indent..).unwrap_or_else(|| line.trim_start());
        xml.push_str("    ");
        xml.push_str(body.trim_end());
        xml.push('\n');
    }
    xml.push_str("</member>\n");
    xml
}
