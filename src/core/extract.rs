//! Resource entry extraction from member documentation.
//!
//! Each static member of a resource accessor carries its resource text in the
//! `<summary>` of its doc comment. The documentation XML is parsed as markup:
//! the first `<member name="...">` gives the key and the text content of the
//! first `<summary>` gives the value. Anything that does not parse yields no
//! entry, the same way the compiler drops badly formed doc comments.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::core::{
    ResourceEntry,
    compilation::{MemberSymbol, TypeSymbol},
};

/// Generated plumbing members that are never resource keys.
pub const SCAFFOLDING_MEMBERS: [&str; 4] = [
    "s_resourceManager",
    "ResourceManager",
    "Culture",
    "GetResourceString",
];

pub fn is_resource_member(member: &MemberSymbol) -> bool {
    member.is_static && !SCAFFOLDING_MEMBERS.contains(&member.name.as_str())
}

/// Entries for the resource members of `symbol`, in member order.
pub fn extract_entries(symbol: &TypeSymbol) -> impl Iterator<Item = ResourceEntry> + '_ {
    symbol
        .members
        .iter()
        .filter(|m| is_resource_member(m))
        .filter_map(|m| parse_documentation(&m.documentation_xml))
}

/// Read the `(member name, summary text)` pair out of documentation XML.
///
/// Returns `None` for empty or malformed markup, and when either part is
/// missing or blank. Summary text keeps the text of nested elements, drops
/// their tags, and has its lines trimmed and joined with single spaces.
pub fn parse_documentation(xml: &str) -> Option<ResourceEntry> {
    if xml.trim().is_empty() {
        return None;
    }

    let mut reader = Reader::from_str(xml);
    let mut name: Option<String> = None;
    let mut summary: Option<String> = None;
    let mut open_elements = 0usize;
    // depth inside the first <summary>; 0 when outside
    let mut summary_depth = 0usize;
    let mut text = String::new();

    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                open_elements += 1;
                if summary_depth > 0 {
                    summary_depth += 1;
                    continue;
                }
                match e.name().as_ref() {
                    b"member" if name.is_none() => name = Some(name_attribute(&e)?),
                    b"summary" if summary.is_none() => summary_depth = 1,
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if summary_depth > 0 {
                    continue;
                }
                match e.name().as_ref() {
                    b"member" if name.is_none() => name = Some(name_attribute(&e)?),
                    b"summary" if summary.is_none() => summary = Some(String::new()),
                    _ => {}
                }
            }
            Event::Text(t) if summary_depth > 0 => text.push_str(&t.unescape().ok()?),
            Event::CData(c) if summary_depth > 0 => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(_) => {
                open_elements = open_elements.checked_sub(1)?;
                if summary_depth > 0 {
                    summary_depth -= 1;
                    if summary_depth == 0 {
                        summary = Some(std::mem::take(&mut text));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open_elements != 0 {
        return None;
    }

    let name = name?.trim().to_string();
    let value = join_lines(&summary?);
    let entry = ResourceEntry::new(name, value);
    (!entry.is_blank()).then_some(entry)
}

/// Trim each line, drop blank ones and join the rest with one space. Spacing
/// inside a line is part of the value.
fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn name_attribute(e: &BytesStart<'_>) -> Option<String> {
    match e.try_get_attribute("name").ok()? {
        Some(attr) => Some(attr.unescape_value().ok()?.into_owned()),
        None => Some(String::new()),
    }
}
