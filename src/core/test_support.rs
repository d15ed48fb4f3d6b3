//! Hand-built compiled units for scanner and extractor tests.

use crate::core::compilation::{
    CompiledUnit, DeclarationKind, DeclaredType, MemberKind, MemberSymbol, TypeSymbol,
};

pub struct FixtureUnit {
    name: String,
    types: Vec<(DeclarationKind, TypeSymbol)>,
}

impl FixtureUnit {
    pub fn new(types: Vec<(DeclarationKind, TypeSymbol)>) -> Self {
        Self::named("Fixture", types)
    }

    pub fn named(name: &str, types: Vec<(DeclarationKind, TypeSymbol)>) -> Self {
        Self {
            name: name.to_string(),
            types,
        }
    }
}

impl CompiledUnit for FixtureUnit {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn declared_types(&self) -> impl Iterator<Item = DeclaredType<'_>> {
        self.types
            .iter()
            .map(|(kind, symbol)| DeclaredType { kind: *kind, symbol })
    }
}

/// Type symbol named after the last segment of its documentation id.
pub fn symbol(documentation_id: &str, members: Vec<MemberSymbol>) -> TypeSymbol {
    let name = documentation_id
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(documentation_id)
        .to_string();
    TypeSymbol {
        name,
        documentation_id: documentation_id.to_string(),
        members,
    }
}

pub fn member(name: &str, is_static: bool, documentation_xml: &str) -> MemberSymbol {
    MemberSymbol {
        name: name.to_string(),
        kind: MemberKind::Property,
        is_static,
        documentation_xml: documentation_xml.to_string(),
    }
}

/// Documentation XML for a member whose summary is `value`.
pub fn doc(documentation_id: &str, value: &str) -> String {
    format!("<member name=\"{documentation_id}\">\n    <summary>{value}</summary>\n</member>\n")
}

/// A resource accessor class with one static property per `(name, value)`.
pub fn resource_class(documentation_id: &str, resources: &[(&str, &str)]) -> TypeSymbol {
    let type_name = documentation_id.trim_start_matches("T:");
    let mut members = vec![member("ResourceManager", true, "")];
    members.extend(resources.iter().map(|(name, value)| {
        member(name, true, &doc(&format!("P:{type_name}.{name}"), value))
    }));
    symbol(documentation_id, members)
}
