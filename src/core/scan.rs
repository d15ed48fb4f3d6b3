//! Selection of generated resource accessor types.

use crate::core::compilation::{CompiledUnit, DeclarationKind, DeclaredType, TypeSymbol};

/// Member that marks a type as a generated resource accessor.
pub const RESOURCE_MANAGER_MEMBER: &str = "ResourceManager";

/// Only these declaration kinds can be resource accessors.
pub fn is_scannable_kind(kind: DeclarationKind) -> bool {
    matches!(
        kind,
        DeclarationKind::Class | DeclarationKind::Record | DeclarationKind::Struct
    )
}

pub fn is_resource_declaration(declared: &DeclaredType<'_>) -> bool {
    is_scannable_kind(declared.kind) && declared.symbol.contains_member(RESOURCE_MANAGER_MEMBER)
}

/// Resource accessor symbols of one compiled unit, in declaration order.
///
/// Member accessibility is never consulted, since generated accessors are
/// usually `internal` with `private` fields.
pub fn resource_symbols<U: CompiledUnit>(unit: &U) -> impl Iterator<Item = &TypeSymbol> {
    unit.declared_types()
        .filter(is_resource_declaration)
        .map(|declared| declared.symbol)
}
