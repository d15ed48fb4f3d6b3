//! Compilations and the symbol model the scanner works on.
//!
//! A [`Compilation`] is one project built for one target framework: its
//! parsed source files plus a symbol table in which partial declarations of
//! the same type are merged. Scanning and extraction only see compilations
//! through [`CompiledUnit`], so they can be exercised with hand-built fixtures.

pub mod doc_id;
pub mod syntax;

use indexmap::IndexMap;

pub use syntax::{SyntaxTree, TypeDeclaration, parse_syntax_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    /// `record`, `record class` and `record struct`.
    Record,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl DeclarationKind {
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        let kind = match kind {
            "class_declaration" => Self::Class,
            "record_declaration" | "record_struct_declaration" => Self::Record,
            "struct_declaration" => Self::Struct,
            "interface_declaration" => Self::Interface,
            "enum_declaration" => Self::Enum,
            "delegate_declaration" => Self::Delegate,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Method,
    Event,
    NestedType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSymbol {
    pub name: String,
    pub kind: MemberKind,
    /// Constants and enum members count as static.
    pub is_static: bool,
    /// `<member name="...">...</member>`, or empty when the member has no doc comment.
    pub documentation_xml: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    pub documentation_id: String,
    /// Members of every partial declaration, in declaration order.
    pub members: Vec<MemberSymbol>,
}

impl TypeSymbol {
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub fn contains_member(&self, name: &str) -> bool {
        self.member_names().any(|n| n == name)
    }
}

/// A type declaration together with the symbol it declares.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredType<'a> {
    pub kind: DeclarationKind,
    pub symbol: &'a TypeSymbol,
}

/// Enumerates the declared types of one compiled unit.
pub trait CompiledUnit {
    /// Human-readable unit name for diagnostics.
    fn display_name(&self) -> String;

    /// Every type declaration in source order, one item per declaration
    /// (a partial type appears once for each of its parts).
    fn declared_types(&self) -> impl Iterator<Item = DeclaredType<'_>>;
}

#[derive(Debug, Clone, Copy)]
struct DeclarationRef {
    kind: DeclarationKind,
    symbol: usize,
}

#[derive(Debug, Clone)]
pub struct Compilation {
    pub project_name: String,
    pub target_framework: Option<String>,
    syntax_trees: Vec<SyntaxTree>,
    symbols: Vec<TypeSymbol>,
    declarations: Vec<DeclarationRef>,
}

impl Compilation {
    pub fn new(
        project_name: impl Into<String>,
        target_framework: Option<String>,
        syntax_trees: Vec<SyntaxTree>,
    ) -> Self {
        let mut symbols: IndexMap<String, TypeSymbol> = IndexMap::new();
        let mut declarations = Vec::new();

        for declaration in syntax_trees.iter().flat_map(|t| &t.declarations) {
            let entry = symbols.entry(declaration.documentation_id.clone());
            let index = entry.index();
            entry
                .or_insert_with(|| TypeSymbol {
                    name: declaration.name.clone(),
                    documentation_id: declaration.documentation_id.clone(),
                    members: Vec::new(),
                })
                .members
                .extend(declaration.members.iter().cloned());
            declarations.push(DeclarationRef {
                kind: declaration.kind,
                symbol: index,
            });
        }

        Self {
            project_name: project_name.into(),
            target_framework,
            syntax_trees,
            symbols: symbols.into_values().collect(),
            declarations,
        }
    }

    pub fn syntax_trees(&self) -> &[SyntaxTree] {
        &self.syntax_trees
    }

    pub fn symbols(&self) -> &[TypeSymbol] {
        &self.symbols
    }
}

impl CompiledUnit for Compilation {
    fn display_name(&self) -> String {
        match &self.target_framework {
            Some(tfm) => format!("{} ({})", self.project_name, tfm),
            None => self.project_name.clone(),
        }
    }

    fn declared_types(&self) -> impl Iterator<Item = DeclaredType<'_>> {
        self.declarations.iter().map(|d| DeclaredType {
            kind: d.kind,
            symbol: &self.symbols[d.symbol],
        })
    }
}
