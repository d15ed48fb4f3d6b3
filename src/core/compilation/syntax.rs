//! Lowering of tree-sitter C# syntax trees into type declarations.
//!
//! Each source file becomes a [`SyntaxTree`]: the class, record, struct,
//! interface, enum and delegate declarations it contains, in pre-order (a
//! type comes before the types nested in it), each with its direct members
//! and their documentation XML.

use std::path::{Path, PathBuf};

use tree_sitter::Node;

use super::{
    DeclarationKind, MemberKind, MemberSymbol,
    doc_id::{doc_type_name, documentation_xml},
};
use crate::core::LoadError;

#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// `T:` documentation ID, which doubles as the symbol identity.
    pub documentation_id: String,
    pub members: Vec<MemberSymbol>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub file_path: PathBuf,
    pub declarations: Vec<TypeDeclaration>,
    /// True when tree-sitter had to recover from syntax errors.
    pub has_errors: bool,
}

/// Parse one C# source file.
///
/// A fresh parser is created per call; `tree_sitter::Parser` is not `Send`,
/// and files are parsed from rayon workers.
pub fn parse_syntax_tree(file_path: &Path, source: &str) -> Result<SyntaxTree, LoadError> {
    let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| LoadError::Parser(format!("Language version mismatch: {e}")))?;

    let tree = parser.parse(source, None).ok_or_else(|| {
        LoadError::Parser("tree-sitter returned None (timeout or cancellation)".into())
    })?;

    let mut lowering = Lowering {
        source: source.as_bytes(),
        declarations: Vec::new(),
    };
    let root = tree.root_node();
    lowering.visit_container(root, &Scope::default());

    Ok(SyntaxTree {
        file_path: file_path.to_path_buf(),
        declarations: lowering.declarations,
        has_errors: root.has_error(),
    })
}

#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: String,
    /// Enclosing types, already in metadata form (`Outer`1`).
    containing_types: Vec<String>,
}

impl Scope {
    fn with_namespace(&self, name: &str) -> Self {
        let namespace = if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        };
        Self {
            namespace,
            containing_types: self.containing_types.clone(),
        }
    }

    fn nested(&self, type_name: String) -> Self {
        let mut containing_types = self.containing_types.clone();
        containing_types.push(type_name);
        Self {
            namespace: self.namespace.clone(),
            containing_types,
        }
    }

    fn qualify(&self, name: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.namespace.is_empty() {
            parts.push(&self.namespace);
        }
        parts.extend(self.containing_types.iter().map(String::as_str));
        parts.push(name);
        parts.join(".")
    }
}

struct Lowering<'s> {
    source: &'s [u8],
    declarations: Vec<TypeDeclaration>,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Identifier of a declaration, without whitespace or the `@` verbatim prefix.
    fn name_of(&self, node: Node<'_>) -> String {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or("");
        let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        name.strip_prefix('@').map(String::from).unwrap_or(name)
    }

    fn visit_container(&mut self, node: Node<'_>, scope: &Scope) {
        let mut scope = scope.clone();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "namespace_declaration" => {
                    let inner = scope.with_namespace(&self.name_of(child));
                    if let Some(body) = body_of(child) {
                        self.visit_container(body, &inner);
                    }
                }
                // Applies to everything after it, whether the grammar nests
                // those declarations inside the node or leaves them as siblings.
                "file_scoped_namespace_declaration" => {
                    scope = scope.with_namespace(&self.name_of(child));
                    self.visit_container(child, &scope);
                }
                kind if is_preprocessor_block(kind) => self.visit_container(child, &scope),
                kind => {
                    if let Some(declaration_kind) = DeclarationKind::from_node_kind(kind) {
                        self.visit_type(child, declaration_kind, &scope);
                    }
                }
            }
        }
    }

    fn visit_type(&mut self, node: Node<'_>, kind: DeclarationKind, scope: &Scope) {
        let name = self.name_of(node);
        let metadata_name = match type_parameter_count(node) {
            0 => name.clone(),
            arity => format!("{}`{}", name, arity),
        };
        let documentation_id = format!("T:{}", scope.qualify(&metadata_name));
        let inner = scope.nested(metadata_name);

        let mut members = Vec::new();
        let mut nested = Vec::new();
        if let Some(body) = body_of(node) {
            self.collect_members(body, &inner, &mut members, &mut nested);
        }

        self.declarations.push(TypeDeclaration {
            kind,
            name,
            documentation_id,
            members,
        });

        for (child, child_kind) in nested {
            self.visit_type(child, child_kind, &inner);
        }
    }

    fn collect_members<'t>(
        &self,
        body: Node<'t>,
        scope: &Scope,
        members: &mut Vec<MemberSymbol>,
        nested: &mut Vec<(Node<'t>, DeclarationKind)>,
    ) {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            let kind = child.kind();
            match kind {
                "field_declaration" | "event_field_declaration" => {
                    let (member_kind, prefix) = if kind == "field_declaration" {
                        (MemberKind::Field, "F")
                    } else {
                        (MemberKind::Event, "E")
                    };
                    let is_static = self.has_modifier(child, "static") || self.has_modifier(child, "const");
                    for name in self.declarator_names(child) {
                        let id = format!("{}:{}", prefix, scope.qualify(&name));
                        members.push(self.member(child, name, member_kind, is_static, &id));
                    }
                }
                "enum_member_declaration" => {
                    let name = self.name_of(child);
                    let id = format!("F:{}", scope.qualify(&name));
                    members.push(self.member(child, name, MemberKind::Field, true, &id));
                }
                "property_declaration" => {
                    let name = self.name_of(child);
                    let id = format!("P:{}", scope.qualify(&name));
                    let is_static = self.has_modifier(child, "static");
                    members.push(self.member(child, name, MemberKind::Property, is_static, &id));
                }
                "indexer_declaration" => {
                    let id = format!("P:{}{}", scope.qualify("Item"), self.parameter_signature(child));
                    let is_static = self.has_modifier(child, "static");
                    members.push(self.member(child, "this[]".to_string(), MemberKind::Property, is_static, &id));
                }
                "event_declaration" => {
                    let name = self.name_of(child);
                    let id = format!("E:{}", scope.qualify(&name));
                    let is_static = self.has_modifier(child, "static");
                    members.push(self.member(child, name, MemberKind::Event, is_static, &id));
                }
                "method_declaration" => {
                    let name = self.name_of(child);
                    let metadata_name = match type_parameter_count(child) {
                        0 => name.clone(),
                        arity => format!("{}``{}", name, arity),
                    };
                    let id = format!(
                        "M:{}{}",
                        scope.qualify(&metadata_name),
                        self.parameter_signature(child)
                    );
                    let is_static = self.has_modifier(child, "static");
                    members.push(self.member(child, name, MemberKind::Method, is_static, &id));
                }
                "constructor_declaration" => {
                    let is_static = self.has_modifier(child, "static");
                    let (name, id_name) = if is_static {
                        (".cctor", "#cctor")
                    } else {
                        (".ctor", "#ctor")
                    };
                    let id = format!("M:{}{}", scope.qualify(id_name), self.parameter_signature(child));
                    members.push(self.member(child, name.to_string(), MemberKind::Method, is_static, &id));
                }
                kind if is_preprocessor_block(kind) => {
                    self.collect_members(child, scope, members, nested);
                }
                kind => {
                    if let Some(declaration_kind) = DeclarationKind::from_node_kind(kind) {
                        let name = self.name_of(child);
                        let metadata_name = match type_parameter_count(child) {
                            0 => name.clone(),
                            arity => format!("{}`{}", name, arity),
                        };
                        let id = format!("T:{}", scope.qualify(&metadata_name));
                        let is_static = self.has_modifier(child, "static");
                        members.push(self.member(child, name, MemberKind::NestedType, is_static, &id));
                        if declaration_kind != DeclarationKind::Delegate {
                            nested.push((child, declaration_kind));
                        }
                    }
                }
            }
        }
    }

    fn member(
        &self,
        node: Node<'_>,
        name: String,
        kind: MemberKind,
        is_static: bool,
        documentation_id: &str,
    ) -> MemberSymbol {
        MemberSymbol {
            name,
            kind,
            is_static,
            documentation_xml: documentation_xml(documentation_id, &self.doc_comment_lines(node)),
        }
    }

    fn has_modifier(&self, node: Node<'_>, modifier: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|c| (c.kind() == "modifier" && self.text(c) == modifier) || c.kind() == modifier)
    }

    /// `///` lines directly above `node`, slashes stripped, in source order.
    fn doc_comment_lines(&self, node: Node<'_>) -> Vec<String> {
        let mut lines = Vec::new();
        let mut prev = node.prev_sibling();
        while let Some(sibling) = prev {
            if sibling.kind() != "comment" {
                break;
            }
            if let Some(rest) = self.text(sibling).strip_prefix("///") {
                if !rest.starts_with('/') {
                    lines.push(rest.trim_end_matches('\r').to_string());
                }
            }
            prev = sibling.prev_sibling();
        }
        lines.reverse();
        lines
    }

    fn declarator_names(&self, node: Node<'_>) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "variable_declaration" {
                continue;
            }
            let mut inner = child.walk();
            for declarator in child.named_children(&mut inner) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let name = declarator
                    .child_by_field_name("name")
                    .or_else(|| first_named_child_of_kind(declarator, "identifier"))
                    .map(|n| self.text(n))
                    .unwrap_or("");
                let name = name.strip_prefix('@').unwrap_or(name);
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// `(System.String,System.Object)` for a method, or an empty string
    /// when it takes no parameters.
    fn parameter_signature(&self, node: Node<'_>) -> String {
        let Some(list) = node
            .child_by_field_name("parameters")
            .or_else(|| first_named_child_of_kind(node, "parameter_list"))
            .or_else(|| first_named_child_of_kind(node, "bracketed_parameter_list"))
        else {
            return String::new();
        };

        let mut cursor = list.walk();
        let params: Vec<String> = list
            .named_children(&mut cursor)
            .filter(|p| matches!(p.kind(), "parameter" | "parameter_array"))
            .map(|p| self.parameter_type(p))
            .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("({})", params.join(","))
        }
    }

    fn parameter_type(&self, param: Node<'_>) -> String {
        let name_node = param.child_by_field_name("name");
        let type_node = param.child_by_field_name("type").or_else(|| {
            let mut cursor = param.walk();
            param
                .named_children(&mut cursor)
                .find(|c| {
                    !matches!(c.kind(), "attribute_list" | "modifier" | "parameter_modifier")
                        && Some(c.id()) != name_node.map(|n| n.id())
                })
        });

        let by_ref = {
            let mut cursor = param.walk();
            param
                .children(&mut cursor)
                .any(|c| matches!(self.text(c), "ref" | "out" | "in") && c.child_count() <= 1)
        };

        let written = type_node.map(|n| self.text(n)).unwrap_or("");
        let mut name = doc_type_name(written);
        if by_ref {
            name.push('@');
        }
        name
    }
}

fn body_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("body")
        .or_else(|| first_named_child_of_kind(node, "declaration_list"))
        .or_else(|| first_named_child_of_kind(node, "enum_member_declaration_list"))
}

fn type_parameter_count(node: Node<'_>) -> usize {
    let Some(list) = node
        .child_by_field_name("type_parameters")
        .or_else(|| first_named_child_of_kind(node, "type_parameter_list"))
    else {
        return 0;
    };
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|c| c.kind() == "type_parameter")
        .count()
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn is_preprocessor_block(kind: &str) -> bool {
    matches!(kind, "preproc_if" | "preproc_elif" | "preproc_else" | "preproc_region")
}
