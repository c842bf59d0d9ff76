use crate::analysis::ast_cache::ParsedFile;
use crate::analysis::tag_parser::{parse_json_tag, unquote_tag};
use crate::models::{FieldDescriptor, GoType};
use std::path::PathBuf;
use tree_sitter::Node;

/// A top-level struct declaration with its unresolved fields
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// File that declared the struct; its imports scope the field types
    pub file: PathBuf,
}

/// A top-level non-struct type: `type Status string`, `type IDs []int64`, `type A = B`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTypeDecl {
    pub name: String,
    pub underlying: GoType,
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Struct(StructDecl),
    Named(NamedTypeDecl),
}

/// Reads type declarations out of a Go syntax tree
#[derive(Debug, Default)]
pub struct StructParser;

impl StructParser {
    pub fn new() -> Self {
        Self
    }

    /// Every top-level type declaration in the file, grouped or not, in source order
    pub fn parse_type_declarations(&self, file: &ParsedFile) -> Vec<TypeDecl> {
        let root = file.root();
        let mut decls = Vec::new();

        let mut cursor = root.walk();
        for declaration in root.children(&mut cursor) {
            if declaration.kind() != "type_declaration" {
                continue;
            }
            let mut spec_cursor = declaration.walk();
            for spec in declaration.named_children(&mut spec_cursor) {
                if let Some(decl) = self.parse_type_spec(spec, file) {
                    decls.push(decl);
                }
            }
        }

        decls
    }

    fn parse_type_spec(&self, spec: Node<'_>, file: &ParsedFile) -> Option<TypeDecl> {
        if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
            return None;
        }
        let name = file.text(spec.child_by_field_name("name")?).to_string();
        let type_node = spec.child_by_field_name("type")?;

        if type_node.kind() == "struct_type" {
            return Some(TypeDecl::Struct(StructDecl {
                fields: self.parse_struct_fields(type_node, file),
                name,
                file: file.path.clone(),
            }));
        }

        Some(TypeDecl::Named(NamedTypeDecl {
            name,
            underlying: self.parse_go_type(type_node, file),
            file: file.path.clone(),
        }))
    }

    /// Fields of a `struct_type` node in declaration order. Embedded fields and
    /// fields tagged `json:"-"` are left out.
    pub fn parse_struct_fields(&self, struct_node: Node<'_>, file: &ParsedFile) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();

        let mut cursor = struct_node.walk();
        let Some(list) = struct_node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return fields;
        };

        let mut list_cursor = list.walk();
        for declaration in list.named_children(&mut list_cursor) {
            if declaration.kind() != "field_declaration" {
                continue;
            }
            fields.extend(self.parse_field_declaration(declaration, file));
        }

        fields
    }

    fn parse_field_declaration(&self, declaration: Node<'_>, file: &ParsedFile) -> Vec<FieldDescriptor> {
        let Some(type_node) = declaration.child_by_field_name("type") else {
            return Vec::new();
        };

        let mut name_cursor = declaration.walk();
        let names: Vec<String> = declaration
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| file.text(n).to_string())
            .collect();

        // Embedded field
        if names.is_empty() {
            return Vec::new();
        }

        let json_tag = declaration
            .child_by_field_name("tag")
            .map(|tag| parse_json_tag(&unquote_tag(file.text(tag))))
            .unwrap_or_default();
        if json_tag.skip {
            return Vec::new();
        }

        let go_type = self.parse_go_type(type_node, file);
        let raw_type = file.text(type_node).to_string();

        // `A, B int` with one tag: the tag name applies to each field
        names
            .into_iter()
            .map(|name| {
                let mut field =
                    FieldDescriptor::new(name, json_tag.name.clone(), raw_type.clone(), go_type.clone());
                field.omit_empty = json_tag.omit_empty;
                field
            })
            .collect()
    }

    /// Parse a type expression node into its structural form
    pub fn parse_go_type(&self, node: Node<'_>, file: &ParsedFile) -> GoType {
        match node.kind() {
            "type_identifier" => GoType::Ident(file.text(node).to_string()),
            "qualified_type" => {
                match (
                    node.child_by_field_name("package"),
                    node.child_by_field_name("name"),
                ) {
                    (Some(package), Some(name)) => GoType::Qualified {
                        package: file.text(package).to_string(),
                        name: file.text(name).to_string(),
                    },
                    _ => GoType::Unsupported(file.text(node).to_string()),
                }
            }
            "pointer_type" => self.wrap_inner(node, file, None, GoType::Pointer),
            "slice_type" => self.wrap_inner(node, file, Some("element"), GoType::Slice),
            "array_type" => self.wrap_inner(node, file, Some("element"), GoType::Array),
            "parenthesized_type" => match node.named_child(0) {
                Some(inner) => self.parse_go_type(inner, file),
                None => GoType::Unsupported(file.text(node).to_string()),
            },
            "map_type" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => GoType::Map {
                    key: Box::new(self.parse_go_type(key, file)),
                    value: Box::new(self.parse_go_type(value, file)),
                },
                _ => GoType::Unsupported(file.text(node).to_string()),
            },
            "interface_type" => GoType::Interface,
            _ => GoType::Unsupported(file.text(node).to_string()),
        }
    }

    fn wrap_inner(
        &self,
        node: Node<'_>,
        file: &ParsedFile,
        field: Option<&str>,
        wrap: fn(Box<GoType>) -> GoType,
    ) -> GoType {
        let inner = field
            .and_then(|f| node.child_by_field_name(f))
            .or_else(|| last_named_child(node));
        match inner {
            Some(inner) => wrap(Box::new(self.parse_go_type(inner, file))),
            None => GoType::Unsupported(file.text(node).to_string()),
        }
    }
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let count = node.named_child_count();
    if count == 0 {
        None
    } else {
        node.named_child(count - 1)
    }
}
