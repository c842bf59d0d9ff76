use crate::analysis::ast_cache::{AstCache, ParsedFile};
use crate::analysis::handler_parser::HandlerParser;
use crate::analysis::struct_parser::{NamedTypeDecl, StructDecl, StructParser, TypeDecl};
use crate::error::{Error, Result};
use crate::interface::output::Logger;
use crate::models::HandlerDescriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Import alias to import path, for one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    aliases: HashMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an import. Blank and dot imports bind no usable name and are dropped.
    pub fn add(&mut self, alias: Option<&str>, path: &str) {
        let alias = match alias {
            Some("_") | Some(".") => return,
            Some(alias) => alias.to_string(),
            None => path.rsplit('/').next().unwrap_or(path).to_string(),
        };
        self.aliases.insert(alias, path.to_string());
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Everything scanned out of one Go package directory
#[derive(Debug, Clone, Default)]
pub struct GoPackage {
    /// Declared package name
    pub name: String,
    pub import_path: String,
    pub dir: PathBuf,
    /// Source lives inside the current module's own tree
    pub module_owned: bool,
    /// Declaration order, files sorted by path
    pub structs: Vec<StructDecl>,
    pub named_types: Vec<NamedTypeDecl>,
    pub handlers: Vec<HandlerDescriptor>,
    imports: HashMap<PathBuf, ImportTable>,
}

impl GoPackage {
    pub fn find_struct(&self, name: &str) -> Option<&StructDecl> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_named_type(&self, name: &str) -> Option<&NamedTypeDecl> {
        self.named_types.iter().find(|t| t.name == name)
    }

    /// Import path bound to `alias` in `file`
    pub fn resolve_import(&self, file: &Path, alias: &str) -> Option<&str> {
        self.imports.get(file).and_then(|table| table.resolve(alias))
    }

    pub fn imports(&self, file: &Path) -> Option<&ImportTable> {
        self.imports.get(file)
    }
}

/// Turns a package directory into a [`GoPackage`]
#[derive(Debug)]
pub struct PackageScanner {
    struct_parser: StructParser,
    handler_parser: HandlerParser,
    logger: Logger,
}

impl PackageScanner {
    pub fn new(logger: Logger) -> Self {
        Self {
            struct_parser: StructParser::new(),
            handler_parser: HandlerParser::new(),
            logger,
        }
    }

    /// Scan every non-test `.go` file directly inside `dir`
    pub fn scan_dir(&self, dir: &Path, import_path: &str) -> Result<GoPackage> {
        let mut cache = AstCache::new();
        cache.parse_and_cache_package_dir(dir, &self.logger)?;
        self.scan_cache(&cache, dir, import_path)
    }

    /// Scan in-memory sources as if they were the files of `dir`
    pub fn scan_sources(
        &self,
        dir: &Path,
        import_path: &str,
        sources: &[(&str, &str)],
    ) -> Result<GoPackage> {
        let mut cache = AstCache::new();
        for (file_name, source) in sources {
            let path = dir.join(file_name);
            if let Err(e) = cache.parse_and_cache_source(&path, source) {
                self.logger.warning(&format!("Skipping {}", e));
            }
        }
        self.scan_cache(&cache, dir, import_path)
    }

    fn scan_cache(&self, cache: &AstCache, dir: &Path, import_path: &str) -> Result<GoPackage> {
        if cache.is_empty() {
            return Err(Error::PackageParse(format!(
                "no parseable Go files in {}",
                dir.display()
            )));
        }

        let mut package = GoPackage {
            import_path: import_path.to_string(),
            dir: dir.to_path_buf(),
            ..GoPackage::default()
        };

        for file in cache.files() {
            if package.name.is_empty() {
                if let Some(name) = file.package_name() {
                    package.name = name.to_string();
                }
            }

            package
                .imports
                .insert(file.path.clone(), self.collect_imports(file));

            for decl in self.struct_parser.parse_type_declarations(file) {
                match decl {
                    TypeDecl::Struct(s) => package.structs.push(s),
                    TypeDecl::Named(n) => package.named_types.push(n),
                }
            }

            package.handlers.extend(self.collect_handlers(file));
        }

        self.logger.debug(&format!(
            "Scanned package {} ({}): {} structs, {} named types, {} handlers",
            package.name,
            package.import_path,
            package.structs.len(),
            package.named_types.len(),
            package.handlers.len()
        ));

        Ok(package)
    }

    fn collect_imports(&self, file: &ParsedFile) -> ImportTable {
        let mut table = ImportTable::new();
        let root = file.root();

        let mut cursor = root.walk();
        for declaration in root.children(&mut cursor) {
            if declaration.kind() != "import_declaration" {
                continue;
            }
            let mut specs = Vec::new();
            collect_import_specs(declaration, &mut specs);
            for spec in specs {
                let Some(path_node) = spec.child_by_field_name("path") else {
                    continue;
                };
                let path = file.text(path_node).trim_matches(|c: char| c == '"' || c == '`');
                let alias = spec.child_by_field_name("name").map(|n| file.text(n));
                table.add(alias, path);
            }
        }

        table
    }

    fn collect_handlers(&self, file: &ParsedFile) -> Vec<HandlerDescriptor> {
        let root = file.root();
        let mut handlers = Vec::new();
        let mut doc: Vec<Node<'_>> = Vec::new();

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "comment" => {
                    let contiguous = doc
                        .last()
                        .is_some_and(|prev| prev.end_position().row + 1 >= node.start_position().row);
                    if !contiguous {
                        doc.clear();
                    }
                    doc.push(node);
                }
                "function_declaration" | "method_declaration" => {
                    let attached = doc
                        .last()
                        .is_some_and(|last| last.end_position().row + 1 == node.start_position().row);
                    if attached {
                        if let Some(name) = node.child_by_field_name("name") {
                            let lines = doc_lines(file, &doc);
                            if let Some(handler) = self.handler_parser.parse_handler(
                                file.text(name),
                                &lines,
                                &file.path,
                                node.start_position().row + 1,
                            ) {
                                handlers.push(handler);
                            }
                        }
                    }
                    doc.clear();
                }
                _ => doc.clear(),
            }
        }

        handlers
    }
}

fn collect_import_specs<'tree>(node: Node<'tree>, specs: &mut Vec<Node<'tree>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => specs.push(child),
            "import_spec_list" => collect_import_specs(child, specs),
            _ => {}
        }
    }
}

/// Comment nodes to plain text lines, delimiters removed
fn doc_lines(file: &ParsedFile, comments: &[Node<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for comment in comments {
        let text = file.text(*comment);
        if let Some(line) = text.strip_prefix("//") {
            lines.push(line.trim().to_string());
        } else {
            let body = text
                .trim_start_matches("/*")
                .trim_end_matches("*/");
            lines.extend(
                body.lines()
                    .map(|l| l.trim().trim_start_matches('*').trim().to_string())
                    .filter(|l| !l.is_empty()),
            );
        }
    }
    lines
}
