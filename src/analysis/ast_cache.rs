use crate::error::{Error, Result};
use crate::interface::output::Logger;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

/// A Go source file and its syntax tree
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
}

impl ParsedFile {
    /// Parse Go source. Files whose tree contains syntax errors are rejected.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let source = source.into();

        let mut parser = go_parser()?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| Error::PackageParse(format!("{}: parser returned no tree", path.display())))?;

        if tree.root_node().has_error() {
            return Err(Error::PackageParse(format!(
                "{}: syntax error",
                path.display()
            )));
        }

        Ok(Self { path, source, tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Declared `package` name
    pub fn package_name(&self) -> Option<&str> {
        let root = self.root();
        let mut cursor = root.walk();
        let clause = root
            .children(&mut cursor)
            .find(|child| child.kind() == "package_clause")?;
        let mut clause_cursor = clause.walk();
        let ident = clause
            .children(&mut clause_cursor)
            .find(|child| child.kind() == "package_identifier")?;
        Some(self.text(ident))
    }
}

fn go_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| Error::PackageParse(format!("failed to load Go grammar: {}", e)))?;
    Ok(parser)
}

/// `.go` files that belong to the build, excluding tests
pub fn is_package_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// Parsed files of one package directory, ordered by path
#[derive(Debug, Default)]
pub struct AstCache {
    cache: BTreeMap<PathBuf, ParsedFile>,
}

impl AstCache {
    pub fn new() -> Self {
        Self {
            cache: BTreeMap::new(),
        }
    }

    /// Parse and cache every Go source directly inside `dir` (non-recursive).
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn parse_and_cache_package_dir(&mut self, dir: &Path, logger: &Logger) -> Result<usize> {
        logger.verbose(&format!("Parsing Go files in: {}", dir.display()));

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::PackageParse(format!("cannot read {}: {}", dir.display(), e))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_package_source(path) {
                continue;
            }

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    logger.warning(&format!("Skipping {}: {}", path.display(), e));
                    continue;
                }
            };
            match ParsedFile::parse(path, content) {
                Ok(parsed) => {
                    logger.debug(&format!("Parsed: {}", path.display()));
                    self.cache.insert(path.to_path_buf(), parsed);
                }
                Err(e) => logger.warning(&format!("Skipping {}", e)),
            }
        }

        Ok(self.cache.len())
    }

    /// Parse an in-memory source and add it to the cache
    pub fn parse_and_cache_source(&mut self, path: impl Into<PathBuf>, source: &str) -> Result<()> {
        let parsed = ParsedFile::parse(path, source)?;
        self.cache.insert(parsed.path.clone(), parsed);
        Ok(())
    }

    pub fn get(&self, path: &Path) -> Option<&ParsedFile> {
        self.cache.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &ParsedFile> {
        self.cache.values()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
