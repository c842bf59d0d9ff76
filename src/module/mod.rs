//! Module identity and package loading.
//!
//! The resolver never touches the filesystem or the Go toolchain directly for
//! module questions; it goes through a [`ModuleResolver`]. [`GoModResolver`]
//! answers from `go.mod` (falling back to `go list -m`), [`InMemoryModule`]
//! serves fixed sources for tests.

pub mod go_mod;
pub mod in_memory;

pub use go_mod::GoModResolver;
pub use in_memory::InMemoryModule;

use crate::analysis::package_scanner::GoPackage;
use crate::error::Result;
use std::path::{Component, Path, PathBuf};

/// A `replace old => ./local/dir` directive pointing at a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub dir: PathBuf,
}

/// The Go module a package pass runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module path from `go.mod`
    pub name: String,
    /// Directory holding `go.mod`
    pub root: PathBuf,
    pub replacements: Vec<Replacement>,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            replacements: Vec::new(),
        }
    }

    /// Whether `import_path` lives under this module's path
    pub fn owns(&self, import_path: &str) -> bool {
        import_path == self.name
            || import_path
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Directory of an import path owned by this module
    pub fn package_dir(&self, import_path: &str) -> Option<PathBuf> {
        if !self.owns(import_path) {
            return None;
        }
        let relative = import_path[self.name.len()..].trim_start_matches('/');
        Some(if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        })
    }

    /// Import path of a directory inside the module root
    pub fn import_path_for(&self, dir: &Path) -> Option<String> {
        let relative = dir.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if segments.is_empty() {
            Some(self.name.clone())
        } else {
            Some(format!("{}/{}", self.name, segments.join("/")))
        }
    }

    /// Local directory a `replace` directive maps `import_path` onto
    pub fn replaced_dir(&self, import_path: &str) -> Option<PathBuf> {
        self.replacements.iter().find_map(|r| {
            if import_path == r.from {
                Some(r.dir.clone())
            } else {
                import_path
                    .strip_prefix(r.from.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
                    .map(|rest| r.dir.join(rest))
            }
        })
    }

    /// Source under the module root that is not vendored third-party code
    pub fn is_module_source(&self, dir: &Path) -> bool {
        let dir = normalize_path(dir);
        let root = normalize_path(&self.root);
        dir.starts_with(&root) && !dir.starts_with(root.join("vendor"))
    }
}

/// Drop `.` components and fold `..` into its parent without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Injected source of module identity and package type information
pub trait ModuleResolver {
    /// Module that contains `package_dir`
    fn resolve_module_root(&self, package_dir: &Path) -> Result<ModuleInfo>;

    /// Scan the package at `import_path`, setting `module_owned` on the result
    fn load_package_type_info(&self, module: &ModuleInfo, import_path: &str) -> Result<GoPackage>;
}
