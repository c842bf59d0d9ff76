use super::{ModuleInfo, ModuleResolver};
use crate::analysis::package_scanner::{GoPackage, PackageScanner};
use crate::error::{Error, Result};
use crate::interface::output::Logger;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
struct PackageSources {
    files: Vec<(String, String)>,
    module_owned: bool,
}

/// A module whose packages are held in memory, keyed by import path
#[derive(Debug)]
pub struct InMemoryModule {
    module: ModuleInfo,
    packages: HashMap<String, PackageSources>,
    scanner: PackageScanner,
}

impl InMemoryModule {
    pub fn new(name: &str) -> Self {
        Self {
            module: ModuleInfo::new(name, Path::new("/").join(name)),
            packages: HashMap::new(),
            scanner: PackageScanner::new(Logger::new(false, false)),
        }
    }

    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    /// Add a source file to a package of this module, `relative` to the module path
    pub fn with_file(self, relative: &str, file_name: &str, source: &str) -> Self {
        let import_path = if relative.is_empty() {
            self.module.name.clone()
        } else {
            format!("{}/{}", self.module.name, relative)
        };
        self.with_package_file(&import_path, true, file_name, source)
    }

    /// Add a source file to any package, e.g. a vendored or replaced dependency
    pub fn with_package_file(
        mut self,
        import_path: &str,
        module_owned: bool,
        file_name: &str,
        source: &str,
    ) -> Self {
        let entry = self
            .packages
            .entry(import_path.to_string())
            .or_insert_with(|| PackageSources {
                files: Vec::new(),
                module_owned,
            });
        entry.files.push((file_name.to_string(), source.to_string()));
        self
    }

    /// Scan the package at `import_path`, as the root of a pass
    pub fn scan(&self, import_path: &str) -> Result<GoPackage> {
        self.load_package_type_info(&self.module, import_path)
    }
}

impl ModuleResolver for InMemoryModule {
    fn resolve_module_root(&self, _package_dir: &Path) -> Result<ModuleInfo> {
        Ok(self.module.clone())
    }

    fn load_package_type_info(&self, module: &ModuleInfo, import_path: &str) -> Result<GoPackage> {
        let sources = self.packages.get(import_path).ok_or_else(|| {
            Error::PackageParse(format!("package {} is not available locally", import_path))
        })?;

        let dir = module
            .package_dir(import_path)
            .unwrap_or_else(|| module.root.join("vendor").join(import_path));
        let files: Vec<(&str, &str)> = sources
            .files
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str()))
            .collect();

        let mut package = self.scanner.scan_sources(&dir, import_path, &files)?;
        package.module_owned = sources.module_owned;
        Ok(package)
    }
}
