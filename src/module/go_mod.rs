use super::{normalize_path, ModuleInfo, ModuleResolver, Replacement};
use crate::analysis::package_scanner::{GoPackage, PackageScanner};
use crate::error::{Error, Result};
use crate::interface::output::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Module resolution backed by `go.mod` files on disk
#[derive(Debug)]
pub struct GoModResolver {
    scanner: PackageScanner,
    logger: Logger,
    use_toolchain: bool,
}

impl GoModResolver {
    pub fn new(logger: Logger) -> Self {
        Self {
            scanner: PackageScanner::new(logger.clone()),
            logger,
            use_toolchain: true,
        }
    }

    /// Disable the `go list -m` fallback used when no `go.mod` is found
    pub fn without_toolchain(mut self) -> Self {
        self.use_toolchain = false;
        self
    }

    fn find_go_mod(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join("go.mod"))
            .find(|candidate| candidate.is_file())
    }

    fn from_go_mod(&self, go_mod: &Path) -> Result<ModuleInfo> {
        let content = fs::read_to_string(go_mod)?;
        let root = go_mod
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let module = parse_go_mod(&content, &root).ok_or_else(|| {
            Error::ModuleInfo(format!("no module directive in {}", go_mod.display()))
        })?;
        self.logger.debug(&format!(
            "Module {} at {}",
            module.name,
            module.root.display()
        ));
        Ok(module)
    }

    fn from_toolchain(&self, package_dir: &Path) -> Result<ModuleInfo> {
        self.logger
            .verbose("No go.mod found, asking the Go toolchain for module information");

        let output = Command::new("go")
            .args(["list", "-m", "-f", "{{.Path}} {{.Dir}}"])
            .current_dir(package_dir)
            .output()
            .map_err(|e| Error::ModuleInfo(format!("failed to run go list: {}", e)))?;

        if !output.status.success() {
            return Err(Error::ModuleInfo(format!(
                "go list -m failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.split_whitespace().collect::<Vec<_>>().as_slice() {
            [name, dir] => {
                let root = PathBuf::from(dir);
                match Self::find_go_mod(&root) {
                    Some(go_mod) => self.from_go_mod(&go_mod),
                    None => Ok(ModuleInfo::new(*name, root)),
                }
            }
            _ => Err(Error::ModuleInfo(
                "unexpected output format from 'go list -m'".to_string(),
            )),
        }
    }

    fn locate_package(&self, module: &ModuleInfo, import_path: &str) -> Option<PathBuf> {
        if let Some(dir) = module.package_dir(import_path) {
            return Some(dir);
        }
        if let Some(dir) = module.replaced_dir(import_path) {
            return Some(dir);
        }
        let vendored = module.root.join("vendor").join(import_path);
        vendored.is_dir().then_some(vendored)
    }
}

impl ModuleResolver for GoModResolver {
    fn resolve_module_root(&self, package_dir: &Path) -> Result<ModuleInfo> {
        let absolute = package_dir
            .canonicalize()
            .map_err(|e| Error::ModuleInfo(format!("{}: {}", package_dir.display(), e)))?;

        match Self::find_go_mod(&absolute) {
            Some(go_mod) => self.from_go_mod(&go_mod),
            None if self.use_toolchain => self.from_toolchain(&absolute),
            None => Err(Error::ModuleInfo(format!(
                "no go.mod found above {}",
                absolute.display()
            ))),
        }
    }

    fn load_package_type_info(&self, module: &ModuleInfo, import_path: &str) -> Result<GoPackage> {
        let dir = self.locate_package(module, import_path).ok_or_else(|| {
            Error::PackageParse(format!("package {} is not available locally", import_path))
        })?;

        self.logger
            .verbose(&format!("Loading package {} from {}", import_path, dir.display()));

        let dir = dir.canonicalize().unwrap_or(dir);
        let mut package = self.scanner.scan_dir(&dir, import_path)?;
        package.module_owned = module.is_module_source(&dir);
        Ok(package)
    }
}

/// Read the `module` path and local-directory `replace` directives of a go.mod
pub fn parse_go_mod(content: &str, root: &Path) -> Option<ModuleInfo> {
    let mut name = None;
    let mut replacements = Vec::new();
    let mut in_replace_block = false;

    for raw_line in content.lines() {
        let line = raw_line.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        if in_replace_block {
            if line == ")" {
                in_replace_block = false;
            } else if let Some(replacement) = parse_replace(line, root) {
                replacements.push(replacement);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("module") {
            let module_name = rest.trim().trim_matches('"');
            if !module_name.is_empty() {
                name = Some(module_name.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("replace") {
            let rest = rest.trim();
            if rest == "(" {
                in_replace_block = true;
            } else if let Some(replacement) = parse_replace(rest, root) {
                replacements.push(replacement);
            }
        }
    }

    name.map(|name| ModuleInfo {
        name,
        root: root.to_path_buf(),
        replacements,
    })
}

/// `old [v] => ./dir`; replacements onto other module versions are ignored
fn parse_replace(line: &str, root: &Path) -> Option<Replacement> {
    let (from, to) = line.split_once("=>")?;
    let from = from.split_whitespace().next()?;
    let to = to.split_whitespace().next()?;

    if !(to.starts_with("./") || to.starts_with("../") || to.starts_with('/')) {
        return None;
    }

    Some(Replacement {
        from: from.to_string(),
        dir: normalize_path(&root.join(to)),
    })
}
