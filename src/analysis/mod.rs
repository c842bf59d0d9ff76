pub mod ast_cache;
pub mod handler_parser;
pub mod package_scanner;
pub mod reachability;
pub mod registry;
pub mod struct_parser;
pub mod tag_parser;
pub mod type_mapping;
pub mod type_resolver;

use crate::error::Result;
use crate::interface::output::Logger;
use crate::models::PackageOutput;
use crate::module::{ModuleInfo, ModuleResolver};
use std::path::Path;
use std::rc::Rc;

use package_scanner::{GoPackage, PackageScanner};
use type_mapping::TypeMappingTable;
use type_resolver::TypeResolver;

/// Runs one package pass: scan, resolve, then filter to what the handlers use
pub struct PackageAnalyzer<'a> {
    resolver: &'a dyn ModuleResolver,
    mappings: TypeMappingTable,
    logger: Logger,
}

impl<'a> PackageAnalyzer<'a> {
    pub fn new(resolver: &'a dyn ModuleResolver, mappings: TypeMappingTable) -> Self {
        Self {
            resolver,
            mappings,
            logger: Logger::new(false, false),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Analyze the Go package in `dir`. Fails only on package-fatal problems:
    /// an unreadable directory, no parseable files, or unknown module identity.
    pub fn analyze_dir(&self, dir: &Path) -> Result<PackageOutput> {
        let module = self.resolver.resolve_module_root(dir)?;
        let dir = dir.canonicalize()?;

        let import_path = module.import_path_for(&dir).unwrap_or_else(|| {
            let leaf = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            format!("{}/{}", module.name, leaf)
        });

        let scanner = PackageScanner::new(self.logger.clone());
        let mut root = scanner.scan_dir(&dir, &import_path)?;
        root.module_owned = true;

        Ok(self.analyze_package(&module, root))
    }

    /// Resolve an already scanned root package against `module`
    pub fn analyze_package(&self, module: &ModuleInfo, root: GoPackage) -> PackageOutput {
        let root = Rc::new(root);
        self.logger.verbose(&format!(
            "Resolving package {} ({} structs, {} handlers)",
            root.import_path,
            root.structs.len(),
            root.handlers.len()
        ));

        let mut resolver =
            TypeResolver::new(&self.mappings, module, self.resolver).with_logger(self.logger.clone());
        resolver.resolve_package(&root);

        let handlers = root
            .handlers
            .iter()
            .map(|handler| {
                let file = Path::new(&handler.file_path);
                let mut handler = handler.clone();
                handler.input_type = resolver.resolve_handler_type(&root, file, &handler.input_type);
                handler.output_type =
                    resolver.resolve_handler_type(&root, file, &handler.output_type);
                handler
            })
            .collect::<Vec<_>>();

        let (registry, diagnostics) = resolver.finish();
        let used_types = reachability::filter_used_types(&registry, &handlers);

        self.logger.debug(&format!(
            "{} types registered, {} reachable from {} handlers",
            registry.len(),
            used_types.len(),
            handlers.len()
        ));

        PackageOutput {
            package: root.name.clone(),
            import_path: root.import_path.clone(),
            module: module.name.clone(),
            used_types,
            handlers,
            diagnostics,
        }
    }
}
