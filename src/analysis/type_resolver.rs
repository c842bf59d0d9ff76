use crate::analysis::handler_parser::split_type_wrappers;
use crate::analysis::package_scanner::GoPackage;
use crate::analysis::registry::{EntryState, TypeKey, TypeRegistry};
use crate::analysis::type_mapping::TypeMappingTable;
use crate::error::ResolveError;
use crate::interface::output::Logger;
use crate::models::{capitalize_first, Diagnostic, GoType, TypeStructure};
use crate::module::{ModuleInfo, ModuleResolver};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

type Resolved<T> = std::result::Result<T, ResolveError>;

/// Resolves Go field types to TypeScript for one package pass.
///
/// Owns the registry while the pass runs. Struct types are registered under a
/// reserved name before their fields are resolved, so self- and mutually
/// recursive types terminate and each source type is registered once.
pub struct TypeResolver<'a> {
    mappings: &'a TypeMappingTable,
    module: &'a ModuleInfo,
    loader: &'a dyn ModuleResolver,
    logger: Logger,
    root_import_path: String,
    /// Loaded packages by import path, failures included
    packages: HashMap<String, Resolved<Rc<GoPackage>>>,
    registry: TypeRegistry,
    diagnostics: Vec<Diagnostic>,
    /// Named non-struct types currently being inlined
    expanding: HashSet<TypeKey>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        mappings: &'a TypeMappingTable,
        module: &'a ModuleInfo,
        loader: &'a dyn ModuleResolver,
    ) -> Self {
        Self {
            mappings,
            module,
            loader,
            logger: Logger::new(false, false),
            root_import_path: String::new(),
            packages: HashMap::new(),
            registry: TypeRegistry::new(),
            diagnostics: Vec::new(),
            expanding: HashSet::new(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Register and resolve every struct declared in the root package.
    ///
    /// Root names are reserved up front so they keep their bare names even when
    /// an imported type with the same name is reached first.
    pub fn resolve_package(&mut self, root: &Rc<GoPackage>) {
        self.root_import_path = root.import_path.clone();
        self.packages
            .insert(root.import_path.clone(), Ok(Rc::clone(root)));

        for decl in &root.structs {
            self.registry.reserve(
                TypeKey::new(&root.import_path, &decl.name),
                &root.name,
                &decl.name,
            );
        }

        for decl in &root.structs {
            if let Err(e) = self.resolve_struct(root, &decl.name) {
                self.logger
                    .warning(&format!("Could not resolve {}: {}", decl.name, e));
            }
        }
    }

    /// Registry name of a struct, resolving it on first use
    pub fn resolve_struct(&mut self, package: &Rc<GoPackage>, type_name: &str) -> Resolved<String> {
        let key = TypeKey::new(&package.import_path, type_name);

        match self.registry.state(&key) {
            Some(EntryState::Resolving) | Some(EntryState::Resolved) => {
                return self.registry.lookup(&key).ok_or_else(|| not_found(package, type_name));
            }
            Some(EntryState::Reserved) => {}
            None => {
                let preferred = self.preferred_name(package, type_name);
                self.registry.reserve(key.clone(), &package.name, &preferred);
            }
        }

        let decl = package
            .find_struct(type_name)
            .ok_or_else(|| not_found(package, type_name))?;
        let name = self
            .registry
            .lookup(&key)
            .ok_or_else(|| not_found(package, type_name))?;

        self.registry.begin(&key);
        self.logger.debug(&format!("Resolving {} as {}", key, name));

        let mut fields = Vec::with_capacity(decl.fields.len());
        let mut failures = Vec::new();
        for raw in &decl.fields {
            let mut field = raw.clone();
            match self.resolve_type(package, &decl.file, &raw.go_type) {
                Ok(resolved) => field.resolved_type = Some(resolved),
                Err(error) => failures.push((raw.source_name.clone(), error)),
            }
            fields.push(field);
        }

        // Completion may fold this entry into an identical one under another name
        let final_name = self
            .registry
            .complete(&key, fields)
            .ok_or_else(|| not_found(package, type_name))?;
        for (field, error) in failures {
            let diagnostic = Diagnostic {
                type_name: final_name.clone(),
                field,
                error,
            };
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
        Ok(final_name)
    }

    /// Resolve one type expression written in `file` of `package`
    pub fn resolve_type(
        &mut self,
        package: &Rc<GoPackage>,
        file: &Path,
        go_type: &GoType,
    ) -> Resolved<TypeStructure> {
        match go_type {
            GoType::Pointer(inner) => match self.resolve_type(package, file, inner)? {
                optional @ TypeStructure::Optional(_) => Ok(optional),
                resolved => Ok(TypeStructure::Optional(Box::new(resolved))),
            },
            GoType::Slice(inner) | GoType::Array(inner) => Ok(TypeStructure::Array(Box::new(
                self.resolve_type(package, file, inner)?,
            ))),
            GoType::Map { key, value } => Ok(TypeStructure::Map {
                key: Box::new(self.resolve_type(package, file, key)?),
                value: Box::new(self.resolve_type(package, file, value)?),
            }),
            GoType::Interface => Ok(TypeStructure::primitive("any")),
            GoType::Ident(name) => self.resolve_ident(package, name),
            GoType::Qualified { package: alias, name } => {
                self.resolve_qualified(package, file, alias, name)
            }
            GoType::Unsupported(text) => Err(ResolveError::Unsupported(text.clone())),
        }
    }

    /// Rewrite a handler's `@Input`/`@Output` annotation to the registry name
    /// of the type it designates. Unknown names are kept as written.
    pub fn resolve_handler_type(&mut self, root: &Rc<GoPackage>, file: &Path, written: &str) -> String {
        let written = written.trim();
        let (wrappers, base) = split_type_wrappers(written);
        if base.is_empty() {
            return written.to_string();
        }

        let resolved = match base.split_once('.') {
            Some((alias, name)) => self.resolve_qualified(root, file, alias, name),
            None if root.find_struct(base).is_some() => self
                .resolve_struct(root, base)
                .map(TypeStructure::Reference),
            None => return written.to_string(),
        };

        match resolved {
            Ok(TypeStructure::Reference(name)) => format!("{}{}", wrappers, name),
            Ok(_) => written.to_string(),
            Err(e) => {
                self.logger.warning(&format!(
                    "Handler type {} could not be resolved: {}",
                    written, e
                ));
                written.to_string()
            }
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> (TypeRegistry, Vec<Diagnostic>) {
        (self.registry, self.diagnostics)
    }

    fn resolve_ident(&mut self, package: &Rc<GoPackage>, name: &str) -> Resolved<TypeStructure> {
        if let Some(mapped) = self.mappings.get(name) {
            return Ok(TypeStructure::primitive(mapped));
        }
        if package.find_struct(name).is_some() || package.find_named_type(name).is_some() {
            return self.resolve_member(package, name);
        }
        Ok(TypeStructure::primitive(name))
    }

    fn resolve_qualified(
        &mut self,
        package: &Rc<GoPackage>,
        file: &Path,
        alias: &str,
        name: &str,
    ) -> Resolved<TypeStructure> {
        let import_path = package.resolve_import(file, alias).map(str::to_string);

        if let Some(mapped) = self
            .mappings
            .lookup_qualified(alias, import_path.as_deref(), name)
        {
            return Ok(TypeStructure::primitive(mapped));
        }

        let import_path = import_path.ok_or_else(|| ResolveError::MissingImport {
            alias: alias.to_string(),
        })?;

        if self.module.owns(&import_path) {
            let target = self.load_package(&import_path)?;
            return self.resolve_member(&target, name);
        }

        match self.load_package(&import_path) {
            Ok(target) if target.module_owned => self.resolve_member(&target, name),
            _ => Err(ResolveError::NoExternalMapping {
                type_name: format!("{}.{}", alias, name),
            }),
        }
    }

    /// A struct becomes a reference; a named non-struct type is inlined
    fn resolve_member(&mut self, package: &Rc<GoPackage>, name: &str) -> Resolved<TypeStructure> {
        if package.find_struct(name).is_some() {
            return self
                .resolve_struct(package, name)
                .map(TypeStructure::Reference);
        }

        let named = package
            .find_named_type(name)
            .ok_or_else(|| not_found(package, name))?;

        let key = TypeKey::new(&package.import_path, name);
        if !self.expanding.insert(key.clone()) {
            return Err(ResolveError::RecursiveNamedType(key.to_string()));
        }
        let result = self.resolve_type(package, &named.file, &named.underlying);
        self.expanding.remove(&key);
        result
    }

    fn load_package(&mut self, import_path: &str) -> Resolved<Rc<GoPackage>> {
        if let Some(cached) = self.packages.get(import_path) {
            return cached.clone();
        }

        let loaded = self
            .loader
            .load_package_type_info(self.module, import_path)
            .map(Rc::new)
            .map_err(|e| ResolveError::PackageLoad {
                import_path: import_path.to_string(),
                reason: e.to_string(),
            });
        if let Err(e) = &loaded {
            self.logger.debug(&e.to_string());
        }
        self.packages
            .insert(import_path.to_string(), loaded.clone());
        loaded
    }

    fn preferred_name(&self, package: &GoPackage, type_name: &str) -> String {
        if package.import_path == self.root_import_path {
            type_name.to_string()
        } else {
            format!("{}{}", capitalize_first(&package.name), type_name)
        }
    }
}

fn not_found(package: &GoPackage, type_name: &str) -> ResolveError {
    ResolveError::TypeNotFound {
        type_name: type_name.to_string(),
        import_path: package.import_path.clone(),
    }
}
