use crate::interface::config::ConfigError;
use serde::{ser::Serializer, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort the pass for one configured package
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Package parsing failed: {0}")]
    PackageParse(String),

    #[error("Module information unavailable: {0}")]
    ModuleInfo(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Code generation failed: {0}")]
    CodeGeneration(String),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

/// Field-scoped resolution failures. These never abort a package pass; they are
/// collected as diagnostics and the offending field stays unresolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("could not find import for package {alias}")]
    MissingImport { alias: String },

    #[error("no type mapping for external type {type_name}")]
    NoExternalMapping { type_name: String },

    #[error("failed to load package {import_path}: {reason}")]
    PackageLoad { import_path: String, reason: String },

    #[error("type {type_name} not found in package {import_path}")]
    TypeNotFound {
        type_name: String,
        import_path: String,
    },

    #[error("recursive named type {0}")]
    RecursiveNamedType(String),

    #[error("unsupported type expression: {0}")]
    Unsupported(String),
}

impl Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
