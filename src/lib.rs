//! # go2type
//!
//! Resolve the types behind annotated Go HTTP handlers into TypeScript type text.
//!
//! A Go package is scanned for struct declarations and handler functions whose
//! doc comments carry routing directives. Every struct field is resolved to a
//! TypeScript structure, following imports into other packages of the same
//! module, and only the types a handler can reach are kept.
//!
//! ## Handler annotations
//!
//! ```go
//! // @Method GET
//! // @Path /users/:id
//! // @Input GetUserInput
//! // @Output User
//! // @Header localStorage:X-Auth-Token:auth_token
//! func GetUserHandler(w http.ResponseWriter, r *http.Request) {}
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! go2type generate -c go2type.yaml
//! ```
//!
//! with a configuration like:
//!
//! ```yaml
//! auth_token: auth
//! auth_token_storage: localStorage
//! hooks: react-query
//! packages:
//!   - path: ./api
//!     output_path: ./frontend/src/api.generated.json
//!     type_mappings:
//!       null.String: "null | string"
//! ```
//!
//! ### Programmatic Usage
//!
//! ```rust,no_run
//! use go2type::{GoModResolver, Logger, PackageAnalyzer, TypeMappingTable};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let resolver = GoModResolver::new(Logger::new(false, false));
//! let mappings = TypeMappingTable::new(&HashMap::new(), false);
//! let output = PackageAnalyzer::new(&resolver, mappings).analyze_dir(Path::new("./api"))?;
//!
//! for ty in &output.used_types {
//!     println!("{}", ty.name);
//! }
//! # Ok::<(), go2type::Error>(())
//! ```

pub mod analysis;
mod error;
pub mod generators;
pub mod interface;
pub mod models;
pub mod module;

pub use error::{Error, ResolveError, Result};
pub use models::*;

pub use analysis::type_mapping::TypeMappingTable;
pub use analysis::PackageAnalyzer;
pub use generators::{JsonRenderer, RenderOptions, Renderer};
pub use interface::config::{Go2TypeConfig, PackageConfig};
pub use interface::output::{Logger, ProgressReporter};
pub use interface::{generate_from_config, GenerationReport};
pub use module::{GoModResolver, InMemoryModule, ModuleInfo, ModuleResolver};
