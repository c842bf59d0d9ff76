pub mod file_writer;
pub mod json;

use crate::error::Result;
use crate::interface::config::{Go2TypeConfig, HooksMode, TokenStorage};
use crate::models::PackageOutput;
use serde::Serialize;

pub use file_writer::FileWriter;
pub use json::JsonRenderer;

/// Settings that shape the client code, taken from the top level of the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub auth_token: String,
    pub auth_token_storage: TokenStorage,
    pub hooks: HooksMode,
    pub use_date_object: bool,
}

impl RenderOptions {
    pub fn from_config(config: &Go2TypeConfig) -> Self {
        Self {
            auth_token: config.auth_token.clone(),
            auth_token_storage: config.token_storage(),
            hooks: config.hooks_mode(),
            use_date_object: config.use_date_object,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&Go2TypeConfig::default())
    }
}

/// Turns one package's resolved types and handlers into output text
pub trait Renderer {
    fn render(&self, output: &PackageOutput, options: &RenderOptions) -> Result<String>;
}
