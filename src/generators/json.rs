use super::{RenderOptions, Renderer};
use crate::error::{Error, Result};
use crate::models::PackageOutput;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BindingsDocument<'a> {
    generator: &'static str,
    version: &'static str,
    generated_at: String,
    options: &'a RenderOptions,
    #[serde(flatten)]
    package: &'a PackageOutput,
}

/// Writes the resolved package as pretty-printed JSON for downstream templating
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    timestamp: Option<DateTime<Utc>>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the `generatedAt` stamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, output: &PackageOutput, options: &RenderOptions) -> Result<String> {
        let generated_at = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let document = BindingsDocument {
            generator: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at,
            options,
            package: output,
        };

        serde_json::to_string_pretty(&document)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| Error::CodeGeneration(e.to_string()))
    }
}
