use crate::models::{capitalize_first, HandlerDescriptor, HeaderDescriptor, HeaderSource};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const METHOD: &str = "@Method";
const PATH: &str = "@Path";
const INPUT: &str = "@Input";
const OUTPUT: &str = "@Output";
const HEADER: &str = "@Header";

/// Extracts handler metadata from the comment block attached to a function
#[derive(Debug, Default)]
pub struct HandlerParser;

impl HandlerParser {
    pub fn new() -> Self {
        Self
    }

    /// Build a handler from a function's doc lines. Functions lacking either
    /// `@Method` or `@Path` are not handlers.
    pub fn parse_handler(
        &self,
        function_name: &str,
        doc_lines: &[String],
        file_path: &Path,
        line_number: usize,
    ) -> Option<HandlerDescriptor> {
        let mut method = String::new();
        let mut path = String::new();
        let mut input_type = String::new();
        let mut output_type = String::new();
        let mut headers = Vec::new();

        // A line carries at most one directive; the first marker found wins
        for line in doc_lines {
            if let Some(value) = directive_value(line, METHOD) {
                method = value;
            } else if let Some(value) = directive_value(line, PATH) {
                path = value;
            } else if let Some(value) = directive_value(line, INPUT) {
                input_type = value;
            } else if let Some(value) = directive_value(line, OUTPUT) {
                output_type = value;
            } else if let Some(value) = directive_value(line, HEADER) {
                headers.push(self.parse_header_directive(&value));
            }
        }

        if method.is_empty() || path.is_empty() {
            return None;
        }

        Some(HandlerDescriptor {
            name: format_handler_name(function_name),
            url_params: extract_url_params(&path),
            method,
            path,
            input_type,
            output_type,
            headers,
            file_path: file_path.to_string_lossy().to_string(),
            line_number,
        })
    }

    /// Parse the text after `@Header`:
    /// `source:key:storageKey`, `source:key`, or a bare header key
    pub fn parse_header_directive(&self, directive: &str) -> HeaderDescriptor {
        let parts: Vec<&str> = directive.split(':').collect();

        let source = match parts.len() {
            2 | 3 => HeaderSource::from_directive(parts[0]),
            _ => None,
        };

        match (source, parts.as_slice()) {
            (Some(source), [_, key, storage_key]) => HeaderDescriptor {
                header_key: key.to_string(),
                safe_name: to_safe_header_name(key),
                source,
                storage_key: storage_key.to_string(),
            },
            (Some(source), [_, key]) => HeaderDescriptor {
                header_key: key.to_string(),
                safe_name: to_safe_header_name(key),
                source,
                storage_key: if source.is_storage() {
                    key.to_string()
                } else {
                    String::new()
                },
            },
            _ => HeaderDescriptor {
                header_key: directive.to_string(),
                safe_name: to_safe_header_name(directive),
                source: HeaderSource::Input,
                storage_key: String::new(),
            },
        }
    }
}

fn directive_value(line: &str, marker: &str) -> Option<String> {
    line.split_once(marker)
        .map(|(_, rest)| rest.trim().to_string())
}

fn unsafe_header_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new("[^a-z0-9_]").expect("header pattern compiles"))
}

/// Turn a header key into a TypeScript identifier: `X-Auth-Token` -> `x_auth_token`
pub fn to_safe_header_name(header_key: &str) -> String {
    let lowered = header_key.to_lowercase();
    let safe = unsafe_header_chars().replace_all(&lowered, "_").into_owned();
    if safe.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", safe)
    } else {
        safe
    }
}

/// `getUserHandler` -> `GetUser`
pub fn format_handler_name(function_name: &str) -> String {
    let trimmed = function_name
        .strip_suffix("Handler")
        .unwrap_or(function_name);
    capitalize_first(trimmed)
}

/// Split `[]*pkg.User` into its wrapper prefix `[]*` and the named type `pkg.User`
pub fn split_type_wrappers(written: &str) -> (&str, &str) {
    let written = written.trim();
    let mut rest = written;
    loop {
        if let Some(inner) = rest.strip_prefix("[]") {
            rest = inner;
        } else if let Some(inner) = rest.strip_prefix('*') {
            rest = inner;
        } else {
            break;
        }
    }
    written.split_at(written.len() - rest.len())
}

/// Names of the `:param` segments of a URL template, in order
pub fn extract_url_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .map(str::to_string)
        .collect()
}
