#![allow(dead_code)]
/// Common test utilities and helpers
use go2type::{GoModResolver, Logger, PackageAnalyzer, PackageOutput, TypeMappingTable};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MODULE: &str = "example.com/app";

/// A Go module on disk with a `go.mod` at its root
pub struct TestProject {
    pub temp_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        project.write_file("go.mod", &format!("module {}\n\ngo 1.22\n", MODULE));
        project
    }

    /// Write a file relative to the module root
    pub fn write_file(&self, name: &str, content: &str) -> &Self {
        let file_path = self.temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(file_path, content).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn dir(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Analyze the package in `relative` with the built-in mappings
    pub fn analyze(&self, relative: &str) -> PackageOutput {
        self.analyze_with(relative, &HashMap::new())
    }

    pub fn analyze_with(&self, relative: &str, overrides: &HashMap<String, String>) -> PackageOutput {
        let resolver = GoModResolver::new(Logger::new(false, false)).without_toolchain();
        let mappings = TypeMappingTable::new(overrides, false);
        PackageAnalyzer::new(&resolver, mappings)
            .analyze_dir(&self.dir(relative))
            .unwrap()
    }
}

/// Rendered TypeScript type of `type_name.field`
pub fn field_type(output: &PackageOutput, type_name: &str, field: &str) -> Option<String> {
    output
        .used_type(type_name)
        .unwrap_or_else(|| panic!("type {} not emitted", type_name))
        .field(field)
        .unwrap_or_else(|| panic!("field {}.{} missing", type_name, field))
        .ts_type()
}

pub fn used_type_names(output: &PackageOutput) -> Vec<&str> {
    output.used_types.iter().map(|t| t.name.as_str()).collect()
}

pub fn mappings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
