use std::collections::HashMap;

/// Go type name (bare `int` or dotted `uuid.UUID`) to TypeScript type text.
///
/// Built in layers; each layer overwrites keys from the previous one:
/// built-ins, then date handling, then user overrides.
#[derive(Debug, Clone)]
pub struct TypeMappingTable {
    mappings: HashMap<String, String>,
}

impl TypeMappingTable {
    /// The layered table for one configured package
    pub fn new(overrides: &HashMap<String, String>, use_date_object: bool) -> Self {
        Self::builtin()
            .with_date_mode(use_date_object)
            .with_overrides(overrides)
    }

    pub fn builtin() -> Self {
        let mut mappings = HashMap::new();

        for number in [
            "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
            "uint64", "uintptr", "float32", "float64", "byte", "rune",
        ] {
            mappings.insert(number.to_string(), "number".to_string());
        }

        mappings.insert("string".to_string(), "string".to_string());
        mappings.insert("bool".to_string(), "boolean".to_string());
        mappings.insert("error".to_string(), "Error".to_string());
        mappings.insert("any".to_string(), "any".to_string());

        mappings.insert("uuid.UUID".to_string(), "string /* uuid */".to_string());
        mappings.insert(
            "pgtype.Timestamptz".to_string(),
            "string /* date-time */".to_string(),
        );
        mappings.insert(
            "pgtypes.Timestamptz".to_string(),
            "string /* date-time */".to_string(),
        );
        mappings.insert("types.Interface".to_string(), "any".to_string());

        Self { mappings }
    }

    pub fn with_date_mode(mut self, use_date_object: bool) -> Self {
        if use_date_object {
            self.insert("time.Time", "Date");
            self.insert("pgtype.Timestamptz", "Date");
        } else {
            self.insert("time.Time", "string /* date-time */");
        }
        self
    }

    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (go_type, ts_type) in overrides {
            self.insert(go_type, ts_type);
        }
        self
    }

    pub fn insert(&mut self, go_type: impl Into<String>, ts_type: impl Into<String>) {
        self.mappings.insert(go_type.into(), ts_type.into());
    }

    pub fn get(&self, go_type: &str) -> Option<&str> {
        self.mappings.get(go_type).map(String::as_str)
    }

    /// Look up `alias.Type`, then `<package name>.Type`, then `<import path>.Type`
    pub fn lookup_qualified(
        &self,
        alias: &str,
        import_path: Option<&str>,
        type_name: &str,
    ) -> Option<&str> {
        if let Some(found) = self.get(&format!("{}.{}", alias, type_name)) {
            return Some(found);
        }

        let import_path = import_path?;
        let package_name = import_path.rsplit('/').next().unwrap_or(import_path);
        if package_name != alias {
            if let Some(found) = self.get(&format!("{}.{}", package_name, type_name)) {
                return Some(found);
            }
        }

        self.get(&format!("{}.{}", import_path, type_name))
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl Default for TypeMappingTable {
    fn default() -> Self {
        Self::new(&HashMap::new(), false)
    }
}
