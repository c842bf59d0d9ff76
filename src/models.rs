use crate::error::ResolveError;
use serde::{ser::Serializer, Serialize};
use std::fmt;

/// A Go type expression as written in source, before any resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// Bare identifier: `int`, `User`, `any`
    Ident(String),

    /// `pkg.Type` selector; `package` is the local import alias
    Qualified { package: String, name: String },

    /// `*T`
    Pointer(Box<GoType>),

    /// `[]T`
    Slice(Box<GoType>),

    /// `[N]T`, emitted like a slice
    Array(Box<GoType>),

    /// `map[K]V`
    Map { key: Box<GoType>, value: Box<GoType> },

    /// Any interface type, including `interface{}`
    Interface,

    /// Channels, functions, inline structs, generics; carries the source text
    Unsupported(String),
}

impl GoType {
    /// Strip pointer, slice and array wrappers
    pub fn base(&self) -> &GoType {
        match self {
            GoType::Pointer(inner) | GoType::Slice(inner) | GoType::Array(inner) => inner.base(),
            other => other,
        }
    }

    /// The `package.Type` (or bare `Type`) key of the base type
    pub fn qualified_source_type(&self) -> String {
        match self.base() {
            GoType::Ident(name) => name.clone(),
            GoType::Qualified { package, name } => format!("{}.{}", package, name),
            GoType::Map { .. } => "map".to_string(),
            GoType::Interface => "interface".to_string(),
            GoType::Unsupported(text) => text.clone(),
            GoType::Pointer(_) | GoType::Slice(_) | GoType::Array(_) => unreachable!(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, GoType::Pointer(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, GoType::Slice(_) | GoType::Array(_))
    }
}

/// Resolved TypeScript shape of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeStructure {
    /// Literal TypeScript type text: `number`, `string /* uuid */`, `null | string`
    Primitive(String),

    /// Name of another entry in the type registry
    Reference(String),

    /// `Array<T>`
    Array(Box<TypeStructure>),

    /// `T | null`
    Optional(Box<TypeStructure>),

    /// `{ [key: K]: V }`, always inline
    Map {
        key: Box<TypeStructure>,
        value: Box<TypeStructure>,
    },
}

impl TypeStructure {
    pub fn primitive(ts_type: impl Into<String>) -> Self {
        TypeStructure::Primitive(ts_type.into())
    }

    /// Collect every registry name this type refers to, looking through wrappers
    pub fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            TypeStructure::Primitive(_) => {}
            TypeStructure::Reference(name) => names.push(name),
            TypeStructure::Array(inner) | TypeStructure::Optional(inner) => {
                inner.collect_references(names)
            }
            TypeStructure::Map { key, value } => {
                key.collect_references(names);
                value.collect_references(names);
            }
        }
    }
}

impl fmt::Display for TypeStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeStructure::Primitive(ts_type) => write!(f, "{}", ts_type),
            TypeStructure::Reference(name) => write!(f, "{}", name),
            TypeStructure::Array(inner) => write!(f, "Array<{}>", inner),
            TypeStructure::Optional(inner) => write!(f, "{} | null", inner),
            TypeStructure::Map { key, value } => write!(f, "{{ [key: {}]: {} }}", key, value),
        }
    }
}

impl Serialize for TypeStructure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One struct field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub source_name: String,
    /// Name on the wire, from the `json` tag or the source name
    pub serialized_name: String,
    /// Declared type text, e.g. `*pkg.Foo`
    pub raw_type: String,
    #[serde(skip)]
    pub go_type: GoType,
    /// `None` until resolved, and after a field-scoped resolution failure
    pub resolved_type: Option<TypeStructure>,
    pub qualified_source_type: String,
    pub is_optional: bool,
    pub is_array: bool,
    pub omit_empty: bool,
}

impl FieldDescriptor {
    pub fn new(
        source_name: impl Into<String>,
        serialized_name: Option<String>,
        raw_type: impl Into<String>,
        go_type: GoType,
    ) -> Self {
        let source_name = source_name.into();
        Self {
            serialized_name: serialized_name.unwrap_or_else(|| source_name.clone()),
            source_name,
            raw_type: raw_type.into(),
            qualified_source_type: go_type.qualified_source_type(),
            is_optional: go_type.is_pointer(),
            is_array: go_type.is_sequence(),
            omit_empty: false,
            resolved_type: None,
            go_type,
        }
    }

    /// Rendered TypeScript type, if the field resolved
    pub fn ts_type(&self) -> Option<String> {
        self.resolved_type.as_ref().map(ToString::to_string)
    }
}

/// One emitted struct-shaped type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Unique within the registry
    pub name: String,
    /// `<import path>.<TypeName>`
    pub qualified_name: String,
    /// Go package name that declared the type
    pub package: String,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn field(&self, source_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.source_name == source_name)
    }
}

/// Where a header value comes from when the client call is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderSource {
    Input,
    LocalStorage,
    SessionStorage,
}

impl HeaderSource {
    pub fn from_directive(source: &str) -> Option<Self> {
        match source {
            "input" => Some(HeaderSource::Input),
            "localStorage" => Some(HeaderSource::LocalStorage),
            "sessionStorage" => Some(HeaderSource::SessionStorage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderSource::Input => "input",
            HeaderSource::LocalStorage => "localStorage",
            HeaderSource::SessionStorage => "sessionStorage",
        }
    }

    pub fn is_storage(&self) -> bool {
        !matches!(self, HeaderSource::Input)
    }
}

impl fmt::Display for HeaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDescriptor {
    pub header_key: String,
    pub safe_name: String,
    pub source: HeaderSource,
    pub storage_key: String,
}

/// One annotated API operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerDescriptor {
    pub name: String,
    pub method: String,
    pub path: String,
    pub url_params: Vec<String>,
    pub input_type: String,
    pub output_type: String,
    pub headers: Vec<HeaderDescriptor>,
    pub file_path: String,
    pub line_number: usize,
}

impl HandlerDescriptor {
    /// Headers the caller has to pass explicitly
    pub fn input_headers(&self) -> impl Iterator<Item = &HeaderDescriptor> {
        self.headers
            .iter()
            .filter(|h| h.source == HeaderSource::Input)
    }
}

/// A field-scoped problem recorded during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub type_name: String,
    pub field: String,
    pub error: ResolveError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.type_name, self.field, self.error)
    }
}

/// Everything the renderer needs for one configured package
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOutput {
    pub package: String,
    pub import_path: String,
    pub module: String,
    pub used_types: Vec<TypeDescriptor>,
    pub handlers: Vec<HandlerDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PackageOutput {
    pub fn used_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.used_types.iter().find(|t| t.name == name)
    }

    pub fn handler(&self, name: &str) -> Option<&HandlerDescriptor> {
        self.handlers.iter().find(|h| h.name == name)
    }
}

/// Capitalize the first character, leaving the rest untouched
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
