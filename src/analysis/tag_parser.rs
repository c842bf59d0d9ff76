use regex::Regex;
use std::sync::OnceLock;

/// What the `json` key of a struct tag says about a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonTag {
    /// Wire name; `None` when the tag is absent or leaves the name empty
    pub name: Option<String>,
    pub omit_empty: bool,
    /// `json:"-"`, the field is never serialized
    pub skip: bool,
}

fn tag_pair_regex() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_]+):"((?:[^"\\]|\\.)*)""#).expect("tag pair pattern compiles")
    })
}

/// Strip the Go literal delimiters from a tag, handling both raw and interpreted strings
pub fn unquote_tag(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return raw.to_string();
    }
    if let Some(interpreted) = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        return interpreted.replace("\\\"", "\"").replace("\\\\", "\\");
    }
    literal.to_string()
}

/// Value of `key` in a struct tag body such as `json:"id,omitempty" db:"id"`
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    tag_pair_regex()
        .captures_iter(tag)
        .find(|caps| &caps[1] == key)
        .map(|caps| caps[2].to_string())
}

/// Parse the `json` entry of a struct tag. The name is everything before the first comma.
pub fn parse_json_tag(tag: &str) -> JsonTag {
    let Some(value) = lookup_tag(tag, "json") else {
        return JsonTag::default();
    };

    if value == "-" {
        return JsonTag {
            skip: true,
            ..JsonTag::default()
        };
    }

    let mut parts = value.split(',');
    let name = parts.next().unwrap_or_default();
    let omit_empty = parts.any(|opt| opt == "omitempty");

    JsonTag {
        name: (!name.is_empty()).then(|| name.to_string()),
        omit_empty,
        skip: false,
    }
}
