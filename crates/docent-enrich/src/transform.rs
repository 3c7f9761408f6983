//! Safe response transforms
//!
//! Operators can configure a dot-notation path (e.g. `data.items` or
//! `response.results[0]`) to extract the useful part of an external API
//! response. Paths are parsed with a strict grammar (no expression
//! evaluation) and depth is bounded to keep hostile configurations from
//! walking arbitrarily deep structures.

use serde_json::Value;
use tracing::warn;

/// Maximum number of path segments a transform may navigate
pub const MAX_TRANSFORM_DEPTH: usize = 10;

/// One step of a transform path
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPart {
    Key(String),
    Index(usize),
}

/// Apply a dot-notation transform to a value.
///
/// Returns the extracted value, or the original when the transform is
/// empty, unsafe, too deep, or does not resolve. Accepts the lenient
/// forms `return data.path` and a trailing semicolon.
pub fn apply_transform(data: Value, transform: &str) -> Value {
    let mut path = transform.trim();
    if let Some(stripped) = path.strip_prefix("return ") {
        path = stripped.trim();
    }
    if let Some(stripped) = path.strip_suffix(';') {
        path = stripped.trim();
    }

    if path.is_empty() {
        return data;
    }

    let parts = match parse_path(path) {
        Some(parts) => parts,
        None => {
            warn!(transform, "transform path contains unsafe characters, returning original data");
            return data;
        }
    };

    if parts.len() > MAX_TRANSFORM_DEPTH {
        warn!(
            transform,
            max = MAX_TRANSFORM_DEPTH,
            "transform path exceeds maximum depth, returning original data"
        );
        return data;
    }

    let mut current = &data;
    for part in &parts {
        let next = match part {
            PathPart::Key(key) => current.get(key.as_str()),
            PathPart::Index(index) => current.get(index),
        };
        match next {
            Some(value) => current = value,
            None => return data,
        }
    }

    current.clone()
}

/// Parse `ident(.ident | [digits])*`, rejecting anything else
fn parse_path(path: &str) -> Option<Vec<PathPart>> {
    let mut parts = Vec::new();
    let mut chars = path.chars().peekable();

    parts.push(PathPart::Key(parse_identifier(&mut chars)?));

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                parts.push(PathPart::Key(parse_identifier(&mut chars)?));
            }
            '[' => {
                chars.next();
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if digits.is_empty() || chars.next() != Some(']') {
                    return None;
                }
                parts.push(PathPart::Index(digits.parse().ok()?));
            }
            _ => return None,
        }
    }

    Some(parts)
}

fn parse_identifier(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<String> {
    let mut ident = String::new();

    match chars.peek() {
        Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
            ident.push(c);
            chars.next();
        }
        _ => return None,
    }

    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }

    Some(ident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_property_access() {
        let data = json!({"data": {"items": [1, 2, 3]}});
        assert_eq!(apply_transform(data, "data.items"), json!([1, 2, 3]));
    }

    #[test]
    fn test_index_access() {
        let data = json!({"response": {"results": ["first", "second"]}});
        assert_eq!(
            apply_transform(data, "response.results[0]"),
            json!("first")
        );
    }

    #[test]
    fn test_return_prefix_and_semicolon() {
        let data = json!({"data": {"value": 42}});
        assert_eq!(apply_transform(data, "return data.value;"), json!(42));
    }

    #[test]
    fn test_empty_transform_returns_original() {
        let data = json!({"a": 1});
        assert_eq!(apply_transform(data.clone(), ""), data);
        assert_eq!(apply_transform(data.clone(), "   "), data);
    }

    #[test]
    fn test_unsafe_path_returns_original() {
        let data = json!({"a": 1});
        assert_eq!(
            apply_transform(data.clone(), "constructor.constructor('x')"),
            data
        );
        // Anything outside the grammar falls back to the original
        assert_eq!(apply_transform(data.clone(), "a; drop()"), data);
        assert_eq!(apply_transform(data.clone(), "a[b]"), data);
        assert_eq!(apply_transform(data.clone(), "1abc"), data);
    }

    #[test]
    fn test_unresolved_path_returns_original() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(apply_transform(data.clone(), "a.missing"), data);
        assert_eq!(apply_transform(data.clone(), "a.b.c"), data);
    }

    #[test]
    fn test_depth_limit() {
        let transform = "a.b.c.d.e.f.g.h.i.j.k"; // 11 parts
        let data = json!({"a": 1});
        assert_eq!(apply_transform(data.clone(), transform), data);

        // Exactly at the limit is fine
        let mut nested = json!(99);
        for key in ["j", "i", "h", "g", "f", "e", "d", "c", "b", "a"] {
            nested = json!({ key: nested });
        }
        assert_eq!(apply_transform(nested, "a.b.c.d.e.f.g.h.i.j"), json!(99));
    }
}
