//! File-name and anchor generation, plus cross-reference shortening.

use regex::Regex;
use std::sync::LazyLock;

// Generic arity marker in a cref, e.g. the "`1" in "T:List`1".
static RE_ARITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`\d+").unwrap());

/// Split an identifier into words.
///
/// Boundaries: lower→upper (`getUser`), the end of an acronym (`HTTPServer`
/// → `HTTP`, `Server`), letter↔digit (`Vector3`), and any character that is
/// not alphanumeric, which is dropped.
pub fn tokenize(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(s) = start.take() {
                tokens.push(&name[s..pos]);
            }
            continue;
        }
        let Some(s) = start else {
            start = Some(pos);
            continue;
        };
        let prev = chars[i - 1].1;
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let boundary = (prev.is_lowercase() && c.is_uppercase())
            || (prev.is_alphabetic() && c.is_ascii_digit())
            || (prev.is_ascii_digit() && c.is_alphabetic())
            || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase));
        if boundary {
            tokens.push(&name[s..pos]);
            start = Some(pos);
        }
    }
    if let Some(s) = start {
        tokens.push(&name[s..]);
    }
    tokens
}

/// Hyphen-joined words, case preserved: `GetUserById` → `Get-User-By-Id`.
pub fn file_name(name: &str) -> String {
    let tokens = tokenize(name);
    if tokens.is_empty() {
        return name.to_string();
    }
    tokens.join("-")
}

/// Lower-case link target: `GetUserById` → `get-user-by-id`.
pub fn anchor(name: &str) -> String {
    file_name(name).to_lowercase()
}

/// Shorten a cross-reference for display: `T:System.Collections.Generic.List`1{T}`
/// becomes `System.Collections.Generic.List<T>`.
pub fn format_cref(cref: &str) -> String {
    let name = match cref.split_once(':') {
        Some((_, rest)) => rest,
        None => cref,
    };
    RE_ARITY
        .replace_all(name, "")
        .replace('{', "<")
        .replace('}', ">")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_camel_case() {
        assert_eq!(tokenize("GetUserById"), vec!["Get", "User", "By", "Id"]);
        assert_eq!(tokenize("value2"), vec!["value", "2"]);
    }

    #[test]
    fn tokenize_acronyms_and_digits() {
        assert_eq!(tokenize("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(tokenize("Vector3Int"), vec!["Vector", "3", "Int"]);
        assert_eq!(tokenize("IOError"), vec!["IO", "Error"]);
    }

    #[test]
    fn tokenize_separators() {
        assert_eq!(tokenize("_private_field"), vec!["private", "field"]);
        assert_eq!(tokenize("output-field"), vec!["output", "field"]);
    }

    #[test]
    fn file_name_keeps_case() {
        assert_eq!(file_name("MulticlassTest"), "Multiclass-Test");
        assert_eq!(file_name("Item"), "Item");
    }

    #[test]
    fn anchor_lower_case() {
        assert_eq!(anchor("GetUserById"), "get-user-by-id");
        assert_eq!(anchor("output-field"), "output-field");
    }

    #[test]
    fn anchor_idempotent_on_hyphenated_input() {
        for input in ["get-user-by-id", "item-2", "a", "multiclass-test"] {
            assert_eq!(anchor(input), input);
            assert_eq!(anchor(&anchor(input)), anchor(input));
        }
    }

    #[test]
    fn cref_shortening() {
        assert_eq!(format_cref("T:Game.Inventory"), "Game.Inventory");
        assert_eq!(
            format_cref("T:System.Collections.Generic.Dictionary`2{K,V}"),
            "System.Collections.Generic.Dictionary<K,V>"
        );
        assert_eq!(format_cref("ArgumentNullException"), "ArgumentNullException");
        assert_eq!(format_cref(""), "");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("remarks"), "Remarks");
        assert_eq!(capitalize(""), "");
    }
}
