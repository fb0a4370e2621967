//! Identifier scanning and variable substitution over formula text.
//!
//! A "word" is a maximal run of `[A-Za-z0-9_]`; it is an identifier when it
//! starts with a letter or `_`. Numeric literals such as `2e3` start with a
//! digit and are therefore never identifiers.

use std::collections::HashMap;

/// Check whether `name` is a valid bare identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split text into words and the separators between them.
fn split_words(text: &str) -> Vec<(&str, bool)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_word = false;

    for (i, c) in text.char_indices() {
        let word = is_word_char(c);
        if i > start && word != in_word {
            parts.push((&text[start..i], in_word));
            start = i;
        }
        in_word = word;
    }
    if start < text.len() {
        parts.push((&text[start..], in_word));
    }

    parts
}

/// Identifiers referenced by `formula`, in order of first appearance.
pub fn extract_identifiers(formula: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (part, is_word) in split_words(formula) {
        if is_word && is_identifier(part) && !found.iter().any(|f| f == part) {
            found.push(part.to_string());
        }
    }
    found
}

/// Replace every whole-word occurrence of a variable name with its value.
///
/// Matching is per whole identifier token, so the longest name always wins
/// and a short name (`L`) never matches inside a longer one (`Lv`). Values
/// are written in parentheses.
pub fn substitute_variables(formula: &str, variables: &HashMap<String, f64>) -> String {
    let mut out = String::with_capacity(formula.len() + 8);
    for (part, is_word) in split_words(formula) {
        let replacement = if is_word && is_identifier(part) {
            variables.get(part).copied()
        } else {
            None
        };

        match replacement {
            Some(value) => {
                out.push('(');
                out.push_str(&value.to_string());
                out.push(')');
            }
            None => out.push_str(part),
        }
    }
    out
}
