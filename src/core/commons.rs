// src/core/commons.rs

/// Wraps a value in double quotes, escaping the quotes it already contains.
pub fn wrap_value(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Formats a list of names as indented `  - name` lines.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
