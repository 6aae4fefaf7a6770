//! Identifier derivation.
use crate::schema::SchemaNode;

/// Turns schema names into identifiers. Must be deterministic for equal
/// inputs within one run.
pub trait Namer: Send + Sync {
    /// Member-style name (`snake_case`).
    fn field_name(&self, base: &str, node: &SchemaNode<'_>) -> String;
    /// Type-style name (`PascalCase`).
    fn type_name(&self, base: &str, node: &SchemaNode<'_>) -> String;
    fn getter_name(&self, field: &str) -> String {
        field.to_string()
    }
    fn setter_name(&self, field: &str) -> String {
        format!("set_{field}")
    }
}

/// Vendor keyword that pins a member name.
pub const NAME_OVERRIDE_KEYWORD: &str = "x-rust-name";

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "try", "type", "unsafe", "use", "where", "while", "yield",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn field_name(&self, base: &str, node: &SchemaNode<'_>) -> String {
        if let Some(pinned) = node.str_keyword(NAME_OVERRIDE_KEYWORD) {
            return pinned.to_string();
        }
        let mut name = words(base).join("_");
        if name.is_empty() {
            name.push_str("field");
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        if RUST_KEYWORDS.contains(&name.as_str()) {
            name.push('_');
        }
        name
    }

    fn type_name(&self, base: &str, node: &SchemaNode<'_>) -> String {
        let source = node.str_keyword("title").unwrap_or(base);
        let mut name: String = words(source).iter().map(|w| capitalize(w)).collect();
        if name.is_empty() {
            name.push_str("Unnamed");
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, 'T');
        }
        name
    }
}

/// Strip one trailing `suffix` (the plural marker) if present.
pub fn singular<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() && !stem.is_empty() => stem,
        _ => name,
    }
}

/// Lower-cased words, split on separators and camelCase humps.
fn words(src: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in src.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
