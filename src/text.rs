use regex::Regex;
use std::sync::OnceLock;

fn quote_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"`]"#).expect("valid quote pattern"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Strip single, double and back-tick quotes.
///
/// Nothing is escaped: the result is dropped straight between single quotes
/// in a resource entry, so quotes must not survive here.
pub fn clean_text(text: &str) -> String {
    quote_chars().replace_all(text, "").into_owned()
}

/// Collapse every whitespace run into a single `_` and lower-case the rest.
pub fn to_snake_case(text: &str) -> String {
    whitespace_runs().replace_all(text, "_").to_lowercase()
}

/// Key suggested for a selection, shown pre-filled in the key prompt.
pub fn suggest_key(selected: &str) -> String {
    to_snake_case(&clean_text(selected))
}
