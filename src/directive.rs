use std::path::Path;

/// Language id editors use for Blade templates.
pub const BLADE_LANGUAGE_ID: &str = "blade";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Blade,
    Other(String),
}

impl DocumentKind {
    pub fn from_language_id(language_id: &str) -> Self {
        if language_id.eq_ignore_ascii_case(BLADE_LANGUAGE_ID) {
            DocumentKind::Blade
        } else {
            DocumentKind::Other(language_id.to_string())
        }
    }

    /// Guess a language id from the file name the way editors do for Laravel
    /// projects: `*.blade.php` is blade, everything else goes by extension.
    pub fn language_id_for(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".blade.php") {
            return BLADE_LANGUAGE_ID.to_string();
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "plaintext".to_string())
    }
}

/// Lookup expression that replaces the extracted text.
pub fn format_directive(key: &str, kind: &DocumentKind, namespace: &str) -> String {
    let namespace = namespace.to_lowercase();
    match kind {
        DocumentKind::Blade => format!("{{{{ __('{}.{}') }}}}", namespace, key),
        DocumentKind::Other(_) => format!("__('{}.{}')", namespace, key),
    }
}
