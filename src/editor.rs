use crate::directive::DocumentKind;
use crate::i18n::I18n;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// What the localization workflow needs from the editing host.
pub trait EditorHost {
    fn selected_text(&self) -> String;
    fn language_id(&self) -> String;
    /// Replace the current selection in one edit; the selection then covers the new text.
    fn replace_selection(&mut self, text: &str);
    /// Persist the document, returning whether it was saved.
    fn save(&mut self) -> bool;
}

/// A document on disk with a byte-range selection.
pub struct FileDocument {
    path: PathBuf,
    text: String,
    language_id: String,
    selection: Range<usize>,
}

impl FileDocument {
    pub fn open(path: &Path, language_id: Option<String>, i18n: &I18n) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| i18n.t_format("error_open_document", &[&path.display().to_string()]))?;
        let language_id = language_id.unwrap_or_else(|| DocumentKind::language_id_for(path));
        Ok(Self {
            path: path.to_path_buf(),
            text,
            language_id,
            selection: 0..0,
        })
    }

    /// Select `LINE:COL-LINE:COL`, 1-based, columns in characters, end exclusive.
    pub fn select_range(&mut self, spec: &str, i18n: &I18n) -> Result<()> {
        let invalid = || anyhow!(i18n.t_format("error_invalid_range", &[spec]));
        let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
        let start = parse_position(start).ok_or_else(invalid)?;
        let end = parse_position(end).ok_or_else(invalid)?;

        let out_of_bounds = || anyhow!(i18n.t_format("error_range_out_of_bounds", &[spec]));
        let start = offset_of(&self.text, start).ok_or_else(out_of_bounds)?;
        let end = offset_of(&self.text, end).ok_or_else(out_of_bounds)?;
        if end < start {
            return Err(invalid());
        }
        self.selection = start..end;
        Ok(())
    }

    /// Select the first occurrence of `needle`.
    pub fn select_text(&mut self, needle: &str, i18n: &I18n) -> Result<()> {
        let start = self
            .text
            .find(needle)
            .ok_or_else(|| anyhow!(i18n.t_format("error_text_not_found", &[needle])))?;
        self.selection = start..start + needle.len();
        Ok(())
    }
}

impl EditorHost for FileDocument {
    fn selected_text(&self) -> String {
        self.text[self.selection.clone()].to_string()
    }

    fn language_id(&self) -> String {
        self.language_id.clone()
    }

    fn replace_selection(&mut self, text: &str) {
        self.text.replace_range(self.selection.clone(), text);
        self.selection = self.selection.start..self.selection.start + text.len();
    }

    fn save(&mut self) -> bool {
        match fs::write(&self.path, &self.text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "document save failed");
                false
            }
        }
    }
}

fn parse_position(spec: &str) -> Option<(usize, usize)> {
    let (line, col) = spec.trim().split_once(':')?;
    let line: usize = line.parse().ok()?;
    let col: usize = col.parse().ok()?;
    if line == 0 || col == 0 {
        return None;
    }
    Some((line, col))
}

/// Byte offset of a 1-based line/character position; the column may point one
/// past the last character of the line.
fn offset_of(text: &str, (line, col): (usize, usize)) -> Option<usize> {
    let mut line_start = 0;
    for (index, raw_line) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return column_offset(raw_line, col).map(|o| line_start + o);
        }
        line_start += raw_line.len();
    }
    // a trailing newline leaves one more, empty, line
    let line_count = text.split_inclusive('\n').count();
    if (line == line_count + 1 && (text.is_empty() || text.ends_with('\n'))) && col == 1 {
        return Some(text.len());
    }
    None
}

fn column_offset(raw_line: &str, col: usize) -> Option<usize> {
    let content = raw_line.strip_suffix('\n').unwrap_or(raw_line);
    let content = content.strip_suffix('\r').unwrap_or(content);
    if col == content.chars().count() + 1 {
        return Some(content.len());
    }
    content.char_indices().nth(col - 1).map(|(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn document(text: &str, name: &str) -> Result<(TempDir, FileDocument)> {
        let dir = TempDir::new()?;
        let path = dir.path().join(name);
        fs::write(&path, text)?;
        let doc = FileDocument::open(&path, None, &I18n::new("en"))?;
        Ok((dir, doc))
    }

    #[test]
    fn test_select_range_single_line() -> Result<()> {
        let (_dir, mut doc) = document("<h1>Hello World</h1>\n", "home.blade.php")?;
        doc.select_range("1:5-1:16", &I18n::new("en"))?;
        assert_eq!(doc.selected_text(), "Hello World");
        assert_eq!(doc.language_id(), "blade");
        Ok(())
    }

    #[test]
    fn test_select_range_counts_characters() -> Result<()> {
        let (_dir, mut doc) = document("a\nمرحبا بك\n", "page.php")?;
        doc.select_range("2:1-2:6", &I18n::new("en"))?;
        assert_eq!(doc.selected_text(), "مرحبا");
        doc.select_range("2:7-2:9", &I18n::new("en"))?;
        assert_eq!(doc.selected_text(), "بك");
        Ok(())
    }

    #[test]
    fn test_select_range_across_lines() -> Result<()> {
        let (_dir, mut doc) = document("one\ntwo\nthree", "page.php")?;
        doc.select_range("1:2-3:3", &I18n::new("en"))?;
        assert_eq!(doc.selected_text(), "ne\ntwo\nth");
        Ok(())
    }

    #[test]
    fn test_invalid_ranges() -> Result<()> {
        let i18n = I18n::new("en");
        let (_dir, mut doc) = document("short\n", "page.php")?;
        assert!(doc.select_range("1:1", &i18n).is_err());
        assert!(doc.select_range("0:1-1:2", &i18n).is_err());
        assert!(doc.select_range("1:3-1:2", &i18n).is_err());
        let err = doc.select_range("1:1-4:1", &i18n).unwrap_err();
        assert!(err.to_string().contains("outside the document"));
        Ok(())
    }

    #[test]
    fn test_replace_and_save() -> Result<()> {
        let (dir, mut doc) = document("echo 'Hello World';\n", "page.php")?;
        let i18n = I18n::new("en");
        doc.select_text("'Hello World'", &i18n)?;
        doc.replace_selection("__('messages.hello_world')");
        assert_eq!(doc.selected_text(), "__('messages.hello_world')");
        assert!(doc.save());
        assert_eq!(
            fs::read_to_string(dir.path().join("page.php"))?,
            "echo __('messages.hello_world');\n"
        );
        Ok(())
    }

    #[test]
    fn test_select_missing_text() -> Result<()> {
        let (_dir, mut doc) = document("nothing here", "page.php")?;
        assert!(doc.select_text("absent", &I18n::new("en")).is_err());
        Ok(())
    }
}
