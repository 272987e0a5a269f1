use crate::config::ResourceConfig;
use crate::directive::{format_directive, DocumentKind};
use crate::editor::EditorHost;
use crate::i18n::I18n;
use crate::prompt::{InputRequest, Prompter};
use crate::resource::{prepare_resource_path, resolve_resource_path, ResourceFile};
use crate::text::{clean_text, suggest_key};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything collected from the user for one extraction.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub selected_text: String,
    pub key: String,
    pub value: String,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRole {
    Original,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceReport {
    pub role: ResourceRole,
    pub path: PathBuf,
    pub status: EntryStatus,
    #[serde(skip)]
    pub before: String,
    #[serde(skip)]
    pub after: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizeReport {
    pub key: String,
    pub namespace: String,
    pub directive: String,
    pub resources: Vec<ResourceReport>,
    /// `None` on a dry run, where the document is left alone.
    pub document_saved: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    NoSelection,
    Cancelled,
    Localized(LocalizeReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A transient, user-visible message produced while localizing.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Localization {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub notices: Vec<Notice>,
}

enum Collected {
    Request(TranslationRequest),
    Stopped(Outcome),
}

/// Runs one extraction: prompts, both resource files, then the document edit.
///
/// One invocation at a time is assumed; nothing guards the resource files
/// against a concurrent run.
pub struct Localizer<'a> {
    config: &'a ResourceConfig,
    workspace: &'a Path,
    i18n: &'a I18n,
    dry_run: bool,
    notices: Vec<Notice>,
}

impl<'a> Localizer<'a> {
    pub fn new(config: &'a ResourceConfig, workspace: &'a Path, i18n: &'a I18n) -> Self {
        Self {
            config,
            workspace,
            i18n,
            dry_run: false,
            notices: Vec::new(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run<E, P>(mut self, editor: &mut E, prompter: &mut P) -> Result<Localization>
    where
        E: EditorHost,
        P: Prompter,
    {
        let outcome = match self.collect(editor, prompter)? {
            Collected::Request(request) => Outcome::Localized(self.apply(&request, editor)?),
            Collected::Stopped(outcome) => outcome,
        };
        Ok(Localization {
            outcome,
            notices: self.notices,
        })
    }

    /// Gather selection, key and value. A stop ends the run with nothing touched.
    fn collect<E, P>(&mut self, editor: &E, prompter: &mut P) -> Result<Collected>
    where
        E: EditorHost,
        P: Prompter,
    {
        let selected_text = editor.selected_text();
        if selected_text.is_empty() {
            self.notify(NoticeLevel::Info, self.i18n.t("no_text_selected"));
            return Ok(Collected::Stopped(Outcome::NoSelection));
        }

        let key = match prompter.ask(&InputRequest::key(suggest_key(&selected_text)), self.i18n)? {
            Some(key) => key,
            None => {
                self.notify(NoticeLevel::Info, self.i18n.t("cancelled"));
                return Ok(Collected::Stopped(Outcome::Cancelled));
            }
        };
        let value = match prompter.ask(&InputRequest::value(), self.i18n)? {
            Some(value) if !value.is_empty() => value,
            // prompters are not required to validate their answers
            Some(_) => {
                self.notify(NoticeLevel::Info, self.i18n.t("translation_not_given"));
                return Ok(Collected::Stopped(Outcome::Cancelled));
            }
            None => {
                self.notify(NoticeLevel::Info, self.i18n.t("cancelled"));
                return Ok(Collected::Stopped(Outcome::Cancelled));
            }
        };

        Ok(Collected::Request(TranslationRequest {
            selected_text,
            key,
            value,
            kind: DocumentKind::from_language_id(&editor.language_id()),
        }))
    }

    fn apply<E: EditorHost>(&mut self, request: &TranslationRequest, editor: &mut E) -> Result<LocalizeReport> {
        let i18n = self.i18n;
        let dry_run = self.dry_run;
        self.apply_with_loader(request, editor, |path| {
            if dry_run && !path.exists() {
                Ok(ResourceFile::from_content(path, String::new()))
            } else {
                ResourceFile::load(path, i18n)
            }
        })
    }

    /// `loader` reads each resource right before its entry is written.
    fn apply_with_loader<E, F>(
        &mut self,
        request: &TranslationRequest,
        editor: &mut E,
        mut loader: F,
    ) -> Result<LocalizeReport>
    where
        E: EditorHost,
        F: FnMut(&Path) -> Result<ResourceFile>,
    {
        let target_path = self.resource_path(&self.config.target_path)?;
        let original_path = self.resource_path(&self.config.original_path)?;

        let original = self.add_translation(
            ResourceRole::Original,
            loader(&original_path)?,
            &request.key,
            &clean_text(&request.selected_text),
        )?;
        let target = self.add_translation(
            ResourceRole::Target,
            loader(&target_path)?,
            &request.key,
            &request.value,
        )?;

        if original.status == EntryStatus::Added || target.status == EntryStatus::Added {
            self.notify(NoticeLevel::Info, self.i18n.t("translation_added"));
        }

        let namespace = self.config.namespace();
        let directive = format_directive(&request.key, &request.kind, &namespace);

        let document_saved = if self.dry_run {
            self.notify(NoticeLevel::Info, self.i18n.t("dry_run_notice"));
            None
        } else {
            editor.replace_selection(&directive);
            self.notify(
                NoticeLevel::Info,
                self.i18n.t_format("directive_inserted", &[&directive]),
            );
            let saved = editor.save();
            if !saved {
                self.notify(NoticeLevel::Warning, self.i18n.t("document_not_saved"));
            }
            Some(saved)
        };

        info!(key = %request.key, directive = %directive, "localized selection");
        Ok(LocalizeReport {
            key: request.key.clone(),
            namespace,
            directive,
            resources: vec![original, target],
            document_saved,
        })
    }

    fn resource_path(&self, subfolder: &str) -> Result<PathBuf> {
        if self.dry_run {
            return Ok(resolve_resource_path(
                self.workspace,
                subfolder,
                &self.config.target_file_name,
            ));
        }
        prepare_resource_path(
            self.workspace,
            subfolder,
            &self.config.target_file_name,
            self.i18n,
        )
    }

    fn add_translation(
        &mut self,
        role: ResourceRole,
        mut resource: ResourceFile,
        key: &str,
        value: &str,
    ) -> Result<ResourceReport> {
        let path = resource.path.clone();
        if resource.contains_key(key) {
            self.notify(NoticeLevel::Info, self.i18n.t_format("key_exists", &[key]));
            let exists = match role {
                ResourceRole::Original => "exists_on_original",
                ResourceRole::Target => "exists_on_target",
            };
            self.notify(NoticeLevel::Info, self.i18n.t(exists));
            info!(path = %path.display(), key, "key already present, skipping");
            return Ok(ResourceReport {
                role,
                path,
                status: EntryStatus::AlreadyExists,
                after: resource.source.clone(),
                before: resource.source,
            });
        }

        resource.append_entry(key, value);
        if !self.dry_run {
            resource.save(self.i18n)?;
        }
        let shown = pathdiff::diff_paths(&path, self.workspace).unwrap_or_else(|| path.clone());
        self.notify(
            NoticeLevel::Info,
            self.i18n.t_format("entry_added", &[key, &shown.display().to_string()]),
        );

        Ok(ResourceReport {
            role,
            path,
            status: EntryStatus::Added,
            after: resource.render(),
            before: resource.source,
        })
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        info!(?level, %message, "notice");
        self.notices.push(Notice { level, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct FakeEditor {
        text: String,
        language_id: String,
        replaced: Option<String>,
        save_ok: bool,
        saves: usize,
    }

    impl FakeEditor {
        fn new(text: &str, language_id: &str) -> Self {
            Self {
                text: text.to_string(),
                language_id: language_id.to_string(),
                replaced: None,
                save_ok: true,
                saves: 0,
            }
        }
    }

    impl EditorHost for FakeEditor {
        fn selected_text(&self) -> String {
            self.text.clone()
        }

        fn language_id(&self) -> String {
            self.language_id.clone()
        }

        fn replace_selection(&mut self, text: &str) {
            self.replaced = Some(text.to_string());
        }

        fn save(&mut self) -> bool {
            self.saves += 1;
            self.save_ok
        }
    }

    /// Replies in order; records the initial value offered for each prompt.
    struct Scripted {
        answers: Vec<Option<String>>,
        offered: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
                offered: Vec::new(),
            }
        }
    }

    impl Prompter for Scripted {
        fn ask(&mut self, request: &InputRequest, _i18n: &I18n) -> Result<Option<String>> {
            self.offered.push(request.initial.clone());
            Ok(self.answers.remove(0))
        }
    }

    fn messages(localization: &Localization) -> Vec<String> {
        localization.notices.iter().map(|n| n.message.clone()).collect()
    }

    #[test]
    fn test_hello_world_scenario() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("\"Hello World\"", "php");
        let mut prompter = Scripted::new(&[Some("hello_world"), Some("مرحبا")]);

        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;

        assert_eq!(prompter.offered[0], "hello_world");
        let original = fs::read_to_string(dir.path().join("lang/en/messages.php"))?;
        let target = fs::read_to_string(dir.path().join("lang/ar/messages.php"))?;
        assert_eq!(original, "<?php\n\n return [ \n\t'hello_world' => 'Hello World',\n];");
        assert_eq!(target, "<?php\n\n return [ \n\t'hello_world' => 'مرحبا',\n];");
        assert_eq!(editor.replaced.as_deref(), Some("__('messages.hello_world')"));
        assert_eq!(editor.saves, 1);

        match &result.outcome {
            Outcome::Localized(report) => {
                assert_eq!(report.document_saved, Some(true));
                assert!(report.resources.iter().all(|r| r.status == EntryStatus::Added));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(messages(&result).contains(&"Translation Added!".to_string()));
        Ok(())
    }

    #[test]
    fn test_blade_document_gets_echo_directive() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello World", "blade");
        let mut prompter = Scripted::new(&[Some("hello_world"), Some("مرحبا")]);

        Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
        assert_eq!(editor.replaced.as_deref(), Some("{{ __('messages.hello_world') }}"));
        Ok(())
    }

    #[test]
    fn test_existing_key_is_skipped_per_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let original_path = dir.path().join("lang/en/messages.php");
        fs::create_dir_all(original_path.parent().unwrap())?;
        let existing = "<?php\n\n return [\n\t'greeting' => 'Hi',\n];";
        fs::write(&original_path, existing)?;

        let mut editor = FakeEditor::new("Hello", "php");
        let mut prompter = Scripted::new(&[Some("greeting"), Some("أهلا")]);
        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;

        assert_eq!(fs::read_to_string(&original_path)?, existing);
        let target = fs::read_to_string(dir.path().join("lang/ar/messages.php"))?;
        assert!(target.contains("\t'greeting' => 'أهلا',"));

        let notices = messages(&result);
        assert!(notices.contains(&"'greeting' already exists !".to_string()));
        assert!(notices.contains(&"Translation already exist on original!".to_string()));
        assert!(notices.contains(&"Translation Added!".to_string()));
        assert_eq!(editor.replaced.as_deref(), Some("__('messages.greeting')"));
        Ok(())
    }

    #[test]
    fn test_existing_everywhere_still_replaces_selection() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        for folder in ["lang/en", "lang/ar"] {
            fs::create_dir_all(dir.path().join(folder))?;
            fs::write(
                dir.path().join(folder).join("messages.php"),
                "<?php\n\n return [\n\t'bye' => 'x',\n];",
            )?;
        }

        let mut editor = FakeEditor::new("Bye", "php");
        let mut prompter = Scripted::new(&[Some("bye"), Some("مع السلامة")]);
        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;

        assert!(!messages(&result).contains(&"Translation Added!".to_string()));
        assert_eq!(editor.replaced.as_deref(), Some("__('messages.bye')"));
        Ok(())
    }

    #[test]
    fn test_cancel_touches_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");

        for answers in [vec![None], vec![Some("key"), None]] {
            let mut editor = FakeEditor::new("Hello", "php");
            let mut prompter = Scripted::new(&answers);
            let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
            assert!(matches!(result.outcome, Outcome::Cancelled));
            assert!(editor.replaced.is_none());
            assert_eq!(editor.saves, 0);
        }
        assert!(!dir.path().join("lang").exists());
        Ok(())
    }

    #[test]
    fn test_no_selection() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("", "php");
        let mut prompter = Scripted::new(&[]);

        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
        assert!(matches!(result.outcome, Outcome::NoSelection));
        assert_eq!(messages(&result), vec!["No Text Selected!".to_string()]);
        assert!(prompter.offered.is_empty());
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello World", "php");
        let mut prompter = Scripted::new(&[Some("hello_world"), Some("مرحبا")]);

        let result = Localizer::new(&config, dir.path(), &i18n)
            .with_dry_run(true)
            .run(&mut editor, &mut prompter)?;

        assert!(!dir.path().join("lang").exists());
        assert!(editor.replaced.is_none());
        let Outcome::Localized(report) = result.outcome else {
            panic!("expected a localized outcome");
        };
        assert_eq!(report.document_saved, None);
        assert_eq!(report.resources[1].before, "");
        assert!(report.resources[1].after.contains("'hello_world' => 'مرحبا',"));
        Ok(())
    }

    #[test]
    fn test_failed_document_save_is_reported() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello", "php");
        editor.save_ok = false;
        let mut prompter = Scripted::new(&[Some("hello"), Some("مرحبا")]);

        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
        assert!(result
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message == "couldn't save the document."));
        Ok(())
    }

    #[test]
    fn test_resource_failure_aborts_before_editing() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        // a directory where the original resource file should be
        fs::create_dir_all(dir.path().join("lang/en/messages.php"))?;

        let mut editor = FakeEditor::new("Hello", "php");
        let mut prompter = Scripted::new(&[Some("hello"), Some("مرحبا")]);
        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter);

        assert!(result.is_err());
        assert!(editor.replaced.is_none());
        Ok(())
    }

    #[test]
    fn test_write_failure_leaves_document_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello", "php");
        let request = TranslationRequest {
            selected_text: "Hello".to_string(),
            key: "hello".to_string(),
            value: "مرحبا".to_string(),
            kind: DocumentKind::from_language_id("php"),
        };

        let mut localizer = Localizer::new(&config, dir.path(), &i18n);
        let result = localizer.apply_with_loader(&request, &mut editor, |path| {
            let resource = ResourceFile::load(path, &i18n)?;
            // the target folder goes away between reading and writing
            if let Some(folder) = path.parent().filter(|p| p.ends_with("lang/ar")) {
                fs::remove_dir_all(folder)?;
            }
            Ok(resource)
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("couldn't write file content"));
        assert!(editor.replaced.is_none());
        assert_eq!(editor.saves, 0);
        assert!(localizer.notices.iter().all(|n| n.message != "Translation Added!"));
        let original = fs::read_to_string(dir.path().join("lang/en/messages.php"))?;
        assert!(original.contains("'hello' => 'Hello'"));
        Ok(())
    }

    #[test]
    fn test_empty_translation_from_prompter_stops() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello", "php");
        let mut prompter = Scripted::new(&[Some("hello"), Some("")]);

        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;

        assert!(matches!(result.outcome, Outcome::Cancelled));
        assert_eq!(messages(&result), vec!["Translation not given!".to_string()]);
        assert!(!dir.path().join("lang").exists());
        assert!(editor.replaced.is_none());
        Ok(())
    }

    #[test]
    fn test_quotes_in_translation_are_not_escaped() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("It's here", "php");
        let mut prompter = Scripted::new(&[Some("its_here"), Some("l'ici")]);

        Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
        let original = fs::read_to_string(dir.path().join("lang/en/messages.php"))?;
        let target = fs::read_to_string(dir.path().join("lang/ar/messages.php"))?;
        assert!(original.contains("'its_here' => 'Its here',"));
        assert!(target.contains("'its_here' => 'l'ici',"));
        Ok(())
    }

    #[test]
    fn test_report_serializes_for_editors() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ResourceConfig::default();
        let i18n = I18n::new("en");
        let mut editor = FakeEditor::new("Hello", "php");
        let mut prompter = Scripted::new(&[Some("hello"), Some("مرحبا")]);

        let result = Localizer::new(&config, dir.path(), &i18n).run(&mut editor, &mut prompter)?;
        let json = serde_json::to_value(&result)?;
        assert_eq!(json["outcome"], "localized");
        assert_eq!(json["directive"], "__('messages.hello')");
        assert_eq!(json["resources"][0]["role"], "original");
        assert_eq!(json["resources"][0]["status"], "added");
        assert!(json["resources"][0].get("before").is_none());
        Ok(())
    }
}
