use crate::i18n::I18n;
use anyhow::{anyhow, Context, Result};
use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};
use std::io::{self, BufRead, Write};
use std::sync::Once;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key,
    Value,
}

#[derive(Debug, Clone)]
pub struct InputRequest {
    pub field: Field,
    pub initial: String,
}

impl InputRequest {
    pub fn key(suggestion: String) -> Self {
        Self {
            field: Field::Key,
            initial: suggestion,
        }
    }

    pub fn value() -> Self {
        Self {
            field: Field::Value,
            initial: String::new(),
        }
    }

    pub fn placeholder(&self, i18n: &I18n) -> String {
        match self.field {
            Field::Key => i18n.t("prompt_key"),
            Field::Value => i18n.t("prompt_value"),
        }
    }

    /// Returns the message to show when `text` is not acceptable.
    pub fn validate(&self, text: &str, i18n: &I18n) -> Option<String> {
        match self.field {
            Field::Key if text.trim().is_empty() => Some(i18n.t("key_required")),
            Field::Value if text.is_empty() => Some(i18n.t("value_required")),
            _ => None,
        }
    }
}

/// Free-text input from the user. `Ok(None)` means the prompt was dismissed.
pub trait Prompter {
    fn ask(&mut self, request: &InputRequest, i18n: &I18n) -> Result<Option<String>>;
}

/// Answers taken from command-line flags, falling back to another prompter for
/// anything not given.
pub struct PresetPrompter<P> {
    key: Option<String>,
    value: Option<String>,
    fallback: P,
}

impl<P: Prompter> PresetPrompter<P> {
    pub fn new(key: Option<String>, value: Option<String>, fallback: P) -> Self {
        Self { key, value, fallback }
    }
}

impl<P: Prompter> Prompter for PresetPrompter<P> {
    fn ask(&mut self, request: &InputRequest, i18n: &I18n) -> Result<Option<String>> {
        let preset = match request.field {
            Field::Key => self.key.take(),
            Field::Value => self.value.take(),
        };
        match preset {
            Some(answer) => match request.validate(&answer, i18n) {
                Some(message) => Err(anyhow!(message)),
                None => Ok(Some(answer)),
            },
            None => self.fallback.ask(request, i18n),
        }
    }
}

pub struct TerminalPrompter {
    simple: bool,
}

impl TerminalPrompter {
    pub fn new(simple: bool) -> Self {
        Self { simple }
    }

    fn simple_ask(request: &InputRequest, i18n: &I18n) -> Result<Option<String>> {
        Self::simple_ask_with(&mut io::stdin().lock(), &mut io::stderr(), request, i18n)
    }

    /// Line prompt over any reader/writer pair. Prompts go to stderr so they
    /// never mix with the JSON report on stdout.
    fn simple_ask_with<R: BufRead, W: Write>(
        input: &mut R,
        out: &mut W,
        request: &InputRequest,
        i18n: &I18n,
    ) -> Result<Option<String>> {
        loop {
            if request.initial.is_empty() {
                write!(out, "{}: ", request.placeholder(i18n).cyan())?;
            } else {
                write!(out, "{} [{}]: ", request.placeholder(i18n).cyan(), request.initial)?;
            }
            out.flush().ok();

            let mut line = String::new();
            let read = input.read_line(&mut line).context(i18n.t("error_prompt"))?;
            if read == 0 {
                writeln!(out)?;
                return Ok(None);
            }

            let line = line.trim_end_matches(&['\n', '\r'][..]);
            let answer = if line.is_empty() {
                request.initial.clone()
            } else {
                line.to_string()
            };
            match request.validate(&answer, i18n) {
                Some(message) => writeln!(out, "{}", message.red())?,
                None => return Ok(Some(answer)),
            }
        }
    }

    fn interactive_ask(request: &InputRequest, i18n: &I18n) -> Result<Option<String>> {
        let mut buffer: Vec<char> = request.initial.chars().collect();
        let mut cursor = buffer.len();
        let mut error: Option<String> = None;
        let label = request.placeholder(i18n);
        let mut out = io::stderr();

        let result = loop {
            if let Err(e) = Self::render_line(&mut out, &label, &buffer, cursor, error.as_deref(), i18n) {
                break Err(e);
            }

            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
                Ok(_) => continue,
                Err(e) => break Err(anyhow::Error::new(e).context(i18n.t("error_prompt"))),
            };
            error = None;

            match key.code {
                KeyCode::Esc => break Ok(None),
                KeyCode::Char('c') | KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    break Ok(None)
                }
                KeyCode::Enter => {
                    let answer: String = buffer.iter().collect();
                    match request.validate(&answer, i18n) {
                        Some(message) => error = Some(message),
                        None => break Ok(Some(answer)),
                    }
                }
                KeyCode::Backspace => {
                    if cursor > 0 {
                        cursor -= 1;
                        buffer.remove(cursor);
                    }
                }
                KeyCode::Delete => {
                    if cursor < buffer.len() {
                        buffer.remove(cursor);
                    }
                }
                KeyCode::Left => cursor = cursor.saturating_sub(1),
                KeyCode::Right => cursor = (cursor + 1).min(buffer.len()),
                KeyCode::Home => cursor = 0,
                KeyCode::End => cursor = buffer.len(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    buffer.insert(cursor, c);
                    cursor += 1;
                }
                _ => {}
            }
        };

        let _ = terminal::disable_raw_mode();
        write!(out, "\r\n").ok();
        out.flush().ok();
        result
    }

    fn render_line<W: Write>(
        out: &mut W,
        label: &str,
        buffer: &[char],
        cursor: usize,
        error: Option<&str>,
        i18n: &I18n,
    ) -> Result<()> {
        let head: String = buffer[..cursor].iter().collect();
        let tail: String = buffer[cursor..].iter().collect();
        let note = error.map(str::to_string).unwrap_or_else(|| i18n.t("prompt_hint"));
        let styled = if error.is_some() { note.red() } else { note.dimmed() };

        write!(out, "\r\x1b[2K{}: {}{}  {}", label.cyan(), head, tail, styled)?;
        // park the cursor back at the edit position
        write!(out, "\x1b[{}D", tail.width() + 2 + note.width())?;
        out.flush().ok();
        Ok(())
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, request: &InputRequest, i18n: &I18n) -> Result<Option<String>> {
        if self.simple {
            return Self::simple_ask(request, i18n);
        }

        static INIT_CTRL_C: Once = Once::new();
        INIT_CTRL_C.call_once(|| {
            let _ = ctrlc::set_handler(move || {
                // Best-effort restore terminal state and exit with 130
                let _ = terminal::disable_raw_mode();
                eprint!("\r\n");
                let _ = io::stderr().flush();
                std::process::exit(130);
            });
        });

        // Set terminal to raw mode, fallback to simple mode if failed
        if terminal::enable_raw_mode().is_err() {
            eprintln!("{}", i18n.t("warning_interactive_failed").yellow());
            self.simple = true;
            return Self::simple_ask(request, i18n);
        }
        Self::interactive_ask(request, i18n)
    }
}
