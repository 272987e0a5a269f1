use crate::i18n::I18n;
use crate::workflow::{EntryStatus, ResourceReport};
use colored::*;
use similar::{ChangeTag, TextDiff};

pub struct Differ;

impl Differ {
    /// Coloured line diff of every resource the run would change.
    pub fn diff_resources(resources: &[ResourceReport], i18n: &I18n) -> String {
        let mut output = String::new();

        for resource in resources.iter().filter(|r| r.status == EntryStatus::Added) {
            output.push_str(&format!(
                "{}\n",
                i18n.t_format("resource_diff", &[&resource.path.display().to_string()])
                    .bold()
                    .cyan()
            ));
            output.push_str(&Self::diff_text(&resource.before, &resource.after));
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    fn diff_text(old: &str, new: &str) -> String {
        let diff = TextDiff::from_lines(old, new);

        let mut result = String::new();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => {
                    result.push_str(&format!("{}{}", "-".red(), change.to_string().red()));
                }
                ChangeTag::Insert => {
                    result.push_str(&format!("{}{}", "+".green(), change.to_string().green()));
                }
                ChangeTag::Equal => {
                    result.push_str(&format!(" {}", change));
                }
            }
        }

        result
    }
}
