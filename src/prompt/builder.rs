//! Context builder
//!
//! Assembles the single text prompt sent to the model. The remote API is
//! stateless, so every chat request carries the instruction, a window of the
//! most recent turns and the new input in one string:
//!
//! ```text
//! <system instruction>
//! <separator>
//! <label>: <turn>        (at most `window` lines, oldest first)
//! <user label>: <new input>
//! ```

use super::{RoleLabels, PANIC_LOG_PLACEHOLDER};
use crate::session::{Role, Turn};

/// Builds a chat prompt from an instruction, prior turns and the new input.
///
/// Only the last `window` turns are included, in their original order. A
/// `window` of zero drops history entirely. Turns with empty content are
/// kept as a bare label.
pub fn build_prompt<'a, I>(
    system_instruction: &str,
    history: I,
    new_input: &str,
    window: usize,
    labels: &RoleLabels,
) -> String
where
    I: IntoIterator<Item = &'a Turn>,
    I::IntoIter: ExactSizeIterator,
{
    let turns = history.into_iter();
    let skip = turns.len().saturating_sub(window);

    let mut lines = Vec::with_capacity(window.min(turns.len()) + 3);
    lines.push(system_instruction.to_string());
    lines.push(labels.separator.clone());

    for turn in turns.skip(skip) {
        lines.push(format_line(label_for(labels, turn.role), &turn.content));
    }

    lines.push(format_line(&labels.user, new_input));
    lines.join("\n")
}

/// Substitutes a panic log into the analysis template.
///
/// A template without the placeholder gets the log appended on its own line.
pub fn render_analysis_prompt(template: &str, panic_log: &str) -> String {
    if template.contains(PANIC_LOG_PLACEHOLDER) {
        template.replace(PANIC_LOG_PLACEHOLDER, panic_log)
    } else {
        format!("{}\n{}", template, panic_log)
    }
}

fn label_for(labels: &RoleLabels, role: Role) -> &str {
    match role {
        Role::User => &labels.user,
        Role::Assistant => &labels.assistant,
    }
}

fn format_line(label: &str, content: &str) -> String {
    format!("{}: {}", label, content)
}
