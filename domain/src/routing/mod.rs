//! Directed-question routing.
//!
//! Stage 2 responses are free text in which reviewers address questions to
//! each other ("Question to CTO: ..."). These functions find out who was
//! asked something and collect the questions for one addressee. They are
//! pure text processing with no I/O and no global state.
//!
//! | Pattern | Example |
//! |---------|---------|
//! | `QUESTION TO {ROLE}:` | `Question to CTO: how does this scale?` |
//! | `QUESTION FOR {ROLE}:` | `question for ciso: who owns the keys?` |
//! | `TO {ROLE}:` | `To COO: can support absorb this?` |
//! | `@{ROLE}` | `@CPO is this in the roadmap?` |
//!
//! Matching is ASCII case-insensitive. Patterns are tried in the order above
//! and the first one found on a line wins, which makes the captured text
//! deterministic when a line matches several of them.

use crate::core::role::Role;
use crate::review::value_objects::StageRecord;
use std::collections::BTreeSet;

/// Returned by [`extract_for`] when nothing is addressed to the target role
pub const NO_DIRECTED_QUESTIONS: &str = "No questions directed to your role.";

/// Recognised addressing forms, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressPattern {
    QuestionTo,
    QuestionFor,
    To,
    At,
}

impl AddressPattern {
    const PRIORITY: [AddressPattern; 4] = [
        AddressPattern::QuestionTo,
        AddressPattern::QuestionFor,
        AddressPattern::To,
        AddressPattern::At,
    ];

    /// Uppercase needle for a role
    fn needle(&self, role: &Role) -> String {
        match self {
            AddressPattern::QuestionTo => format!("QUESTION TO {}:", role),
            AddressPattern::QuestionFor => format!("QUESTION FOR {}:", role),
            AddressPattern::To => format!("TO {}:", role),
            AddressPattern::At => format!("@{}", role),
        }
    }

    /// Byte offset of the first acceptable occurrence in an uppercased line.
    ///
    /// An occurrence must not be glued to a preceding word character
    /// (`INTO CTO:` is not `TO CTO:`), and `@ROLE` must not run on into a
    /// longer identifier (`@CTO` is not `@CT`).
    fn find_in(&self, upper_line: &str, role: &Role) -> Option<usize> {
        let needle = self.needle(role);
        upper_line.match_indices(&needle).map(|(idx, _)| idx).find(|&idx| {
            let before_ok = !upper_line[..idx]
                .chars()
                .next_back()
                .is_some_and(is_word_char);
            let after_ok = *self != AddressPattern::At
                || !upper_line[idx + needle.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_word_char);
            before_ok && after_ok
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Start offset of the question addressed to `role` in `line`, if any.
///
/// ASCII uppercasing keeps byte offsets stable, so the offset indexes the
/// original line directly.
fn question_start(line: &str, role: &Role) -> Option<usize> {
    let upper = line.to_ascii_uppercase();
    AddressPattern::PRIORITY
        .iter()
        .find_map(|p| p.find_in(&upper, role))
}

/// Roles from `known_roles` that at least one record addresses.
///
/// Returns an empty set when nobody was addressed; that is a normal outcome,
/// not an error. Authors addressing themselves are included.
pub fn addressed_roles(records: &[StageRecord], known_roles: &[Role]) -> BTreeSet<Role> {
    known_roles
        .iter()
        .filter(|role| {
            records
                .iter()
                .flat_map(|r| r.response.lines())
                .any(|line| question_start(line, role).is_some())
        })
        .cloned()
        .collect()
}

/// Collect the questions addressed to `target`, attributed to their authors.
///
/// Each matching line contributes one entry, `"From {author}: {question}"`,
/// where the question runs from the matched pattern to the end of the line.
/// Entries are separated by a blank line. Never returns an empty string:
/// [`NO_DIRECTED_QUESTIONS`] is returned instead.
pub fn extract_for(records: &[StageRecord], target: &Role) -> String {
    let questions: Vec<String> = records
        .iter()
        .flat_map(|record| {
            record.response.lines().filter_map(move |line| {
                question_start(line, target)
                    .map(|idx| format!("From {}: {}", record.role, &line[idx..]))
            })
        })
        .collect();

    if questions.is_empty() {
        NO_DIRECTED_QUESTIONS.to_string()
    } else {
        questions.join("\n\n")
    }
}
