//! Line-level rendering of two documents.
//!
//! Both sides are pretty-printed as JSON (keys sorted) and handed to
//! `similar` for a unified diff. Used for human-readable output; change
//! detection itself relies on the structural diff.

use similar::{ChangeTag, TextDiff};

use lastseen_types::Value;

/// Unchanged lines kept around each change.
const CONTEXT_LINES: usize = 3;

/// A unified diff of two rendered documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnifiedDiff {
    /// The diff text, with `---`/`+++` headers. Empty if the renderings match.
    pub text: String,
    pub additions: usize,
    pub deletions: usize,
}

impl UnifiedDiff {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Render two documents and diff them line by line.
///
/// An absent side renders as no lines at all. `labels` name the old and the
/// new side in the diff header.
pub fn text_diff(
    old: Option<&Value>,
    new: Option<&Value>,
    labels: (&str, &str),
) -> UnifiedDiff {
    let old_text = old.map(render).unwrap_or_default();
    let new_text = new.map(render).unwrap_or_default();

    let diff = TextDiff::from_lines(&old_text, &new_text);
    let count = |tag: ChangeTag| diff.iter_all_changes().filter(|c| c.tag() == tag).count();

    UnifiedDiff {
        text: diff
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(labels.0, labels.1)
            .to_string(),
        additions: count(ChangeTag::Insert),
        deletions: count(ChangeTag::Delete),
    }
}

fn render(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}
