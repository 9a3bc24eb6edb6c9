use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Collapses whitespace and truncates to `max_chars` on a word boundary.
    /// Returns `None` when nothing printable is left.
    pub fn normalize(raw: &str, max_chars: usize) -> Option<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() || max_chars == 0 {
            return None;
        }

        if collapsed.chars().count() <= max_chars {
            return Some(Self(collapsed));
        }

        let mut chars = collapsed.chars();
        let cut: String = chars.by_ref().take(max_chars).collect();
        if chars.next() == Some(' ') {
            return Some(Self(cut));
        }

        let truncated = match cut.rfind(' ') {
            Some(idx) if idx > 0 => cut[..idx].to_string(),
            _ => cut,
        };
        Some(Self(truncated))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
