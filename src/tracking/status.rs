//! Parsing of `git status --porcelain` (v1) output.
//!
//! Each line is `XY <path>` where `X` is the index status and `Y` the work
//! tree status. Renames and copies read `XY <old> -> <new>`. Paths with
//! special characters are C-quoted (`"a\tb.bin"`, `"caf\303\251.bin"`).

use std::collections::HashSet;

/// One line of porcelain status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character status code, e.g. `"M "`, `"A "`, `"??"`
    pub code: String,
    /// Path relative to the repository root (destination for renames)
    pub path: String,
}

impl StatusEntry {
    /// Deleted in the index or the work tree.
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.code.contains('D')
    }

    /// Parse a single porcelain line; `None` for blank or malformed lines.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        if line.trim().is_empty() || line.len() < 4 || !line.is_char_boundary(2) {
            return None;
        }
        let (code, rest) = line.split_at(2);
        let raw = rest.strip_prefix(' ')?;

        let path = match split_rename(raw) {
            Some((_, new)) => unquote(new),
            None => unquote(raw),
        };
        if path.is_empty() {
            return None;
        }

        Some(Self {
            code: code.to_string(),
            path,
        })
    }
}

/// Entries reported by one status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Entries in the order git printed them
    pub entries: Vec<StatusEntry>,
}

impl ChangeSet {
    /// Parse full `status --porcelain` output.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        Self {
            entries: output.lines().filter_map(StatusEntry::parse).collect(),
        }
    }

    /// Keep the entries that affect the published snapshot: anything touching
    /// a tracked path, plus deletions of previously committed files.
    ///
    /// Untracked files outside the tracked list (e.g. hidden files the walk
    /// skips) are dropped so they cannot force a commit on every run.
    #[must_use]
    pub fn relevant_to<'a>(self, tracked: impl IntoIterator<Item = &'a str>) -> Self {
        let tracked: HashSet<&str> = tracked.into_iter().collect();
        Self {
            entries: self
                .entries
                .into_iter()
                .filter(|e| tracked.contains(e.path.as_str()) || e.is_deletion())
                .collect(),
        }
    }

    /// Nothing reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `path` is reported.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    /// Paths of entries that are not deletions.
    #[must_use]
    pub fn updated(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.is_deletion())
            .map(|e| e.path.clone())
            .collect()
    }

    /// Paths of deleted entries.
    #[must_use]
    pub fn removed(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.is_deletion())
            .map(|e| e.path.clone())
            .collect()
    }
}

/// Split `old -> new`, honouring quotes so an arrow inside a quoted name is not a separator.
fn split_rename(raw: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes && raw[i..].starts_with(" -> ") => {
                return Some((&raw[..i], &raw[i + 4..]));
            }
            _ => {}
        }
    }
    None
}

/// Undo git's C-style quoting; unquoted input is returned as is.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 >= bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        match next {
            b'0'..=b'7' => {
                let digits: Vec<u8> = bytes[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|d| (b'0'..=b'7').contains(*d))
                    .copied()
                    .collect();
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push(u8::try_from(value).unwrap_or(b'?'));
                i += 1 + digits.len();
            }
            _ => {
                out.push(match next {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    other => other,
                });
                i += 2;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
