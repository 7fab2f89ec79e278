//! Bounded command history with file persistence.
//!
//! Entries are ordered oldest-first in storage; the public index
//! convention is reversed (index 0 is the newest entry) because that is
//! how history navigation counts. The edit loop keeps the live buffer as
//! the newest entry while a line is being edited, so navigation always
//! addresses a stable list.
//!
//! File format: entries joined with `\n`, no header, no escaping. Lines
//! are trimmed on load and empties dropped, so entries containing
//! newlines are not representable.

use std::fs;
use std::path::Path;

/// Default capacity of the ring.
pub const DEFAULT_MAXLEN: usize = 32;

#[derive(Debug)]
pub struct History {
    entries: Vec<String>,
    maxlen: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            maxlen: DEFAULT_MAXLEN,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `line`, evicting the oldest entry at capacity. Returns
    /// whether an entry was actually inserted: a zero capacity or a line
    /// equal to any existing entry suppresses the add.
    pub fn add(&mut self, line: &str) -> bool {
        if self.maxlen == 0 {
            return false;
        }
        if self.entries.iter().any(|entry| entry == line) {
            return false;
        }
        if self.entries.len() == self.maxlen {
            self.entries.remove(0);
        }
        self.entries.push(line.to_string());
        true
    }

    /// Entry by navigation index: 0 is the newest.
    pub fn get(&self, idx: usize) -> &str {
        &self.entries[self.entries.len() - 1 - idx]
    }

    /// Overwrite the entry at navigation index `idx`; out-of-range indices
    /// are ignored.
    pub fn set(&mut self, idx: usize, line: &str) {
        let n = self.entries.len();
        if idx < n {
            self.entries[n - 1 - idx] = line.to_string();
        }
    }

    /// Remove and return the newest entry.
    pub fn pop_last(&mut self) -> Option<String> {
        self.entries.pop()
    }

    /// Change capacity, dropping the oldest entries if the current list is
    /// longer than the new limit.
    pub fn set_maxlen(&mut self, maxlen: usize) {
        self.maxlen = maxlen;
        if self.entries.len() > maxlen {
            let excess = self.entries.len() - maxlen;
            self.entries.drain(..excess);
        }
    }

    /// All entries, oldest first.
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    /// Stash the current buffer at the navigation cursor and move one entry
    /// toward the oldest; returns the entry now under the cursor.
    pub fn prev(&mut self, idx: &mut usize, current: &str) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        self.set(*idx, current);
        *idx = (*idx + 1).min(self.entries.len() - 1);
        self.get(*idx).to_string()
    }

    /// Stash the current buffer at the navigation cursor and move one entry
    /// toward the newest; returns the entry now under the cursor.
    pub fn next(&mut self, idx: &mut usize, current: &str) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        self.set(*idx, current);
        *idx = idx.saturating_sub(1);
        self.get(*idx).to_string()
    }

    /// Write the history to `path`, entries joined with `\n`. An empty
    /// history writes nothing. Failures are logged and swallowed; losing a
    /// history file must not fail the session.
    pub fn save(&self, path: &Path) {
        if self.entries.is_empty() {
            return;
        }
        if let Err(err) = fs::write(path, self.entries.join("\n")) {
            tracing::warn!(target: "history", %err, path = %path.display(), "save_failed");
        }
    }

    /// Replace the history with the contents of `path`: one entry per
    /// line, trimmed, empties dropped, capped to the newest `maxlen`.
    /// Missing or irregular files are ignored.
    pub fn load(&mut self, path: &Path) {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(_) => return,
        };
        if !meta.is_file() {
            tracing::warn!(target: "history", path = %path.display(), "not_a_regular_file");
            return;
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(target: "history", %err, path = %path.display(), "load_failed");
                return;
            }
        };
        self.entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        if self.entries.len() > self.maxlen {
            let excess = self.entries.len() - self.maxlen;
            self.entries.drain(..excess);
        }
    }
}
