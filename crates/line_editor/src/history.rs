use std::collections::VecDeque;

/// Default number of entries kept in memory.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded command history with an Up/Down browsing cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    /// Steps back from the newest entry while browsing.
    cursor: Option<usize>,
    /// Input line as it was before browsing started.
    draft: String,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            cursor: None,
            draft: String::new(),
        }
    }

    /// Append without filtering. Oldest entries fall off past capacity.
    pub fn push(&mut self, entry: &str) {
        self.entries.push_back(entry.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Append a submitted line, skipping blanks and repeats of the last entry.
    pub fn record(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if self.entries.back().is_some_and(|last| last == line) {
            return;
        }
        self.push(line);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stop browsing; the next `older` starts from the newest entry again.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
        self.draft.clear();
    }

    /// Step back one entry. `current` is remembered when browsing starts.
    pub fn older(&mut self, current: &str) -> Option<String> {
        let next = match self.cursor {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                0
            }
            Some(steps) if steps + 1 < self.entries.len() => steps + 1,
            Some(_) => return None,
        };
        self.cursor = Some(next);
        self.entry_back(next)
    }

    /// Step forward one entry, ending at the remembered draft.
    pub fn newer(&mut self) -> Option<String> {
        match self.cursor? {
            0 => {
                self.cursor = None;
                Some(std::mem::take(&mut self.draft))
            }
            steps => {
                self.cursor = Some(steps - 1);
                self.entry_back(steps - 1)
            }
        }
    }

    fn entry_back(&self, steps: usize) -> Option<String> {
        let idx = self.entries.len().checked_sub(steps + 1)?;
        self.entries.get(idx).cloned()
    }
}
