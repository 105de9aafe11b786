//! Linear undo/redo history over canvas snapshots.
//!
//! The stack holds snapshots oldest first and a cursor to the one currently
//! displayed. An empty cursor means the blank canvas. Committing while the
//! cursor is behind the tail discards the redo tail first.

/// What the canvas should show after an undo or redo.
#[derive(Debug, PartialEq, Eq)]
pub enum HistoryStep<'a, T> {
    /// Nothing to do; the cursor was at a boundary.
    Unchanged,
    /// Display this snapshot.
    Restore(&'a T),
    /// Display the blank canvas.
    Blank,
}

impl<T> HistoryStep<'_, T> {
    /// Whether the step moved the cursor.
    pub fn changed(&self) -> bool {
        !matches!(self, HistoryStep::Unchanged)
    }
}

/// Ordered snapshots with a current-position cursor.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    /// Index of the displayed snapshot, `None` for the blank canvas.
    at: Option<usize>,
    /// Oldest entries are dropped past this many snapshots.
    max_entries: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            at: None,
            max_entries: None,
        }
    }

    /// Create a history that keeps at most `max_entries` snapshots.
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new()
        }
    }

    /// Append a snapshot, discarding any redo tail first.
    pub fn commit(&mut self, snapshot: T) {
        let keep = self.at.map_or(0, |at| at + 1);
        if keep < self.entries.len() {
            log::debug!("Discarding {} redo snapshot(s)", self.entries.len() - keep);
            self.entries.truncate(keep);
        }
        self.entries.push(snapshot);

        if let Some(max) = self.max_entries {
            if self.entries.len() > max {
                let excess = self.entries.len() - max;
                self.entries.drain(..excess);
            }
        }
        self.at = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot.
    pub fn undo(&mut self) -> HistoryStep<'_, T> {
        match self.at {
            None => HistoryStep::Unchanged,
            Some(0) => {
                self.at = None;
                HistoryStep::Blank
            }
            Some(at) => {
                self.at = Some(at - 1);
                HistoryStep::Restore(&self.entries[at - 1])
            }
        }
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> HistoryStep<'_, T> {
        let next = self.at.map_or(0, |at| at + 1);
        if next >= self.entries.len() {
            return HistoryStep::Unchanged;
        }
        self.at = Some(next);
        HistoryStep::Restore(&self.entries[next])
    }

    /// Drop every snapshot and return to the blank canvas.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.at = None;
    }

    /// Replace the history with exactly one snapshot at cursor 0.
    pub fn seed(&mut self, snapshot: T) {
        self.entries.clear();
        self.entries.push(snapshot);
        self.at = Some(0);
    }

    /// The cursor as a signed index; `-1` is the blank canvas.
    pub fn cursor(&self) -> isize {
        self.at.map_or(-1, |at| at as isize)
    }

    /// The displayed snapshot, if any.
    pub fn current(&self) -> Option<&T> {
        self.at.map(|at| &self.entries[at])
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.at.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.at.map_or(0, |at| at + 1) < self.entries.len()
    }
}
