// Diagnostic history domain model
use super::prediction::Condition;
use std::collections::VecDeque;

/// Number of past runs kept for the operator.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub condition: Condition,
    pub confidence: f64,
}

impl HistoryEntry {
    pub fn new(id: String, timestamp: String, condition: Condition, confidence: f64) -> Self {
        Self {
            id,
            timestamp,
            condition,
            confidence,
        }
    }
}

/// Newest-first log of recent runs, never longer than [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
