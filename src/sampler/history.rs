use serde::{Deserialize, Serialize};

use crate::sampler::ScoreBreakdown;

/// One accepted step: the full assignment after commit and the scores that
/// justified it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub assignments: Vec<u32>,
    pub scores: ScoreBreakdown,
}

/// Append-only log of accepted steps. Entry `i` is accepted step `i`;
/// entries are never mutated after being recorded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Number of accepted steps recorded.
    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    /// Returns true if no step has been accepted yet.
    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// All recorded entries, in step order.
    #[inline] pub fn entries(&self) -> &[HistoryEntry] { &self.entries }

    /// Assignment vectors of the accepted steps, in step order.
    pub fn assignment_vectors(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.entries.iter().map(|entry| entry.assignments.as_slice())
    }

    /// Score breakdowns of the accepted steps, in step order.
    pub fn score_records(&self) -> impl Iterator<Item = &ScoreBreakdown> + '_ {
        self.entries.iter().map(|entry| &entry.scores)
    }

    /// Record an accepted step.
    pub(crate) fn record(&mut self, assignments: Vec<u32>, scores: ScoreBreakdown) {
        self.entries.push(HistoryEntry { assignments, scores });
    }

    /// Drop all entries; used when a partition is re-seeded.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(total: f64) -> ScoreBreakdown {
        ScoreBreakdown { compactness: total, population: 0.0, border: 0.0, vra: 0.0, total }
    }

    #[test]
    fn entries_keep_step_order() {
        let mut history = History::new();
        history.record(vec![0, 0, 1], breakdown(3.0));
        history.record(vec![0, 1, 1], breakdown(6.0));

        assert_eq!(history.len(), 2);
        let maps = history.assignment_vectors().collect::<Vec<_>>();
        assert_eq!(maps, vec![&[0, 0, 1][..], &[0, 1, 1][..]]);
        assert_eq!(history.score_records().last().unwrap().total, 6.0);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut history = History::new();
        history.record(vec![0], breakdown(1.0));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn json_round_trip_is_identity() {
        let mut history = History::new();
        history.record(vec![0, 1, 1, 0], breakdown(2.5));
        history.record(vec![0, 1, 0, 0], breakdown(1.5));

        let json = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
