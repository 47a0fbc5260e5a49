//! In-memory interview store.
//!
//! The authoritative local collection for one view scope. Mutation goes
//! through the reconciler (push path) or `replace_all` (snapshot path); reads
//! always observe `(date, time, id)` ascending order.

use crate::interview::{Interview, InterviewId};

/// Ordered collection of interview records for a single view scope.
///
/// Invariant: at most one record per id, iteration order is ascending
/// `(date, time, id)`.
#[derive(Debug, Default)]
pub struct InterviewStore {
    interviews: Vec<Interview>,
}

impl InterviewStore {
    pub fn new() -> Self {
        InterviewStore {
            interviews: Vec::new(),
        }
    }

    /// Replace the entire contents with a fresh snapshot.
    ///
    /// The snapshot is more authoritative than anything buffered before it
    /// arrived, so previous contents are discarded rather than merged.
    pub fn replace_all(&mut self, interviews: Vec<Interview>) {
        let mut seen = std::collections::HashSet::new();
        self.interviews = interviews
            .into_iter()
            .filter(|iv| seen.insert(iv.id))
            .collect();
        self.interviews.sort_by_key(Interview::sort_key);
    }

    /// Insert a record at its sorted position.
    ///
    /// Callers are expected to have checked for duplicates; an id that is
    /// already present is replaced instead of duplicated.
    pub fn insert(&mut self, interview: Interview) {
        if self.contains(interview.id) {
            self.upsert(interview);
            return;
        }
        let pos = self
            .interviews
            .partition_point(|iv| iv.sort_key() < interview.sort_key());
        self.interviews.insert(pos, interview);
    }

    /// Replace the record with a matching id wholesale, or insert it when
    /// absent. Returns true if an existing record was replaced.
    pub fn upsert(&mut self, interview: Interview) -> bool {
        match self.interviews.iter().position(|iv| iv.id == interview.id) {
            Some(idx) => {
                self.interviews.remove(idx);
                self.insert(interview);
                true
            }
            None => {
                self.insert(interview);
                false
            }
        }
    }

    /// Remove the record with the given id, if present.
    pub fn remove(&mut self, id: InterviewId) -> Option<Interview> {
        let idx = self.interviews.iter().position(|iv| iv.id == id)?;
        Some(self.interviews.remove(idx))
    }

    pub fn get(&self, id: InterviewId) -> Option<&Interview> {
        self.interviews.iter().find(|iv| iv.id == id)
    }

    pub fn contains(&self, id: InterviewId) -> bool {
        self.get(id).is_some()
    }

    /// Whether some record's `linked_interview_id` points at the given id.
    /// Used to suppress the counterpart copy of an already-materialized
    /// meeting.
    pub fn contains_linked(&self, id: InterviewId) -> bool {
        self.interviews
            .iter()
            .any(|iv| iv.linked_interview_id == Some(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interview> {
        self.interviews.iter()
    }

    pub fn as_slice(&self) -> &[Interview] {
        &self.interviews
    }

    pub fn len(&self) -> usize {
        self.interviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interviews.is_empty()
    }
}
