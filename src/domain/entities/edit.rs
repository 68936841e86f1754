use std::collections::HashMap;

use crate::domain::entities::marker::MarkerId;

// Membership is what matters; the mark ordinal exists so a re-marked id
// cannot be cleared by a push whose snapshot predates the re-mark.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    marks: HashMap<MarkerId, u64>,
    clock: u64,
}

impl PendingSet {
    pub fn insert(&mut self, id: MarkerId) {
        self.clock += 1;
        self.marks.insert(id, self.clock);
    }

    pub fn remove(&mut self, id: &MarkerId) -> bool {
        self.marks.remove(id).is_some()
    }

    pub fn remove_if_unchanged(&mut self, id: &MarkerId, mark: u64) -> bool {
        if self.marks.get(id) == Some(&mark) {
            self.marks.remove(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.marks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<MarkerId, u64> {
        self.marks.clone()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}
