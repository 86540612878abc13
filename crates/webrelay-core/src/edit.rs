//! Host edit notifications and undo grouping.
//!
//! UI-originated parameter changes are reported to the host as
//! begin/perform/end triples. A begin/end pair is a drag span: every value
//! performed inside it belongs to one undoable edit. Values performed outside
//! a span are individual edits.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::parameter_store::ParameterStore;
use crate::types::{ParameterId, ParameterValue};

/// Receiver of UI-originated parameter edits.
///
/// Format wrappers forward these to the host's component handler.
/// All calls arrive on the UI thread.
pub trait HostEditSink: Send + Sync {
    /// A drag span for `id` starts.
    fn begin_edit(&self, id: ParameterId);

    /// `id` changed to the normalized `value`.
    fn perform_edit(&self, id: ParameterId, value: ParameterValue);

    /// The drag span for `id` ends.
    fn end_edit(&self, id: ParameterId);
}

/// Sink that discards every edit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEditSink;

impl HostEditSink for NullEditSink {
    fn begin_edit(&self, _id: ParameterId) {}
    fn perform_edit(&self, _id: ParameterId, _value: ParameterValue) {}
    fn end_edit(&self, _id: ParameterId) {}
}

/// One undoable step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndoEntry {
    pub id: ParameterId,
    /// Normalized value before the edit.
    pub before: ParameterValue,
    /// Normalized value after the edit.
    pub after: ParameterValue,
}

#[derive(Debug, Default)]
struct History {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
    /// Open spans: id -> value before the span began.
    open: HashMap<ParameterId, Option<ParameterValue>>,
    /// Last value performed in each open span.
    pending: HashMap<ParameterId, ParameterValue>,
    /// Last known value per parameter, used as the `before` of the next edit.
    current: HashMap<ParameterId, ParameterValue>,
}

impl History {
    fn push(&mut self, entry: UndoEntry) {
        if entry.before != entry.after {
            self.undo.push(entry);
            self.redo.clear();
        }
    }
}

/// Undo history that groups drag spans into single entries.
///
/// The history needs the value a parameter had before an edit. It learns
/// values from the edits it sees; call [`track`](Self::track) with the
/// initial values so the first edit of each parameter has a correct
/// `before`.
#[derive(Debug, Default)]
pub struct UndoHistory {
    inner: Mutex<History>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the known values from a parameter store.
    pub fn track(&self, store: &dyn ParameterStore) {
        let mut h = self.lock();
        for p in store.iter() {
            h.current.insert(p.id(), p.get_normalized());
        }
    }

    /// Number of undoable entries.
    pub fn undo_len(&self) -> usize {
        self.lock().undo.len()
    }

    /// Number of redoable entries.
    pub fn redo_len(&self) -> usize {
        self.lock().redo.len()
    }

    /// Snapshot of the undo stack, oldest first.
    pub fn entries(&self) -> Vec<UndoEntry> {
        self.lock().undo.clone()
    }

    /// Revert the most recent entry into `store`.
    pub fn undo(&self, store: &dyn ParameterStore) -> Option<UndoEntry> {
        let mut h = self.lock();
        let entry = h.undo.pop()?;
        store.set_normalized(entry.id, entry.before);
        h.current.insert(entry.id, entry.before);
        h.redo.push(entry);
        Some(entry)
    }

    /// Re-apply the most recently undone entry into `store`.
    pub fn redo(&self, store: &dyn ParameterStore) -> Option<UndoEntry> {
        let mut h = self.lock();
        let entry = h.redo.pop()?;
        store.set_normalized(entry.id, entry.after);
        h.current.insert(entry.id, entry.after);
        h.undo.push(entry);
        Some(entry)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        // A poisoned history is still structurally valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HostEditSink for UndoHistory {
    fn begin_edit(&self, id: ParameterId) {
        let mut h = self.lock();
        let before = h.current.get(&id).copied();
        if h.open.insert(id, before).is_some() {
            log::debug!("nested begin_edit for parameter {id}");
        }
    }

    fn perform_edit(&self, id: ParameterId, value: ParameterValue) {
        let mut h = self.lock();
        if h.open.contains_key(&id) {
            h.pending.insert(id, value);
        } else {
            let before = h.current.get(&id).copied().unwrap_or(value);
            h.push(UndoEntry { id, before, after: value });
        }
        h.current.insert(id, value);
    }

    fn end_edit(&self, id: ParameterId) {
        let mut h = self.lock();
        let Some(before) = h.open.remove(&id) else {
            log::debug!("end_edit without begin_edit for parameter {id}");
            return;
        };
        if let Some(after) = h.pending.remove(&id) {
            h.push(UndoEntry {
                id,
                before: before.unwrap_or(after),
                after,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_store::ParameterSet;
    use crate::parameter_types::FloatParameter;
    use crate::types::parameter_id;

    fn store() -> ParameterSet {
        ParameterSet::builder()
            .with(FloatParameter::new("mix", "Mix", 0.0, 0.0..=1.0))
            .build()
            .unwrap()
    }

    #[test]
    fn drag_span_is_one_entry() {
        let params = store();
        let history = UndoHistory::new();
        history.track(&params);
        let id = parameter_id("mix");

        history.begin_edit(id);
        for v in [0.1, 0.2, 0.3, 0.4] {
            history.perform_edit(id, v);
        }
        history.end_edit(id);

        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.entries()[0], UndoEntry { id, before: 0.0, after: 0.4 });
    }

    #[test]
    fn edits_without_span_are_separate_entries() {
        let params = store();
        let history = UndoHistory::new();
        history.track(&params);
        let id = parameter_id("mix");

        for v in [0.1, 0.2, 0.3] {
            history.perform_edit(id, v);
        }

        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.entries()[1].before, 0.1);
    }

    #[test]
    fn undo_and_redo_restore_values() {
        let params = store();
        let history = UndoHistory::new();
        history.track(&params);
        let id = parameter_id("mix");

        history.begin_edit(id);
        params.set_normalized(id, 0.7);
        history.perform_edit(id, 0.7);
        history.end_edit(id);

        history.undo(&params).unwrap();
        assert_eq!(params.get_normalized(id), Some(0.0));
        assert_eq!(history.redo_len(), 1);

        history.redo(&params).unwrap();
        assert_eq!(params.get_normalized(id), Some(0.7));
        assert!(history.redo(&params).is_none());
    }

    #[test]
    fn empty_span_records_nothing() {
        let history = UndoHistory::new();
        history.begin_edit(1);
        history.end_edit(1);
        history.end_edit(1);
        assert_eq!(history.undo_len(), 0);
    }
}
