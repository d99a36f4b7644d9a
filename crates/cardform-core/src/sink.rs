#![forbid(unsafe_code)]

//! Receivers for validated field-sets.
//!
//! A successful submit hands a copy of the field-set to the form's
//! [`SubmitSink`]. The form never sends data anywhere else.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::fields::FormFields;

/// Tracing target used for submitted field-sets.
pub const SUBMIT_TARGET: &str = "cardform::submit";

/// Receives a copy of every validated field-set.
pub trait SubmitSink {
    /// Accept a validated field-set.
    fn accept(&mut self, fields: &FormFields);
}

impl<S: SubmitSink + ?Sized> SubmitSink for Box<S> {
    fn accept(&mut self, fields: &FormFields) {
        (**self).accept(fields);
    }
}

/// Emits each field-set as a JSON `info` event on [`SUBMIT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SubmitSink for TracingSink {
    fn accept(&mut self, fields: &FormFields) {
        match fields.to_json() {
            Ok(payload) => {
                tracing::info!(target: SUBMIT_TARGET, payload = %payload, "card details submitted");
            }
            Err(err) => {
                tracing::warn!(target: SUBMIT_TARGET, error = %err, "failed to encode submission");
            }
        }
    }
}

/// Keeps every field-set in memory.
///
/// Clones share the same list, so a handle kept outside the form sees what
/// the form submitted.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<FormFields>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<FormFields> {
        self.records.borrow().clone()
    }

    /// Number of recorded field-sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<FormFields> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

impl SubmitSink for RecordingSink {
    fn accept(&mut self, fields: &FormFields) {
        self.records.borrow_mut().push(fields.clone());
    }
}

impl fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("records", &self.len())
            .finish()
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&FormFields)> SubmitSink for FnSink<F> {
    fn accept(&mut self, fields: &FormFields) {
        (self.0)(fields);
    }
}

/// Forwards each field-set to several sinks, in insertion order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn SubmitSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink (builder).
    #[must_use]
    pub fn with(mut self, sink: impl SubmitSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of downstream sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no downstream sinks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SubmitSink for FanoutSink {
    fn accept(&mut self, fields: &FormFields) {
        for sink in &mut self.sinks {
            sink.accept(fields);
        }
    }
}

impl fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldId;

    #[test]
    fn recording_sink_shares_records_between_clones() {
        let recorder = RecordingSink::new();
        let mut sink = recorder.clone();
        sink.accept(&FormFields::new().with(FieldId::Cvc, "123"));
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.records()[0].cvc, "123");
        assert_eq!(recorder.drain().len(), 1);
        assert!(recorder.is_empty());
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = RecordingSink::new();
        let b = RecordingSink::new();
        let mut fanout = FanoutSink::new()
            .with(a.clone())
            .with(b.clone())
            .with(FnSink(|_: &FormFields| {}));
        assert_eq!(fanout.len(), 3);
        fanout.accept(&FormFields::new());
        fanout.accept(&FormFields::new());
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn empty_fanout_is_a_no_op() {
        let mut fanout = FanoutSink::new();
        assert!(fanout.is_empty());
        fanout.accept(&FormFields::new());
    }

    #[test]
    fn recorder_debug_shows_count() {
        let a = RecordingSink::new();
        assert_eq!(format!("{a:?}"), "RecordingSink { records: 0 }");
    }

    #[test]
    fn recorder_starts_empty() {
        let a = RecordingSink::new();
        assert_eq!(a.len(), 0);
        assert!(a.records().is_empty());
    }

    #[test]
    fn fn_sink_calls_closure() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink(|f: &FormFields| seen.push(f.name.clone()));
            sink.accept(&FormFields::new().with(FieldId::Name, "Jane Appleseed"));
        }
        assert_eq!(seen, vec!["Jane Appleseed".to_string()]);
    }

    #[test]
    fn boxed_sink_forwards() {
        let recorder = RecordingSink::new();
        let mut boxed: Box<dyn SubmitSink> = Box::new(recorder.clone());
        boxed.accept(&FormFields::new());
        assert_eq!(recorder.len(), 1);
    }
}
