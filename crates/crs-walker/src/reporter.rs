use crs_core::{EventSink, MirrorEvent, RunSummary};

/// Fans each event out to the run summary and the caller's sink.
pub struct Reporter<'s, S> {
    sink: &'s mut S,
    summary: RunSummary,
}

impl<'s, S: EventSink> Reporter<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            summary: RunSummary::start(),
        }
    }

    pub fn emit(&mut self, event: MirrorEvent) {
        self.summary.record(&event);
        self.sink.emit(&event);
    }

    pub fn abandon(&mut self, branch: String, reason: impl std::fmt::Display) {
        self.emit(MirrorEvent::BranchAbandoned {
            branch,
            reason: reason.to_string(),
        });
    }

    pub fn into_summary(mut self) -> RunSummary {
        self.summary.finish();
        self.summary
    }
}
