//! Progress reporting port
//!
//! The deliberation engine reports every generation call through a
//! [`ProgressSink`] instead of touching job state itself, which keeps the
//! engine a pure function of its inputs and the gateway.

use council_domain::{Stage, StageProgress};
use tokio::sync::mpsc;

/// Callback for progress updates during a council review
pub trait ProgressSink: Send + Sync {
    /// Called when a stage starts, with the number of calls it will issue
    fn on_stage_start(&self, _stage: Stage, _total_calls: usize) {}

    /// Called immediately before each generation call
    fn on_call_start(&self, progress: &StageProgress);

    /// Called when a generation call resolves
    fn on_call_complete(&self, _stage: Stage, _step: &str, _success: bool) {}

    /// Called when every call of a stage has resolved
    fn on_stage_complete(&self, _stage: Stage) {}
}

/// No-op progress sink for when progress reporting is not needed
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_call_start(&self, _progress: &StageProgress) {}
}

/// Forwards call-start markers into a channel.
///
/// Sending never blocks the engine; once the receiver is gone updates are
/// silently dropped, matching the best-effort nature of progress tracking.
pub struct ChannelProgressSink {
    sender: mpsc::UnboundedSender<StageProgress>,
}

impl ChannelProgressSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StageProgress>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn on_call_start(&self, progress: &StageProgress) {
        let _ = self.sender.send(progress.clone());
    }
}

/// A progress sink that delegates to multiple inner sinks.
///
/// The dispatcher composes its status-store channel with an optional
/// caller-supplied observer (e.g. a terminal progress bar).
pub struct CompositeProgressSink<'a> {
    delegates: Vec<&'a dyn ProgressSink>,
}

impl<'a> CompositeProgressSink<'a> {
    pub fn new(delegates: Vec<&'a dyn ProgressSink>) -> Self {
        Self { delegates }
    }
}

/// Macro to delegate a method call to all inner sinks.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ProgressSink for CompositeProgressSink<'_> {
    fn on_stage_start(&self, stage: Stage, total_calls: usize) {
        delegate!(self, on_stage_start, stage, total_calls);
    }

    fn on_call_start(&self, progress: &StageProgress) {
        delegate!(self, on_call_start, progress);
    }

    fn on_call_complete(&self, stage: Stage, step: &str, success: bool) {
        delegate!(self, on_call_complete, stage, step, success);
    }

    fn on_stage_complete(&self, stage: Stage) {
        delegate!(self, on_stage_complete, stage);
    }
}

/// Step label used for the stage 4 call
pub const SYNTHESIS_STEP: &str = "synthesis";
