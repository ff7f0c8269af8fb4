// src/progress.rs
/// Progress reporting for the operator workflows (fetch, populate, generate).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of steps (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One step finished ("fetched", "parsed", "saved").
    fn step(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects status lines; used by tests and by callers that show them later.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub lines: Vec<String>,
}

impl Progress for RecordingProgress {
    fn log(&mut self, msg: &str) {
        self.lines.push(s!(msg));
    }
    fn step(&mut self, label: &str) {
        self.lines.push(join!("✓ ", label));
    }
}
