mod engine;
mod format;
mod phase;
mod progress;

pub use engine::{CountdownEngine, Notification, Snapshot, TimerState};
pub use format::format_remaining;
pub use phase::{Phase, TimerSettings};
pub use progress::ProgressTracker;
