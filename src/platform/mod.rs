//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic clocks)
//! - Frame scheduling (cancelable per-frame loop)

pub mod clock;
pub mod frame_loop;

pub use clock::{Clock, ManualClock};
pub use frame_loop::{FrameLoop, FrameStatus, LoopHandle};
