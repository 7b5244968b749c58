//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime:
//! - one `FrameClock` per surface
//! - `tick()` once per presented frame yields `FrameTime`, whose `uptime_ms`
//!   is what animation is keyed on

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
