//! The consumer side of the capture pipeline.

use crate::monitor::MonitorDescriptor;

/// Consumer of raw capture bytes, one per processor instance.
pub trait FrameSink {
    /// Called once per tick that drained a frame.
    ///
    /// `data` holds `row_pitch * monitor.height` bytes of BGRA8
    /// straight-alpha pixels laid out in rows of `row_pitch` bytes. The slice
    /// aliases the mapped staging texture and is only valid for the duration
    /// of the call; implementations must copy what they keep.
    fn frame_captured(&mut self, monitor: &MonitorDescriptor, data: &[u8], row_pitch: usize);
}
