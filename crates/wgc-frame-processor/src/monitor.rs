//! The caller-supplied capture target.

/// Identity and geometry of the monitor a processor captures.
///
/// Resolved by the caller at session creation and never re-read from the OS
/// afterwards; the per-tick descriptor passed to
/// [`process_frame`](crate::WgcFrameProcessor::process_frame) may carry
/// different dimensions once the live mode has diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorDescriptor {
    /// Index of the DXGI adapter the monitor's output lives on.
    pub adapter: u32,

    /// Index of the output on that adapter.
    pub output: u32,

    /// Logical width in pixels.
    pub width: u32,

    /// Logical height in pixels.
    pub height: u32,

    /// Desktop-coordinate X offset of the monitor's top-left corner.
    pub offset_x: i32,

    /// Desktop-coordinate Y offset of the monitor's top-left corner.
    pub offset_y: i32,
}
