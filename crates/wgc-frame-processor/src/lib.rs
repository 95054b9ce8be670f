//! A thin adapter between Windows Graphics Capture / DXGI and an abstract
//! frame sink.
//!
//! One [`WgcFrameProcessor`] per monitor: it negotiates a Direct3D 11
//! device, binds a capture session to the monitor's `GraphicsCaptureItem`,
//! and on each [`process_frame`](WgcFrameProcessor::process_frame) tick
//! copies the newest GPU frame into a CPU-readable staging texture and hands
//! the raw BGRA8 bytes to a [`FrameSink`]. Monitor enumeration and the tick
//! cadence belong to the external driver loop.

pub mod capabilities;
pub mod classify;
pub mod directx;
pub mod duplication;
pub mod monitor;
pub mod processor;
pub mod scoped_mapping;
pub mod sink;

pub use capabilities::SessionCapabilities;
pub use classify::{ClassifiedError, ErrorKind, classify};
pub use directx::DirectX;
pub use duplication::{FrameLease, rotate_dirty_rect};
pub use monitor::MonitorDescriptor;
pub use processor::WgcFrameProcessor;
pub use scoped_mapping::ScopedMapping;
pub use sink::FrameSink;
