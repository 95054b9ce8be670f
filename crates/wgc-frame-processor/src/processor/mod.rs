//! The per-monitor frame processor.

mod copy_region;
mod init;
mod process_frame;

use tracing::debug;
use windows::{
    Graphics::Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem, GraphicsCaptureSession},
    Win32::Graphics::{Direct3D11::ID3D11Texture2D, Dxgi::DXGI_OUTPUT_DESC},
};

use crate::{directx::DirectX, monitor::MonitorDescriptor, sink::FrameSink};

/// Pulls frames for one monitor from a Windows Graphics Capture session and
/// forwards the raw pixels to a [`FrameSink`].
///
/// The external driver owns the tick cadence: it calls
/// [`process_frame`](Self::process_frame) repeatedly and serializes the
/// calls, there is no internal locking around the staging texture or device
/// context.
pub struct WgcFrameProcessor<S: FrameSink> {
    devices: DirectX,

    /// The monitor geometry recorded at session creation.
    selected: MonitorDescriptor,

    /// Descriptor of the resolved output, read once at init.
    output_desc: DXGI_OUTPUT_DESC,

    // Field order mirrors the teardown dependency chain:
    // session before pool before item.
    session: GraphicsCaptureSession,
    frame_pool: Direct3D11CaptureFramePool,
    capture_item: GraphicsCaptureItem,

    /// Created on the first drained frame, reused for the processor's
    /// lifetime.
    staging: Option<ID3D11Texture2D>,

    sink: S,
}

impl<S: FrameSink> WgcFrameProcessor<S> {
    /// The monitor geometry recorded at session creation.
    pub fn selected_monitor(&self) -> &MonitorDescriptor {
        &self.selected
    }

    /// The descriptor of the output this processor captures.
    pub fn output_desc(&self) -> &DXGI_OUTPUT_DESC {
        &self.output_desc
    }

    /// The capture item the session is bound to.
    pub fn capture_item(&self) -> &GraphicsCaptureItem {
        &self.capture_item
    }

    /// The sink frames are forwarded to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The staging texture, present once a frame has been drained.
    #[doc(hidden)]
    pub fn staging_texture(&self) -> Option<&ID3D11Texture2D> {
        self.staging.as_ref()
    }
}

impl<S: FrameSink> Drop for WgcFrameProcessor<S> {
    fn drop(&mut self) {
        // The session and pool may already be dead after a device loss; a
        // failed Close here has nowhere to go.
        if let Err(error) = self.session.Close() {
            debug!("failed to close capture session: {error}");
        }
        if let Err(error) = self.frame_pool.Close() {
            debug!("failed to close frame pool: {error}");
        }
    }
}
