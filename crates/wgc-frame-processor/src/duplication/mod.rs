//! Helpers for the DXGI output-duplication acquisition path.

mod rotate;

pub use rotate::rotate_dirty_rect;

use tracing::warn;
use windows::Win32::{
    Foundation::E_POINTER,
    Graphics::Dxgi::{
        DXGI_ERROR_WAIT_TIMEOUT, DXGI_OUTDUPL_FRAME_INFO, IDXGIOutputDuplication, IDXGIResource,
    },
};
use windows_result::{Error as WindowsError, Result as WindowsResult};

use crate::classify::{FRAME_INFO_ERRORS, classify};

/// RAII lease over the single outstanding frame an output duplication allows.
///
/// Acquiring releases any frame still held by this lease first; dropping the
/// lease releases exactly once. Release failures never propagate: a timeout
/// is ignored outright, anything else is classified and logged, because the
/// capture loop must survive a failed release.
pub struct FrameLease<'a> {
    duplication: &'a IDXGIOutputDuplication,
    holding: bool,
}

impl<'a> FrameLease<'a> {
    /// Create a lease for a duplication; the duplication is borrowed, not
    /// owned.
    pub fn new(duplication: &'a IDXGIOutputDuplication) -> Self {
        Self {
            duplication,
            holding: false,
        }
    }

    /// Acquire the next duplication frame, waiting up to `timeout_ms`.
    pub fn acquire_next_frame(
        &mut self,
        timeout_ms: u32,
        frame_info: &mut DXGI_OUTDUPL_FRAME_INFO,
    ) -> WindowsResult<IDXGIResource> {
        self.try_release();

        let mut resource = None;
        let result = unsafe {
            self.duplication
                .AcquireNextFrame(timeout_ms, frame_info, &mut resource)
        };
        self.holding = result.is_ok();
        result?;

        resource.ok_or_else(|| {
            WindowsError::new(E_POINTER, "AcquireNextFrame succeeded without a resource")
        })
    }

    fn try_release(&mut self) {
        if self.holding {
            if let Err(error) = unsafe { self.duplication.ReleaseFrame() } {
                if error.code() != DXGI_ERROR_WAIT_TIMEOUT {
                    let classified = classify(
                        None,
                        "IDXGIOutputDuplication::ReleaseFrame",
                        error.code(),
                        FRAME_INFO_ERRORS,
                    );
                    warn!("failed to release duplication frame: {classified}");
                }
            }
        }
        self.holding = false;
    }
}

impl Drop for FrameLease<'_> {
    fn drop(&mut self) {
        self.try_release();
    }
}
