//! Capability probing for capture-session properties that only exist on
//! newer OS builds.

use tracing::debug;
use windows::Foundation::Metadata::ApiInformation;
use windows_core::HSTRING;

const SESSION_TYPE_NAME: &str = "Windows.Graphics.Capture.GraphicsCaptureSession";

/// Optional `GraphicsCaptureSession` properties, resolved once at session
/// construction instead of probing per call.
#[derive(Debug, Clone, Copy)]
pub struct SessionCapabilities {
    /// `IsBorderRequired` exists, the yellow capture border can be disabled.
    pub can_disable_border: bool,

    /// `IsCursorCaptureEnabled` exists, cursor capture can be toggled.
    pub can_toggle_cursor: bool,
}

impl SessionCapabilities {
    /// Probe the running OS build. A failed probe means the property is
    /// absent, which is skipped, never an error.
    pub fn detect() -> Self {
        let session_type = HSTRING::from(SESSION_TYPE_NAME);

        let can_disable_border =
            ApiInformation::IsPropertyPresent(&session_type, &HSTRING::from("IsBorderRequired"))
                .unwrap_or(false);

        let can_toggle_cursor = ApiInformation::IsPropertyPresent(
            &session_type,
            &HSTRING::from("IsCursorCaptureEnabled"),
        )
        .unwrap_or(false);

        debug!("session capabilities: border={can_disable_border}, cursor={can_toggle_cursor}");

        Self {
            can_disable_border,
            can_toggle_cursor,
        }
    }
}
