//! Maps failed Windows calls onto the retry taxonomy the capture driver
//! understands: expected-transient errors may resolve on their own once the
//! system transition (mode change, session lock, GPU reset) completes,
//! unexpected errors require tearing the processor down.

use thiserror::Error;
use tracing::debug;
use windows::Win32::{
    Foundation::{E_ACCESSDENIED, E_OUTOFMEMORY, WAIT_ABANDONED},
    Graphics::{
        Direct3D11::ID3D11Device,
        Dxgi::{
            DXGI_ERROR_ACCESS_LOST, DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET,
            DXGI_ERROR_INVALID_CALL, DXGI_ERROR_NOT_FOUND, DXGI_ERROR_SESSION_DISCONNECTED,
            DXGI_ERROR_UNSUPPORTED,
        },
    },
};
use windows_core::HRESULT;

// `WAIT_ABANDONED` leaks through DXGI frame acquisition as a raw wait code.
const WAIT_ABANDONED_HRESULT: HRESULT = HRESULT(WAIT_ABANDONED.0 as i32);

/// Errors expected from general DXGI calls during a system transition.
pub const SYSTEM_TRANSITION_ERRORS: &[HRESULT] = &[
    DXGI_ERROR_DEVICE_REMOVED,
    DXGI_ERROR_ACCESS_LOST,
    WAIT_ABANDONED_HRESULT,
];

/// Errors expected from `IDXGIOutput1::DuplicateOutput` during a transition.
pub const CREATE_DUPLICATION_ERRORS: &[HRESULT] = &[
    DXGI_ERROR_DEVICE_REMOVED,
    E_ACCESSDENIED,
    DXGI_ERROR_UNSUPPORTED,
    DXGI_ERROR_SESSION_DISCONNECTED,
];

/// Errors expected from `IDXGIOutputDuplication` methods during a transition.
pub const FRAME_INFO_ERRORS: &[HRESULT] = &[
    DXGI_ERROR_DEVICE_REMOVED,
    DXGI_ERROR_ACCESS_LOST,
    DXGI_ERROR_INVALID_CALL,
];

/// Errors expected from `IDXGIAdapter::EnumOutputs` while outputs are stale
/// during a topology change.
pub const ENUM_OUTPUTS_ERRORS: &[HRESULT] = &[DXGI_ERROR_NOT_FOUND];

/// How the capture driver should treat a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arises from an ordinary system transition; retrying session
    /// construction is reasonable.
    ExpectedTransient,

    /// Carries no retry contract; tear down and recreate the processor.
    Unexpected,
}

/// A failed Windows call together with its classification.
#[derive(Debug, Clone, Error)]
#[error("Windows {call} call failed ({kind:?}): {code:?}")]
pub struct ClassifiedError {
    /// Whether the failure is a known transition condition.
    pub kind: ErrorKind,

    /// The Windows call that failed.
    pub call: &'static str,

    /// The failure code after device-loss normalization.
    pub code: HRESULT,
}

impl ClassifiedError {
    /// Whether retrying session construction is a reasonable response.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::ExpectedTransient
    }
}

/// Classify a failed Windows call.
///
/// When a device is supplied its removal reason takes precedence over the
/// original failure code, with the three GPU-loss reasons collapsed into
/// `DXGI_ERROR_DEVICE_REMOVED`. The normalized code is then matched against
/// `expected`; the empty slice means every real failure is unexpected.
pub fn classify(
    device: Option<&ID3D11Device>,
    call: &'static str,
    code: HRESULT,
    expected: &[HRESULT],
) -> ClassifiedError {
    let translated = match device {
        Some(device) => match unsafe { device.GetDeviceRemovedReason() } {
            // Device is not removed, keep the original failure.
            Ok(()) => code,
            Err(reason) => normalize_removal_reason(reason.code(), code),
        },
        None => code,
    };

    let kind = if expected.contains(&translated) {
        ErrorKind::ExpectedTransient
    } else {
        ErrorKind::Unexpected
    };

    debug!("{call} failed: {code:?} translated to {translated:?}, {kind:?}");

    ClassifiedError {
        kind,
        call,
        code: translated,
    }
}

/// Collapse the removal reasons that indicate external GPU loss into the one
/// canonical code callers handle; any other reason overrides the original
/// failure outright.
fn normalize_removal_reason(reason: HRESULT, original: HRESULT) -> HRESULT {
    if reason == DXGI_ERROR_DEVICE_REMOVED
        || reason == DXGI_ERROR_DEVICE_RESET
        || reason == E_OUTOFMEMORY
    {
        DXGI_ERROR_DEVICE_REMOVED
    } else if reason.is_ok() {
        original
    } else {
        reason
    }
}

#[cfg(test)]
mod tests {
    use windows::Win32::Foundation::{E_FAIL, S_OK};

    use super::*;

    #[test]
    fn gpu_loss_reasons_normalize_to_device_removed() {
        for reason in [DXGI_ERROR_DEVICE_REMOVED, DXGI_ERROR_DEVICE_RESET, E_OUTOFMEMORY] {
            assert_eq!(
                normalize_removal_reason(reason, E_FAIL),
                DXGI_ERROR_DEVICE_REMOVED
            );
            assert_eq!(
                normalize_removal_reason(reason, DXGI_ERROR_ACCESS_LOST),
                DXGI_ERROR_DEVICE_REMOVED
            );
        }
    }

    #[test]
    fn healthy_device_keeps_the_original_code() {
        assert_eq!(normalize_removal_reason(S_OK, E_FAIL), E_FAIL);
    }

    #[test]
    fn other_removal_reason_overrides_the_original_code() {
        assert_eq!(
            normalize_removal_reason(DXGI_ERROR_ACCESS_LOST, E_FAIL),
            DXGI_ERROR_ACCESS_LOST
        );
    }

    #[test]
    fn expected_list_membership_is_transient() {
        let error = classify(None, "test", DXGI_ERROR_ACCESS_LOST, SYSTEM_TRANSITION_ERRORS);
        assert_eq!(error.kind, ErrorKind::ExpectedTransient);
        assert!(error.is_transient());

        let error = classify(None, "test", DXGI_ERROR_NOT_FOUND, ENUM_OUTPUTS_ERRORS);
        assert!(error.is_transient());
    }

    #[test]
    fn absence_from_expected_list_is_unexpected() {
        let error = classify(None, "test", E_FAIL, SYSTEM_TRANSITION_ERRORS);
        assert_eq!(error.kind, ErrorKind::Unexpected);
    }

    #[test]
    fn empty_expected_list_is_always_unexpected() {
        for code in [E_FAIL, DXGI_ERROR_ACCESS_LOST, DXGI_ERROR_DEVICE_REMOVED] {
            let error = classify(None, "test", code, &[]);
            assert_eq!(error.kind, ErrorKind::Unexpected);
        }
    }

    #[test]
    fn abandoned_wait_is_a_transition_error() {
        let error = classify(None, "test", WAIT_ABANDONED_HRESULT, SYSTEM_TRANSITION_ERRORS);
        assert!(error.is_transient());
    }
}
