//! Tests for the duplication frame lease
//!

use wgc_frame_processor::{DirectX, FrameLease};
use windows::Win32::Graphics::Dxgi::{
    DXGI_ERROR_WAIT_TIMEOUT, DXGI_OUTDUPL_FRAME_INFO, IDXGIDevice, IDXGIOutput1,
    IDXGIOutputDuplication,
};
use windows_core::Interface;

fn create_duplication(direct_x: &DirectX) -> IDXGIOutputDuplication {
    let dxgi_device: IDXGIDevice = direct_x.d3d11_device.cast().unwrap();
    let adapter = unsafe { dxgi_device.GetAdapter() }.unwrap();
    let output = unsafe { adapter.EnumOutputs(0) }.unwrap();
    let output_1: IDXGIOutput1 = output.cast().unwrap();

    unsafe { output_1.DuplicateOutput(&direct_x.d3d11_device) }.unwrap()
}

#[test]
fn repeated_acquire_releases_the_previous_frame() {
    let direct_x = DirectX::new().unwrap();
    let duplication = create_duplication(&direct_x);

    let mut lease = FrameLease::new(&duplication);
    let mut frame_info = DXGI_OUTDUPL_FRAME_INFO::default();

    // Acquiring again without a manual release must not double-release;
    // a timeout is the only failure tolerated here.
    for _ in 0..3 {
        match lease.acquire_next_frame(100, &mut frame_info) {
            Ok(_resource) => {}
            Err(error) => assert_eq!(error.code(), DXGI_ERROR_WAIT_TIMEOUT),
        }
    }

    drop(lease);

    // The duplication must still be usable after the lease released its
    // frame on drop.
    let mut lease = FrameLease::new(&duplication);
    match lease.acquire_next_frame(100, &mut frame_info) {
        Ok(_resource) => {}
        Err(error) => assert_eq!(error.code(), DXGI_ERROR_WAIT_TIMEOUT),
    }
}
