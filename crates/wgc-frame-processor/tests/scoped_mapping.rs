//! Tests for the scoped mapping guard
//!

use wgc_frame_processor::{DirectX, ScopedMapping};
use windows::Win32::Graphics::{
    Direct3D11::{
        D3D11_CPU_ACCESS_READ, D3D11_MAP_READ, D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
        ID3D11Resource,
    },
    Dxgi::Common::{DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_SAMPLE_DESC},
};
use windows_core::Interface;

fn staging_resource(direct_x: &DirectX, width: u32, height: u32) -> ID3D11Resource {
    let desc = D3D11_TEXTURE2D_DESC {
        Width: width,
        Height: height,
        MipLevels: 1,
        ArraySize: 1,
        Format: DXGI_FORMAT_B8G8R8A8_UNORM,
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Usage: D3D11_USAGE_STAGING,
        BindFlags: 0,
        CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
        MiscFlags: 0,
    };

    let mut texture = None;
    unsafe {
        direct_x
            .d3d11_device
            .CreateTexture2D(&desc, None, Some(&mut texture))
            .unwrap();
    }

    texture.unwrap().cast().unwrap()
}

#[test]
fn map_returns_readable_rows() {
    let direct_x = DirectX::new().unwrap();
    let resource = staging_resource(&direct_x, 64, 64);

    let mut guard = ScopedMapping::new(&direct_x.d3d11_context);
    let mapping = guard.map(&resource, 0, D3D11_MAP_READ, 0).unwrap();

    assert!(!mapping.pData.is_null());
    assert!(mapping.RowPitch >= 64 * 4);
}

#[test]
fn remapping_swaps_resources_without_leaking_a_map() {
    let direct_x = DirectX::new().unwrap();
    let first = staging_resource(&direct_x, 32, 32);
    let second = staging_resource(&direct_x, 128, 128);

    let mut guard = ScopedMapping::new(&direct_x.d3d11_context);

    let mapping = guard.map(&first, 0, D3D11_MAP_READ, 0).unwrap();
    assert!(!mapping.pData.is_null());

    // Mapping another resource must unmap the first before mapping.
    let mapping = guard.map(&second, 0, D3D11_MAP_READ, 0).unwrap();
    assert!(!mapping.pData.is_null());

    // And mapping the first again proves it was released.
    let mapping = guard.map(&first, 0, D3D11_MAP_READ, 0).unwrap();
    assert!(!mapping.pData.is_null());

    drop(guard);

    // After the guard is gone the resource must be mappable directly.
    let mut check = ScopedMapping::new(&direct_x.d3d11_context);
    let mapping = check.map(&first, 0, D3D11_MAP_READ, 0).unwrap();
    assert!(!mapping.pData.is_null());
}
