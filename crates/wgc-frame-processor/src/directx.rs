//! Direct3D 11 device negotiation.

use windows::{
    Graphics::DirectX::Direct3D11::IDirect3DDevice,
    Win32::{
        Foundation::{E_POINTER, HMODULE},
        Graphics::{
            Direct3D::{
                D3D_DRIVER_TYPE, D3D_DRIVER_TYPE_HARDWARE, D3D_DRIVER_TYPE_REFERENCE,
                D3D_DRIVER_TYPE_WARP, D3D_FEATURE_LEVEL, D3D_FEATURE_LEVEL_9_1,
                D3D_FEATURE_LEVEL_10_0, D3D_FEATURE_LEVEL_10_1, D3D_FEATURE_LEVEL_11_0,
            },
            Direct3D11::{
                D3D11_CREATE_DEVICE_FLAG, D3D11_SDK_VERSION, D3D11CreateDevice, ID3D11Device,
                ID3D11DeviceContext,
            },
            Dxgi::IDXGIDevice,
        },
        System::WinRT::Direct3D11::CreateDirect3D11DeviceFromDXGIDevice,
    },
};
use windows_core::Interface;
use windows_result::{Error as WindowsError, Result as WindowsResult};

use crate::classify::{ClassifiedError, classify};

/// Driver types tried in order, stopping at the first that succeeds.
const DRIVER_TYPES: [D3D_DRIVER_TYPE; 3] = [
    D3D_DRIVER_TYPE_HARDWARE,
    D3D_DRIVER_TYPE_WARP,
    D3D_DRIVER_TYPE_REFERENCE,
];

/// Feature levels accepted from the created device.
const FEATURE_LEVELS: [D3D_FEATURE_LEVEL; 4] = [
    D3D_FEATURE_LEVEL_11_0,
    D3D_FEATURE_LEVEL_10_1,
    D3D_FEATURE_LEVEL_10_0,
    D3D_FEATURE_LEVEL_9_1,
];

/// The Direct3D devices backing one frame processor.
pub struct DirectX {
    /// Used to create the staging texture and query device-loss state.
    pub d3d11_device: ID3D11Device,

    /// Used to copy and map GPU surfaces.
    pub d3d11_context: ID3D11DeviceContext,

    /// The WinRT interop device the frame pool is created against.
    pub d3d_device: IDirect3DDevice,
}

impl DirectX {
    /// Create the device set, falling back through the driver types.
    pub fn new() -> Result<Self, ClassifiedError> {
        let (d3d11_device, d3d11_context) =
            create_device().map_err(|e| classify(None, "D3D11CreateDevice", e.code(), &[]))?;

        let dxgi_device: IDXGIDevice = d3d11_device
            .cast()
            .map_err(|e| classify(Some(&d3d11_device), "ID3D11Device::cast", e.code(), &[]))?;

        let d3d_device = {
            let inspectable = unsafe { CreateDirect3D11DeviceFromDXGIDevice(&dxgi_device) }
                .map_err(|e| {
                    classify(
                        Some(&d3d11_device),
                        "CreateDirect3D11DeviceFromDXGIDevice",
                        e.code(),
                        &[],
                    )
                })?;

            inspectable
                .cast()
                .map_err(|e| classify(Some(&d3d11_device), "IInspectable::cast", e.code(), &[]))?
        };

        Ok(Self {
            d3d11_device,
            d3d11_context,
            d3d_device,
        })
    }
}

fn create_device() -> WindowsResult<(ID3D11Device, ID3D11DeviceContext)> {
    let mut last_error = WindowsError::new(E_POINTER, "D3D11CreateDevice returned no device");

    for driver_type in DRIVER_TYPES {
        let mut device = None;
        let mut context = None;

        let result = unsafe {
            D3D11CreateDevice(
                None,
                driver_type,
                HMODULE::default(),
                D3D11_CREATE_DEVICE_FLAG(0),
                Some(&FEATURE_LEVELS),
                D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                Some(&mut context),
            )
        };

        match result {
            Ok(()) => {
                if let (Some(device), Some(context)) = (device, context) {
                    return Ok((device, context));
                }
            }
            Err(error) => last_error = error,
        }
    }

    Err(last_error)
}
