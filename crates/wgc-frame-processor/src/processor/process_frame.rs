use core::slice;

use tracing::debug;
use windows::{
    Graphics::Capture::Direct3D11CaptureFrame,
    Win32::{
        Foundation::{E_POINTER, S_OK},
        Graphics::Direct3D11::{
            D3D11_CPU_ACCESS_READ, D3D11_MAP_READ, D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
            ID3D11Device, ID3D11Resource, ID3D11Texture2D,
        },
        System::WinRT::Direct3D11::IDirect3DDxgiInterfaceAccess,
    },
};
use windows_core::Interface;
use windows_result::{Error as WindowsError, Result as WindowsResult};

use crate::{
    classify::{ClassifiedError, SYSTEM_TRANSITION_ERRORS, classify},
    monitor::MonitorDescriptor,
    scoped_mapping::ScopedMapping,
    sink::FrameSink,
};

use super::{WgcFrameProcessor, copy_region::CopyStrategy};

impl<S: FrameSink> WgcFrameProcessor<S> {
    /// Drain the newest ready frame, if any, and forward its pixels to the
    /// sink.
    ///
    /// This is a non-blocking poll: `Ok(())` is returned immediately when no
    /// frame is ready. A failed tick aborts only that tick; the processor
    /// stays usable and the retry cadence belongs to the external driver.
    pub fn process_frame(&mut self, current: &MonitorDescriptor) -> Result<(), ClassifiedError> {
        let frame = match self.frame_pool.TryGetNextFrame() {
            Ok(frame) => frame,
            // A drained pool surfaces as a null frame, which windows-rs
            // reports as an error carrying S_OK. Not an error, nothing to do
            // this tick.
            Err(error) if error.code().is_ok() => return Ok(()),
            Err(error) => {
                return Err(classify(
                    None,
                    "Direct3D11CaptureFramePool::TryGetNextFrame",
                    error.code(),
                    &[],
                ));
            }
        };

        let result = self.consume_frame(&frame, current);

        // Frames must never outlive the tick that drained them.
        if let Err(error) = frame.Close() {
            debug!("failed to close capture frame: {error}");
        }

        result
    }

    fn consume_frame(
        &mut self,
        frame: &Direct3D11CaptureFrame,
        current: &MonitorDescriptor,
    ) -> Result<(), ClassifiedError> {
        let surface_texture = surface_texture(frame).map_err(|e| {
            classify(
                Some(&self.devices.d3d11_device),
                "IDirect3DDxgiInterfaceAccess::GetInterface",
                e.code(),
                &[],
            )
        })?;

        let staging = match &mut self.staging {
            Some(staging) => staging,
            staging => staging.insert(
                create_staging_texture(&self.devices.d3d11_device, &surface_texture, &self.selected)
                    .map_err(|e| {
                        classify(
                            Some(&self.devices.d3d11_device),
                            "ID3D11Device::CreateTexture2D",
                            e.code(),
                            SYSTEM_TRANSITION_ERRORS,
                        )
                    })?,
            ),
        };

        let origin = (
            self.output_desc.DesktopCoordinates.left,
            self.output_desc.DesktopCoordinates.top,
        );
        match CopyStrategy::select(&self.selected, current, origin) {
            CopyStrategy::Full => unsafe {
                self.devices
                    .d3d11_context
                    .CopyResource(&*staging, &surface_texture);
            },
            CopyStrategy::Region(source_box) => unsafe {
                self.devices.d3d11_context.CopySubresourceRegion(
                    &*staging,
                    0,
                    0,
                    0,
                    0,
                    &surface_texture,
                    0,
                    Some(&source_box),
                );
            },
        }

        let staging_resource: ID3D11Resource = staging.cast().map_err(|e| {
            classify(
                Some(&self.devices.d3d11_device),
                "ID3D11Texture2D::cast",
                e.code(),
                &[],
            )
        })?;

        let mut mapping_guard = ScopedMapping::new(&self.devices.d3d11_context);
        let mapping = mapping_guard
            .map(&staging_resource, 0, D3D11_MAP_READ, 0)
            .map_err(|e| {
                classify(
                    Some(&self.devices.d3d11_device),
                    "ID3D11DeviceContext::Map",
                    e.code(),
                    SYSTEM_TRANSITION_ERRORS,
                )
            })?;

        if mapping.pData.is_null() {
            return Err(classify(
                Some(&self.devices.d3d11_device),
                "ID3D11DeviceContext::Map",
                S_OK,
                SYSTEM_TRANSITION_ERRORS,
            ));
        }

        let row_pitch = mapping.RowPitch as usize;
        let len = row_pitch * self.selected.height as usize;
        // Aliases the mapped staging texture; valid until the guard unmaps.
        let data = unsafe { slice::from_raw_parts(mapping.pData as *const u8, len) };

        self.sink.frame_captured(&self.selected, data, row_pitch);

        Ok(())
    }
}

/// Resolve a frame's WinRT surface as a D3D11 texture.
fn surface_texture(frame: &Direct3D11CaptureFrame) -> WindowsResult<ID3D11Texture2D> {
    let surface = frame.Surface()?;
    let access: IDirect3DDxgiInterfaceAccess = surface.cast()?;
    unsafe { access.GetInterface::<ID3D11Texture2D>() }
}

/// Create the CPU-readable staging texture.
///
/// Format, mip, and array parameters follow the live surface, but the
/// dimensions anticipate the monitor's configured capture region rather than
/// the surface's own size.
fn create_staging_texture(
    device: &ID3D11Device,
    surface: &ID3D11Texture2D,
    selected: &MonitorDescriptor,
) -> WindowsResult<ID3D11Texture2D> {
    let mut surface_desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { surface.GetDesc(&mut surface_desc) };

    let staging_desc = D3D11_TEXTURE2D_DESC {
        Width: selected.width,
        Height: selected.height,
        Usage: D3D11_USAGE_STAGING,
        BindFlags: 0,
        CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
        MiscFlags: 0,
        ..surface_desc
    };

    let mut texture = None;
    unsafe { device.CreateTexture2D(&staging_desc, None, Some(&mut texture))? };

    texture.ok_or_else(|| WindowsError::new(E_POINTER, "CreateTexture2D returned no texture"))
}
