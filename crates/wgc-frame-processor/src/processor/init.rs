use tracing::info_span;
use windows::{
    Foundation::TypedEventHandler,
    Graphics::{
        Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem, GraphicsCaptureSession},
        DirectX::DirectXPixelFormat,
    },
    Win32::{
        Graphics::{
            Dxgi::{CreateDXGIFactory1, DXGI_OUTPUT_DESC, IDXGIFactory1},
            Gdi::HMONITOR,
        },
        System::WinRT::Graphics::Capture::IGraphicsCaptureItemInterop,
    },
};
use windows_core::IInspectable;
use windows_result::Result as WindowsResult;

use crate::{
    capabilities::SessionCapabilities,
    classify::{ClassifiedError, ENUM_OUTPUTS_ERRORS, SYSTEM_TRANSITION_ERRORS, classify},
    directx::DirectX,
    monitor::MonitorDescriptor,
    sink::FrameSink,
};

use super::WgcFrameProcessor;

/// Two frames so one can be mid-processing while the next arrives.
const FRAME_POOL_DEPTH: i32 = 2;

impl<S: FrameSink> WgcFrameProcessor<S> {
    /// Create a processor for the given monitor and start its capture
    /// stream.
    ///
    /// Each initialization phase is attempted once; the first failure aborts
    /// with its classified error and partially constructed resources are
    /// dropped by scope.
    pub fn new(monitor: MonitorDescriptor, sink: S) -> Result<Self, ClassifiedError> {
        let _span = info_span!("WgcFrameProcessor::new").entered();

        let devices = DirectX::new()?;
        let (capture_item, frame_pool, session, output_desc) = create_session(&devices, &monitor)?;

        Ok(Self {
            devices,
            selected: monitor,
            output_desc,
            session,
            frame_pool,
            capture_item,
            staging: None,
            sink,
        })
    }
}

/// Resolve the target output, bind the capture session triple to it, and
/// start capturing.
fn create_session(
    devices: &DirectX,
    monitor: &MonitorDescriptor,
) -> Result<
    (
        GraphicsCaptureItem,
        Direct3D11CaptureFramePool,
        GraphicsCaptureSession,
        DXGI_OUTPUT_DESC,
    ),
    ClassifiedError,
> {
    let device = Some(&devices.d3d11_device);

    let factory: IDXGIFactory1 = unsafe { CreateDXGIFactory1() }
        .map_err(|e| classify(None, "CreateDXGIFactory1", e.code(), &[]))?;

    let adapter = unsafe { factory.EnumAdapters1(monitor.adapter) }.map_err(|e| {
        classify(
            device,
            "IDXGIFactory1::EnumAdapters1",
            e.code(),
            SYSTEM_TRANSITION_ERRORS,
        )
    })?;

    let output = unsafe { adapter.EnumOutputs(monitor.output) }.map_err(|e| {
        classify(
            device,
            "IDXGIAdapter1::EnumOutputs",
            e.code(),
            ENUM_OUTPUTS_ERRORS,
        )
    })?;

    let output_desc = unsafe { output.GetDesc() }.map_err(|e| {
        classify(
            device,
            "IDXGIOutput::GetDesc",
            e.code(),
            SYSTEM_TRANSITION_ERRORS,
        )
    })?;

    let capture_item = create_capture_item(output_desc.Monitor).map_err(|e| {
        classify(
            device,
            "IGraphicsCaptureItemInterop::CreateForMonitor",
            e.code(),
            &[],
        )
    })?;

    let capture_size = capture_item
        .Size()
        .map_err(|e| classify(device, "GraphicsCaptureItem::Size", e.code(), &[]))?;

    let frame_pool = Direct3D11CaptureFramePool::CreateFreeThreaded(
        &devices.d3d_device,
        DirectXPixelFormat::B8G8R8A8UIntNormalized,
        FRAME_POOL_DEPTH,
        capture_size,
    )
    .map_err(|e| {
        classify(
            device,
            "Direct3D11CaptureFramePool::CreateFreeThreaded",
            e.code(),
            &[],
        )
    })?;

    let session = frame_pool.CreateCaptureSession(&capture_item).map_err(|e| {
        classify(
            device,
            "Direct3D11CaptureFramePool::CreateCaptureSession",
            e.code(),
            &[],
        )
    })?;

    let capabilities = SessionCapabilities::detect();

    if capabilities.can_disable_border {
        session.SetIsBorderRequired(false).map_err(|e| {
            classify(
                device,
                "GraphicsCaptureSession::SetIsBorderRequired",
                e.code(),
                &[],
            )
        })?;
    }

    // Consumption happens in process_frame; the handler only has to be
    // registered before capture starts so the first arrivals are not
    // dropped.
    frame_pool
        .FrameArrived(
            &TypedEventHandler::<Direct3D11CaptureFramePool, IInspectable>::new(|_, _| Ok(())),
        )
        .map_err(|e| {
            classify(
                device,
                "Direct3D11CaptureFramePool::FrameArrived",
                e.code(),
                &[],
            )
        })?;

    if capabilities.can_toggle_cursor {
        session.SetIsCursorCaptureEnabled(true).map_err(|e| {
            classify(
                device,
                "GraphicsCaptureSession::SetIsCursorCaptureEnabled",
                e.code(),
                &[],
            )
        })?;
    }

    session
        .StartCapture()
        .map_err(|e| classify(device, "GraphicsCaptureSession::StartCapture", e.code(), &[]))?;

    Ok((capture_item, frame_pool, session, output_desc))
}

fn create_capture_item(monitor: HMONITOR) -> WindowsResult<GraphicsCaptureItem> {
    let interop = windows::core::factory::<GraphicsCaptureItem, IGraphicsCaptureItemInterop>()?;
    unsafe { interop.CreateForMonitor(monitor) }
}
