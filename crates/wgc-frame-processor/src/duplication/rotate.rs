use windows::Win32::{
    Foundation::RECT,
    Graphics::Dxgi::Common::{
        DXGI_MODE_ROTATION, DXGI_MODE_ROTATION_ROTATE90, DXGI_MODE_ROTATION_ROTATE180,
        DXGI_MODE_ROTATION_ROTATE270,
    },
};

/// Convert a dirty rect from rotated display space into unrotated space.
///
/// `width` and `height` are the display's logical dimensions. Identity and
/// unspecified rotations pass the rect through unchanged. Exact integer
/// arithmetic, no clamping.
pub fn rotate_dirty_rect(
    dirty: RECT,
    rotation: DXGI_MODE_ROTATION,
    width: i32,
    height: i32,
) -> RECT {
    match rotation {
        DXGI_MODE_ROTATION_ROTATE90 => RECT {
            left: width - dirty.bottom,
            top: dirty.left,
            right: width - dirty.top,
            bottom: dirty.right,
        },
        DXGI_MODE_ROTATION_ROTATE180 => RECT {
            left: width - dirty.right,
            top: height - dirty.bottom,
            right: width - dirty.left,
            bottom: height - dirty.top,
        },
        DXGI_MODE_ROTATION_ROTATE270 => RECT {
            left: dirty.top,
            top: height - dirty.right,
            right: dirty.bottom,
            bottom: height - dirty.left,
        },
        _ => dirty,
    }
}
