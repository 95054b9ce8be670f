//! RAII pairing of `ID3D11DeviceContext::Map` with its `Unmap`.

use windows::Win32::Graphics::Direct3D11::{
    D3D11_MAP, D3D11_MAPPED_SUBRESOURCE, ID3D11DeviceContext, ID3D11Resource,
};
use windows_result::Result as WindowsResult;

/// Guard that tracks the one mapped (resource, subresource) pair on a device
/// context and guarantees exactly one matching unmap.
///
/// Callers must not call `Unmap` themselves and must not retain the mapped
/// pointer past the guard's lifetime.
pub struct ScopedMapping<'a> {
    context: &'a ID3D11DeviceContext,
    mapped: Option<(ID3D11Resource, u32)>,
}

impl<'a> ScopedMapping<'a> {
    /// Create a guard for a context; the context is borrowed, not owned.
    pub fn new(context: &'a ID3D11DeviceContext) -> Self {
        Self {
            context,
            mapped: None,
        }
    }

    /// Map a resource for CPU access, unmapping any previously mapped
    /// resource first.
    pub fn map(
        &mut self,
        resource: &ID3D11Resource,
        subresource: u32,
        map_type: D3D11_MAP,
        flags: u32,
    ) -> WindowsResult<D3D11_MAPPED_SUBRESOURCE> {
        self.unmap_current();

        let mut mapping = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context
                .Map(resource, subresource, map_type, flags, Some(&mut mapping))?;
        }
        self.mapped = Some((resource.clone(), subresource));

        Ok(mapping)
    }

    fn unmap_current(&mut self) {
        if let Some((resource, subresource)) = self.mapped.take() {
            unsafe { self.context.Unmap(&resource, subresource) };
        }
    }
}

impl Drop for ScopedMapping<'_> {
    fn drop(&mut self) {
        self.unmap_current();
    }
}
