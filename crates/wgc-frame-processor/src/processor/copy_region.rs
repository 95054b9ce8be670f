use windows::Win32::Graphics::Direct3D11::D3D11_BOX;

use crate::monitor::MonitorDescriptor;

/// How a frame's GPU surface is copied into the staging texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CopyStrategy {
    /// The live monitor still matches the session geometry; copy the whole
    /// surface.
    Full,

    /// The monitor's reported size has diverged from the size recorded at
    /// session start; copy only the originally selected region.
    Region(D3D11_BOX),
}

impl CopyStrategy {
    /// Select the copy path for one tick.
    ///
    /// The full path is taken iff the current dimensions exactly equal the
    /// dimensions recorded at session start; offsets do not participate in
    /// the decision. The sub-region box is the selected monitor's rect
    /// expressed relative to the output's desktop-coordinate origin.
    pub(crate) fn select(
        selected: &MonitorDescriptor,
        current: &MonitorDescriptor,
        output_origin: (i32, i32),
    ) -> Self {
        if current.width == selected.width && current.height == selected.height {
            return Self::Full;
        }

        let left = selected.offset_x - output_origin.0;
        let top = selected.offset_y - output_origin.1;

        Self::Region(D3D11_BOX {
            left: left as u32,
            top: top as u32,
            right: (left + selected.width as i32) as u32,
            bottom: (top + selected.height as i32) as u32,
            front: 0,
            back: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(width: u32, height: u32, offset_x: i32, offset_y: i32) -> MonitorDescriptor {
        MonitorDescriptor {
            adapter: 0,
            output: 0,
            width,
            height,
            offset_x,
            offset_y,
        }
    }

    #[test]
    fn matching_dimensions_take_the_full_path() {
        let selected = monitor(1920, 1080, 0, 0);
        let current = monitor(1920, 1080, 0, 0);
        assert_eq!(
            CopyStrategy::select(&selected, &current, (0, 0)),
            CopyStrategy::Full
        );
    }

    #[test]
    fn matching_dimensions_with_different_offsets_still_take_the_full_path() {
        let selected = monitor(1920, 1080, 0, 0);
        let current = monitor(1920, 1080, 1920, 540);
        assert_eq!(
            CopyStrategy::select(&selected, &current, (0, 0)),
            CopyStrategy::Full
        );
    }

    #[test]
    fn diverged_dimensions_take_the_region_path() {
        let selected = monitor(1920, 1080, 100, 200);
        let current = monitor(1280, 720, 100, 200);

        let CopyStrategy::Region(source_box) = CopyStrategy::select(&selected, &current, (64, 32))
        else {
            panic!("expected the region path");
        };

        assert_eq!(source_box.left, 36);
        assert_eq!(source_box.right, 36 + 1920);
        assert_eq!(source_box.top, 168);
        assert_eq!(source_box.bottom, 168 + 1080);
        assert_eq!(source_box.front, 0);
        assert_eq!(source_box.back, 1);
    }

    #[test]
    fn region_extent_comes_from_the_selected_monitor() {
        // A mode change to 1280 wide still copies the 1920 wide region
        // recorded at session start.
        let selected = monitor(1920, 1080, 0, 0);
        let current = monitor(1280, 1080, 0, 0);

        let CopyStrategy::Region(source_box) = CopyStrategy::select(&selected, &current, (0, 0))
        else {
            panic!("expected the region path");
        };

        assert_eq!(source_box.right - source_box.left, 1920);
        assert_eq!(source_box.bottom - source_box.top, 1080);
    }

    #[test]
    fn height_only_divergence_takes_the_region_path() {
        let selected = monitor(1920, 1080, 0, 0);
        let current = monitor(1920, 1200, 0, 0);
        assert_ne!(
            CopyStrategy::select(&selected, &current, (0, 0)),
            CopyStrategy::Full
        );
    }
}
