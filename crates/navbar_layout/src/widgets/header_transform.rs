//! Visual properties of the collapsing header
//!
//! The title shrinks from the large profile size (24pt) to the navigation
//! bar size (17pt), the bio fades out faster than it shrinks, and the
//! navigation bar backdrop only appears once the header is fully collapsed.

use super::profile_header::DerivedState;

/// Large title size
const TITLE_SIZE: f32 = 24.0;
/// Navigation bar title size
const NAV_TITLE_SIZE: f32 = 17.0;

/// Per-frame transform of the profile header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderTransform {
    pub title_scale: f32,
    pub description_scale: f32,
    pub description_alpha: f32,
    pub background_opacity: f32,
    /// 1 once collapsed, otherwise 0
    pub nav_backdrop_opacity: f32,
    pub translation_y: f32,
}

impl HeaderTransform {
    pub fn from_state(state: &DerivedState) -> Self {
        let p = state.progress;
        Self {
            title_scale: (1.0 - 0.25 * p).clamp(NAV_TITLE_SIZE / TITLE_SIZE, 1.0),
            description_scale: 1.0 - p,
            description_alpha: (1.0 - 1.5 * p).clamp(0.0, 1.0),
            background_opacity: 1.0 - p,
            nav_backdrop_opacity: if (p - 1.0).abs() < 0.01 { 1.0 } else { 0.0 },
            translation_y: state.offset,
        }
    }

    /// Title font size after scaling
    pub fn title_size(&self) -> f32 {
        TITLE_SIZE * self.title_scale
    }
}

impl Default for HeaderTransform {
    fn default() -> Self {
        Self::from_state(&DerivedState::default())
    }
}

impl From<DerivedState> for HeaderTransform {
    fn from(state: DerivedState) -> Self {
        Self::from_state(&state)
    }
}
