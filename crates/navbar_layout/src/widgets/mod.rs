//! Header widgets
//!
//! - [`profile_header`]: scroll offset to collapse progress, settle and snap
//! - [`header_transform`]: visual properties derived from the collapse state

pub mod header_transform;
pub mod profile_header;

pub use header_transform::HeaderTransform;
pub use profile_header::{
    DerivedField, DerivedState, HeaderPhase, ProfileLayout, ScrollMetrics,
    ScrollProfileController, SnapTarget, Subscription, HEADER_SPACE,
};
