//! Event types
//!
//! Notifications delivered by the host rendering/layout system: scroll offset
//! changes, layout measurements and container lifecycle.

use crate::geometry::{CoordinateSpace, Rect};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    /// Scroll offset of a container changed
    pub const SCROLL: EventType = 30;
    /// Layout measured a frame
    pub const LAYOUT: EventType = 40;

    // Element lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;
}

/// Which part of the header a layout measurement describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasuredRegion {
    /// The username text that merges into the navigation bar title
    Title,
    /// The whole profile header
    Header,
}

/// A host event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Raw vertical content offset of the scroll container
    ScrollOffset { y: f32 },
    /// Measured frame, tagged with the space it was measured in
    Frame {
        region: MeasuredRegion,
        rect: Rect,
        space: CoordinateSpace,
    },
    None,
}

impl Event {
    pub fn scroll(y: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::ScrollOffset { y },
        }
    }

    pub fn frame(region: MeasuredRegion, rect: Rect, space: CoordinateSpace) -> Self {
        Self {
            event_type: event_types::LAYOUT,
            data: EventData::Frame {
                region,
                rect,
                space,
            },
        }
    }

    pub fn mount() -> Self {
        Self {
            event_type: event_types::MOUNT,
            data: EventData::None,
        }
    }

    pub fn unmount() -> Self {
        Self {
            event_type: event_types::UNMOUNT,
            data: EventData::None,
        }
    }
}
