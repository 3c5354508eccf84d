//! Navbar Layout
//!
//! View tree introspection and the collapsing profile header.
//!
//! - [`tree`]: tagged view tree with a closed set of node kinds
//! - [`finder`]: locate the real container a marker node is attached to
//! - [`introspect`]: marker injection and hooks re-run on mount and update
//! - [`scroll`]: scroll container and the weak handle the controller drives
//! - [`widgets`]: the scroll-driven profile header controller and its transforms
//! - [`screen`]: a screen harness wiring all of the above together
//!
//! # Example
//!
//! ```rust
//! use navbar_core::Rect;
//! use navbar_layout::prelude::*;
//! use std::time::Duration;
//!
//! let mut screen = ProfileScreen::new(ScreenConfig::default());
//! screen.mount();
//! assert!(screen.is_tracking());
//!
//! screen.measure(
//!     Rect::new(16.0, 136.0, 240.0, 24.0),
//!     Rect::new(0.0, 0.0, 390.0, 220.0),
//! );
//! screen.drag(55.0);
//! assert!(screen.controller().progress() > 0.0);
//!
//! // Let the scroll settle: the header snaps back open
//! for _ in 0..60 {
//!     screen.tick(Duration::from_millis(16));
//! }
//! assert_eq!(screen.container_offset(), Some(0.0));
//! assert_eq!(screen.controller().progress(), 0.0);
//! ```

pub mod config;
pub mod error;
pub mod finder;
pub mod introspect;
pub mod screen;
pub mod scroll;
pub mod tree;
pub mod widgets;

pub use error::{ConfigError, FindError, NavbarError, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::config::{ProfileHeaderConfig, ScreenConfig};
    pub use crate::error::{FindError, NavbarError};
    pub use crate::finder::{FinderCapabilities, ViewFinder};
    pub use crate::introspect::{HookId, Introspector};
    pub use crate::screen::ProfileScreen;
    pub use crate::scroll::{ScrollConfig, ScrollContainer, ScrollTarget, ScrollableHandle};
    pub use crate::tree::{NodeId, NodeKind, ViewTree};
    pub use crate::widgets::{
        DerivedField, DerivedState, HeaderPhase, HeaderTransform, ProfileLayout, ScrollMetrics,
        ScrollProfileController, SnapTarget, Subscription, HEADER_SPACE,
    };
}
