//! Navbar Core Runtime
//!
//! This crate provides the foundational primitives shared by the navbar crates:
//!
//! - **Geometry**: points, sizes, rects and the coordinate spaces they are measured in
//! - **Observable Cells**: explicit change notification with ordered subscriptions
//! - **Events**: scroll, layout and lifecycle notifications delivered by the host
//! - **Thread Affinity**: debug-build checks that UI state is only touched on its owning thread
//!
//! # Example
//!
//! ```rust
//! use navbar_core::reactive::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut progress = Observable::new(0.0f32);
//! let seen = Rc::new(Cell::new(0.0f32));
//!
//! let seen_clone = seen.clone();
//! let _sub = progress.subscribe(move |v| seen_clone.set(*v));
//!
//! // Only changes are delivered
//! assert!(progress.set(0.5));
//! assert!(!progress.set(0.5));
//! assert_eq!(seen.get(), 0.5);
//! ```

pub mod affinity;
pub mod events;
pub mod geometry;
pub mod reactive;

pub use affinity::ThreadAffinity;
pub use events::{Event, EventData, EventType, MeasuredRegion};
pub use geometry::{CoordinateSpace, Point, Rect, Size};
pub use reactive::{Observable, SubscriptionId};
