//! Navbar Animation System
//!
//! Time-driven primitives for the collapsing header.
//!
//! # Features
//!
//! - **Timers**: host-ticked scheduler with cancellable one-shot timers
//! - **Debounce**: quiet-window detection built on the scheduler
//! - **Cooldown**: time-boxed lock that drops overlapping requests
//! - **Tweens**: eased scroll-to animations, retargetable mid-flight
//!
//! Nothing here reads the wall clock. The host advances time explicitly, which
//! keeps every consumer deterministic under test.

pub mod debounce;
pub mod easing;
pub mod scheduler;
pub mod tween;

pub use debounce::{Cooldown, Debouncer};
pub use easing::Easing;
pub use scheduler::{TimerId, TimerScheduler};
pub use tween::ScrollTween;
