//! Contrail renders an ambient "flight routes" backdrop: a fixed working set
//! of curved routes, each with a glow marker traveling along it, rasterized on
//! the CPU once per frame behind a host UI.
//!
//! The public API is session-oriented:
//!
//! - Describe the look with a [`BackdropConfig`]
//! - [`BackdropSession::bind`] a session to the viewport
//! - Drive it with [`BackdropSession::frame`] (host-paced) or
//!   [`BackdropSession::run`] (paced by a [`FrameClock`])
//! - Composite the [`Surface`] pixels behind the host content; drop the
//!   session to tear the loop down on any exit path
#![forbid(unsafe_code)]

mod foundation;
mod route;

/// Rasterization, scheduling and frame pacing.
pub mod render;
/// Session-oriented bind/resize/unbind lifecycle.
pub mod session;

pub use crate::foundation::core::{Point, QuadBez, Rgb8, Rgba8Premul, Vec2, Viewport};
pub use crate::foundation::error::{ContrailError, ContrailResult};

pub use crate::render::clock::FrameClock;
pub use crate::render::path::{PathRenderer, PathStyle};
pub use crate::render::scheduler::{
    AnimationScheduler, SchedulerState, SchedulerStats, StopHandle, TickOutcome,
};
pub use crate::render::surface::Surface;
pub use crate::route::factory::create_routes;
pub use crate::route::model::FlightRoute;
pub use crate::session::backdrop::{BackdropConfig, BackdropSession};
