use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::ContrailResult;
use crate::render::path::PathRenderer;
use crate::render::surface::Surface;
use crate::route::model::FlightRoute;

/// Scheduler lifecycle. `Stopped` is terminal: a new bind creates a new
/// scheduler, this one never runs again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Route state advanced and the frame was rasterized.
    Rendered,
    /// Route state advanced but the viewport has a zero dimension, so the
    /// render step was skipped until a valid resize arrives.
    SkippedEmptyViewport,
    /// The scheduler is stopped; nothing was mutated.
    Stopped,
}

/// Frame counters for one scheduler lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub frames_rendered: u64,
    pub frames_skipped: u64,
}

/// Cancellation handle for a running scheduler.
///
/// Cloneable and `Send`; [`stop`](Self::stop) is idempotent, infallible and
/// safe to call after the scheduler itself is gone. A tick that was already
/// pending when the flag was raised observes it before mutating anything.
#[derive(Clone, Debug)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Owns the per-frame loop over the route working set.
///
/// Each tick performs state update then render, strictly serialized. The
/// driver (a session `run` loop or the host's own frame callback) calls
/// [`tick`](Self::tick) once per frame slot; the scheduler never blocks.
#[derive(Debug)]
pub struct AnimationScheduler {
    routes: Vec<FlightRoute>,
    state: SchedulerState,
    stop_flag: Arc<AtomicBool>,
    stats: SchedulerStats,
}

impl AnimationScheduler {
    /// Take exclusive ownership of the working set and enter `Running`.
    pub fn start(routes: Vec<FlightRoute>) -> Self {
        Self {
            routes,
            state: SchedulerState::Running,
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: SchedulerStats::default(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running && !self.stop_flag.load(Ordering::SeqCst)
    }

    pub fn routes(&self) -> &[FlightRoute] {
        &self.routes
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop_flag),
        }
    }

    /// Transition to `Stopped`. Idempotent, never errors.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        self.state = SchedulerState::Stopped;
    }

    /// One frame step: advance every route's progress (wrapping at 1), then
    /// rasterize the set.
    ///
    /// A tick on a stopped scheduler is a complete no-op. A renderer error is
    /// fatal: the scheduler stops itself and the error propagates to the host.
    pub fn tick(
        &mut self,
        renderer: &mut PathRenderer,
        surface: &mut Surface,
    ) -> ContrailResult<TickOutcome> {
        if self.state == SchedulerState::Stopped || self.stop_flag.load(Ordering::SeqCst) {
            self.state = SchedulerState::Stopped;
            return Ok(TickOutcome::Stopped);
        }

        for route in &mut self.routes {
            route.advance();
        }

        if surface.viewport().is_empty() {
            self.stats.frames_skipped += 1;
            return Ok(TickOutcome::SkippedEmptyViewport);
        }

        match renderer.render_frame(surface, &self.routes) {
            Ok(()) => {
                self.stats.frames_rendered += 1;
                Ok(TickOutcome::Rendered)
            }
            Err(err) => {
                self.stop();
                Err(err)
            }
        }
    }
}
