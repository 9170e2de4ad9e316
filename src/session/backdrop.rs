use rand::Rng;

use crate::foundation::core::Viewport;
use crate::foundation::error::{ContrailError, ContrailResult};
use crate::render::clock::FrameClock;
use crate::render::path::{PathRenderer, PathStyle};
use crate::render::scheduler::{AnimationScheduler, SchedulerStats, StopHandle, TickOutcome};
use crate::render::surface::Surface;
use crate::route::factory::create_routes;
use crate::route::model::FlightRoute;

/// Everything tunable about one backdrop session. `Default` is the stock
/// look; every knob is named so tests can pin it down.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Number of routes in the working set; fixed for the session lifetime.
    pub route_count: u32,
    /// Per-frame progress increment range, drawn as `[lo, hi)`.
    pub speed_range: [f64; 2],
    /// Route intensity range, drawn as `[lo, hi)`.
    pub opacity_range: [f32; 2],
    /// Visual parameters handed to the renderer.
    pub style: PathStyle,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            route_count: 12,
            speed_range: [0.0005, 0.0015],
            opacity_range: [0.05, 0.20],
            style: PathStyle::default(),
        }
    }
}

impl BackdropConfig {
    pub fn validate(&self) -> ContrailResult<()> {
        let [lo, hi] = self.speed_range;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo >= hi {
            return Err(ContrailError::validation(
                "speed_range must satisfy 0 < lo < hi",
            ));
        }
        let [lo, hi] = self.opacity_range;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo >= hi || hi > 1.0 {
            return Err(ContrailError::validation(
                "opacity_range must satisfy 0 < lo < hi <= 1",
            ));
        }
        self.style.validate()
    }
}

/// The bound lifetime of one surface + route set + scheduler.
///
/// Binding sizes the surface to the viewport, creates the route working set
/// and starts the scheduler. Dropping the session stops the scheduler, so
/// teardown runs on every exit path from the hosting view, error exits
/// included.
#[derive(Debug)]
pub struct BackdropSession {
    config: BackdropConfig,
    surface: Surface,
    renderer: PathRenderer,
    scheduler: AnimationScheduler,
}

impl BackdropSession {
    /// Bind to `viewport` with an ambient RNG.
    pub fn bind(viewport: Viewport, config: BackdropConfig) -> ContrailResult<Self> {
        Self::bind_with_rng(viewport, config, &mut rand::rng())
    }

    /// Bind with an injected RNG so the route layout is reproducible.
    #[tracing::instrument(skip(config, rng))]
    pub fn bind_with_rng<R: Rng + ?Sized>(
        viewport: Viewport,
        config: BackdropConfig,
        rng: &mut R,
    ) -> ContrailResult<Self> {
        config.validate()?;
        let surface = Surface::new(viewport)?;
        let routes = create_routes(
            config.route_count,
            viewport,
            config.speed_range,
            config.opacity_range,
            rng,
        );
        tracing::debug!(routes = routes.len(), "backdrop session bound");

        let renderer = PathRenderer::new(config.style);
        let scheduler = AnimationScheduler::start(routes);
        Ok(Self {
            config,
            surface,
            renderer,
            scheduler,
        })
    }

    /// One frame step. Safe to call after stop: the tick is a no-op and
    /// reports [`TickOutcome::Stopped`].
    pub fn frame(&mut self) -> ContrailResult<TickOutcome> {
        self.scheduler.tick(&mut self.renderer, &mut self.surface)
    }

    /// Drive frames at the clock's cadence until stopped, via [`Self::stop`]
    /// from a host callback or a [`StopHandle`] from another thread.
    pub fn run(&mut self, clock: &mut FrameClock) -> ContrailResult<SchedulerStats> {
        loop {
            if self.frame()? == TickOutcome::Stopped {
                return Ok(self.scheduler.stats());
            }
            clock.wait_next();
        }
    }

    /// Drive exactly `frames` steps back to back (offline/export rendering).
    pub fn run_frames(&mut self, frames: u64) -> ContrailResult<SchedulerStats> {
        for _ in 0..frames {
            if self.frame()? == TickOutcome::Stopped {
                break;
            }
        }
        Ok(self.scheduler.stats())
    }

    /// Resize the surface to a new viewport.
    ///
    /// Route endpoints deliberately keep their original coordinates (after a
    /// large shrink some may fall outside the visible area); only the drawing
    /// surface changes.
    pub fn resize(&mut self, viewport: Viewport) -> ContrailResult<()> {
        self.surface.resize(viewport)?;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "backdrop surface resized"
        );
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn routes(&self) -> &[FlightRoute] {
        self.scheduler.routes()
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Handle for requesting stop from outside the frame loop.
    pub fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    /// Stop the scheduler. Idempotent; a pending frame becomes a no-op.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Scoped teardown: stop and consume the session, returning the final
    /// frame counters.
    pub fn unbind(mut self) -> SchedulerStats {
        self.scheduler.stop();
        self.scheduler.stats()
    }
}

impl Drop for BackdropSession {
    fn drop(&mut self) {
        self.scheduler.stop();
        tracing::debug!(stats = ?self.scheduler.stats(), "backdrop session unbound");
    }
}
