use rand::Rng;

use crate::foundation::core::{Point, Viewport};
use crate::route::model::FlightRoute;

/// Create the initial working set of routes for one session.
///
/// Endpoints are drawn uniformly from `[0, width) x [0, height)`, progress
/// from `[0, 1)` (routes start mid-flight, so there is no synchronized
/// launch), speed and opacity from the given `[lo, hi)` ranges.
///
/// Total: `count = 0` yields an empty set, and a degenerate bound or range
/// collapses to its lower edge instead of erroring. The RNG is injected so a
/// seeded generator reproduces the exact same layout.
pub fn create_routes<R: Rng + ?Sized>(
    count: u32,
    bounds: Viewport,
    speed_range: [f64; 2],
    opacity_range: [f32; 2],
    rng: &mut R,
) -> Vec<FlightRoute> {
    let w = f64::from(bounds.width);
    let h = f64::from(bounds.height);

    let mut routes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let start = Point::new(sample_f64(rng, 0.0, w), sample_f64(rng, 0.0, h));
        let end = Point::new(sample_f64(rng, 0.0, w), sample_f64(rng, 0.0, h));
        let progress = sample_f64(rng, 0.0, 1.0);
        let speed = sample_f64(rng, speed_range[0], speed_range[1]);
        let opacity = sample_f32(rng, opacity_range[0], opacity_range[1]);
        routes.push(FlightRoute::from_parts(start, end, progress, speed, opacity));
    }
    routes
}

fn sample_f64<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}

fn sample_f32<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}
