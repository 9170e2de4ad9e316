use kurbo::ParamCurve as _;

use crate::foundation::core::{Point, QuadBez};
use crate::foundation::error::{ContrailError, ContrailResult};

/// One simulated flight path: fixed endpoints plus a cycling traversal state.
///
/// `speed` and `opacity` are assigned once at construction and never change;
/// `progress` stays in `[0, 1)` across every [`advance`](Self::advance).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightRoute {
    start: Point,
    end: Point,
    progress: f64,
    speed: f64,
    opacity: f32,
}

impl FlightRoute {
    pub fn new(
        start: Point,
        end: Point,
        progress: f64,
        speed: f64,
        opacity: f32,
    ) -> ContrailResult<Self> {
        if !progress.is_finite() || !(0.0..1.0).contains(&progress) {
            return Err(ContrailError::validation(
                "FlightRoute progress must be in [0, 1)",
            ));
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ContrailError::validation(
                "FlightRoute speed must be finite and > 0",
            ));
        }
        if !opacity.is_finite() || opacity <= 0.0 || opacity >= 1.0 {
            return Err(ContrailError::validation(
                "FlightRoute opacity must be in (0, 1)",
            ));
        }
        Ok(Self::from_parts(start, end, progress, speed, opacity))
    }

    /// Construction without validation, for callers that already draw from
    /// validated ranges (the factory).
    pub(crate) fn from_parts(
        start: Point,
        end: Point,
        progress: f64,
        speed: f64,
        opacity: f32,
    ) -> Self {
        Self {
            start,
            end,
            progress,
            speed,
            opacity,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Fractional marker position along the curve, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Per-frame progress increment.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Route intensity; the static curve is stroked dimmer, the marker glow
    /// peaks brighter.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Advance one frame. When the new progress would reach or exceed 1 it
    /// wraps to exactly 0: the path replays from the start (a hard reset, not
    /// a bounce).
    pub fn advance(&mut self) {
        let next = self.progress + self.speed;
        self.progress = if next >= 1.0 { 0.0 } else { next };
    }

    /// The route's curve: a quadratic Bezier whose control point is the
    /// segment midpoint lifted by `arc_height` (screen space, -y is up).
    pub fn curve(&self, arc_height: f64) -> QuadBez {
        let ctrl = Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0 - arc_height,
        );
        QuadBez::new(self.start, ctrl, self.end)
    }

    /// The marker position: the curve evaluated at `t = progress`.
    pub fn position(&self, arc_height: f64) -> Point {
        self.curve(arc_height).eval(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::ParamCurve as _;

    const EPS: f64 = 1e-9;

    fn route(progress: f64, speed: f64) -> FlightRoute {
        FlightRoute::new(
            Point::new(10.0, 700.0),
            Point::new(950.0, 120.0),
            progress,
            speed,
            0.12,
        )
        .unwrap()
    }

    #[test]
    fn curve_hits_both_endpoints() {
        let r = route(0.0, 0.001);
        let c = r.curve(100.0);
        let p0 = c.eval(0.0);
        let p1 = c.eval(1.0);
        assert!((p0.x - 10.0).abs() < EPS && (p0.y - 700.0).abs() < EPS);
        assert!((p1.x - 950.0).abs() < EPS && (p1.y - 120.0).abs() < EPS);
    }

    #[test]
    fn control_point_is_lifted_midpoint() {
        let r = route(0.0, 0.001);
        let c = r.curve(100.0);
        assert_eq!(c.p1, Point::new(480.0, 310.0));
    }

    #[test]
    fn advance_wraps_to_exact_zero() {
        let mut r = route(0.999999, 0.0007);
        r.advance();
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn advance_keeps_progress_in_unit_interval() {
        let mut r = route(0.37, 0.0013);
        for _ in 0..5_000 {
            r.advance();
            assert!((0.0..1.0).contains(&r.progress()));
        }
    }

    #[test]
    fn speed_and_opacity_are_immutable_across_frames() {
        let mut r = route(0.1, 0.0009);
        let (speed, opacity) = (r.speed(), r.opacity());
        for _ in 0..200 {
            r.advance();
        }
        assert_eq!(r.speed(), speed);
        assert_eq!(r.opacity(), opacity);
    }

    #[test]
    fn new_rejects_out_of_range_fields() {
        let p = Point::new(0.0, 0.0);
        assert!(FlightRoute::new(p, p, 1.0, 0.001, 0.1).is_err());
        assert!(FlightRoute::new(p, p, -0.1, 0.001, 0.1).is_err());
        assert!(FlightRoute::new(p, p, 0.5, 0.0, 0.1).is_err());
        assert!(FlightRoute::new(p, p, 0.5, 0.001, 1.0).is_err());
        assert!(FlightRoute::new(p, p, 0.5, 0.001, 0.0).is_err());
        assert!(FlightRoute::new(p, p, 0.5, f64::NAN, 0.1).is_err());
    }
}
