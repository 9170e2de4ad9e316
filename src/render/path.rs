use std::collections::HashMap;
use std::sync::Arc;

use kurbo::{BezPath, Stroke, StrokeOpts};

use crate::foundation::core::{Rgb8, Rgba8Premul};
use crate::foundation::error::{ContrailError, ContrailResult};
use crate::render::surface::Surface;
use crate::route::model::FlightRoute;

/// Fraction of a route's opacity used for the static curve stroke; the full
/// opacity is reserved for the marker glow.
const CURVE_ALPHA_FACTOR: f32 = 0.3;

/// Flattening tolerance for dash/stroke expansion. Routes span hundreds of
/// surface units; a quarter unit keeps dash edges clean at that scale.
const STROKE_TOLERANCE: f64 = 0.25;

/// Visual parameters for route rendering.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathStyle {
    /// Accent hue shared by the curve stroke and the marker glow.
    pub accent: Rgb8,
    /// Upward offset of the Bezier control point from the segment midpoint.
    pub arc_height: f64,
    /// Glow radius around the traveling marker, in surface units.
    pub marker_radius: f64,
    /// Dash run/gap lengths for the static curve stroke.
    pub dash_pattern: [f64; 2],
    /// Stroke width of the static curve.
    pub stroke_width: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            accent: Rgb8::new(249, 178, 51),
            arc_height: 100.0,
            marker_radius: 8.0,
            dash_pattern: [10.0, 15.0],
            stroke_width: 1.0,
        }
    }
}

impl PathStyle {
    pub fn validate(&self) -> ContrailResult<()> {
        if !self.arc_height.is_finite() {
            return Err(ContrailError::validation("arc_height must be finite"));
        }
        if !self.marker_radius.is_finite() || self.marker_radius <= 0.0 {
            return Err(ContrailError::validation(
                "marker_radius must be finite and > 0",
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ContrailError::validation(
                "stroke_width must be finite and > 0",
            ));
        }
        if self.dash_pattern.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(ContrailError::validation(
                "dash_pattern entries must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlowKey {
    opacity_bits: u32,
}

/// Rasterizes the full route set for one time sample.
///
/// Every frame starts by clearing the drawable area; nothing accumulates
/// across frames. Routes are drawn in the order the slice provides, each as a
/// dashed full-length curve plus a radial glow at the marker position.
#[derive(Debug)]
pub struct PathRenderer {
    style: PathStyle,
    ctx: Option<vello_cpu::RenderContext>,
    glow_cache: HashMap<GlowKey, vello_cpu::Image>,
}

impl PathRenderer {
    pub fn new(style: PathStyle) -> Self {
        Self {
            style,
            ctx: None,
            glow_cache: HashMap::new(),
        }
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Draw every route onto the surface. An empty set performs only the
    /// clear step; a zero-area surface is left untouched.
    pub fn render_frame(
        &mut self,
        surface: &mut Surface,
        routes: &[FlightRoute],
    ) -> ContrailResult<()> {
        if surface.viewport().is_empty() {
            return Ok(());
        }
        surface.clear_transparent();
        if routes.is_empty() {
            return Ok(());
        }

        let (width, height) = surface.raster_size();
        self.with_ctx_mut(width, height, |this, ctx| {
            for route in routes {
                this.draw_route(route, ctx)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(surface.pixmap_mut());
            Ok(())
        })
    }

    fn with_ctx_mut<T>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ContrailResult<T>,
    ) -> ContrailResult<T> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn draw_route(
        &mut self,
        route: &FlightRoute,
        ctx: &mut vello_cpu::RenderContext,
    ) -> ContrailResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        // Static curve, independent of progress: the dash pattern is expanded
        // into an outline and filled, so only fill ops reach the backend.
        let quad = route.curve(self.style.arc_height);
        let mut path = BezPath::new();
        path.move_to(quad.p0);
        path.quad_to(quad.p1, quad.p2);
        let stroke_style =
            Stroke::new(self.style.stroke_width).with_dashes(0.0, self.style.dash_pattern);
        let outline = kurbo::stroke(path, &stroke_style, &StrokeOpts::default(), STROKE_TOLERANCE);

        let c = self.style.accent;
        let curve_alpha = alpha_u8(route.opacity() * CURVE_ALPHA_FACTOR);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            c.r,
            c.g,
            c.b,
            curve_alpha,
        ));
        ctx.fill_path(&bezpath_to_cpu(&outline));

        // Traveling marker: a cached radial glow sprite centered on the curve
        // point at t = progress, at the route's undimmed opacity.
        let glow = self.glow_image(route.opacity())?;
        let r = self.style.marker_radius;
        let d = f64::from(glow_diameter(r));
        let pos = route.position(self.style.arc_height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((pos.x - r, pos.y - r)));
        ctx.set_paint(glow);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, d, d));
        Ok(())
    }

    fn glow_image(&mut self, opacity: f32) -> ContrailResult<vello_cpu::Image> {
        let key = GlowKey {
            opacity_bits: opacity.to_bits(),
        };
        if let Some(img) = self.glow_cache.get(&key).cloned() {
            return Ok(img);
        }

        let c = self.style.accent;
        let r = self.style.marker_radius;
        let d = glow_diameter(r);
        let center = f64::from(d - 1) / 2.0;
        let mut bytes = Vec::with_capacity((d as usize) * (d as usize) * 4);
        for y in 0..d {
            for x in 0..d {
                let dx = f64::from(x) - center;
                let dy = f64::from(y) - center;
                let t = (dx.hypot(dy) / r).min(1.0);
                let px = Rgba8Premul::from_straight_rgba(c.r, c.g, c.b, alpha_u8(glow_alpha(opacity, t)));
                bytes.extend_from_slice(&[px.r, px.g, px.b, px.a]);
            }
        }

        let img = rgba_premul_to_image(&bytes, d, d)?;
        self.glow_cache.insert(key, img.clone());
        Ok(img)
    }
}

/// Glow intensity at normalized distance `t` from the marker: full intensity
/// (opacity doubled, clamped) at the center, the raw opacity at half radius,
/// transparent at the edge, linear between the stops.
fn glow_alpha(opacity: f32, t: f64) -> f32 {
    let t = t as f32;
    let peak = (opacity * 2.0).min(1.0);
    if t <= 0.5 {
        peak + (opacity - peak) * (t / 0.5)
    } else {
        opacity * (1.0 - (t - 0.5) / 0.5)
    }
}

fn alpha_u8(a: f32) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn glow_diameter(radius: f64) -> u32 {
    (radius * 2.0).ceil() as u32 + 1
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ContrailResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ContrailError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ContrailError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ContrailError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ContrailResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_profile_matches_gradient_stops() {
        let o = 0.12f32;
        assert!((glow_alpha(o, 0.0) - 0.24).abs() < 1e-6);
        assert!((glow_alpha(o, 0.5) - 0.12).abs() < 1e-6);
        assert!(glow_alpha(o, 1.0).abs() < 1e-6);

        // Doubling saturates instead of overshooting.
        assert!((glow_alpha(0.8, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn alpha_quantization_clamps() {
        assert_eq!(alpha_u8(-0.5), 0);
        assert_eq!(alpha_u8(0.5), 128);
        assert_eq!(alpha_u8(2.0), 255);
    }

    #[test]
    fn glow_sprite_covers_the_radius() {
        assert_eq!(glow_diameter(8.0), 17);
        assert_eq!(glow_diameter(0.5), 2);
    }

    #[test]
    fn style_validation_rejects_degenerate_values() {
        let mut s = PathStyle::default();
        assert!(s.validate().is_ok());
        s.marker_radius = 0.0;
        assert!(s.validate().is_err());

        let mut s = PathStyle::default();
        s.dash_pattern = [10.0, 0.0];
        assert!(s.validate().is_err());

        let mut s = PathStyle::default();
        s.arc_height = f64::INFINITY;
        assert!(s.validate().is_err());
    }
}
