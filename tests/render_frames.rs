use contrail::{FlightRoute, PathRenderer, PathStyle, Point, Rgb8, Surface, Viewport};

fn style_small() -> PathStyle {
    PathStyle {
        arc_height: 8.0,
        marker_radius: 4.0,
        ..PathStyle::default()
    }
}

fn alpha_at(surface: &Surface, x: u32, y: u32) -> u8 {
    surface.data()[((y * surface.width() + x) * 4 + 3) as usize]
}

#[test]
fn empty_route_set_performs_only_the_clear_step() {
    let mut renderer = PathRenderer::new(style_small());
    let mut surface = Surface::new(Viewport::new(32, 32)).unwrap();

    // Dirty the surface first so the clear is observable.
    let route = FlightRoute::new(
        Point::new(4.0, 16.0),
        Point::new(28.0, 16.0),
        0.5,
        0.001,
        0.8,
    )
    .unwrap();
    renderer.render_frame(&mut surface, &[route]).unwrap();
    assert!(surface.data().iter().any(|&b| b != 0));

    renderer.render_frame(&mut surface, &[]).unwrap();
    assert!(surface.data().iter().all(|&b| b == 0));
}

#[test]
fn marker_glow_lights_pixels_at_the_curve_position() {
    let mut renderer = PathRenderer::new(style_small());
    let mut surface = Surface::new(Viewport::new(64, 64)).unwrap();

    // Curve from (8,40) to (56,40), control point (32,32): the midpoint of the
    // curve at t = 0.5 sits at (32,36).
    let route = FlightRoute::new(
        Point::new(8.0, 40.0),
        Point::new(56.0, 40.0),
        0.5,
        0.001,
        0.8,
    )
    .unwrap();
    renderer.render_frame(&mut surface, &[route]).unwrap();

    let peak = (29..36)
        .flat_map(|x| (33..40).map(move |y| (x, y)))
        .map(|(x, y)| alpha_at(&surface, x, y))
        .max()
        .unwrap();
    assert!(peak > 100, "expected a bright glow near (32,36), got {peak}");

    // Far corner stays untouched by both draws.
    assert_eq!(alpha_at(&surface, 2, 2), 0);
}

#[test]
fn dashed_curve_strokes_pixels_along_the_path() {
    let style = PathStyle {
        arc_height: 0.0,
        marker_radius: 2.0,
        ..PathStyle::default()
    };
    let mut renderer = PathRenderer::new(style);
    let mut surface = Surface::new(Viewport::new(64, 64)).unwrap();

    // Flat curve on the center of pixel row 20; dashes leave gaps but the
    // first run must land.
    let route = FlightRoute::new(
        Point::new(8.0, 20.5),
        Point::new(56.0, 20.5),
        0.9,
        0.001,
        0.9,
    )
    .unwrap();
    renderer.render_frame(&mut surface, &[route]).unwrap();

    let lit = (8..56)
        .filter(|&x| alpha_at(&surface, x, 20) > 30)
        .count();
    assert!(lit >= 8, "expected dash coverage on row 20, got {lit} pixels");

    let gaps = (8..56)
        .filter(|&x| alpha_at(&surface, x, 20) == 0)
        .count();
    assert!(gaps > 0, "expected dash gaps on row 20");
}

#[test]
fn rendering_the_same_state_twice_is_identical() {
    let mut renderer = PathRenderer::new(style_small());
    let mut surface = Surface::new(Viewport::new(48, 48)).unwrap();
    let route = FlightRoute::new(
        Point::new(6.0, 30.0),
        Point::new(42.0, 28.0),
        0.25,
        0.001,
        0.4,
    )
    .unwrap();

    renderer.render_frame(&mut surface, &[route]).unwrap();
    let first = surface.data().to_vec();
    renderer.render_frame(&mut surface, &[route]).unwrap();
    assert_eq!(surface.data(), first.as_slice());
}

#[test]
fn zero_area_surface_is_tolerated() {
    let mut renderer = PathRenderer::new(style_small());
    let mut surface = Surface::new(Viewport::new(0, 0)).unwrap();
    let route = FlightRoute::new(
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
        0.1,
        0.001,
        0.1,
    )
    .unwrap();
    renderer.render_frame(&mut surface, &[route]).unwrap();
    assert!(surface.data().is_empty());
}

#[test]
fn flatten_composites_over_the_background() {
    let mut renderer = PathRenderer::new(style_small());
    let mut surface = Surface::new(Viewport::new(64, 64)).unwrap();
    let route = FlightRoute::new(
        Point::new(8.0, 40.0),
        Point::new(56.0, 40.0),
        0.5,
        0.001,
        0.8,
    )
    .unwrap();
    renderer.render_frame(&mut surface, &[route]).unwrap();

    let bg = Rgb8::new(0, 8, 20);
    let flat = surface.to_rgba8_over(bg);
    assert_eq!(flat.len(), surface.data().len());

    // Untouched corner shows the background; every pixel is opaque.
    assert_eq!(&flat[..4], &[0, 8, 20, 255]);
    assert!(flat.chunks_exact(4).all(|px| px[3] == 255));
}
