//! End-to-end rendering checks on synthetic textures

use approx::assert_relative_eq;
use earthrise::prelude::*;
use earthrise::render::overlay::{AXIS_COLOR, SUN_COLOR, TERMINATOR_COLOR};
use earthrise::render::DiskProjection;

/// 2024-01-11T05:00:00Z, Sun and Moon nearly aligned: Earth is full from the Moon
const NEW_MOON: f64 = 1_704_949_200.0;

/// 2024-01-26T00:00:00Z, Sun and Moon opposed: Earth is dark from the Moon
const FULL_MOON: f64 = 1_706_227_200.0;

fn white_texture() -> Texture {
    Texture::from_image_data(ImageData::solid_color(16, 8, [255, 255, 255]), 0.0).unwrap()
}

/// Each column a different colour so rotation shows up in the frame
fn striped_texture() -> Texture {
    let (width, height) = (36u32, 18u32);
    let mut data = Vec::new();
    for _ in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 7) as u8, 255 - (x * 5) as u8, 90]);
        }
    }
    Texture::from_raw(data, width, height, width as usize * 3, 3, 0.0).unwrap()
}

fn disk_pixels(width: u32, height: u32) -> impl Iterator<Item = (u32, u32, bool)> {
    let disk = DiskProjection::for_frame(width, height);
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y, disk.unproject(x, y).is_some())))
}

#[test]
fn test_outside_disk_is_background() {
    let config = RenderConfig::default().with_size(48, 32);
    let renderer = EarthRenderer::new(config, Some(striped_texture())).unwrap();
    let frame = renderer.render(TimeInstant::from_unix_seconds(1_700_000_000.0));

    for (x, y, inside) in disk_pixels(48, 32) {
        if !inside {
            assert_eq!(frame.pixel(x, y), Some([0, 0, 0]), "pixel ({x}, {y})");
        }
    }
    // Columns outside the 32 px wide disk are empty.
    for y in 0..32 {
        assert_eq!(frame.pixel(3, y), Some([0, 0, 0]));
        assert_eq!(frame.pixel(44, y), Some([0, 0, 0]));
    }
}

#[test]
fn test_render_is_deterministic() {
    let config = RenderConfig::default().with_size(40, 40).with_debug_overlay(true);
    let renderer = EarthRenderer::new(config, Some(striped_texture())).unwrap();
    let t = TimeInstant::from_unix_seconds(1_650_000_123.5);

    let first = renderer.render(t);
    let second = renderer.render(t);
    assert_eq!(first.as_bytes(), second.as_bytes());

    let mut reused = RasterFrame::new(1, 1);
    renderer.render_into(TimeInstant::J2000, &mut reused);
    renderer.render_into(t, &mut reused);
    assert_eq!(reused, first);
}

#[test]
fn test_earth_rotates_between_frames() {
    let config = RenderConfig::default().with_size(40, 40);
    let renderer = EarthRenderer::new(config, Some(striped_texture())).unwrap();
    let t = TimeInstant::from_unix_seconds(1_650_000_000.0);
    let later = t.offset(3.0 * 3600.0);
    assert_ne!(renderer.render(t).as_bytes(), renderer.render(later).as_bytes());
}

#[test]
fn test_phase_follows_sun_and_moon() {
    let mut config = RenderConfig::default().with_size(32, 32);
    config.calibration = Calibration::IDENTITY;
    let renderer = EarthRenderer::new(config, Some(white_texture())).unwrap();
    let night = (0.08_f64 * 255.0).round() as u8;

    let full_earth = renderer.render(TimeInstant::from_unix_seconds(NEW_MOON));
    let [r, g, b] = full_earth.pixel(16, 16).unwrap();
    assert!(r >= 250 && r == g && g == b, "centre was {r}");

    let dark_earth = renderer.render(TimeInstant::from_unix_seconds(FULL_MOON));
    for (x, y, inside) in disk_pixels(32, 32) {
        if inside {
            let [r, ..] = dark_earth.pixel(x, y).unwrap();
            assert!((night..=night + 5).contains(&r), "pixel ({x}, {y}) was {r}");
        }
    }
}

#[test]
fn test_disabled_shading_is_uniform() {
    let mut config = RenderConfig::default().with_size(32, 32);
    config.shading.disabled = true;
    let renderer = EarthRenderer::new(config, Some(white_texture())).unwrap();
    let frame = renderer.render(TimeInstant::from_unix_seconds(FULL_MOON));

    for (x, y, inside) in disk_pixels(32, 32) {
        let expected = if inside { [255, 255, 255] } else { [0, 0, 0] };
        assert_eq!(frame.pixel(x, y), Some(expected));
    }
}

#[test]
fn test_pattern_ignores_texture_and_time() {
    let config = RenderConfig::default().with_size(30, 30).with_test_pattern(true);
    let with_texture = EarthRenderer::new(config.clone(), Some(white_texture())).unwrap();
    let without_texture = EarthRenderer::new(config, None).unwrap();

    let a = with_texture.render(TimeInstant::J2000);
    let b = without_texture.render(TimeInstant::from_unix_seconds(NEW_MOON));
    assert_eq!(a, b);

    // Left of centre is less red than right; above centre is more green than below.
    let left = a.pixel(5, 15).unwrap();
    let right = a.pixel(25, 15).unwrap();
    let top = a.pixel(15, 5).unwrap();
    let bottom = a.pixel(15, 25).unwrap();
    assert!(left[0] < right[0]);
    assert!(top[1] > bottom[1]);
}

#[test]
fn test_debug_overlay_draws_on_top() {
    let config = RenderConfig::default().with_size(64, 64);
    let t = TimeInstant::from_unix_seconds(1_700_000_000.0);
    let plain = EarthRenderer::new(config.clone(), Some(white_texture())).unwrap();
    let overlaid = EarthRenderer::new(config.with_debug_overlay(true), Some(white_texture())).unwrap();

    let geometry = overlaid.geometry(t);
    let disk = DiskProjection::for_frame(64, 64);
    let overlay = OverlayGeometry::compute(&geometry.basis, &geometry.ephemeris.sun_ecef, &disk);

    let base = plain.render(t);
    let frame = overlaid.render(t);
    assert_ne!(base, frame);

    let overlay_colors = [AXIS_COLOR, SUN_COLOR, TERMINATOR_COLOR];
    let changed: Vec<[u8; 3]> = (0..64)
        .flat_map(|y| (0..64).map(move |x| (x, y)))
        .filter(|&(x, y)| base.pixel(x, y) != frame.pixel(x, y))
        .filter_map(|(x, y)| frame.pixel(x, y))
        .collect();
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|rgb| overlay_colors.contains(rgb)));

    assert!(overlay.axis_arrow.is_some() || overlay.sun_arrow.is_some() || !overlay.terminator.is_empty());
    assert!(frame.lit_fraction() >= base.lit_fraction());
}

#[test]
fn test_basis_stays_orthonormal_over_a_month() {
    let start = TimeInstant::from_unix_seconds(NEW_MOON);
    for hour in (0..30 * 24).step_by(7) {
        let geometry = FrameGeometry::at(start.offset(f64::from(hour) * 3600.0), &Calibration::default());
        let m = geometry.basis.ecef_to_view_matrix();
        assert_relative_eq!(m * m.transpose(), Mat3::identity(), epsilon = 1e-9);
        assert_relative_eq!(geometry.view_to_ecef, m.transpose(), epsilon = 1e-12);
    }
}

#[test]
fn test_config_file_drives_renderer() {
    let path = std::env::temp_dir().join(format!("earthrise_render_{}.toml", std::process::id()));
    let path = path.to_str().unwrap();

    let mut config = RenderConfig::default().with_size(20, 10).with_test_pattern(true);
    config.water.boost = 1.5;
    config.calibration.roll_deg = 90.0;
    config.save_to_file(path).unwrap();

    let loaded = RenderConfig::load_from_file(path).unwrap();
    std::fs::remove_file(path).ok();
    assert_eq!(loaded, config);

    let frame = EarthRenderer::new(loaded, None).unwrap().render(TimeInstant::J2000);
    assert_eq!((frame.width(), frame.height()), (20, 10));
}
