use std::{io::Cursor, sync::Arc};

use reframe::{
    BackgroundMode, FitMode, OutputFormat, Session, SourceImage, TargetSpec, render,
    render_for_export, sample_color,
};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn solid_source(width: u32, height: u32, px: [u8; 4]) -> SourceImage {
    SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat(width as usize * height as usize)),
        file_name: None,
    }
}

fn spec(width: u32, height: u32) -> TargetSpec {
    TargetSpec {
        width,
        height,
        ..TargetSpec::default()
    }
}

#[test]
fn render_is_deterministic_and_nonempty() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let src = solid_source(200, 100, [255, 0, 0, 255]);
    let mut s = spec(100, 100);
    s.background = BackgroundMode::Color;
    s.background_color = "#1a2b3c".to_string();

    let a = render(Some(&src), &mut s.clone(), 1.0, false);
    let b = render(Some(&src), &mut s, 1.0, false);

    assert_eq!((a.width(), a.height()), (100, 100));
    assert_eq!(digest_u64(a.data()), digest_u64(b.data()));
    assert!(a.data().iter().any(|&x| x != 0));
}

#[test]
fn fit_letterboxes_and_fill_covers() {
    let src = solid_source(200, 100, [255, 0, 0, 255]);

    let mut fit_spec = spec(100, 100);
    fit_spec.background = BackgroundMode::Color;
    fit_spec.background_color = "#1a2b3c".to_string();
    let fit = render_for_export(Some(&src), &mut fit_spec);
    // Bars above and below, image across the middle.
    assert_eq!(fit.pixel(50, 5), Some([0x1a, 0x2b, 0x3c, 255]));
    assert_eq!(fit.pixel(50, 50), Some([255, 0, 0, 255]));
    assert_eq!(fit.pixel(50, 95), Some([0x1a, 0x2b, 0x3c, 255]));

    let mut fill_spec = spec(100, 100);
    fill_spec.fit = FitMode::Fill;
    let fill = render_for_export(Some(&src), &mut fill_spec);
    for &(x, y) in &[(0, 0), (99, 0), (0, 99), (99, 99), (50, 50)] {
        assert_eq!(fill.pixel(x, y), Some([255, 0, 0, 255]), "at ({x},{y})");
    }
}

#[test]
fn export_resolution_is_density_independent() {
    let src = solid_source(64, 64, [0, 0, 255, 255]);
    for density in [1.0, 1.5, 2.0, 3.0] {
        let mut s = spec(400, 300);
        let preview = render(Some(&src), &mut s, density, false);
        assert_eq!(preview.width(), (400.0f64 * density).round() as u32);

        let export = render_for_export(Some(&src), &mut s);
        assert_eq!((export.width(), export.height()), (400, 300), "density {density}");
    }
}

#[test]
fn sampling_a_background_only_canvas_returns_the_fill_color() {
    let mut s = spec(50, 40);
    s.background = BackgroundMode::Color;
    s.background_color = "#1a2b3c".to_string();
    let surface = render_for_export(None, &mut s);
    let picked = sample_color(&surface, (0.0, 0.0), (50.0, 40.0));
    assert_eq!(picked.to_hex(), "#1a2b3c");
}

#[test]
fn session_end_to_end_export_matches_target() {
    let img = image::RgbaImage::from_pixel(123, 77, image::Rgba([10, 200, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let mut session = Session::new(reframe::MemoryStore::new());
    session.load_image(&buf, Some("swatch.png")).unwrap();
    session.set_target_width(80.0);
    session.set_target_height(60.0);
    session.set_fit(FitMode::Fill);
    session.set_format(OutputFormat::Png);

    let artifact = session.export().unwrap();
    assert_eq!(artifact.file_name, "swatch-80x60.png");

    let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (80, 60));
    assert_eq!(decoded.get_pixel(40, 30).0, [10, 200, 30, 255]);
}
