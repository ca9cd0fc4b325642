// End-to-end properties of the render pipeline: determinism, the
// empty-text no-op law, dimension preservation, and the documented
// bottom-right placement scenario.

use image::{Rgba, RgbaImage};
use tidemark::export::{self, ExportOptions};
use tidemark::pipeline::render_image;
use tidemark::session::{Session, SourceImage};
use tidemark::settings::{Position, WatermarkSettings};
use tidemark::watermark::{self, geometry};

fn source_image(name: &str, width: u32, height: u32) -> SourceImage {
    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        *pixel = Rgba([((x * 7) % 256) as u8, ((y * 5) % 256) as u8, 180, 255]);
    }
    SourceImage {
        name: name.to_string(),
        byte_size: (width * height * 4) as u64,
        thumbnail: image.clone(),
        image,
    }
}

fn sample_settings() -> WatermarkSettings {
    WatermarkSettings {
        text: "SAMPLE".to_string(),
        position: Position::BottomRight,
        font_color: "#FFFFFF".to_string(),
        opacity: 80,
        rotation: 15.0,
        ..Default::default()
    }
}

#[test]
fn render_image_is_deterministic() {
    let source = source_image("photo.png", 320, 240);
    let settings = sample_settings();

    let first = render_image(&source, &settings).unwrap();
    let second = render_image(&source, &settings).unwrap();

    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn encoded_output_is_byte_identical() {
    let mut session = Session::new(sample_settings());
    session.extend(vec![source_image("photo.png", 200, 160)]);

    let options = ExportOptions::default();
    let a = export::export_image(&session, 0, &options).unwrap();
    let b = export::export_image(&session, 0, &options).unwrap();

    assert_eq!(a.data, b.data);
    assert_eq!(a.name, "watermark_photo.png");
}

#[test]
fn renderer_leaves_surface_untouched_for_empty_text() {
    let source = source_image("photo.png", 150, 90);
    let settings = WatermarkSettings::default();
    assert_eq!(settings.text, "");

    let surface = render_image(&source, &settings).unwrap();
    assert_eq!(surface, source.image);
}

#[test]
fn second_invocation_from_fresh_base_matches_first() {
    // No paint state survives between renderer calls: rendering onto a
    // freshly painted base twice in a row gives the same pixels both
    // times.
    let source = source_image("photo.png", 240, 180);
    let settings = sample_settings();

    let first = render_image(&source, &settings).unwrap();
    let second = render_image(&source, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn exported_image_round_trips_dimensions() {
    let mut session = Session::new(sample_settings());
    session.extend(vec![source_image("photo.png", 517, 293)]);

    let exported = export::export_image(&session, 0, &ExportOptions::default()).unwrap();
    let decoded = image::load_from_memory(&exported.data).unwrap();

    assert_eq!(decoded.width(), 517);
    assert_eq!(decoded.height(), 293);
}

#[test]
fn bottom_right_scenario_anchor() {
    // 800x600, "SAMPLE" at 24px, spacing 10/10, no rotation.
    let text_width = watermark::measure_text("Arial", "SAMPLE", 24.0);
    assert!(text_width > 0.0);

    let anchor = geometry::resolve(Position::BottomRight, 800, 600, text_width, 24.0, 10, 10);

    assert_eq!(anchor.x, 800.0 - text_width - 10.0);
    assert_eq!(anchor.y, 590.0);

    // Fully visible: the text box fits inside the surface.
    assert!(anchor.x > 0.0);
    assert!(anchor.y - 24.0 > 0.0);
}

#[test]
fn bottom_right_scenario_paints_only_near_the_corner() {
    let source = SourceImage {
        name: "white.png".to_string(),
        byte_size: 0,
        image: RgbaImage::from_pixel(800, 600, Rgba([255, 255, 255, 255])),
        thumbnail: RgbaImage::new(1, 1),
    };
    let settings = WatermarkSettings {
        text: "SAMPLE".to_string(),
        position: Position::BottomRight,
        ..Default::default()
    };

    let surface = render_image(&source, &settings).unwrap();
    let text_width = watermark::measure_text("Arial", "SAMPLE", 24.0);
    let anchor_x = 800.0 - text_width - 10.0;

    let mut painted = 0usize;
    for (x, y, pixel) in surface.enumerate_pixels() {
        if pixel[0] < 255 {
            painted += 1;
            assert!((x as f32) >= anchor_x.floor() - 1.0, "paint at ({}, {})", x, y);
            assert!(y > 550, "paint at ({}, {})", x, y);
        }
    }
    assert!(painted > 0, "watermark should be visible");
}
