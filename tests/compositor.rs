//! Layer-order and geometry tests for the compositor, driven through a
//! [`RecordingSurface`] so no fonts or real pixels are involved.

use std::sync::Arc;

use snapcard::{
    Alignment, CTA_CORNER_RADIUS, CTA_PADDING, DrawCommand, PreparedAssetStore, PreparedImage,
    RECORDING_CHAR_ADVANCE, RecordingSurface, Rect, RenderInputs, Rgba8, Template, cta_box,
    render,
};

fn sample_template() -> Template {
    Template::from_json(
        r##"{
            "urls": {
                "design_pattern": "assets/pattern.png",
                "mask": "assets/mask.png",
                "stroke": "assets/stroke.png",
                "font": "assets/font.ttf"
            },
            "image_mask": { "x": 56.0, "y": 442.0, "width": 970.0, "height": 600.0 },
            "caption": {
                "text": "1 & 2 BHK Luxury Apartments",
                "position": { "x": 540.0, "y": 200.0 },
                "font_size": 60.0,
                "text_color": "#FFFFFF",
                "alignment": "center",
                "max_characters_per_line": 18
            },
            "cta": {
                "text": "Shop Now",
                "position": { "x": 540.0, "y": 980.0 },
                "font_size": 30.0,
                "text_color": "#FFFFFF",
                "background_color": "#000000"
            }
        }"##,
    )
    .unwrap()
}

fn full_store() -> PreparedAssetStore {
    PreparedAssetStore::from_images(
        Some(PreparedImage::solid(8, 8, [10, 10, 10, 255])),
        Some(PreparedImage::solid(4, 4, [20, 20, 20, 255])),
        Some(PreparedImage::solid(4, 4, [30, 30, 30, 255])),
        Some(PreparedImage::solid(16, 9, [40, 40, 40, 255])),
        Arc::new(Vec::new()),
    )
}

#[test]
fn draws_layers_in_fixed_z_order() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let store = full_store();
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &store).unwrap();

    // Background fill, three template blits, user blit, CTA box path.
    let kinds: Vec<&'static str> = surface
        .commands
        .iter()
        .map(|c| match c {
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::Blit { .. } => "blit",
            DrawCommand::FillPath { .. } => "fill_path",
            DrawCommand::TextLine { .. } => "text",
        })
        .collect();

    let non_text: Vec<&&str> = kinds.iter().filter(|k| **k != "text").collect();
    assert_eq!(
        non_text,
        ["fill_rect", "blit", "blit", "blit", "blit", "fill_path"]
            .iter()
            .collect::<Vec<_>>()
    );

    // All text comes after the box fill.
    let box_index = kinds.iter().position(|k| *k == "fill_path").unwrap();
    let first_caption = kinds.iter().position(|k| *k == "text").unwrap();
    assert!(first_caption < box_index, "caption draws before the CTA box");
    assert!(
        kinds[box_index + 1..].iter().all(|k| *k == "text"),
        "only CTA text follows the box fill"
    );
}

#[test]
fn background_fill_covers_full_canvas() {
    let template = sample_template();
    let mut inputs = RenderInputs::from_template(&template);
    inputs.background_color = Rgba8::rgb(1, 2, 3);
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &full_store()).unwrap();

    match &surface.commands[0] {
        DrawCommand::FillRect { rect, color } => {
            assert_eq!(*rect, Rect::new(0.0, 0.0, 1080.0, 1080.0));
            assert_eq!(*color, Rgba8::rgb(1, 2, 3));
        }
        other => panic!("expected background fill first, got {other:?}"),
    }
}

#[test]
fn mask_stroke_and_user_image_share_the_mask_rect() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &full_store()).unwrap();

    let expected = Rect::new(56.0, 442.0, 56.0 + 970.0, 442.0 + 600.0);
    let blits: Vec<Rect> = surface
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Blit { dest, .. } => Some(*dest),
            _ => None,
        })
        .collect();

    assert_eq!(blits.len(), 4);
    assert_eq!(blits[0], Rect::new(0.0, 0.0, 1080.0, 1080.0));
    assert_eq!(&blits[1..], &[expected, expected, expected]);
}

#[test]
fn without_a_user_image_only_template_layers_blit() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let store = PreparedAssetStore::from_images(
        Some(PreparedImage::solid(8, 8, [10, 10, 10, 255])),
        Some(PreparedImage::solid(4, 4, [20, 20, 20, 255])),
        Some(PreparedImage::solid(4, 4, [30, 30, 30, 255])),
        None,
        Arc::new(Vec::new()),
    );
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &store).unwrap();

    // Pattern, mask, stroke; the mask rect is last painted by the stroke.
    assert_eq!(surface.blit_count(), 3);
    let last_blit = surface
        .commands
        .iter()
        .rev()
        .find_map(|c| match c {
            DrawCommand::Blit { dest, source_size } => Some((*dest, *source_size)),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_blit.0, Rect::new(56.0, 442.0, 1026.0, 1042.0));
    assert_eq!(last_blit.1, (4, 4));
}

#[test]
fn missing_layers_are_skipped_without_error() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let store = PreparedAssetStore::from_images(None, None, None, None, Arc::new(Vec::new()));
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &store).unwrap();

    assert_eq!(surface.blit_count(), 0);
    assert!(
        surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::TextLine { .. })),
        "text still draws when all image layers are missing"
    );
}

#[test]
fn caption_lines_advance_by_font_size() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &full_store()).unwrap();

    // "1 & 2 BHK Luxury Apartments" at 18 chars/line wraps into two lines.
    let captions: Vec<(String, f64, f64, Alignment)> = surface
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::TextLine {
                line,
                x,
                y,
                font_size,
                align,
                ..
            } if *font_size == 60.0 => Some((line.clone(), *x, *y, *align)),
            _ => None,
        })
        .collect();

    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].0, "1 & 2 BHK Luxury");
    assert_eq!(captions[1].0, "Apartments");
    assert_eq!(captions[0].1, 540.0);
    assert_eq!(captions[0].2, 200.0);
    assert_eq!(captions[1].2, 260.0);
    assert_eq!(captions[0].3, Alignment::Center);
}

#[test]
fn cta_box_matches_measured_text_width() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &full_store()).unwrap();

    // "Shop Now" is 8 chars under the recording measurement model.
    let text_width = 8.0 * 30.0 * RECORDING_CHAR_ADVANCE;
    let expected = cta_box(snapcard::Point::new(540.0, 980.0), text_width, 30.0);
    assert_eq!(expected.width(), text_width + 2.0 * CTA_PADDING);

    let (bounds, color) = surface
        .commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::FillPath { bounds, color, .. } => Some((*bounds, *color)),
            _ => None,
        })
        .expect("CTA box fill recorded");

    assert_eq!(color, Rgba8::BLACK);
    assert!((bounds.x0 - expected.x0).abs() < 1e-9);
    assert!((bounds.y0 - expected.y0).abs() < 1e-9);
    assert!((bounds.width() - expected.width()).abs() < 1e-9);
    assert!((bounds.height() - expected.height()).abs() < 1e-9);
    assert!(CTA_CORNER_RADIUS <= expected.height() / 2.0);
}

#[test]
fn cta_text_sits_a_third_of_a_font_below_the_anchor() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let mut surface = RecordingSurface::new(1080, 1080);

    render(&mut surface, &template, &inputs, &full_store()).unwrap();

    let cta_lines: Vec<(f64, f64, Alignment)> = surface
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::TextLine {
                x,
                y,
                font_size,
                align,
                ..
            } if *font_size == 30.0 => Some((*x, *y, *align)),
            _ => None,
        })
        .collect();

    assert_eq!(cta_lines, vec![(540.0, 980.0 + 10.0, Alignment::Center)]);
}

#[test]
fn surface_size_mismatch_is_an_error_before_any_drawing() {
    let template = sample_template();
    let inputs = RenderInputs::from_template(&template);
    let mut surface = RecordingSurface::new(512, 512);

    let err = render(&mut surface, &template, &inputs, &full_store()).unwrap_err();
    assert!(err.to_string().contains("512x512"));
    assert!(surface.commands.is_empty());
}
