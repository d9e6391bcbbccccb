//! Pixel-level smoke tests for the CPU raster backend, plus the text-path
//! error behavior. No font file is needed: font registration is lazy and
//! these tests only ever hand the surface empty font bytes.

use std::sync::Arc;

use snapcard::{
    Alignment, CanvasSize, PreparedImage, RasterSurface, Rect, Rgba8, Surface as _,
    rounded_rect_path,
};

fn surface(width: u32, height: u32) -> RasterSurface {
    let size = CanvasSize::new(width, height).unwrap();
    RasterSurface::new(size, Arc::new(Vec::new())).unwrap()
}

#[test]
fn fill_rect_writes_opaque_pixels() {
    let mut s = surface(16, 16);
    s.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Rgba8::rgb(255, 0, 0));
    let frame = s.into_frame();

    assert_eq!(frame.width, 16);
    assert_eq!(frame.height, 16);
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(8, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(15, 15), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(16, 0), None);
}

#[test]
fn later_fills_paint_over_earlier_ones() {
    let mut s = surface(16, 16);
    s.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Rgba8::rgb(0, 0, 255));
    s.fill_rect(Rect::new(4.0, 4.0, 12.0, 12.0), Rgba8::rgb(0, 255, 0));
    let frame = s.into_frame();

    assert_eq!(frame.pixel(8, 8), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 255, 255]));
}

#[test]
fn blit_stretches_image_into_dest_rect() {
    let mut s = surface(16, 16);
    s.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Rgba8::rgb(0, 0, 0));
    let white = PreparedImage::solid(2, 2, [255, 255, 255, 255]);
    s.blit(&white, Rect::new(4.0, 4.0, 12.0, 12.0));
    let frame = s.into_frame();

    assert_eq!(frame.pixel(8, 8), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(15, 15), Some([0, 0, 0, 255]));
}

#[test]
fn fill_path_covers_rounded_rect_interior_but_not_corners() {
    let mut s = surface(32, 32);
    s.fill_rect(Rect::new(0.0, 0.0, 32.0, 32.0), Rgba8::rgb(0, 0, 0));
    let path = rounded_rect_path(Rect::new(2.0, 2.0, 30.0, 30.0), 8.0);
    s.fill_path(&path, Rgba8::rgb(255, 255, 255));
    let frame = s.into_frame();

    // Interior is solid.
    assert_eq!(frame.pixel(16, 16), Some([255, 255, 255, 255]));
    // The square corner of the bounding rect stays outside the rounding.
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn measure_text_without_usable_font_data_is_an_error() {
    let mut s = surface(16, 16);
    let err = s.measure_text("Shop Now", 30.0).unwrap_err();
    assert!(err.to_string().contains("validation error"));
    assert!(err.to_string().contains("no font families"));
}

#[test]
fn draw_text_line_without_usable_font_data_is_an_error() {
    let mut s = surface(16, 16);
    let err = s
        .draw_text_line("Shop Now", 8.0, 8.0, 30.0, Rgba8::WHITE, Alignment::Center)
        .unwrap_err();
    assert!(err.to_string().contains("no font families"));
}

#[test]
fn empty_lines_draw_as_a_no_op_before_font_loading() {
    // An empty line short-circuits, so bad font data never surfaces.
    let mut s = surface(16, 16);
    s.draw_text_line("", 8.0, 8.0, 30.0, Rgba8::WHITE, Alignment::Left)
        .unwrap();
}

#[test]
fn text_operations_reject_non_positive_font_sizes() {
    let mut s = surface(16, 16);
    assert!(s.measure_text("x", 0.0).is_err());
    assert!(s.measure_text("x", f64::NAN).is_err());
}

#[test]
fn empty_surface_is_fully_transparent() {
    let frame = surface(8, 8).into_frame();
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.data.iter().all(|b| *b == 0));
}
