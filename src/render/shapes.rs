use crate::foundation::core::{BezPath, Rect};

/// Cubic Bezier approximation constant for a quarter circle.
const KAPPA: f64 = 0.552_284_749_831;

/// Build a closed rounded-rectangle path over `rect` with corner radius
/// `radius`.
///
/// The path starts at the top edge after the top-left corner and walks
/// clockwise: top edge, top-right corner, right edge, bottom-right corner,
/// bottom edge, bottom-left corner, left edge, top-left corner, close.
/// Corners are quarter circles approximated with cubic Beziers, so the
/// path's bounding box equals `rect` exactly.
///
/// The radius is clamped to `min(width, height) / 2`; a larger request
/// would produce self-intersecting corner arcs.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
    let r = radius
        .max(0.0)
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0);
    let k = KAPPA * r;

    let mut path = BezPath::new();
    path.move_to((x0 + r, y0));
    path.line_to((x1 - r, y0));
    path.curve_to((x1 - r + k, y0), (x1, y0 + r - k), (x1, y0 + r));
    path.line_to((x1, y1 - r));
    path.curve_to((x1, y1 - r + k), (x1 - r + k, y1), (x1 - r, y1));
    path.line_to((x0 + r, y1));
    path.curve_to((x0 + r - k, y1), (x0, y1 - r + k), (x0, y1 - r));
    path.line_to((x0, y0 + r));
    path.curve_to((x0, y0 + r - k), (x0 + r - k, y0), (x0 + r, y0));
    path.close_path();
    path
}
