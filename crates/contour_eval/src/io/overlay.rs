use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};
use tracing::info;

use crate::{
    error::{EvalError, Result},
    types::{BoundingBox, Contour},
};

pub const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Copy of `image` with each contour outlined and its bounding box drawn
/// two pixels thick on top.
pub fn render_overlay(image: &DynamicImage, contours: &[Contour]) -> RgbImage {
    let mut canvas = image.to_rgb8();

    for contour in contours {
        draw_outline(&mut canvas, contour);
    }
    for contour in contours {
        draw_box(&mut canvas, &contour.bounding_box());
    }

    canvas
}

/// Render the overlay and write it; the format follows the file extension
pub fn save_overlay<P: AsRef<Path>>(path: P, image: &DynamicImage, contours: &[Contour]) -> Result<()> {
    let path = path.as_ref();
    render_overlay(image, contours)
        .save(path)
        .map_err(|source| EvalError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), boxes = contours.len(), "wrote overlay image");
    Ok(())
}

fn draw_outline(canvas: &mut RgbImage, contour: &Contour) {
    let points = &contour.points;
    if points.len() < 2 {
        return;
    }

    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            canvas,
            (start.x as f32, start.y as f32),
            (end.x as f32, end.y as f32),
            OUTLINE_COLOR,
        );
    }
}

fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox) {
    if bbox.width == 0 || bbox.height == 0 {
        return;
    }
    draw_hollow_rect_mut(canvas, Rect::at(bbox.x, bbox.y).of_size(bbox.width, bbox.height), BOX_COLOR);

    if bbox.width > 2 && bbox.height > 2 {
        let inner = Rect::at(bbox.x + 1, bbox.y + 1).of_size(bbox.width - 2, bbox.height - 2);
        draw_hollow_rect_mut(canvas, inner, BOX_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn square() -> Contour {
        [(10, 10), (10, 29), (29, 29), (29, 10)]
            .into_iter()
            .map(Point::from)
            .collect()
    }

    #[test]
    fn test_boxes_drawn_over_input() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        let overlay = render_overlay(&image, &[square()]);

        assert_eq!(overlay.dimensions(), (50, 50));
        assert_eq!(*overlay.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*overlay.get_pixel(11, 20), BOX_COLOR);
        assert_eq!(*overlay.get_pixel(29, 29), BOX_COLOR);
        assert_eq!(*overlay.get_pixel(20, 20), Rgb([0, 0, 0]));
        assert_eq!(*overlay.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_outline_visible_inside_box() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        let triangle: Contour = [(10, 10), (40, 10), (10, 40)]
            .into_iter()
            .map(Point::from)
            .collect();
        let overlay = render_overlay(&image, &[triangle]);

        // Hypotenuse runs through the box interior
        assert_eq!(*overlay.get_pixel(25, 25), OUTLINE_COLOR);
    }

    #[test]
    fn test_degenerate_contours_do_not_panic() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let overlay = render_overlay(&image, &[Contour::default(), Contour::new(vec![Point::new(3, 3)])]);
        assert_eq!(*overlay.get_pixel(3, 3), BOX_COLOR);
    }

    #[test]
    fn test_save_overlay() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("result.png");
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 50));

        save_overlay(&path, &image, &[square()]).expect("Should save");
        let reloaded = image::open(&path).expect("Should reopen").to_rgb8();
        assert_eq!(*reloaded.get_pixel(10, 10), BOX_COLOR);
    }
}
