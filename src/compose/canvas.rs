//! Canvas allocation and alpha-over compositing.

use crate::core::types::{Color, Size};
use image::{imageops, RgbaImage};

/// A canvas of `size` filled with `color`, alpha included.
pub fn blank_canvas(size: Size, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, color.to_rgba())
}

/// Composite `top` onto `base` at `(x, y)` with the "over" operator,
/// using `top`'s own alpha channel as the mask.
///
/// Any part of `top` falling outside `base` (including negative offsets) is
/// cropped. Fully transparent source pixels leave the base untouched.
pub fn alpha_over(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(base, top, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_blank_canvas_fill() {
        let canvas = blank_canvas(Size::new(4, 3), Color::new(10, 20, 30, 40));
        assert_eq!(canvas.dimensions(), (4, 3));
        assert!(canvas.pixels().all(|p| *p == Rgba([10, 20, 30, 40])));
    }

    #[test]
    fn test_opaque_over_transparent() {
        let mut base = blank_canvas(Size::square(5), Color::TRANSPARENT);
        let top = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        alpha_over(&mut base, &top, 1, 2);

        for (x, y, p) in base.enumerate_pixels() {
            let inside = (1..3).contains(&x) && (2..4).contains(&y);
            if inside {
                assert_eq!(*p, Rgba([255, 0, 0, 255]));
            } else {
                assert_eq!(*p, Rgba([0, 0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_transparent_source_keeps_padding() {
        let pad = Color::new(0, 0, 255, 255);
        let mut base = blank_canvas(Size::square(3), pad);
        let top = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 0]));
        alpha_over(&mut base, &top, 0, 0);
        assert!(base.pixels().all(|p| *p == pad.to_rgba()));
    }

    #[test]
    fn test_half_alpha_blends() {
        let mut base = blank_canvas(Size::square(1), Color::rgb(0, 0, 0));
        let top = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        alpha_over(&mut base, &top, 0, 0);
        let p = base.get_pixel(0, 0);
        assert!(p[3] >= 254);
        assert!((126..=130).contains(&p[0]));
    }

    #[test]
    fn test_half_alpha_over_transparent_keeps_color() {
        let mut base = blank_canvas(Size::square(1), Color::TRANSPARENT);
        let top = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        alpha_over(&mut base, &top, 0, 0);
        let p = base.get_pixel(0, 0);
        for (channel, expected) in p.0.iter().zip([200u8, 100, 50, 128]) {
            assert!(channel.abs_diff(expected) <= 1, "{:?}", p);
        }
    }

    #[test]
    fn test_negative_offset_crops() {
        let mut base = blank_canvas(Size::square(2), Color::TRANSPARENT);
        let mut top = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        top.put_pixel(1, 1, Rgba([1, 2, 3, 255]));
        alpha_over(&mut base, &top, -1, -1);

        assert_eq!(*base.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
        assert_eq!(*base.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_partial_overlap_over_semi_opaque_base() {
        let mut base = blank_canvas(Size::square(5), Color::new(0, 0, 255, 128));
        let mut top = RgbaImage::from_pixel(7, 3, Rgba([255, 0, 0, 255]));
        top.put_pixel(2, 1, Rgba([0, 255, 0, 0]));
        alpha_over(&mut base, &top, -1, 1);

        // Rows 1..4 are covered, columns past the right edge are dropped
        assert_eq!(*base.get_pixel(0, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(4, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*base.get_pixel(1, 2), Rgba([0, 0, 255, 128]));
        assert_eq!(*base.get_pixel(2, 0), Rgba([0, 0, 255, 128]));
        assert_eq!(*base.get_pixel(2, 4), Rgba([0, 0, 255, 128]));
    }

    #[test]
    fn test_fully_outside_is_noop() {
        let mut base = blank_canvas(Size::square(2), Color::TRANSPARENT);
        let top = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        alpha_over(&mut base, &top, 5, -10);
        assert!(base.pixels().all(|p| p[3] == 0));
    }
}
