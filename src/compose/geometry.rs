//! Fit-and-center math.

use crate::core::error::ProcessError;
use crate::core::types::Size;

/// Ratio that scales `source` to fit inside `bounds` on both axes.
///
/// There is no shrink-only clamp: a source smaller than `bounds` yields a
/// ratio above 1 and is enlarged.
pub fn scale_ratio(source: Size, bounds: Size) -> Result<f64, ProcessError> {
    if source.is_empty() {
        return Err(ProcessError::InvalidDimensions {
            width: source.width,
            height: source.height,
        });
    }

    let rx = f64::from(bounds.width) / f64::from(source.width);
    let ry = f64::from(bounds.height) / f64::from(source.height);
    Ok(rx.min(ry))
}

/// Size of `source` after scaling it to fit `bounds`, preserving the aspect
/// ratio. Each axis is truncated toward zero.
pub fn fit_within(source: Size, bounds: Size) -> Result<Size, ProcessError> {
    let ratio = scale_ratio(source, bounds)?;
    let width = (f64::from(source.width) * ratio) as u32;
    let height = (f64::from(source.height) * ratio) as u32;

    if width == 0 || height == 0 {
        return Err(ProcessError::EmptyResize { width, height });
    }

    Ok(Size::new(width, height))
}

/// Top-left position that centers `content` on `canvas`.
///
/// Uses floor division, so an odd leftover puts the extra pixel on the
/// right/bottom. Offsets are negative when the content is larger than the
/// canvas.
pub fn center_offset(canvas: Size, content: Size) -> (i64, i64) {
    let dx = i64::from(canvas.width) - i64::from(content.width);
    let dy = i64::from(canvas.height) - i64::from(content.height);
    (dx.div_euclid(2), dy.div_euclid(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_landscape() {
        let fitted = fit_within(Size::new(500, 300), Size::square(250)).unwrap();
        assert_eq!(fitted, Size::new(250, 150));
    }

    #[test]
    fn test_fit_portrait() {
        let fitted = fit_within(Size::new(100, 400), Size::square(250)).unwrap();
        assert_eq!(fitted, Size::new(62, 250));
    }

    #[test]
    fn test_small_source_is_upscaled() {
        let ratio = scale_ratio(Size::new(40, 20), Size::square(250)).unwrap();
        assert!(ratio >= 1.0);
        assert_eq!(
            fit_within(Size::new(40, 20), Size::square(250)).unwrap(),
            Size::new(250, 125)
        );
    }

    #[test]
    fn test_zero_source_rejected() {
        assert_eq!(
            scale_ratio(Size::new(0, 10), Size::square(250)),
            Err(ProcessError::InvalidDimensions { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_degenerate_aspect_collapses() {
        assert_eq!(
            fit_within(Size::new(1000, 1), Size::square(250)),
            Err(ProcessError::EmptyResize { width: 250, height: 0 })
        );
    }

    #[test]
    fn test_center_offset_even_and_odd() {
        assert_eq!(center_offset(Size::square(350), Size::new(250, 156)), (50, 97));
        assert_eq!(center_offset(Size::square(11), Size::square(4)), (3, 3));
    }

    #[test]
    fn test_center_offset_negative() {
        assert_eq!(center_offset(Size::square(100), Size::square(250)), (-75, -75));
        assert_eq!(center_offset(Size::square(100), Size::square(251)), (-76, -76));
    }

    proptest! {
        #[test]
        fn prop_fit_never_exceeds_bounds(
            sw in 1u32..5000, sh in 1u32..5000,
            bw in 1u32..1000, bh in 1u32..1000,
        ) {
            let source = Size::new(sw, sh);
            let bounds = Size::new(bw, bh);
            let ratio = scale_ratio(source, bounds).unwrap();
            let expected_w = (f64::from(sw) * ratio) as u32;
            let expected_h = (f64::from(sh) * ratio) as u32;

            match fit_within(source, bounds) {
                Ok(fitted) => {
                    prop_assert!(fitted.fits_within(bounds));
                    prop_assert_eq!(fitted, Size::new(expected_w, expected_h));
                }
                Err(ProcessError::EmptyResize { width, height }) => {
                    prop_assert!(width == 0 || height == 0);
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        #[test]
        fn prop_center_offset_splits_leftover(
            cw in 1u32..2000, ch in 1u32..2000,
            w in 1u32..2000, h in 1u32..2000,
        ) {
            let (x, y) = center_offset(Size::new(cw, ch), Size::new(w, h));
            let right = i64::from(cw) - i64::from(w) - x;
            let bottom = i64::from(ch) - i64::from(h) - y;
            prop_assert!(right - x == 0 || right - x == 1);
            prop_assert!(bottom - y == 0 || bottom - y == 1);
        }
    }
}
