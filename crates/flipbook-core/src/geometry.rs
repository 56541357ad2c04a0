//! Pure frame-geometry resolution.
//!
//! Maps a frame's packed rectangle to a destination draw rectangle. No
//! owned state; the draw path calls [`resolve`] on every frame change.

use glam::Vec2;

use crate::sheet::SpriteFrame;
use crate::types::{FitMode, Rect, Size};

/// A resolved draw: which sheet region to read and where to put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSpec {
    pub src: Rect,
    pub dst: Rect,
}

/// Resolves the draw rectangles for `frame` on a surface of `dest` size.
///
/// `FitMode::Contain` picks the minimum of the two axis ratios so both
/// dimensions fit, then centers the axis that does not fill. `Native`
/// draws at source size with a unit ratio. A trimmed frame shifts the
/// destination origin by the trim origin (scaled) and shrinks the
/// destination box by the same amount, so the visible sprite lands where
/// its untrimmed bounding box would have sat. `offset` is the per-entry
/// position override from the script author, applied last.
pub fn resolve(frame: &SpriteFrame, offset: Option<Vec2>, dest: Size, mode: FitMode) -> DrawSpec {
    let src = frame.rect;
    let source = frame.source_size;

    let (ratio, mut dst) = match mode {
        FitMode::Contain => {
            let r = (dest.w / source.w).min(dest.h / source.h);
            let w = source.w * r;
            let h = source.h * r;
            (
                r,
                Rect::new((dest.w - w) / 2.0, (dest.h - h) / 2.0, w, h),
            )
        }
        FitMode::Native => (1.0, Rect::new(0.0, 0.0, source.w, source.h)),
    };

    if frame.trimmed {
        if let Some(trim) = frame.trim_origin {
            dst.x += trim.x * ratio;
            dst.y += trim.y * ratio;
            dst.w -= trim.x * ratio;
            dst.h -= trim.y * ratio;
        }
    }

    if let Some(o) = offset {
        dst.x += o.x;
        dst.y += o.y;
    }

    DrawSpec { src, dst }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rect: Rect, source: Size) -> SpriteFrame {
        SpriteFrame {
            index: 0,
            name: None,
            rect,
            source_size: source,
            trim_origin: None,
            trimmed: false,
            delay: None,
        }
    }

    #[test]
    fn test_native_draws_at_source_size() {
        let f = frame(Rect::new(32.0, 0.0, 16.0, 16.0), Size::new(16.0, 16.0));
        let spec = resolve(&f, None, Size::new(100.0, 100.0), FitMode::Native);
        assert_eq!(spec.src, Rect::new(32.0, 0.0, 16.0, 16.0));
        assert_eq!(spec.dst, Rect::new(0.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn test_contain_uses_minimum_axis_ratio() {
        // 100x50 source into 200x200 dest: width ratio 2, height ratio 4.
        // The minimum (2) must win so both dimensions fit.
        let f = frame(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(100.0, 50.0));
        let spec = resolve(&f, None, Size::new(200.0, 200.0), FitMode::Contain);
        assert_eq!(spec.dst.w, 200.0);
        assert_eq!(spec.dst.h, 100.0);
    }

    #[test]
    fn test_contain_centers_the_unfilled_axis() {
        let f = frame(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(100.0, 50.0));
        let spec = resolve(&f, None, Size::new(200.0, 200.0), FitMode::Contain);
        // Width fills exactly, so x is 0; height is 100 of 200, centered.
        assert_eq!(spec.dst.x, 0.0);
        assert_eq!(spec.dst.y, 50.0);
    }

    #[test]
    fn test_trim_shifts_and_shrinks_destination() {
        let mut f = frame(Rect::new(0.0, 0.0, 60.0, 62.0), Size::new(64.0, 64.0));
        f.trimmed = true;
        f.trim_origin = Some(Vec2::new(2.0, 1.0));
        let spec = resolve(&f, None, Size::new(64.0, 64.0), FitMode::Native);
        assert_eq!(spec.dst.x, 2.0);
        assert_eq!(spec.dst.y, 1.0);
        assert_eq!(spec.dst.w, 62.0);
        assert_eq!(spec.dst.h, 63.0);
    }

    #[test]
    fn test_trim_scales_with_contain_ratio() {
        let mut f = frame(Rect::new(0.0, 0.0, 30.0, 30.0), Size::new(32.0, 32.0));
        f.trimmed = true;
        f.trim_origin = Some(Vec2::new(2.0, 0.0));
        let spec = resolve(&f, None, Size::new(64.0, 64.0), FitMode::Contain);
        // Ratio is 2, so the 2px trim shifts the origin by 4.
        assert_eq!(spec.dst.x, 4.0);
        assert_eq!(spec.dst.w, 60.0);
    }

    #[test]
    fn test_entry_offset_translates_destination() {
        let f = frame(Rect::new(0.0, 0.0, 16.0, 16.0), Size::new(16.0, 16.0));
        let spec = resolve(
            &f,
            Some(Vec2::new(10.0, -4.0)),
            Size::new(64.0, 64.0),
            FitMode::Native,
        );
        assert_eq!(spec.dst.x, 10.0);
        assert_eq!(spec.dst.y, -4.0);
    }

    #[test]
    fn test_untrimmed_frame_ignores_trim_origin() {
        let mut f = frame(Rect::new(0.0, 0.0, 16.0, 16.0), Size::new(16.0, 16.0));
        f.trim_origin = Some(Vec2::new(5.0, 5.0));
        let spec = resolve(&f, None, Size::new(64.0, 64.0), FitMode::Native);
        assert_eq!(spec.dst.x, 0.0);
    }
}
