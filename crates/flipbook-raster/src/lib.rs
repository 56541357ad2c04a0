//! CPU raster binding for the flipbook playback core.
//!
//! [`RasterSurface`] implements the core's [`Surface`] seam over a plain
//! RGBA pixel buffer: transparent clears and nearest-neighbor scaled
//! blits with source-over compositing. The target can be exported as PNG
//! for inspection.

use image::{ImageError, Rgba, RgbaImage};
use std::path::Path;

use flipbook_core::{Rect, SheetImage, Size, Surface};

/// A fixed-size RGBA target plus the installed sprite sheet.
pub struct RasterSurface {
    target: RgbaImage,
    sheet: Option<RgbaImage>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: RgbaImage::new(width, height),
            sheet: None,
        }
    }

    pub fn target(&self) -> &RgbaImage {
        &self.target
    }

    /// Writes the current target to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), ImageError> {
        self.target.save(path)
    }
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for c in 0..3 {
        dst[c] = ((src[c] as u32 * sa + dst[c] as u32 * inv) / 255) as u8;
    }
    dst[3] = (sa + dst[3] as u32 * inv / 255).min(255) as u8;
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::new(self.target.width() as f32, self.target.height() as f32)
    }

    fn install_sheet(&mut self, sheet: SheetImage) {
        self.sheet = RgbaImage::from_raw(sheet.width, sheet.height, sheet.pixels);
    }

    fn clear_region(&mut self, region: Rect) {
        let (tw, th) = (self.target.width() as i64, self.target.height() as i64);
        let x0 = (region.x.floor() as i64).clamp(0, tw);
        let y0 = (region.y.floor() as i64).clamp(0, th);
        let x1 = ((region.x + region.w).ceil() as i64).clamp(0, tw);
        let y1 = ((region.y + region.h).ceil() as i64).clamp(0, th);
        for y in y0..y1 {
            for x in x0..x1 {
                self.target.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn blit(&mut self, src: Rect, dst: Rect) {
        let Some(sheet) = self.sheet.as_ref() else {
            return;
        };
        if dst.w <= 0.0 || dst.h <= 0.0 || src.w <= 0.0 || src.h <= 0.0 {
            return;
        }
        let (tw, th) = (self.target.width() as i64, self.target.height() as i64);
        let x0 = (dst.x.floor() as i64).clamp(0, tw);
        let y0 = (dst.y.floor() as i64).clamp(0, th);
        let x1 = ((dst.x + dst.w).ceil() as i64).clamp(0, tw);
        let y1 = ((dst.y + dst.h).ceil() as i64).clamp(0, th);
        for y in y0..y1 {
            for x in x0..x1 {
                // Nearest-neighbor sample from the source rectangle.
                let u = (x as f32 + 0.5 - dst.x) / dst.w;
                let v = (y as f32 + 0.5 - dst.y) / dst.h;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = (src.x + u * src.w) as u32;
                let sy = (src.y + v * src.h) as u32;
                if sx >= sheet.width() || sy >= sheet.height() {
                    continue;
                }
                let px = *sheet.get_pixel(sx, sy);
                blend(self.target.get_pixel_mut(x as u32, y as u32), px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_sheet() -> SheetImage {
        // 4x2 sheet: left 2x2 red, right 2x2 blue, fully opaque.
        let mut pixels = Vec::with_capacity(4 * 2 * 4);
        for _row in 0..2 {
            for x in 0..4 {
                if x < 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        SheetImage {
            width: 4,
            height: 2,
            pixels,
        }
    }

    #[test]
    fn test_blit_copies_the_source_region() {
        let mut s = RasterSurface::new(4, 4);
        s.install_sheet(checker_sheet());
        s.blit(Rect::new(2.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(s.target().get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(s.target().get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
        // Outside the destination stays untouched.
        assert_eq!(s.target().get_pixel(3, 3), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_scales_nearest_neighbor() {
        let mut s = RasterSurface::new(4, 4);
        s.install_sheet(checker_sheet());
        // 2x2 red region stretched over the whole 4x4 target.
        s.blit(Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 4.0, 4.0));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(s.target().get_pixel(x, y), &Rgba([255, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn test_clear_region_is_clamped_and_transparent() {
        let mut s = RasterSurface::new(4, 4);
        s.install_sheet(checker_sheet());
        s.blit(Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 4.0, 4.0));
        s.clear_region(Rect::new(2.0, 2.0, 100.0, 100.0));
        assert_eq!(s.target().get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(s.target().get_pixel(3, 3), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_without_sheet_is_a_no_op() {
        let mut s = RasterSurface::new(2, 2);
        s.blit(Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(s.target().get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_alpha_blend_composites_over() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend(&mut dst, Rgba([255, 255, 255, 128]));
        // Roughly half-white over black.
        assert!(dst[0] > 120 && dst[0] < 132);
        assert_eq!(dst[3], 255);
    }
}
