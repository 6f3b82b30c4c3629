//! Resampling operations: resize and perspective warp.
use super::GrayImageU8;
use crate::error::Result;
use image::imageops::{self, FilterType};
use nalgebra::{Matrix3, Vector3};

const EPS: f32 = 1e-9;

/// Resize to exactly `width × height` with a triangle (bilinear) filter.
pub fn resize(src: &GrayImageU8, width: usize, height: usize) -> Result<GrayImageU8> {
    if src.width() == width && src.height() == height {
        return Ok(src.clone());
    }
    let resized = imageops::resize(
        &src.to_gray_image()?,
        width as u32,
        height as u32,
        FilterType::Triangle,
    );
    Ok(GrayImageU8::from_gray_image(resized))
}

/// Downscale so the width does not exceed `max_width`, keeping aspect ratio.
/// Narrower images are returned unchanged.
pub fn resize_to_width(src: &GrayImageU8, max_width: usize) -> Result<GrayImageU8> {
    if src.width() <= max_width || src.width() == 0 {
        return Ok(src.clone());
    }
    let scale = max_width as f64 / src.width() as f64;
    let height = ((src.height() as f64 * scale).round() as usize).max(1);
    resize(src, max_width, height)
}

/// Perspective warp with `warpPerspective` conventions: each destination
/// pixel `p` samples the source at `H⁻¹·p` bilinearly; samples falling
/// outside the source are 0. Returns `None` for a singular `H`.
pub fn warp_perspective(
    src: &GrayImageU8,
    h: &Matrix3<f32>,
    out_w: usize,
    out_h: usize,
) -> Option<GrayImageU8> {
    let h_inv = h.try_inverse()?;
    let mut out = GrayImageU8::zeros(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let v = h_inv * Vector3::new(x as f32, y as f32, 1.0);
            if v[2].abs() <= EPS {
                continue;
            }
            let sx = v[0] / v[2];
            let sy = v[1] / v[2];
            if let Some(px) = sample_bilinear(src, sx, sy) {
                out.set(x, y, px);
            }
        }
    }
    Some(out)
}

fn sample_bilinear(src: &GrayImageU8, x: f32, y: f32) -> Option<u8> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let max_x = src.width() as f32 - 1.0;
    let max_y = src.height() as f32 - 1.0;
    if x < 0.0 || y < 0.0 || x > max_x || y > max_y {
        return None;
    }
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let top = src.get(x0, y0) as f32 * (1.0 - fx) + src.get(x1, y0) as f32 * fx;
    let bottom = src.get(x0, y1) as f32 * (1.0 - fx) + src.get(x1, y1) as f32 * fx;
    Some((top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_warp_preserves_pixels() {
        let img = GrayImageU8::from_fn(16, 12, |x, y| (x * 7 + y * 3) as u8);
        let warped = warp_perspective(&img, &Matrix3::identity(), 16, 12).unwrap();
        assert_eq!(warped, img);
    }

    #[test]
    fn translation_warp_shifts_content() {
        let img = GrayImageU8::from_fn(10, 10, |x, _| if x == 2 { 200 } else { 0 });
        let shift = Matrix3::new(1.0, 0.0, 3.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let warped = warp_perspective(&img, &shift, 10, 10).unwrap();
        assert_eq!(warped.get(5, 4), 200);
        assert_eq!(warped.get(2, 4), 0);
        // columns 0..3 sample outside the source
        assert_eq!(warped.get(1, 4), 0);
    }

    #[test]
    fn singular_homography_is_rejected() {
        let img = GrayImageU8::zeros(4, 4);
        assert!(warp_perspective(&img, &Matrix3::zeros(), 4, 4).is_none());
    }

    #[test]
    fn resize_to_width_keeps_aspect_ratio() {
        let img = GrayImageU8::zeros(1280, 720);
        let small = resize_to_width(&img, 640).unwrap();
        assert_eq!((small.width(), small.height()), (640, 360));

        let narrow = GrayImageU8::zeros(320, 200);
        let same = resize_to_width(&narrow, 640).unwrap();
        assert_eq!((same.width(), same.height()), (320, 200));
    }
}
