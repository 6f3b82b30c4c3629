//! Binary mask filters applied to sight crops.
//!
//! Every filter returns a mask of the crop's size with set pixels at 255 and
//! cleared pixels at 0.
//!
//! - `Edges`: 3×3 Sobel magnitude with replicated borders, kept where it
//!   reaches `EDGE_FRACTION` of the crop's strongest response.
//! - `Threshold` / `Inverted`: global Otsu threshold over the crop histogram.
use crate::image::{GrayImageU8, ImageF32, ImageU8, ImageView};
use crate::pov::ImageFilterType;

const EDGE_FRACTION: f32 = 0.25;
const SET: u8 = 255;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

impl ImageFilterType {
    pub fn apply(self, crop: &ImageU8<'_>) -> GrayImageU8 {
        match self {
            ImageFilterType::Edges => edge_mask(crop),
            ImageFilterType::Threshold => otsu_mask(crop, false),
            ImageFilterType::Inverted => otsu_mask(crop, true),
        }
    }
}

/// Sobel gradient magnitude on a float image.
pub fn sobel_magnitude(l: &ImageF32) -> ImageF32 {
    let (w, h) = (l.w, l.h);
    let mut mag = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return mag;
    }
    for y in 0..h {
        let rows = [l.row(y.saturating_sub(1)), l.row(y), l.row((y + 1).min(h - 1))];
        for x in 0..w {
            let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut gx = 0.0;
            let mut gy = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                for (kx, &xx) in xs.iter().enumerate() {
                    gx += row[xx] * SOBEL_KERNEL_X[ky][kx];
                    gy += row[xx] * SOBEL_KERNEL_Y[ky][kx];
                }
            }
            mag.set(x, y, (gx * gx + gy * gy).sqrt());
        }
    }
    mag
}

fn edge_mask(crop: &ImageU8<'_>) -> GrayImageU8 {
    let mag = sobel_magnitude(&ImageF32::from_u8(crop));
    let peak = mag.max_value();
    if peak <= f32::EPSILON {
        return GrayImageU8::zeros(crop.w, crop.h);
    }
    let cutoff = peak * EDGE_FRACTION;
    GrayImageU8::from_fn(crop.w, crop.h, |x, y| {
        if mag.get(x, y) >= cutoff {
            SET
        } else {
            0
        }
    })
}

/// Otsu's threshold: the level maximising between-class variance.
pub fn otsu_level(crop: &ImageU8<'_>) -> u8 {
    let mut hist = [0u64; 256];
    for row in crop.rows() {
        for &px in row {
            hist[px as usize] += 1;
        }
    }
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum();

    let mut best = (0u8, -1.0f64);
    let mut weight_bg = 0u64;
    let mut sum_bg = 0.0f64;
    for (level, &count) in hist.iter().enumerate() {
        weight_bg += count;
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0 {
            break;
        }
        sum_bg += level as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (sum_all - sum_bg) / weight_fg as f64;
        let between = weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2);
        if between > best.1 {
            best = (level as u8, between);
        }
    }
    best.0
}

fn otsu_mask(crop: &ImageU8<'_>, invert: bool) -> GrayImageU8 {
    let level = otsu_level(crop);
    GrayImageU8::from_fn(crop.w, crop.h, |x, y| {
        let bright = crop.get(x, y) > level;
        if bright != invert {
            SET
        } else {
            0
        }
    })
}
