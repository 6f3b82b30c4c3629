use crate::geometry::PixelRect;

/// Borrowed 8-bit view. `stride` lets a view address a sub-rectangle of a
/// larger buffer without copying.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Sub-view over `rect`, clamped to the view bounds. Rectangles that fall
    /// entirely outside produce an empty view.
    pub fn crop(&self, rect: PixelRect) -> ImageU8<'a> {
        let Some((x0, y0, x1, y1)) = rect.clamp_to(self.w, self.h) else {
            return ImageU8 {
                w: 0,
                h: 0,
                stride: 0,
                data: &[],
            };
        };
        let start = y0 * self.stride + x0;
        let end = (y1 - 1) * self.stride + x1;
        ImageU8 {
            w: x1 - x0,
            h: y1 - y0,
            stride: self.stride,
            data: &self.data[start..end],
        }
    }

    /// Copy the view into a tightly packed buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.w * self.h);
        for y in 0..self.h {
            let start = y * self.stride;
            out.extend_from_slice(&self.data[start..start + self.w]);
        }
        out
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_addresses_parent_rows() {
        let data: Vec<u8> = (0..16).collect();
        let view = ImageU8 {
            w: 4,
            h: 4,
            stride: 4,
            data: &data,
        };
        let sub = view.crop(PixelRect::new(1, 1, 2, 2));
        assert_eq!((sub.w, sub.h), (2, 2));
        assert_eq!(sub.to_vec(), vec![5, 6, 9, 10]);
    }

    #[test]
    fn crop_clamps_negative_origin() {
        let data = vec![7u8; 9];
        let view = ImageU8 {
            w: 3,
            h: 3,
            stride: 3,
            data: &data,
        };
        let sub = view.crop(PixelRect::new(-2, -2, 4, 4));
        assert_eq!((sub.w, sub.h), (2, 2));

        let outside = view.crop(PixelRect::new(5, 5, 2, 2));
        assert_eq!((outside.w, outside.h), (0, 0));
    }
}
