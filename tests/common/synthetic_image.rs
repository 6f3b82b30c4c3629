use pov_framing::image::GrayImageU8;

/// Dark frame with a bright square whose left edge sits on the frame centre.
pub fn target_frame(width: usize, height: usize) -> GrayImageU8 {
    let (cx, cy) = (width / 2, height / 2);
    GrayImageU8::from_fn(width, height, |x, y| {
        let inside = x >= cx && x < cx + width / 4 && y + height / 8 >= cy && y < cy + height / 8;
        if inside {
            220
        } else {
            30
        }
    })
}

/// Horizontally mirrored copy.
pub fn mirrored(image: &GrayImageU8) -> GrayImageU8 {
    let w = image.width();
    GrayImageU8::from_fn(w, image.height(), |x, y| image.get(w - 1 - x, y))
}
