//! Grayscale image buffers, borrowed views and the few pixel operations the
//! POV pipeline needs (crop, resize, perspective warp, encode/decode).

pub mod f32;
pub mod gray;
pub mod io;
pub mod ops;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::gray::GrayImageU8;
pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
