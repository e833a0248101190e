use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("{width}x{height} pixels do not fit in memory on this target")]
    TooLarge { width: u32, height: u32 },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("palette cannot be empty")]
    EmptyPalette,

    #[error("color count must be at least 1, got {0}")]
    InvalidColorCount(usize),

    #[error("could not draw {requested} distinct colors (found {found})")]
    PaletteExhausted { requested: usize, found: usize },

    #[error("invalid hex color {0:?} (expected RRGGBB)")]
    InvalidHexColor(String),

    #[error("unknown kernel {0:?} (expected identity, blur, edges or sharpen)")]
    UnknownKernel(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, QuantizeError>;
