use thiserror::Error;

/// Errors that can occur during blob extraction and queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlobError {
    #[error("input image is empty")]
    EmptyImage,

    #[error("mask size {mask_width}x{mask_height} does not match image size {width}x{height}")]
    MaskSizeMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("moment order ({p},{q}) exceeds the maximum supported order {max}")]
    MomentOrder { p: u32, q: u32, max: u32 },
}
