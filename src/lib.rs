//! blobtrace: binary image → labeled regions with contour-derived
//! descriptors.
//!
//! One linear scan labels every 8-connected foreground region and traces
//! its outer and hole boundaries as Freeman chain codes. Geometry (area,
//! perimeter, moments, fitted ellipse, ...) derives lazily from those
//! chains, and a family of named evaluators with per-blob memoization
//! feeds the collection filter layer.
//!
//! # Example
//!
//! ```
//! use blobtrace::ops::{self, BlobOperator};
//! use blobtrace::label_components;
//! use image::{GrayImage, Luma};
//!
//! // a 4x4 block in an 8x8 image
//! let image = GrayImage::from_fn(8, 8, |x, y| {
//!     if (2..6).contains(&x) && (2..6).contains(&y) {
//!         Luma([255u8])
//!     } else {
//!         Luma([0u8])
//!     }
//! });
//!
//! let blobs = label_components(&image, None, 0)?;
//! assert_eq!(blobs.len(), 1);
//! assert_eq!(ops::Area.value(blobs.get(0).unwrap()), 16.0);
//! # Ok::<(), blobtrace::BlobError>(())
//! ```

#![forbid(unsafe_code)]

mod label;

pub mod blob;
pub mod chain;
pub mod collection;
pub mod contour;
pub mod error;
pub mod geom;
pub mod moments;
pub mod ops;

// Re-export image so downstream users get the same version used by
// label_components and the gray-level evaluators.
pub use image;

pub use blob::{Blob, EdgeFlags, Ellipse};
pub use chain::{ChainCode, Point, CHAIN_CODES};
pub use collection::{BlobCollection, FilterAction, FilterCriterion};
pub use contour::{Contour, ContourKind};
pub use error::BlobError;
pub use geom::Rect;
pub use label::label_components;
pub use moments::{MomentOrder, Moments, MAX_MOMENT_ORDER};
pub use ops::BlobOperator;
