//! nrrd-meta - metadata for self-describing n-dimensional arrays
//!
//! A Rust model of the metadata that accompanies a raster array: per-axis
//! sampling geometry, physical units, and orientation in a world coordinate
//! space, together with the validation that keeps all of it consistent.
//!
//! # Features
//!
//! - Typed registry of element types, centerings, kinds and spaces
//! - Per-field validators and an aggregate [`check_all`]
//! - Space/orientation consistency checking
//! - Origin derivation from per-axis min, max and spacing
//! - One-time platform sanity check with a cached verdict
//!
//! Reading and writing the on-disk format is left to other crates.
//!
//! # Example
//!
//! ```rust
//! use nrrd_meta::{ArrayMetadata, AxisInfo, Space, Type};
//!
//! # fn example() -> nrrd_meta::Result<()> {
//! nrrd_meta::platform_sanity_check()?;
//!
//! let mut meta = ArrayMetadata::with_axes(
//!     Type::Float,
//!     vec![AxisInfo::new(8), AxisInfo::new(8), AxisInfo::new(4)],
//! )?
//! .with_data(vec![0u8; 8 * 8 * 4 * 4]);
//! meta.space_set(Space::RightAnteriorSuperior);
//! meta.space_origin_set(&[0.0, 0.0, 0.0])?;
//! for (ai, axis) in meta.axes_mut().iter_mut().enumerate() {
//!     let mut dir = [0.0; 3];
//!     dir[ai] = 0.5;
//!     axis.set_space_direction(&dir);
//! }
//! meta.check()?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod axis;
pub mod check;
pub mod config;
pub mod enums;
pub mod error;
pub mod metadata;
pub mod nonexist;
pub mod origin;
pub mod sanity;
mod serde_nan;
pub mod shape;
pub mod space;
pub mod types;

// Re-exports
pub use axis::AxisInfo;
pub use check::{check_all, check_field, field_check, FieldCheck};
pub use config::NrrdConfig;
pub use enums::NrrdEnum;
pub use error::{ErrorCategory, NrrdError, Result, ResultExt};
pub use metadata::ArrayMetadata;
pub use nonexist::{has_non_exist, has_non_exist_set};
pub use origin::{derived_origin, origin_calculate, OriginStatus};
pub use sanity::{platform_sanity_check, reset_sanity_latch, SanityLatch};
pub use shape::{element_count, element_size, same_size, shapes_equal};
pub use space::check_space_info;
pub use types::{
    space_dimension, Boundary, Center, Encoding, Field, HasNonExist, Kind, Space, Type, DIM_MAX,
    SPACE_DIM_MAX, TYPE_SIZE_MAX,
};

/// Version of this crate
pub const NRRD_META_VERSION: &str = env!("CARGO_PKG_VERSION");
