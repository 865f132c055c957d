//! Shape arithmetic: element sizes and counts, size validation, shape
//! comparison

use crate::error::{NrrdError, Result};
use crate::metadata::ArrayMetadata;
use crate::types::{Type, DIM_MAX};
use ndarray::IxDyn;

/// Validate a list of axis sizes.
///
/// The number of sizes must be a valid dimension, every size must be
/// positive, and their product must fit in `usize`.
pub fn size_check(sizes: &[usize]) -> Result<()> {
    if sizes.is_empty() || sizes.len() > DIM_MAX {
        return Err(NrrdError::Structural(format!(
            "dimension {} is outside valid range [1,{}]",
            sizes.len(),
            DIM_MAX
        )));
    }
    let mut num: usize = 1;
    for (ai, &size) in sizes.iter().enumerate() {
        if size == 0 {
            return Err(NrrdError::TypeSize(format!(
                "axis {} size ({}) invalid",
                ai, size
            )));
        }
        num = num.checked_mul(size).ok_or_else(|| {
            NrrdError::TypeSize(format!(
                "total # of elements too large to be represented in usize; \
                 overflowed at axis {}",
                ai
            ))
        })?;
    }
    Ok(())
}

/// Bytes per element: the type's width, or the block size for block arrays.
///
/// Returns 0 for an unknown type or a non-positive block size; no valid type
/// has zero width, so 0 doubles as "invalid".
pub fn element_size(meta: &ArrayMetadata) -> usize {
    match meta.element_type {
        Type::Unknown => 0,
        Type::Block => meta.block_size,
        other => other.size_in_bytes(),
    }
}

/// Number of elements: the product of the axis sizes, or 0 if the sizes are
/// invalid
pub fn element_count(meta: &ArrayMetadata) -> usize {
    if meta.dim > DIM_MAX {
        return 0;
    }
    let sizes = meta.sizes();
    if size_check(&sizes).is_err() {
        return 0;
    }
    sizes.iter().product()
}

/// Total bytes of data the metadata describes; 0 if invalid or too large
pub fn data_byte_len(meta: &ArrayMetadata) -> usize {
    element_count(meta)
        .checked_mul(element_size(meta))
        .unwrap_or(0)
}

/// Check that two arrays have the same dimension and axis sizes.
///
/// Element type is not compared.
pub fn same_size(a: &ArrayMetadata, b: &ArrayMetadata) -> Result<()> {
    if a.dim != b.dim {
        return Err(NrrdError::Structural(format!(
            "same_size: a.dim ({}) != b.dim ({})",
            a.dim, b.dim
        )));
    }
    for (ai, (x, y)) in a.axes().iter().zip(b.axes()).enumerate() {
        if x.size != y.size {
            return Err(NrrdError::TypeSize(format!(
                "same_size: a.axis[{}].size ({}) != b.axis[{}].size ({})",
                ai, x.size, ai, y.size
            )));
        }
    }
    Ok(())
}

/// Whether two arrays have the same shape
pub fn shapes_equal(a: &ArrayMetadata, b: &ArrayMetadata) -> bool {
    same_size(a, b).is_ok()
}

/// Split the axes at `split`: returns the number of elements in one piece
/// (axes below `split`) and the number of pieces (axes from `split` on).
///
/// `None` if either product overflows `usize`.
pub fn split_sizes(meta: &ArrayMetadata, split: usize) -> Option<(usize, usize)> {
    let sizes = meta.sizes();
    let split = split.min(sizes.len());
    let product = |part: &[usize]| part.iter().try_fold(1usize, |acc, &s| acc.checked_mul(s));
    Some((product(&sizes[..split])?, product(&sizes[split..])?))
}

/// Shape for viewing the data as a row-major `ndarray`.
///
/// Axis 0 varies fastest in memory, so it comes last. `None` if the sizes
/// are invalid.
pub fn ndarray_shape(meta: &ArrayMetadata) -> Option<IxDyn> {
    if element_count(meta) == 0 {
        return None;
    }
    let mut sizes = meta.sizes();
    sizes.reverse();
    Some(IxDyn(&sizes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisInfo;

    fn create_test_meta(sizes: &[usize]) -> ArrayMetadata {
        let axes = sizes.iter().map(|&s| AxisInfo::new(s)).collect();
        ArrayMetadata::with_axes(Type::Float, axes).unwrap()
    }

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(&create_test_meta(&[2, 3, 4])), 24);
        assert_eq!(element_count(&create_test_meta(&[2, 0, 4])), 0);
        assert_eq!(element_count(&ArrayMetadata::new()), 0);
    }

    #[test]
    fn test_element_count_overflow() {
        let meta = create_test_meta(&[usize::MAX / 2, 3]);
        assert_eq!(element_count(&meta), 0);
        assert!(size_check(&meta.sizes()).is_err());
    }

    #[test]
    fn test_element_size() {
        let mut meta = create_test_meta(&[2]);
        assert_eq!(element_size(&meta), 4);
        meta.element_type = Type::Block;
        assert_eq!(element_size(&meta), 0);
        meta.block_size = 12;
        assert_eq!(element_size(&meta), 12);
        meta.element_type = Type::Unknown;
        assert_eq!(element_size(&meta), 0);
    }

    #[test]
    fn test_data_byte_len() {
        assert_eq!(data_byte_len(&create_test_meta(&[2, 3])), 24);
    }

    #[test]
    fn test_same_size_ignores_type() {
        let a = create_test_meta(&[5, 6]);
        let mut b = create_test_meta(&[5, 6]);
        b.element_type = Type::UChar;
        assert!(shapes_equal(&a, &b));
        assert!(!shapes_equal(&a, &create_test_meta(&[5, 7])));
        assert!(!shapes_equal(&a, &create_test_meta(&[5, 6, 1])));
    }

    #[test]
    fn test_split_sizes() {
        let meta = create_test_meta(&[2, 3, 4, 5]);
        assert_eq!(split_sizes(&meta, 2), Some((6, 20)));
        assert_eq!(split_sizes(&meta, 0), Some((1, 120)));
        assert_eq!(split_sizes(&meta, 4), Some((120, 1)));
    }

    #[test]
    fn test_split_sizes_overflow() {
        let meta = create_test_meta(&[usize::MAX / 2, 3, usize::MAX / 2]);
        assert_eq!(split_sizes(&meta, 2), None);
        assert_eq!(split_sizes(&meta, 1), None);
        assert_eq!(split_sizes(&meta, 3), None);
    }

    #[test]
    fn test_ndarray_shape_is_slowest_first() {
        let meta = create_test_meta(&[2, 3, 4]);
        assert_eq!(ndarray_shape(&meta), Some(IxDyn(&[4, 3, 2])));
        assert_eq!(ndarray_shape(&create_test_meta(&[0])), None);
    }
}
