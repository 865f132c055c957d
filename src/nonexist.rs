//! Scan for non-existent values in the array data
//!
//! Kept out of [`crate::check::check_all`] since it touches every element.

use crate::metadata::ArrayMetadata;
use crate::shape::data_byte_len;
use crate::types::{HasNonExist, Type};
use num_traits::Float;
use tracing::debug;

/// Classify the data as holding non-finite values or not.
///
/// Integral types (block included) can't hold them. Floating point data is
/// read in native byte order. Without data, or with data shorter than the
/// metadata describes, the answer is `Unknown`.
pub fn has_non_exist(meta: &ArrayMetadata) -> HasNonExist {
    if meta.element_type.is_integral() {
        return HasNonExist::False;
    }
    if !meta.element_type.is_float() {
        return HasNonExist::Unknown;
    }
    let Some(data) = meta.data.as_deref() else {
        return HasNonExist::Unknown;
    };
    let len = data_byte_len(meta);
    if len == 0 || data.len() < len {
        debug!(expected = len, actual = data.len(), "data too short to scan");
        return HasNonExist::Unknown;
    }
    let data = &data[..len];
    let found = if meta.element_type == Type::Double {
        any_non_exist(data, |b| {
            f64::from_ne_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
    } else {
        any_non_exist(data, |b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    };
    if found {
        HasNonExist::True
    } else {
        HasNonExist::False
    }
}

/// Scan the data and record the result in `meta.has_non_exist`
pub fn has_non_exist_set(meta: &mut ArrayMetadata) -> HasNonExist {
    let result = has_non_exist(meta);
    meta.has_non_exist = result;
    result
}

fn any_non_exist<T: Float>(data: &[u8], decode: impl Fn(&[u8]) -> T) -> bool {
    data.chunks_exact(std::mem::size_of::<T>())
        .any(|chunk| !decode(chunk).is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisInfo;

    fn float_meta(values: &[f32]) -> ArrayMetadata {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        ArrayMetadata::with_axes(Type::Float, vec![AxisInfo::new(values.len())])
            .unwrap()
            .with_data(bytes)
    }

    #[test]
    fn test_finite_floats() {
        let mut meta = float_meta(&[0.0, 1.5, -3.0]);
        assert_eq!(has_non_exist_set(&mut meta), HasNonExist::False);
        assert_eq!(meta.has_non_exist, HasNonExist::False);
    }

    #[test]
    fn test_nan_and_infinity_found() {
        assert_eq!(has_non_exist(&float_meta(&[0.0, f32::NAN])), HasNonExist::True);
        assert_eq!(
            has_non_exist(&float_meta(&[f32::NEG_INFINITY, 1.0])),
            HasNonExist::True
        );
    }

    #[test]
    fn test_doubles() {
        let bytes: Vec<u8> = [1.0f64, f64::INFINITY]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        let meta = ArrayMetadata::with_axes(Type::Double, vec![AxisInfo::new(2)])
            .unwrap()
            .with_data(bytes);
        assert_eq!(has_non_exist(&meta), HasNonExist::True);
    }

    #[test]
    fn test_integral_never_scanned() {
        let meta = ArrayMetadata::with_axes(Type::UChar, vec![AxisInfo::new(4)]).unwrap();
        assert_eq!(has_non_exist(&meta), HasNonExist::False);
    }

    #[test]
    fn test_missing_or_short_data() {
        let mut meta = float_meta(&[1.0, 2.0]);
        meta.data = None;
        assert_eq!(has_non_exist(&meta), HasNonExist::Unknown);
        let meta = float_meta(&[1.0]).with_data(vec![0u8; 2]);
        assert_eq!(has_non_exist(&meta), HasNonExist::Unknown);
    }

    #[test]
    fn test_unknown_type_not_scanned() {
        let mut meta = float_meta(&[f32::NAN]);
        meta.element_type = Type::Unknown;
        assert_eq!(has_non_exist(&meta), HasNonExist::Unknown);
    }
}
