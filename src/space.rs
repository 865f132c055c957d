//! Space/orientation consistency and space-vector arithmetic
//!
//! An array can describe its geometry two ways: per-axis min/max/spacing, or
//! a coordinate space with an origin and one direction vector per axis.
//! [`check_space_info`] enforces that the two never mix on the same axis and
//! that everything tied to the space agrees with its declared dimension.

use crate::enums::NrrdEnum;
use crate::error::{NrrdError, Result, ResultExt};
use crate::metadata::ArrayMetadata;
use crate::types::{Space, DIM_MAX, SPACE_DIM_MAX};

/// Whether a scalar holds a real value (neither NaN nor infinite)
#[inline]
pub fn exists(x: f64) -> bool {
    x.is_finite()
}

/// Equality in which unset equals unset and never equals a real number
#[inline]
pub fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

pub fn same_vec(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_value(*x, *y))
}

pub fn space_vec_copy(dst: &mut [f64; SPACE_DIM_MAX], src: &[f64; SPACE_DIM_MAX]) {
    dst.copy_from_slice(src);
}

/// `sum = scl_a*vec_a + scl_b*vec_b`, coefficient-wise.
///
/// Unset coefficients are not treated as zero: NaN propagates into `sum`.
pub fn space_vec_scale_add2(
    sum: &mut [f64; SPACE_DIM_MAX],
    scl_a: f64,
    vec_a: &[f64; SPACE_DIM_MAX],
    scl_b: f64,
    vec_b: &[f64; SPACE_DIM_MAX],
) {
    for ((s, a), b) in sum.iter_mut().zip(vec_a).zip(vec_b) {
        *s = scl_a * a + scl_b * b;
    }
}

pub fn space_vec_scale(out: &mut [f64; SPACE_DIM_MAX], scl: f64, vec: &[f64; SPACE_DIM_MAX]) {
    for (o, v) in out.iter_mut().zip(vec) {
        *o = scl * v;
    }
}

/// Euclidean length of the first `sdim` coefficients
pub fn space_vec_norm(sdim: usize, vec: &[f64; SPACE_DIM_MAX]) -> f64 {
    vec.iter()
        .take(sdim)
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt()
}

pub fn space_vec_set_nan(vec: &mut [f64; SPACE_DIM_MAX]) {
    vec.fill(f64::NAN);
}

/// Index of the first coefficient in `0..len` whose existence differs from
/// coefficient 0
fn inconsistent_coefficient(vec: &[f64], len: usize) -> Option<usize> {
    let first = exists(vec[0]);
    (0..len).find(|&ii| exists(vec[ii]) != first)
}

/// Check every space-related invariant of `meta` as one unit.
///
/// Reports the first violation found, scanning axes and coefficients left
/// to right. Never mutates.
pub fn check_space_info(meta: &ArrayMetadata) -> Result<()> {
    space_info(meta).context("check_space_info")
}

fn space_info(meta: &ArrayMetadata) -> Result<()> {
    let space_dim = meta.space_dim;
    if space_dim > SPACE_DIM_MAX {
        return Err(NrrdError::Structural(format!(
            "space dimension {} is outside valid range [0,SPACE_DIM_MAX] = [0,{}]",
            space_dim, SPACE_DIM_MAX
        )));
    }

    // Only the declared axes matter when space is in use, and dim itself
    // may be bogus at this point.
    let declared = meta.dim.min(DIM_MAX);

    if space_dim > 0 {
        if meta.space.is_valid() && meta.space.dimension() != space_dim {
            return Err(NrrdError::SpaceInfo(format!(
                "space {} has dimension {} but spaceDim is {}",
                meta.space,
                meta.space.dimension(),
                space_dim
            )));
        }
        if let Some(ii) = inconsistent_coefficient(&meta.space_origin, space_dim) {
            return Err(NrrdError::SpaceInfo(format!(
                "existence of space origin coefficients must be consistent \
                 (val[0] not like val[{}])",
                ii
            )));
        }
        let frame_exists = exists(meta.measurement_frame[0][0]);
        for (dd, row) in meta.measurement_frame.iter().take(space_dim).enumerate() {
            if let Some(ii) = (0..space_dim).find(|&ii| exists(row[ii]) != frame_exists) {
                return Err(NrrdError::SpaceInfo(format!(
                    "existence of measurement frame coefficients must be consistent: \
                     [col][row] [{}][{}] not like [0][0]",
                    dd, ii
                )));
            }
        }
        for (dd, axis) in meta.axis.iter().take(declared).enumerate() {
            if let Some(ii) = inconsistent_coefficient(&axis.space_direction, space_dim) {
                return Err(NrrdError::SpaceInfo(format!(
                    "existence of space direction {} coefficients must be consistent \
                     (val[0] not like val[{}])",
                    dd, ii
                )));
            }
            if axis.has_space_direction()
                && (exists(axis.min)
                    || exists(axis.max)
                    || exists(axis.spacing)
                    || axis.has_units())
            {
                return Err(NrrdError::SpaceInfo(format!(
                    "axis[{}] has a direction vector, and so can't have min, max, \
                     spacing, or units set",
                    dd
                )));
            }
        }
    } else {
        if meta.space != Space::Unknown {
            return Err(NrrdError::SpaceInfo(format!(
                "space {} can't be set with spaceDim {}",
                meta.space, space_dim
            )));
        }
        if meta
            .space_units
            .iter()
            .any(|u| u.as_deref().is_some_and(|u| !u.is_empty()))
        {
            return Err(NrrdError::SpaceInfo(
                "spaceDim is 0, but space units is set".to_string(),
            ));
        }
        if meta.space_origin.iter().any(|v| exists(*v)) {
            return Err(NrrdError::SpaceInfo(
                "spaceDim is 0, but space origin is set".to_string(),
            ));
        }
        if meta
            .axis
            .iter()
            .any(|axis| axis.space_direction.iter().any(|v| exists(*v)))
        {
            return Err(NrrdError::SpaceInfo(
                "spaceDim is 0, but space directions are set".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisInfo;
    use crate::error::ErrorCategory;
    use crate::types::Type;

    fn oriented() -> ArrayMetadata {
        let mut meta = ArrayMetadata::with_axes(
            Type::Float,
            vec![AxisInfo::new(4), AxisInfo::new(5), AxisInfo::new(6)],
        )
        .unwrap();
        meta.space_set(Space::LeftPosteriorSuperior);
        meta.axis[0].set_space_direction(&[1.0, 0.0, 0.0]);
        meta.axis[1].set_space_direction(&[0.0, 1.0, 0.0]);
        meta.axis[2].set_space_direction(&[0.0, 0.0, 1.0]);
        meta.space_origin_set(&[0.0, 0.0, 0.0]).unwrap();
        meta
    }

    #[test]
    fn test_oriented_volume_is_consistent() {
        check_space_info(&oriented()).unwrap();
    }

    #[test]
    fn test_space_dim_out_of_range() {
        let mut meta = oriented();
        meta.space_dim = SPACE_DIM_MAX + 1;
        let err = check_space_info(&meta).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Structural);
    }

    #[test]
    fn test_label_dimension_mismatch() {
        let mut meta = oriented();
        meta.space = Space::ScannerXyzTime;
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("has dimension 4 but spaceDim is 3"));
    }

    #[test]
    fn test_partial_origin_rejected() {
        let mut meta = oriented();
        meta.space_origin[2] = f64::NAN;
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("val[2]"));
    }

    #[test]
    fn test_partial_measurement_frame_rejected() {
        let mut meta = oriented();
        meta.measurement_frame[0][0] = 1.0;
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("[0][1]"));

        for row in meta.measurement_frame.iter_mut().take(3) {
            row[..3].fill(0.5);
        }
        check_space_info(&meta).unwrap();
    }

    #[test]
    fn test_partial_direction_rejected() {
        let mut meta = oriented();
        meta.axis[1].space_direction[1] = f64::NAN;
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("space direction 1"));
    }

    #[test]
    fn test_direction_excludes_per_axis_geometry() {
        let mut meta = oriented();
        meta.axis[2].units = Some("mm".to_string());
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("axis[2] has a direction vector"));

        // empty units are as good as none
        meta.axis[2].units = Some(String::new());
        check_space_info(&meta).unwrap();
    }

    #[test]
    fn test_directions_beyond_dim_ignored_with_space() {
        let mut meta = oriented();
        meta.axis[5].space_direction[0] = 1.0;
        check_space_info(&meta).unwrap();
    }

    #[test]
    fn test_no_space_means_nothing_spatial() {
        let mut meta = ArrayMetadata::with_axes(Type::UChar, vec![AxisInfo::new(2)]).unwrap();
        check_space_info(&meta).unwrap();

        meta.axis[7].space_direction[3] = 2.0;
        let err = check_space_info(&meta).unwrap_err();
        assert!(err.to_string().contains("space directions are set"));
    }

    #[test]
    fn test_label_without_space_dim_rejected() {
        let mut meta = ArrayMetadata::with_axes(Type::UChar, vec![AxisInfo::new(2)]).unwrap();
        meta.space = Space::ScannerXyz;
        meta.space_dim = 0;
        let err = check_space_info(&meta).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::SpaceInfo);
        assert_eq!(
            err.to_string(),
            "check_space_info: space scanner-xyz can't be set with spaceDim 0"
        );
    }

    #[test]
    fn test_vector_arithmetic_propagates_nan() {
        let mut a = [f64::NAN; SPACE_DIM_MAX];
        a[..3].copy_from_slice(&[1.0, 2.0, 2.0]);
        let mut b = [f64::NAN; SPACE_DIM_MAX];
        b[..2].copy_from_slice(&[1.0, 1.0]);

        let mut sum = [0.0; SPACE_DIM_MAX];
        space_vec_scale_add2(&mut sum, 1.0, &a, 2.0, &b);
        assert_eq!(&sum[..2], &[3.0, 4.0]);
        assert!(sum[2].is_nan());

        assert_eq!(space_vec_norm(3, &a), 3.0);

        let mut scaled = [0.0; SPACE_DIM_MAX];
        space_vec_scale(&mut scaled, 2.0, &a);
        assert_eq!(scaled[2], 4.0);

        let mut copy = [0.0; SPACE_DIM_MAX];
        space_vec_copy(&mut copy, &a);
        assert!(same_vec(&copy, &a));
        space_vec_set_nan(&mut copy);
        assert!(copy.iter().all(|v| v.is_nan()));
    }
}
