//! Per-field validation and the aggregate check
//!
//! Every [`Field`] maps to one [`FieldCheck`]. Callers building metadata
//! piece by piece can validate just the fields they touched with
//! [`check_field`]; consumers that need a fully valid array call
//! [`check_all`]. Any field that interacts with space information re-runs
//! the whole space consistency check.

use crate::enums::NrrdEnum;
use crate::error::{NrrdError, Result, ResultExt};
use crate::metadata::ArrayMetadata;
use crate::shape::size_check;
use crate::space::check_space_info;
use crate::types::{Field, Type, DIM_MAX};
use tracing::debug;

/// Validator for a single metadata field
pub trait FieldCheck: Send + Sync {
    /// The field this validator is responsible for
    fn field(&self) -> Field;

    /// Check the field in isolation
    fn check(&self, meta: &ArrayMetadata) -> Result<()>;
}

/// "+" or "-" for an infinite value
fn inf_sign(v: f64) -> &'static str {
    if v > 0.0 {
        "+"
    } else {
        "-"
    }
}

/// Fields with nothing to check: free-form strings, encoding choices and
/// the like
struct NoopCheck(Field);

impl FieldCheck for NoopCheck {
    fn field(&self) -> Field {
        self.0
    }

    fn check(&self, _meta: &ArrayMetadata) -> Result<()> {
        Ok(())
    }
}

/// Fields whose only constraints come from the space consistency rules
struct SpaceInfoCheck(Field);

impl FieldCheck for SpaceInfoCheck {
    fn field(&self) -> Field {
        self.0
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        check_space_info(meta).context(&format!("field_check_{}", self.0.name()))
    }
}

struct TypeCheck;

impl FieldCheck for TypeCheck {
    fn field(&self) -> Field {
        Field::Type
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        if !meta.element_type.is_valid() {
            return Err(NrrdError::TypeSize(format!(
                "field_check_type: type ({}) is not valid",
                meta.element_type.value()
            )));
        }
        Ok(())
    }
}

struct BlockSizeCheck;

impl FieldCheck for BlockSizeCheck {
    fn field(&self) -> Field {
        Field::BlockSize
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        let is_block = meta.element_type == Type::Block;
        if is_block && meta.block_size == 0 {
            return Err(NrrdError::TypeSize(format!(
                "field_check_block_size: type is {} but block size ({}) invalid",
                Type::Block,
                meta.block_size
            )));
        }
        if !is_block && meta.block_size > 0 {
            return Err(NrrdError::TypeSize(format!(
                "field_check_block_size: type is {} (not block) but block size is {}",
                meta.element_type, meta.block_size
            )));
        }
        Ok(())
    }
}

struct DimensionCheck;

fn dimension_in_range(meta: &ArrayMetadata) -> Result<()> {
    if !(1..=DIM_MAX).contains(&meta.dim) {
        return Err(NrrdError::Structural(format!(
            "dimension {} is outside valid range [1,{}]",
            meta.dim, DIM_MAX
        )));
    }
    Ok(())
}

impl FieldCheck for DimensionCheck {
    fn field(&self) -> Field {
        Field::Dimension
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        dimension_in_range(meta).context("field_check_dimension")
    }
}

struct SizesCheck;

impl FieldCheck for SizesCheck {
    fn field(&self) -> Field {
        Field::Sizes
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        dimension_in_range(meta)
            .and_then(|_| size_check(&meta.sizes()))
            .context("field_check_sizes: trouble with array sizes")
    }
}

struct SpacingsCheck;

impl FieldCheck for SpacingsCheck {
    fn field(&self) -> Field {
        Field::Spacings
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        for (ai, axis) in meta.axes().iter().enumerate() {
            let v = axis.spacing;
            if !(!v.is_infinite() && (v.is_nan() || v != 0.0)) {
                return Err(NrrdError::NumericDomain(format!(
                    "field_check_spacings: axis {} spacing ({}) invalid",
                    ai, v
                )));
            }
        }
        check_space_info(meta).context("field_check_spacings")
    }
}

struct ThicknessesCheck;

impl FieldCheck for ThicknessesCheck {
    fn field(&self) -> Field {
        Field::Thicknesses
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        for (ai, axis) in meta.axes().iter().enumerate() {
            // zero thickness is fine, negative is not
            let v = axis.thickness;
            if !(!v.is_infinite() && (v.is_nan() || v >= 0.0)) {
                return Err(NrrdError::NumericDomain(format!(
                    "field_check_thicknesses: axis {} thickness ({}) invalid",
                    ai, v
                )));
            }
        }
        Ok(())
    }
}

/// Axis mins or maxs: never infinite
struct AxisExtremaCheck {
    field: Field,
    what: &'static str,
    get: fn(&crate::axis::AxisInfo) -> f64,
}

impl FieldCheck for AxisExtremaCheck {
    fn field(&self) -> Field {
        self.field
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        let routine = format!("field_check_axis_{}s", self.what);
        for (ai, axis) in meta.axes().iter().enumerate() {
            let v = (self.get)(axis);
            if v.is_infinite() {
                return Err(NrrdError::NumericDomain(format!(
                    "{}: axis {} {} {}inf invalid",
                    routine,
                    ai,
                    self.what,
                    inf_sign(v)
                )));
            }
        }
        check_space_info(meta).context(&routine)
    }
}

struct KindsCheck;

impl FieldCheck for KindsCheck {
    fn field(&self) -> Field {
        Field::Kinds
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        for (ai, axis) in meta.axes().iter().enumerate() {
            let want = axis.kind.size();
            if want != 0 && want != axis.size {
                return Err(NrrdError::TypeSize(format!(
                    "field_check_kinds: axis {} kind {} requires size {}, but have {}",
                    ai, axis.kind, want, axis.size
                )));
            }
        }
        Ok(())
    }
}

struct KeyValueCheck;

impl FieldCheck for KeyValueCheck {
    fn field(&self) -> Field {
        Field::KeyValue
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        for (idx, (key, _)) in meta.key_values.iter().enumerate() {
            if meta.key_values[..idx].iter().any(|(k, _)| k == key) {
                return Err(NrrdError::Structural(format!(
                    "field_check_keyvalue: key \"{}\" appears more than once",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Old min or old max: never infinite, and equal values are fine
struct OldExtremumCheck {
    field: Field,
    what: &'static str,
    get: fn(&ArrayMetadata) -> f64,
}

impl FieldCheck for OldExtremumCheck {
    fn field(&self) -> Field {
        self.field
    }

    fn check(&self, meta: &ArrayMetadata) -> Result<()> {
        let v = (self.get)(meta);
        if v.is_infinite() {
            return Err(NrrdError::NumericDomain(format!(
                "field_check_old_{}: old {} {}inf invalid",
                self.what,
                self.what,
                inf_sign(v)
            )));
        }
        Ok(())
    }
}

const FIELD_COUNT: usize = Field::LAST as usize;

/// Validators indexed by field value
static FIELD_CHECKS: [&dyn FieldCheck; FIELD_COUNT] = [
    &NoopCheck(Field::Unknown),
    &NoopCheck(Field::Comment),
    &NoopCheck(Field::Content),
    &NoopCheck(Field::Number),
    &TypeCheck,
    &BlockSizeCheck,
    &DimensionCheck,
    &SpaceInfoCheck(Field::Space),
    &SpaceInfoCheck(Field::SpaceDimension),
    &SizesCheck,
    &SpacingsCheck,
    &ThicknessesCheck,
    &AxisExtremaCheck {
        field: Field::AxisMins,
        what: "min",
        get: |axis| axis.min,
    },
    &AxisExtremaCheck {
        field: Field::AxisMaxs,
        what: "max",
        get: |axis| axis.max,
    },
    &SpaceInfoCheck(Field::SpaceDirections),
    // centering is valid by construction
    &NoopCheck(Field::Centers),
    &KindsCheck,
    &NoopCheck(Field::Labels),
    // units on an axis with a direction are a space violation
    &SpaceInfoCheck(Field::Units),
    &NoopCheck(Field::Min),
    &NoopCheck(Field::Max),
    &OldExtremumCheck {
        field: Field::OldMin,
        what: "min",
        get: |meta| meta.old_min,
    },
    &OldExtremumCheck {
        field: Field::OldMax,
        what: "max",
        get: |meta| meta.old_max,
    },
    &NoopCheck(Field::Endian),
    &NoopCheck(Field::Encoding),
    &NoopCheck(Field::LineSkip),
    &NoopCheck(Field::ByteSkip),
    &KeyValueCheck,
    &NoopCheck(Field::SampleUnits),
    &SpaceInfoCheck(Field::SpaceUnits),
    &SpaceInfoCheck(Field::SpaceOrigin),
    &SpaceInfoCheck(Field::MeasurementFrame),
    &NoopCheck(Field::DataFile),
];

/// The validator responsible for `field`
pub fn field_check(field: Field) -> &'static dyn FieldCheck {
    FIELD_CHECKS[field.value() as usize]
}

/// Every validator, in field order
pub fn field_checks() -> &'static [&'static dyn FieldCheck] {
    &FIELD_CHECKS
}

/// Validate a single field
pub fn check_field(meta: &ArrayMetadata, field: Field) -> Result<()> {
    field_check(field).check(meta)
}

/// Validate every field in order, stopping at the first violation.
///
/// With `require_data`, metadata without backing storage is rejected
/// before any field is looked at.
pub fn check_all(meta: &ArrayMetadata, require_data: bool) -> Result<()> {
    if require_data && meta.data.is_none() {
        return Err(NrrdError::Structural("nrrd has no data".to_string())).context("check_all");
    }
    for field in Field::ALL.iter().skip(1) {
        if let Err(err) = field_check(*field).check(meta) {
            debug!(field = %field, error = %err, "metadata check failed");
            return Err(err
                .context(format!("trouble with {} field", field))
                .context("check_all"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisInfo;
    use crate::error::ErrorCategory;
    use crate::types::{Kind, Space};

    fn create_test_meta() -> ArrayMetadata {
        let axes = vec![
            AxisInfo::new(3).with_kind(Kind::RgbColor),
            AxisInfo::new(64).with_min_max(0.0, 63.0).with_spacing(1.0),
            AxisInfo::new(32).with_thickness(0.0),
        ];
        ArrayMetadata::with_axes(Type::UChar, axes)
            .unwrap()
            .with_data(vec![0u8; 3 * 64 * 32])
    }

    #[test]
    fn test_table_is_indexed_by_field() {
        for (idx, check) in field_checks().iter().enumerate() {
            assert_eq!(check.field().value() as usize, idx);
        }
        assert_eq!(field_checks().len(), Field::ALL.len());
    }

    #[test]
    fn test_valid_metadata_passes() {
        check_all(&create_test_meta(), true).unwrap();
    }

    #[test]
    fn test_require_data() {
        let mut meta = create_test_meta();
        meta.data = None;
        check_all(&meta, false).unwrap();
        let err = check_all(&meta, true).unwrap_err();
        assert_eq!(err.to_string(), "check_all: nrrd has no data");
    }

    #[test]
    fn test_block_size_equivalence() {
        let mut meta = create_test_meta();
        meta.block_size = 4;
        assert!(check_field(&meta, Field::BlockSize).is_err());
        meta.element_type = Type::Block;
        check_field(&meta, Field::BlockSize).unwrap();
        meta.block_size = 0;
        let err = check_field(&meta, Field::BlockSize).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::TypeSize);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut meta = create_test_meta();
        meta.element_type = Type::Unknown;
        let err = check_all(&meta, true).unwrap_err();
        assert!(err.to_string().contains("trouble with type field"));
    }

    #[test]
    fn test_dimension_range() {
        let mut meta = create_test_meta();
        meta.dim = 0;
        assert!(check_field(&meta, Field::Dimension).is_err());
        meta.dim = DIM_MAX + 1;
        assert!(check_field(&meta, Field::Dimension).is_err());
        assert!(check_field(&meta, Field::Sizes).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut meta = create_test_meta();
        meta.axis[2].size = 0;
        let err = check_all(&meta, false).unwrap_err();
        assert!(err.to_string().contains("trouble with sizes field"));
    }

    #[test]
    fn test_spacing_policy() {
        let mut meta = create_test_meta();
        meta.axis[1].spacing = 0.0;
        assert!(check_field(&meta, Field::Spacings).is_err());
        meta.axis[1].spacing = f64::INFINITY;
        assert!(check_field(&meta, Field::Spacings).is_err());
        meta.axis[1].spacing = -2.0;
        check_field(&meta, Field::Spacings).unwrap();
        meta.axis[1].spacing = f64::NAN;
        check_field(&meta, Field::Spacings).unwrap();
    }

    #[test]
    fn test_thickness_policy() {
        let mut meta = create_test_meta();
        meta.axis[2].thickness = -0.5;
        let err = check_field(&meta, Field::Thicknesses).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NumericDomain);
        meta.axis[2].thickness = f64::INFINITY;
        assert!(check_field(&meta, Field::Thicknesses).is_err());
    }

    #[test]
    fn test_infinite_extrema_rejected() {
        let mut meta = create_test_meta();
        meta.axis[1].min = f64::NEG_INFINITY;
        let err = check_field(&meta, Field::AxisMins).unwrap_err();
        assert!(err.to_string().contains("axis 1 min -inf invalid"));

        meta.axis[1].min = 0.0;
        meta.axis[1].max = f64::INFINITY;
        let err = check_field(&meta, Field::AxisMaxs).unwrap_err();
        assert!(err.to_string().contains("axis 1 max +inf invalid"));
    }

    #[test]
    fn test_kind_size_mismatch() {
        let mut meta = create_test_meta();
        meta.axis[0].size = 4;
        let err = check_field(&meta, Field::Kinds).unwrap_err();
        assert!(err.to_string().contains("kind RGB-color requires size 3, but have 4"));
    }

    #[test]
    fn test_old_extrema() {
        let mut meta = create_test_meta();
        meta.old_min = 5.0;
        meta.old_max = 5.0;
        check_all(&meta, true).unwrap();
        meta.old_max = f64::INFINITY;
        let err = check_all(&meta, true).unwrap_err();
        assert!(err.to_string().contains("trouble with old max field"));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut meta = create_test_meta();
        meta.key_values.push(("a".to_string(), "1".to_string()));
        meta.key_values.push(("a".to_string(), "2".to_string()));
        assert!(check_field(&meta, Field::KeyValue).is_err());
    }

    #[test]
    fn test_space_fields_share_consistency_check() {
        let mut meta = create_test_meta();
        meta.space_set(Space::RightAnteriorSuperior);
        meta.axis[1].set_space_direction(&[1.0, 0.0, 0.0]);
        for field in [
            Field::Space,
            Field::SpaceDimension,
            Field::SpaceDirections,
            Field::Units,
            Field::SpaceUnits,
            Field::SpaceOrigin,
            Field::MeasurementFrame,
            Field::Spacings,
            Field::AxisMins,
            Field::AxisMaxs,
        ] {
            let err = check_field(&meta, field).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::SpaceInfo, "{}", field);
        }
        check_field(&meta, Field::Thicknesses).unwrap();

        let err = check_all(&meta, true).unwrap_err();
        assert!(err.to_string().starts_with("check_all: trouble with space field"));
    }
}
