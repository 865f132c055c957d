//! Per-axis metadata

use crate::serde_nan;
use crate::space::{exists, same_value, same_vec, space_vec_set_nan};
use crate::types::{Center, Kind, SPACE_DIM_MAX};
use serde::{Deserialize, Serialize};

/// Sampling geometry and semantic role of one array axis.
///
/// Geometric scalars use NaN to mean "unset". The space direction is either
/// fully set or fully NaN; which of the two is recorded by coefficient 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisInfo {
    /// Number of samples along this axis
    pub size: usize,

    /// Node or cell centering of the samples
    pub center: Center,

    /// Semantic role, possibly constraining `size`
    pub kind: Kind,

    /// Position of the first sample
    #[serde(with = "serde_nan")]
    pub min: f64,

    /// Position of the last sample
    #[serde(with = "serde_nan")]
    pub max: f64,

    /// Distance between neighboring samples
    #[serde(with = "serde_nan")]
    pub spacing: f64,

    /// Extent of one sample, e.g. slice thickness
    #[serde(with = "serde_nan")]
    pub thickness: f64,

    pub label: Option<String>,

    pub units: Option<String>,

    /// One unit step along this axis, in space coordinates
    #[serde(with = "serde_nan::vector")]
    pub space_direction: [f64; SPACE_DIM_MAX],
}

impl Default for AxisInfo {
    fn default() -> Self {
        Self {
            size: 0,
            center: Center::Unknown,
            kind: Kind::Unknown,
            min: f64::NAN,
            max: f64::NAN,
            spacing: f64::NAN,
            thickness: f64::NAN,
            label: None,
            units: None,
            space_direction: [f64::NAN; SPACE_DIM_MAX],
        }
    }
}

/// Unset compares equal to unset
impl PartialEq for AxisInfo {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.center == other.center
            && self.kind == other.kind
            && same_value(self.min, other.min)
            && same_value(self.max, other.max)
            && same_value(self.spacing, other.spacing)
            && same_value(self.thickness, other.thickness)
            && self.label == other.label
            && self.units == other.units
            && same_vec(&self.space_direction, &other.space_direction)
    }
}

impl AxisInfo {
    /// Create an axis with the given sample count and nothing else set
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: Center) -> Self {
        self.center = center;
        self
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_min_max(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Set the leading coefficients of the space direction; the rest become NaN
    pub fn with_space_direction(mut self, direction: &[f64]) -> Self {
        self.set_space_direction(direction);
        self
    }

    pub fn set_space_direction(&mut self, direction: &[f64]) {
        space_vec_set_nan(&mut self.space_direction);
        for (dst, src) in self.space_direction.iter_mut().zip(direction) {
            *dst = *src;
        }
    }

    pub fn clear_space_direction(&mut self) {
        space_vec_set_nan(&mut self.space_direction);
    }

    /// Whether this axis is placed in space by a direction vector
    pub fn has_space_direction(&self) -> bool {
        exists(self.space_direction[0])
    }

    /// Whether units are set to a non-empty string
    pub fn has_units(&self) -> bool {
        self.units.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// The axis centering, or `default_center` if the axis has none
    pub fn center_or(&self, default_center: Center) -> Center {
        if self.center == Center::Unknown {
            default_center
        } else {
            self.center
        }
    }

    /// Distance between samples: `spacing` if set, else derived from min/max
    pub fn step_size(&self, center: Center) -> f64 {
        if exists(self.spacing) {
            return self.spacing;
        }
        let intervals = if center == Center::Cell {
            self.size as f64
        } else {
            self.size as f64 - 1.0
        };
        (self.max - self.min) / intervals
    }

    /// World position of a (possibly fractional) sample index.
    ///
    /// Requires min and max; returns NaN otherwise.
    pub fn index_to_pos(&self, index: f64, default_center: Center) -> f64 {
        let center = self.center_or(default_center);
        if center == Center::Cell {
            self.min + (index + 0.5) * (self.max - self.min) / self.size as f64
        } else {
            self.min + index * (self.max - self.min) / (self.size as f64 - 1.0)
        }
    }

    /// Inverse of [`AxisInfo::index_to_pos`]
    pub fn pos_to_index(&self, pos: f64, default_center: Center) -> f64 {
        let center = self.center_or(default_center);
        if center == Center::Cell {
            (pos - self.min) * self.size as f64 / (self.max - self.min) - 0.5
        } else {
            (pos - self.min) * (self.size as f64 - 1.0) / (self.max - self.min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_axis_is_unset() {
        let axis = AxisInfo::new(10);
        assert_eq!(axis.size, 10);
        assert!(axis.min.is_nan() && axis.max.is_nan());
        assert!(axis.spacing.is_nan() && axis.thickness.is_nan());
        assert!(!axis.has_space_direction());
        assert!(!axis.has_units());
        assert_eq!(axis, AxisInfo::new(10));
        assert_ne!(axis, AxisInfo::new(10).with_spacing(1.0));
    }

    #[test]
    fn test_step_size() {
        let axis = AxisInfo::new(5).with_min_max(0.0, 10.0);
        assert_eq!(axis.step_size(Center::Cell), 2.0);
        assert_eq!(axis.step_size(Center::Node), 2.5);
        assert_eq!(axis.with_spacing(0.5).step_size(Center::Node), 0.5);
    }

    #[test]
    fn test_index_position_conversion() {
        let axis = AxisInfo::new(101)
            .with_center(Center::Node)
            .with_min_max(0.0, 1000.0);
        assert_eq!(axis.index_to_pos(0.0, Center::Cell), 0.0);
        assert_eq!(axis.index_to_pos(100.0, Center::Cell), 1000.0);
        assert_eq!(axis.pos_to_index(500.0, Center::Cell), 50.0);

        let cells = AxisInfo::new(4).with_min_max(0.0, 4.0);
        assert_eq!(cells.index_to_pos(0.0, Center::Cell), 0.5);
        assert_eq!(cells.pos_to_index(3.5, Center::Cell), 3.0);
    }

    #[test]
    fn test_space_direction_fill() {
        let mut axis = AxisInfo::new(3).with_space_direction(&[1.0, 0.0, 0.0]);
        assert!(axis.has_space_direction());
        assert!(axis.space_direction[3].is_nan());
        axis.clear_space_direction();
        assert!(!axis.has_space_direction());
    }

    #[test]
    fn test_empty_units_do_not_count() {
        assert!(!AxisInfo::new(1).with_units("").has_units());
        assert!(AxisInfo::new(1).with_units("mm").has_units());
    }
}
