//! Whole-array metadata: the axes, the coordinate space they live in, and
//! bookkeeping fields

use crate::axis::AxisInfo;
use crate::config;
use crate::error::{NrrdError, Result};
use crate::serde_nan;
use crate::shape::element_count;
use crate::space::{same_value, same_vec, space_vec_set_nan};
use crate::types::{HasNonExist, Space, Type, DIM_MAX, SPACE_DIM_MAX};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata for one n-dimensional array.
///
/// Built empty, filled in by setters (any of which may leave it
/// inconsistent), and validated on demand with [`crate::check::check_all`].
/// Only the first `dim` entries of `axis` are meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayMetadata {
    /// Number of axes; 0 until set
    pub dim: usize,

    /// Element type of the data
    pub element_type: Type,

    /// Bytes per element; only meaningful for `Type::Block`
    pub block_size: usize,

    /// Per-axis information
    pub axis: [AxisInfo; DIM_MAX],

    /// Coordinate system label
    pub space: Space,

    /// Dimension of the coordinate space; 0 means no space information
    pub space_dim: usize,

    /// Location of the center of the first sample, in space coordinates
    #[serde(with = "serde_nan::vector")]
    pub space_origin: [f64; SPACE_DIM_MAX],

    /// Measurement basis relative to the space basis
    #[serde(with = "serde_nan::matrix")]
    pub measurement_frame: [[f64; SPACE_DIM_MAX]; SPACE_DIM_MAX],

    /// Units of each space coordinate
    pub space_units: [Option<String>; SPACE_DIM_MAX],

    /// Provenance of the array
    pub content: Option<String>,

    /// Units of the sample values
    pub sample_units: Option<String>,

    /// Value range before quantization
    #[serde(with = "serde_nan")]
    pub old_min: f64,

    #[serde(with = "serde_nan")]
    pub old_max: f64,

    /// Whether the data holds NaN or infinite values
    pub has_non_exist: HasNonExist,

    pub comments: Vec<String>,

    /// Free-form key/value pairs; keys are unique
    pub key_values: Vec<(String, String)>,

    /// Backing storage
    #[serde(skip)]
    pub data: Option<Bytes>,
}

impl Default for ArrayMetadata {
    fn default() -> Self {
        Self {
            dim: 0,
            element_type: Type::Unknown,
            block_size: 0,
            axis: std::array::from_fn(|_| AxisInfo::default()),
            space: Space::Unknown,
            space_dim: 0,
            space_origin: [f64::NAN; SPACE_DIM_MAX],
            measurement_frame: [[f64::NAN; SPACE_DIM_MAX]; SPACE_DIM_MAX],
            space_units: Default::default(),
            content: None,
            sample_units: None,
            old_min: f64::NAN,
            old_max: f64::NAN,
            has_non_exist: HasNonExist::Unknown,
            comments: Vec::new(),
            key_values: Vec::new(),
            data: None,
        }
    }
}

impl PartialEq for ArrayMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim
            && self.element_type == other.element_type
            && self.block_size == other.block_size
            && self.axis == other.axis
            && self.space == other.space
            && self.space_dim == other.space_dim
            && same_vec(&self.space_origin, &other.space_origin)
            && self
                .measurement_frame
                .iter()
                .zip(&other.measurement_frame)
                .all(|(a, b)| same_vec(a, b))
            && self.space_units == other.space_units
            && self.content == other.content
            && self.sample_units == other.sample_units
            && same_value(self.old_min, other.old_min)
            && same_value(self.old_max, other.old_max)
            && self.has_non_exist == other.has_non_exist
            && self.comments == other.comments
            && self.key_values == other.key_values
            && self.data == other.data
    }
}

impl ArrayMetadata {
    /// Create empty metadata: no axes, no space, every scalar unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create metadata for the given element type and axes
    pub fn with_axes(element_type: Type, axes: Vec<AxisInfo>) -> Result<Self> {
        if axes.is_empty() || axes.len() > DIM_MAX {
            return Err(NrrdError::Structural(format!(
                "number of axes ({}) is outside valid range [1,{}]",
                axes.len(),
                DIM_MAX
            )));
        }

        let mut meta = Self::new();
        meta.dim = axes.len();
        meta.element_type = element_type;
        for (slot, axis) in meta.axis.iter_mut().zip(axes) {
            *slot = axis;
        }
        Ok(meta)
    }

    /// Set the block size
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Attach backing storage
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// The declared axes
    pub fn axes(&self) -> &[AxisInfo] {
        &self.axis[..self.dim.min(DIM_MAX)]
    }

    pub fn axes_mut(&mut self) -> &mut [AxisInfo] {
        let dim = self.dim.min(DIM_MAX);
        &mut self.axis[..dim]
    }

    /// Sample count of every declared axis
    pub fn sizes(&self) -> Vec<usize> {
        self.axes().iter().map(|a| a.size).collect()
    }

    /// Set the space from a known label, or clear all space information.
    ///
    /// `Space::Unknown` wipes the label, the space dimension, every axis
    /// direction, the space units and the origin.
    pub fn space_set(&mut self, space: Space) {
        if space == Space::Unknown {
            self.space = Space::Unknown;
            self.space_dim = 0;
            for axis in self.axis.iter_mut() {
                space_vec_set_nan(&mut axis.space_direction);
            }
            self.space_units = Default::default();
            space_vec_set_nan(&mut self.space_origin);
        } else {
            self.space = space;
            self.space_dim = space.dimension();
        }
    }

    /// Declare a space by its dimension alone, with no label
    pub fn space_dimension_set(&mut self, space_dim: usize) -> Result<()> {
        if space_dim > SPACE_DIM_MAX {
            return Err(NrrdError::Structural(format!(
                "space_dimension_set: given spaceDim ({}) not valid",
                space_dim
            )));
        }
        self.space = Space::Unknown;
        self.space_dim = space_dim;
        Ok(())
    }

    /// The space origin, NaN past `space_dim`, along with `space_dim`
    pub fn space_origin_get(&self) -> (usize, [f64; SPACE_DIM_MAX]) {
        let mut origin = [f64::NAN; SPACE_DIM_MAX];
        let space_dim = self.space_dim.min(SPACE_DIM_MAX);
        origin[..space_dim].copy_from_slice(&self.space_origin[..space_dim]);
        (self.space_dim, origin)
    }

    /// Set the first `space_dim` origin coefficients; the rest become NaN.
    ///
    /// The space (or space dimension) must already be set.
    pub fn space_origin_set(&mut self, origin: &[f64]) -> Result<()> {
        if !(0 < self.space_dim && self.space_dim <= SPACE_DIM_MAX) {
            return Err(NrrdError::Structural(format!(
                "space_origin_set: set spaceDim {} not valid",
                self.space_dim
            )));
        }
        if origin.len() < self.space_dim {
            return Err(NrrdError::Structural(format!(
                "space_origin_set: got {} coefficients for spaceDim {}",
                origin.len(),
                self.space_dim
            )));
        }
        space_vec_set_nan(&mut self.space_origin);
        self.space_origin[..self.space_dim].copy_from_slice(&origin[..self.space_dim]);
        Ok(())
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    /// Add a key/value pair, replacing the value of an existing key
    pub fn key_value_add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.key_values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.key_values.push((key, value)),
        }
    }

    pub fn key_value_get(&self, key: &str) -> Option<&str> {
        self.key_values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn key_value_remove(&mut self, key: &str) -> Option<String> {
        let idx = self.key_values.iter().position(|(k, _)| k == key)?;
        Some(self.key_values.remove(idx).1)
    }

    /// Record that this array was produced by `func` applied to `nin`.
    ///
    /// Content becomes `func(<nin content>,<args>)`, subject to the
    /// process-wide content settings in [`crate::config`].
    pub fn content_set(&mut self, func: &str, nin: &ArrayMetadata, args: &str) {
        let source = nin.content.clone();
        self.compose_content(func, source, args)
    }

    /// Like [`ArrayMetadata::content_set`] with this array as its own input
    pub fn content_set_in_place(&mut self, func: &str, args: &str) {
        let source = self.content.clone();
        self.compose_content(func, source, args)
    }

    fn compose_content(&mut self, func: &str, source: Option<String>, args: &str) {
        let config = config::current();
        if config.disable_content {
            self.content = None;
            return;
        }
        let source = match source {
            Some(content) => content,
            None if config.always_set_content => config.unknown_content,
            None => {
                self.content = None;
                return;
            }
        };
        let sep = if args.is_empty() { "" } else { "," };
        self.content = Some(format!("{}({}{}{})", func, source, sep, args));
    }

    /// Validate everything, including the presence of data
    pub fn check(&self) -> Result<()> {
        crate::check::check_all(self, true)
    }

    /// Multi-line human-readable description
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

fn fmt_scalar(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{}", v)
    }
}

impl fmt::Display for ArrayMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = match &self.data {
            Some(bytes) => format!("{} bytes", bytes.len()),
            None => "(none)".to_string(),
        };
        writeln!(
            f,
            "Data ({}) is {} elements of type {}.",
            data,
            element_count(self),
            self.element_type
        )?;
        if self.element_type == Type::Block {
            writeln!(f, "The blocks have size {}", self.block_size)?;
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            writeln!(f, "Content = \"{}\"", content)?;
        }
        writeln!(f, "{}-dimensional array, with axes:", self.dim)?;
        for (ai, axis) in self.axes().iter().enumerate() {
            match axis.label.as_deref().filter(|l| !l.is_empty()) {
                Some(label) => write!(f, "{}: (\"{}\") ", ai, label)?,
                None => write!(f, "{}: ", ai)?,
            }
            writeln!(
                f,
                "{}-centered, size={}, spacing={}, thickness={},",
                axis.center,
                axis.size,
                fmt_scalar(axis.spacing),
                fmt_scalar(axis.thickness)
            )?;
            writeln!(
                f,
                "    axis(Min,Max) = ({},{})",
                fmt_scalar(axis.min),
                fmt_scalar(axis.max)
            )?;
            if axis.has_units() {
                writeln!(f, "units={},", axis.units.as_deref().unwrap_or_default())?;
            }
        }
        writeln!(
            f,
            "The old min, old max values are {}, {}",
            fmt_scalar(self.old_min),
            fmt_scalar(self.old_max)
        )?;
        if !self.comments.is_empty() {
            writeln!(f, "Comments:")?;
            for comment in &self.comments {
                writeln!(f, "{}", comment)?;
            }
        }
        Ok(())
    }
}
