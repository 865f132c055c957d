//! Origin derived from per-axis geometry
//!
//! Arrays without direction vectors can still imply where their first sample
//! sits, from each axis's min and max or spacing. Like the space origin, the
//! derived location is the center of the first sample.

use crate::metadata::ArrayMetadata;
use crate::space::exists;
use crate::types::{Center, SPACE_DIM_MAX};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Outcome of [`origin_calculate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginStatus {
    /// Invalid arguments: bad axis index, bad default centering, or an
    /// output too short for the requested axes
    Unknown,
    /// The axes have direction vectors; use the space origin instead
    HasDirection,
    /// Some axis has no min
    NoMin,
    /// Some axis has a min but neither a max nor a spacing
    NoMaxOrSpacing,
    /// The origin was computed
    Okay,
}

impl fmt::Display for OriginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OriginStatus::Unknown => "unknown",
            OriginStatus::HasDirection => "direction",
            OriginStatus::NoMin => "no min",
            OriginStatus::NoMaxOrSpacing => "no max or spacing",
            OriginStatus::Okay => "okay",
        };
        f.write_str(name)
    }
}

/// Compute an origin for the axes in `axis_idx`, writing one coordinate per
/// axis into `origin`.
///
/// Axes without their own centering use `default_center`, which must be
/// `Node` or `Cell`. On any outcome other than `Okay`, the first
/// `axis_idx.len()` entries of `origin` are NaN.
pub fn origin_calculate(
    meta: &ArrayMetadata,
    axis_idx: &[usize],
    default_center: Center,
    origin: &mut [f64],
) -> OriginStatus {
    let status = calculate(meta, axis_idx, default_center, origin);
    if status != OriginStatus::Okay {
        debug!(%status, axes = ?axis_idx, "no origin computed");
        let n = axis_idx.len().min(origin.len());
        origin[..n].fill(f64::NAN);
    }
    status
}

fn calculate(
    meta: &ArrayMetadata,
    axis_idx: &[usize],
    default_center: Center,
    origin: &mut [f64],
) -> OriginStatus {
    if !matches!(default_center, Center::Cell | Center::Node)
        || origin.len() < axis_idx.len()
        || axis_idx.len() > SPACE_DIM_MAX
        || axis_idx.iter().any(|&ai| ai >= meta.dim || ai >= meta.axis.len())
    {
        return OriginStatus::Unknown;
    }

    let axes: Vec<_> = axis_idx.iter().map(|&ai| &meta.axis[ai]).collect();

    if meta.space_dim > 0 && axes.iter().any(|a| a.has_space_direction()) {
        return OriginStatus::HasDirection;
    }
    if !axes.iter().all(|a| exists(a.min)) {
        return OriginStatus::NoMin;
    }
    if !axes.iter().all(|a| exists(a.max) || exists(a.spacing)) {
        return OriginStatus::NoMaxOrSpacing;
    }

    for (out, axis) in origin.iter_mut().zip(&axes) {
        let center = axis.center_or(default_center);
        let spacing = axis.step_size(center);
        *out = if center == Center::Cell {
            axis.min + spacing / 2.0
        } else {
            axis.min
        };
    }
    OriginStatus::Okay
}

/// Allocating form of [`origin_calculate`]
pub fn derived_origin(
    meta: &ArrayMetadata,
    axis_idx: &[usize],
    default_center: Center,
) -> (OriginStatus, Vec<f64>) {
    let mut origin = vec![f64::NAN; axis_idx.len()];
    let status = origin_calculate(meta, axis_idx, default_center, &mut origin);
    (status, origin)
}
