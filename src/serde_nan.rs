//! Serde helpers for NaN-as-unset scalars.
//!
//! JSON has no NaN, so unset values travel as `null` and come back as NaN.
//! serde_json writes infinities as `null` too, so they also read back as NaN.

use crate::types::SPACE_DIM_MAX;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn to_opt(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

fn from_opt(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

pub fn serialize<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    to_opt(*v).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(deserializer).map(from_opt)
}

fn vec_from<'de, D: Deserializer<'de>>(raw: Vec<Option<f64>>) -> Result<[f64; SPACE_DIM_MAX], D::Error> {
    if raw.len() != SPACE_DIM_MAX {
        return Err(D::Error::invalid_length(raw.len(), &"SPACE_DIM_MAX coefficients"));
    }
    let mut out = [f64::NAN; SPACE_DIM_MAX];
    for (o, r) in out.iter_mut().zip(raw) {
        *o = from_opt(r);
    }
    Ok(out)
}

/// Space vectors
pub mod vector {
    use super::*;

    pub fn serialize<S: Serializer>(
        v: &[f64; SPACE_DIM_MAX],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        v.iter().map(|x| to_opt(*x)).collect::<Vec<_>>().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[f64; SPACE_DIM_MAX], D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        vec_from::<D>(raw)
    }
}

/// Square space matrices, row by row
pub mod matrix {
    use super::*;

    pub fn serialize<S: Serializer>(
        m: &[[f64; SPACE_DIM_MAX]; SPACE_DIM_MAX],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        m.iter()
            .map(|row| row.iter().map(|x| to_opt(*x)).collect::<Vec<_>>())
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[[f64; SPACE_DIM_MAX]; SPACE_DIM_MAX], D::Error> {
        let raw = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        if raw.len() != SPACE_DIM_MAX {
            return Err(D::Error::invalid_length(raw.len(), &"SPACE_DIM_MAX rows"));
        }
        let mut out = [[f64::NAN; SPACE_DIM_MAX]; SPACE_DIM_MAX];
        for (o, r) in out.iter_mut().zip(raw) {
            *o = vec_from::<D>(r)?;
        }
        Ok(out)
    }
}
