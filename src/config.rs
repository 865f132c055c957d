//! Library-wide defaults and state flags
//!
//! A single process-wide [`NrrdConfig`] is consulted by content composition
//! and verified by the platform sanity check. It can be replaced wholesale,
//! typically from a JSON file at startup.

use crate::error::{NrrdError, Result};
use crate::types::{Boundary, Center, Encoding, Type};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Defaults and behavior switches shared by every array in the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NrrdConfig {
    /// Encoding writers fall back to
    pub default_write_encoding: Encoding,

    /// Centering assumed for axes that do not declare one
    pub default_center: Center,

    /// Output type for resampling; `Unknown` keeps the input type
    pub default_resample_type: Type,

    /// Boundary behavior for resampling
    pub default_resample_boundary: Boundary,

    /// Output type for measurements
    pub measure_type: Type,

    /// Output type for histogram measurements
    pub measure_histo_type: Type,

    /// Never record content strings
    pub disable_content: bool,

    /// Invent content for outputs whose input has none
    pub always_set_content: bool,

    /// Content string used for inputs without content
    pub unknown_content: String,
}

impl Default for NrrdConfig {
    fn default() -> Self {
        Self {
            default_write_encoding: Encoding::Raw,
            default_center: Center::Cell,
            default_resample_type: Type::Unknown,
            default_resample_boundary: Boundary::Bleed,
            measure_type: Type::Float,
            measure_histo_type: Type::Float,
            disable_content: false,
            always_set_content: true,
            unknown_content: "?".to_string(),
        }
    }
}

impl NrrdConfig {
    /// Parse a configuration from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NrrdError::Configuration(e.to_string()))
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading nrrd configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Describe every default that is outside its valid range
    pub fn invalid_defaults(&self) -> Vec<String> {
        use crate::enums::NrrdEnum;

        let mut reasons = Vec::new();
        if !self.default_write_encoding.is_valid() {
            reasons.push(format!(
                "default write encoding ({}) not in valid range [{},{}]",
                self.default_write_encoding.value(),
                Encoding::Unknown as i32 + 1,
                Encoding::LAST - 1
            ));
        }
        if !self.default_center.is_valid() {
            reasons.push(format!(
                "default center ({}) not in valid range [{},{}]",
                self.default_center.value(),
                Center::Unknown as i32 + 1,
                Center::LAST - 1
            ));
        }
        // every resample type is acceptable; Unknown keeps the input type
        if !self.default_resample_boundary.is_valid() {
            reasons.push(format!(
                "default resample boundary ({}) not in valid range [{},{}]",
                self.default_resample_boundary.value(),
                Boundary::Unknown as i32 + 1,
                Boundary::LAST - 1
            ));
        }
        for (what, ty) in [
            ("measure type", self.measure_type),
            ("measure histo type", self.measure_histo_type),
        ] {
            if !ty.is_valid() {
                reasons.push(format!(
                    "{} ({}) not in valid range [{},{}]",
                    what,
                    ty.value(),
                    Type::Unknown as i32 + 1,
                    Type::LAST - 1
                ));
            }
        }
        reasons
    }
}

static CONFIG: RwLock<Option<NrrdConfig>> = RwLock::new(None);

/// Snapshot of the process-wide configuration
pub fn current() -> NrrdConfig {
    CONFIG.read().clone().unwrap_or_default()
}

/// Replace the process-wide configuration
pub fn set(config: NrrdConfig) {
    debug!(?config, "replacing nrrd configuration");
    *CONFIG.write() = Some(config);
}

/// Restore the built-in defaults
pub fn reset() {
    *CONFIG.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(NrrdConfig::default().invalid_defaults().is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            NrrdConfig::from_json_str(r#"{"default_center": "node", "disable_content": true}"#)
                .unwrap();
        assert_eq!(config.default_center, Center::Node);
        assert!(config.disable_content);
        assert_eq!(config.default_write_encoding, Encoding::Raw);
        assert_eq!(config.unknown_content, "?");
    }

    #[test]
    fn test_invalid_defaults_reported() {
        let config = NrrdConfig {
            default_center: Center::Unknown,
            measure_type: Type::Unknown,
            ..NrrdConfig::default()
        };
        let reasons = config.invalid_defaults();
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].starts_with("default center"));
        assert!(reasons[1].starts_with("measure type"));
    }

    #[test]
    fn test_any_resample_type_accepted() {
        for ty in [Type::Unknown, Type::Block, Type::Double] {
            let config = NrrdConfig {
                default_resample_type: ty,
                ..NrrdConfig::default()
            };
            assert!(config.invalid_defaults().is_empty(), "{}", ty);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_write_encoding": "gz"}}"#).unwrap();
        let config = NrrdConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.default_write_encoding, Encoding::Gzip);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = NrrdConfig::from_json_str(r#"{"default_center": "corner"}"#).unwrap_err();
        assert!(matches!(err, NrrdError::Configuration(_)));
    }
}
