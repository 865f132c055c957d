//! Common behavior shared by every enumeration in the type registry
//!
//! Each enumeration carries a declared maximum value and a separately
//! declared `LAST` sentinel; [`check_enum_table`] catches a variant table
//! that drifted from either.

/// An enumeration with a fixed value table and human-readable names
pub trait NrrdEnum: Copy + Eq + Sized + 'static {
    /// Name of the enumeration itself, used in messages
    const NAME: &'static str;
    /// Declared maximum valid value
    const MAX: i32;
    /// Sentinel one past the final table entry
    const LAST: i32;
    /// Every variant, in value order
    const ALL: &'static [Self];
    /// Variant meaning "not set", if the enumeration has one
    const UNKNOWN: Option<Self>;

    fn value(self) -> i32;

    fn name(self) -> &'static str;

    fn from_value(value: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.value() == value)
    }

    /// Case-insensitive lookup by name
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// True for every variant except the "unknown" one
    fn is_valid(self) -> bool {
        Self::UNKNOWN != Some(self)
    }

    /// True if `value` names a valid (non-unknown) variant
    fn value_is_valid(value: i32) -> bool {
        Self::from_value(value).is_some_and(|e| e.is_valid())
    }
}

/// Verify that an enumeration's table agrees with its declared bounds
pub fn check_enum_table<E: NrrdEnum>() -> std::result::Result<(), String> {
    if E::LAST - 1 != E::MAX {
        return Err(format!(
            "Last vs. MAX incompatibility for {} enum ({} - 1 != {})",
            E::NAME,
            E::LAST,
            E::MAX
        ));
    }
    if E::ALL.len() as i32 != E::LAST {
        return Err(format!(
            "{} enum table has {} entries but LAST is {}",
            E::NAME,
            E::ALL.len(),
            E::LAST
        ));
    }
    for (idx, e) in E::ALL.iter().enumerate() {
        if e.value() != idx as i32 {
            return Err(format!(
                "{} enum entry {} has value {}",
                E::NAME,
                idx,
                e.value()
            ));
        }
        if E::ALL[..idx]
            .iter()
            .any(|prev| prev.name().eq_ignore_ascii_case(e.name()))
        {
            return Err(format!("{} enum repeats name \"{}\"", E::NAME, e.name()));
        }
    }
    Ok(())
}

/// Declare a registry enumeration together with its value/name table.
///
/// Serialization goes through the variant names so that configuration
/// files read naturally.
macro_rules! nrrd_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $ty:ident : $label:literal {
            max = $max:literal,
            last = $last:literal,
            unknown = $unknown:expr,
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $vname:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $ty {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $crate::enums::NrrdEnum for $ty {
            const NAME: &'static str = $label;
            const MAX: i32 = $max;
            const LAST: i32 = $last;
            const ALL: &'static [Self] = &[ $( $ty::$variant ),+ ];
            const UNKNOWN: Option<Self> = $unknown;

            fn value(self) -> i32 {
                self as i32
            }

            fn name(self) -> &'static str {
                match self {
                    $( $ty::$variant => $vname ),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::enums::NrrdEnum::name(*self))
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::enums::NrrdEnum::name(*self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                <$ty as $crate::enums::NrrdEnum>::from_name(&name).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} \"{}\"", $label, name))
                })
            }
        }
    };
}

pub(crate) use nrrd_enum;

#[cfg(test)]
mod tests {
    use super::*;

    nrrd_enum! {
        enum Drifted: "drifted" {
            max = 3,
            last = 3,
            unknown = None,
            A = 0 => "a",
            B = 1 => "b",
            C = 2 => "c",
        }
    }

    nrrd_enum! {
        enum Repeated: "repeated" {
            max = 1,
            last = 2,
            unknown = Some(Repeated::Unknown),
            Unknown = 0 => "x",
            Other = 1 => "X",
        }
    }

    #[test]
    fn test_drifted_table_detected() {
        let err = check_enum_table::<Drifted>().unwrap_err();
        assert!(err.contains("Last vs. MAX"));
    }

    #[test]
    fn test_repeated_name_detected() {
        let err = check_enum_table::<Repeated>().unwrap_err();
        assert!(err.contains("repeats name"));
        assert!(!Repeated::Unknown.is_valid());
        assert!(Repeated::Other.is_valid());
    }

    #[test]
    fn test_lookup_by_name_and_value() {
        assert_eq!(Drifted::from_name("B"), Some(Drifted::B));
        assert_eq!(Drifted::from_value(2), Some(Drifted::C));
        assert_eq!(Drifted::from_value(7), None);
        assert!(!Repeated::value_is_valid(0));
        assert!(Repeated::value_is_valid(1));
    }
}
