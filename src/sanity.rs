//! Platform sanity check
//!
//! The rest of the crate assumes facts about the build: element widths,
//! integer wraparound, float semantics and that every enumeration table
//! matches its declared bounds. [`platform_sanity_check`] verifies them once
//! per process and caches the verdict.

use crate::check::field_checks;
use crate::config;
use crate::enums::{check_enum_table, NrrdEnum};
use crate::error::{NrrdError, Result};
use crate::space::exists;
use crate::types::{
    AxisInfoField, Boundary, Center, Encoding, Field, FormatType, HasNonExist, Kind, Space, Type,
    TypeBiggest, DIM_MAX, TYPE_SIZE_MAX,
};
use num_traits::{Bounded, Float, One, SaturatingAdd, WrappingAdd};
use parking_lot::RwLock;
use std::fmt::Display;
use std::mem::size_of;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};

type Verdict = std::result::Result<(), Vec<String>>;

/// A run-once latch over a sanity check routine.
///
/// The routine returns every reason the platform is unfit; an empty list
/// means it passed. Both outcomes are cached until [`SanityLatch::reset`].
pub struct SanityLatch {
    check: fn() -> Vec<String>,
    verdict: RwLock<Option<Verdict>>,
    runs: AtomicUsize,
}

impl SanityLatch {
    pub const fn new(check: fn() -> Vec<String>) -> Self {
        Self {
            check,
            verdict: RwLock::new(None),
            runs: AtomicUsize::new(0),
        }
    }

    /// Run the check on first use; afterwards return the cached verdict
    pub fn check(&self) -> Result<()> {
        if let Some(verdict) = self.verdict.read().as_ref() {
            debug!("platform sanity verdict cached");
            return to_result(verdict);
        }

        let mut slot = self.verdict.write();
        // another caller may have finished while we waited for the lock
        if let Some(verdict) = slot.as_ref() {
            return to_result(verdict);
        }
        self.runs.fetch_add(1, Ordering::Relaxed);
        let reasons = (self.check)();
        for reason in &reasons {
            error!(reason = %reason, "platform sanity check failed");
        }
        let verdict = if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        };
        let result = to_result(&verdict);
        *slot = Some(verdict);
        result
    }

    /// Whether a verdict is cached
    pub fn is_latched(&self) -> bool {
        self.verdict.read().is_some()
    }

    /// Number of times the check routine has actually run
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Forget the cached verdict so the next call runs the check again
    pub fn reset(&self) {
        *self.verdict.write() = None;
    }
}

fn to_result(verdict: &Verdict) -> Result<()> {
    verdict.clone().map_err(|reasons| NrrdError::Insane { reasons })
}

static PLATFORM: SanityLatch = SanityLatch::new(platform_reasons);

/// Verify once per process that this build matches the type registry's
/// assumptions.
///
/// Failure is a misconfiguration of the build, not something to retry.
pub fn platform_sanity_check() -> Result<()> {
    PLATFORM.check()
}

/// Clear the process-wide verdict
pub fn reset_sanity_latch() {
    PLATFORM.reset();
}

/// Every reason the platform is unfit; empty when it is fine
pub fn platform_reasons() -> Vec<String> {
    let mut reasons = Vec::new();
    enum_reasons(&mut reasons);
    reasons.extend(config::current().invalid_defaults());
    type_size_reasons(&mut reasons);
    wrap_reasons::<i64>("i64", &mut reasons);
    wrap_reasons::<u64>("u64", &mut reasons);
    if DIM_MAX < 3 {
        reasons.push(format!("DIM_MAX ({}) not >= 3", DIM_MAX));
    }
    if !Type::Block.is_integral() {
        reasons.push("block type not considered integral".to_string());
    }
    float_reasons::<f32>("f32", &mut reasons);
    float_reasons::<f64>("f64", &mut reasons);
    for (idx, check) in field_checks().iter().enumerate() {
        if check.field().value() as usize != idx {
            reasons.push(format!(
                "field check {} is registered for field {}",
                idx,
                check.field()
            ));
        }
    }
    reasons
}

fn enum_reasons(reasons: &mut Vec<String>) {
    let tables = [
        check_enum_table::<Type>(),
        check_enum_table::<Center>(),
        check_enum_table::<Kind>(),
        check_enum_table::<Space>(),
        check_enum_table::<Field>(),
        check_enum_table::<Encoding>(),
        check_enum_table::<FormatType>(),
        check_enum_table::<AxisInfoField>(),
        check_enum_table::<HasNonExist>(),
        check_enum_table::<Boundary>(),
    ];
    reasons.extend(tables.into_iter().filter_map(|t| t.err()));
}

fn type_size_reasons(reasons: &mut Vec<String>) {
    let expected = [
        (Type::Char, size_of::<i8>()),
        (Type::UChar, size_of::<u8>()),
        (Type::Short, size_of::<i16>()),
        (Type::UShort, size_of::<u16>()),
        (Type::Int, size_of::<i32>()),
        (Type::UInt, size_of::<u32>()),
        (Type::LLong, size_of::<i64>()),
        (Type::ULLong, size_of::<u64>()),
        (Type::Float, size_of::<f32>()),
        (Type::Double, size_of::<f64>()),
    ];
    for (ty, actual) in expected {
        if ty.size_in_bytes() != actual {
            reasons.push(format!(
                "sizeof({}) is {}, not {}",
                ty,
                actual,
                ty.size_in_bytes()
            ));
        }
    }

    let max_size = Type::ALL
        .iter()
        .map(|ty| ty.size_in_bytes())
        .max()
        .unwrap_or(0);
    if max_size != TYPE_SIZE_MAX || max_size != size_of::<TypeBiggest>() {
        reasons.push(format!(
            "max type size {} doesn't match TYPE_SIZE_MAX {} and sizeof(TypeBiggest) {}",
            max_size,
            TYPE_SIZE_MAX,
            size_of::<TypeBiggest>()
        ));
    }
}

/// The maximum plus one must wrap around to the minimum, and saturate at
/// the maximum
fn wrap_reasons<T>(name: &str, reasons: &mut Vec<String>)
where
    T: Bounded + One + WrappingAdd + SaturatingAdd + PartialEq + Display,
{
    let max = std::hint::black_box(T::max_value());
    let wrapped = max.wrapping_add(&T::one());
    if wrapped != T::min_value() {
        reasons.push(format!(
            "{}: max value + 1 is {}, not {}",
            name,
            wrapped,
            T::min_value()
        ));
    }
    if max.saturating_add(&T::one()) != T::max_value() {
        reasons.push(format!("{}: max value + 1 does not saturate", name));
    }
}

/// NaN and infinities must behave as the "unset" sentinel expects
fn float_reasons<T: Float>(name: &str, reasons: &mut Vec<String>) {
    let nan = std::hint::black_box(T::nan());
    let inf = std::hint::black_box(T::infinity());
    if nan.partial_cmp(&nan).is_some() {
        reasons.push(format!("{}: NaN compares equal to itself", name));
    }
    if nan.is_finite() || inf.is_finite() || T::neg_infinity().is_finite() {
        reasons.push(format!("{}: non-finite value considered finite", name));
    }
    if !(inf > T::zero() && T::neg_infinity() < T::zero()) {
        reasons.push(format!("{}: infinity has the wrong sign", name));
    }
    let one = T::one().to_f64().unwrap_or(f64::NAN);
    if !exists(one) || exists(f64::NAN) {
        reasons.push(format!("{}: existence test broken", name));
    }
}
