use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts an `f64` to an `i64` by truncation, rejecting non-finite
/// values.
///
/// Used wherever the language supplies an index as a number: slice
/// positions and the list-mutating builtins. The fractional part is
/// discarded; values beyond the `i64` range saturate, which downstream
/// bounds checks then reject.
///
/// ## Errors
/// Returns `RuntimeError::InvalidArgument` for NaN and infinities.
///
/// ## Example
/// ```
/// use quill::util::num::f64_to_i64_trunc;
///
/// assert_eq!(f64_to_i64_trunc(2.9, 1).unwrap(), 2);
/// assert_eq!(f64_to_i64_trunc(-1.5, 1).unwrap(), -1);
/// assert!(f64_to_i64_trunc(f64::NAN, 1).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i64_trunc(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("Cannot use non-finite value {value} as an index"),
                                                   line });
    }
    Ok(value.trunc() as i64)
}
