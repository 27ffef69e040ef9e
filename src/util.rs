/// Numeric conversion helpers.
///
/// This module provides safe functions for converting the language's
/// doubles into the integer types the interpreter indexes with, without
/// risking undefined casts on NaN or infinities.
pub mod num;
