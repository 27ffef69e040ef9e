use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
    util::num::f64_to_i64_trunc,
};

impl Evaluator<'_> {
    /// Evaluates a slice expression `target[...]`.
    ///
    /// The target must be a list or a string. Each present index must be a
    /// number; indices are truncated to integers. Omitted indices default
    /// to the start, the end, and a step of one (for a negative step the
    /// walk defaults to starting at the last element and running down
    /// through the first).
    ///
    /// One index is element access: lists wrap a negative index from the
    /// end and bounds-check it; strings never wrap, and indexing one past
    /// the last byte yields the empty string. Two indices produce the
    /// `[start, end)` sublist or substring; sublist bounds clamp to the
    /// valid window, and index pairs with strictly opposite signs yield an
    /// empty list. Three indices add a step and apply to lists only.
    ///
    /// # Errors
    /// - `TypeMismatch` for a non-iterable target, a non-number index, or
    ///   a stepped slice of a string.
    /// - `IndexOutOfBounds` for out-of-range element access.
    /// - `InvalidArgument` for a zero step or a non-finite index.
    pub(crate) fn eval_slice(&mut self,
                             target: &Node,
                             indices: &[Option<Node>],
                             line: usize)
                             -> EvalResult<Value> {
        let value = self.eval(target)?;

        let mut resolved: Vec<Option<i64>> = Vec::with_capacity(indices.len());
        for index in indices {
            match index {
                Some(expr) => {
                    let number = match self.eval(expr)? {
                        Value::Number(n) => n,
                        other => {
                            return Err(RuntimeError::TypeMismatch { details: format!("Slice indices must be numbers, found {}",
                                                                                     other.type_name()),
                                                                    line });
                        },
                    };
                    resolved.push(Some(f64_to_i64_trunc(number, line)?));
                },
                None => resolved.push(None),
            }
        }

        match value {
            Value::List(elements) => slice_list(&elements, &resolved, line),
            Value::Str(s) => slice_string(&s.borrow(), &resolved, line),
            other => {
                Err(RuntimeError::TypeMismatch { details: format!("Slice can be applied only to an iterable object, found {}",
                                                                  other.type_name()),
                                                 line })
            },
        }
    }
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn slice_list(elements: &Rc<RefCell<Vec<Value>>>,
              indices: &[Option<i64>],
              line: usize)
              -> EvalResult<Value> {
    let list = elements.borrow();
    let len = list.len() as i64;

    match indices {
        [index] => {
            let Some(index) = index else {
                return Err(RuntimeError::InvalidArgument { details: "Element access requires an index".to_string(),
                                                           line });
            };
            let wrapped = if *index < 0 { index + len } else { *index };
            if wrapped < 0 || wrapped >= len {
                return Err(RuntimeError::IndexOutOfBounds { index: *index,
                                                            len:   list.len(),
                                                            line });
            }
            Ok(list[wrapped as usize].clone())
        },
        [start, end] => sublist(&list, *start, *end, 1),
        [start, end, step] => {
            let step = step.unwrap_or(1);
            if step == 0 {
                return Err(RuntimeError::InvalidArgument { details: "The slice step must be non-zero".to_string(),
                                                           line });
            }
            sublist(&list, *start, *end, step)
        },
        _ => Err(RuntimeError::InvalidArgument { details: format!("Slice expressions take 1 to 3 indices, found {}",
                                                                  indices.len()),
                                                 line }),
    }
}

/// Collects `[start, end)` with a stride.
///
/// Negative indices wrap from the end when start and end share a sign; a
/// pair of strictly opposite signs selects nothing, as does an empty
/// window. Bounds clamp to the list, so a sublist never reads out of
/// range.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn sublist(list: &[Value], start: Option<i64>, end: Option<i64>, step: i64) -> EvalResult<Value> {
    let len = list.len() as i64;

    if let (Some(s), Some(e)) = (start, end)
       && ((s > 0 && e < 0) || (s < 0 && e > 0))
    {
        return Ok(Value::from(Vec::new()));
    }

    let resolve = |index: i64| if index < 0 { index + len } else { index };
    let mut result = Vec::new();

    if step > 0 {
        let start = start.map_or(0, resolve).clamp(0, len);
        let end = end.map_or(len, resolve).clamp(0, len);
        let mut index = start;
        while index < end {
            result.push(list[index as usize].clone());
            index += step;
        }
    } else {
        let start = start.map_or(len - 1, resolve).clamp(-1, len - 1);
        let end = end.map_or(-1, resolve).clamp(-1, len - 1);
        let mut index = start;
        while index > end {
            result.push(list[index as usize].clone());
            index += step;
        }
    }

    Ok(Value::from(result))
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn slice_string(source: &str, indices: &[Option<i64>], line: usize) -> EvalResult<Value> {
    let bytes = source.as_bytes();
    let len = bytes.len() as i64;

    match indices {
        [index] => {
            let Some(index) = index else {
                return Err(RuntimeError::InvalidArgument { details: "Element access requires an index".to_string(),
                                                           line });
            };
            if *index < 0 || *index > len {
                return Err(RuntimeError::IndexOutOfBounds { index: *index,
                                                            len:   bytes.len(),
                                                            line });
            }
            let start = *index as usize;
            let end = (start + 1).min(bytes.len());
            Ok(Value::from(String::from_utf8_lossy(&bytes[start..end]).into_owned()))
        },
        [start, end] => {
            let start = start.unwrap_or(0);
            let end = end.unwrap_or(len);
            if start < 0 || end < 0 {
                let negative = if start < 0 { start } else { end };
                return Err(RuntimeError::IndexOutOfBounds { index: negative,
                                                            len:   bytes.len(),
                                                            line });
            }
            if start > len {
                return Err(RuntimeError::IndexOutOfBounds { index: start,
                                                            len:   bytes.len(),
                                                            line });
            }
            let end = end.min(len);
            if end <= start {
                return Ok(Value::from(String::new()));
            }
            let window = &bytes[start as usize..end as usize];
            Ok(Value::from(String::from_utf8_lossy(window).into_owned()))
        },
        _ => Err(RuntimeError::TypeMismatch { details: "A slice with a step can be applied only to a list".to_string(),
                                              line }),
    }
}
