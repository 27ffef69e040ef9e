use crate::{
    ast::{BinaryOperator, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a binary operation node.
    ///
    /// The assignment family is handled first because its left operand is
    /// a binding target, not a value. `and`/`or` short-circuit: the right
    /// operand is only evaluated when the left one does not decide the
    /// result. Every other operator evaluates both operands and applies
    /// the pure operation.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `lhs`: Left operand expression.
    /// - `rhs`: Right operand expression.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The resulting value. Comparisons and logical operators yield
    /// `Number(1.0)` or `Number(0.0)`, never a distinct boolean.
    pub(crate) fn eval_binary_op(&mut self,
                                 op: BinaryOperator,
                                 lhs: &Node,
                                 rhs: &Node,
                                 line: usize)
                                 -> EvalResult<Value> {
        if op.is_assignment() {
            return self.eval_assignment(op, lhs, rhs, line);
        }

        match op {
            BinaryOperator::And => {
                if !self.eval(lhs)?.truthy() {
                    return Ok(Value::Number(0.0));
                }
                Ok(Value::from(self.eval(rhs)?.truthy()))
            },
            BinaryOperator::Or => {
                if self.eval(lhs)?.truthy() {
                    return Ok(Value::Number(1.0));
                }
                Ok(Value::from(self.eval(rhs)?.truthy()))
            },
            _ => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                eval_binary(op, &left, &right, line)
            },
        }
    }

    /// Evaluates `=` and the compound assignments.
    ///
    /// The left operand must be a variable node. Plain `=` evaluates the
    /// right side and assigns it; a compound operator evaluates the left
    /// side, then the right side, applies the pure operation, and assigns
    /// the result. Either way the assigned value is also the value of the
    /// expression, so assignments chain (`a = b = c`).
    fn eval_assignment(&mut self,
                       op: BinaryOperator,
                       lhs: &Node,
                       rhs: &Node,
                       line: usize)
                       -> EvalResult<Value> {
        let Node::Variable { name, .. } = lhs else {
            return Err(RuntimeError::TypeMismatch { details: "The left operand of the assignment must be a variable".to_string(),
                                                    line });
        };

        let value = match op.compound_base() {
            None => self.eval(rhs)?,
            Some(base) => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                eval_binary(base, &left, &right, line)?
            },
        };

        self.set_variable(name, value.clone());
        Ok(value)
    }
}

/// Applies a pure binary operator to two evaluated values.
///
/// The per-type behavior:
///
/// - `+` adds numbers, concatenates strings, concatenates lists (into a
///   new list).
/// - `-` subtracts numbers; on strings it strips the right operand when it
///   is a suffix of the left one, otherwise leaves the left unchanged
///   (always producing a new string).
/// - `*` multiplies numbers, repeats a string or list by a number.
/// - `/`, `%` and `^` are numeric only; division and modulo by zero follow
///   IEEE-754 and produce inf/NaN rather than an error.
/// - Comparisons never fail; see [`eval_comparison`].
pub(crate) fn eval_binary(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
    use BinaryOperator::{Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
                         NotEqual, Pow, Sub};

    match op {
        Add => eval_add(left, right, line),
        Sub => eval_sub(left, right, line),
        Mul => eval_mul(left, right, line),
        Div | Mod | Pow => eval_numeric(op, left, right, line),
        Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual => {
            Ok(eval_comparison(op, left, right))
        },
        _ => unreachable!("assignment and logical operators are handled by the caller"),
    }
}

fn operand_mismatch(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("Incorrect operands in binary expression: {} {op} {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 line }
}

fn eval_add(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut result = a.borrow().clone();
            result.push_str(&b.borrow());
            Ok(Value::from(result))
        },
        (Value::List(a), Value::List(b)) => {
            let mut elements = a.borrow().clone();
            elements.extend(b.borrow().iter().cloned());
            Ok(Value::from(elements))
        },
        _ => Err(operand_mismatch(BinaryOperator::Add, left, right, line)),
    }
}

fn eval_sub(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut result = a.borrow().clone();
            let suffix = b.borrow();
            if result.ends_with(suffix.as_str()) {
                let stripped = result.len() - suffix.len();
                result.truncate(stripped);
            }
            Ok(Value::from(result))
        },
        _ => Err(operand_mismatch(BinaryOperator::Sub, left, right, line)),
    }
}

fn eval_mul(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::Str(source), Value::Number(count)) => repeat_string(&source.borrow(), *count, line),
        (Value::List(elements), Value::Number(count)) => {
            repeat_list(&elements.borrow(), *count, line)
        },
        _ => Err(operand_mismatch(BinaryOperator::Mul, left, right, line)),
    }
}

/// Repeats a string so that the result length is `floor(count * len)`
/// bytes, taken cyclically from the source.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn repeat_string(source: &str, count: f64, line: usize) -> EvalResult<Value> {
    if !count.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("Cannot multiply a string by {count}"),
                                                   line });
    }
    if count < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: "Cannot multiply a string by a negative number".to_string(),
                                                   line });
    }

    let total = (count * source.len() as f64) as usize;
    let bytes: Vec<u8> = source.bytes().cycle().take(total).collect();
    Ok(Value::from(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Repeats a list `trunc(count)` times, cloning the element handles.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn repeat_list(elements: &[Value], count: f64, line: usize) -> EvalResult<Value> {
    if !count.is_finite() {
        return Err(RuntimeError::InvalidArgument { details: format!("Cannot multiply a list by {count}"),
                                                   line });
    }
    if count < 0.0 {
        return Err(RuntimeError::InvalidArgument { details: "Cannot multiply a list by a negative number".to_string(),
                                                   line });
    }

    let total = (count as usize).checked_mul(elements.len())
                                .ok_or_else(|| RuntimeError::InvalidArgument { details: "List repeat count is too large".to_string(),
                                                                               line })?;
    let mut result = Vec::with_capacity(total);
    for index in 0..total {
        result.push(elements[index % elements.len()].clone());
    }
    Ok(Value::from(result))
}

fn eval_numeric(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(operand_mismatch(op, left, right, line));
    };
    Ok(Value::Number(match op {
                         BinaryOperator::Div => a / b,
                         BinaryOperator::Mod => a % b,
                         BinaryOperator::Pow => a.powf(*b),
                         _ => unreachable!(),
                     }))
}

/// Applies a comparison operator. Comparisons never fail.
///
/// - Numbers compare numerically (IEEE semantics for NaN).
/// - Strings compare lexicographically on bytes.
/// - Nil equals nil.
/// - Lists are equal when they are the same object; ordering compares
///   lengths.
/// - Functions are equal when they share a definition and have no
///   ordering.
/// - Operands of different types compare as `0.0` (false) under every
///   operator.
fn eval_comparison(op: BinaryOperator, left: &Value, right: &Value) -> Value {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};
    use std::rc::Rc;

    let result = match (left, right) {
        (Value::Number(a), Value::Number(b)) => match op {
            Equal => a == b,
            NotEqual => a != b,
            Less => a < b,
            Greater => a > b,
            LessEqual => a <= b,
            GreaterEqual => a >= b,
            _ => unreachable!(),
        },
        (Value::Str(a), Value::Str(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            match op {
                Equal => *a == *b,
                NotEqual => *a != *b,
                Less => *a < *b,
                Greater => *a > *b,
                LessEqual => *a <= *b,
                GreaterEqual => *a >= *b,
                _ => unreachable!(),
            }
        },
        (Value::Nil, Value::Nil) => matches!(op, Equal | LessEqual | GreaterEqual),
        (Value::List(a), Value::List(b)) => match op {
            Equal => Rc::ptr_eq(a, b),
            NotEqual => !Rc::ptr_eq(a, b),
            Less => a.borrow().len() < b.borrow().len(),
            Greater => a.borrow().len() > b.borrow().len(),
            LessEqual => a.borrow().len() <= b.borrow().len(),
            GreaterEqual => a.borrow().len() >= b.borrow().len(),
            _ => unreachable!(),
        },
        (Value::Function(a), Value::Function(b)) => match op {
            Equal | LessEqual | GreaterEqual => Rc::ptr_eq(a, b),
            NotEqual => !Rc::ptr_eq(a, b),
            Less | Greater => false,
            _ => unreachable!(),
        },
        _ => false,
    };
    Value::from(result)
}
