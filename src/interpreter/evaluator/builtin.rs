use std::{cell::RefCell, cmp::Ordering, io::Write, rc::Rc};

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::{
    ast::{Builtin, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a call to a built-in global function.
    ///
    /// Argument counts are strict and checked before any argument is
    /// evaluated; the arguments themselves are evaluated left to right in
    /// the current scope, then the builtin dispatches on its identifier.
    ///
    /// # Parameters
    /// - `builtin`: Which builtin to invoke.
    /// - `args`: Argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The builtin's result. `print`/`println` return the printed value
    /// and the list mutators return the list, so calls can be chained.
    pub(crate) fn eval_builtin(&mut self,
                               builtin: Builtin,
                               args: &[Node],
                               line: usize)
                               -> EvalResult<Value> {
        if args.len() != builtin.arity() {
            return Err(RuntimeError::ArgumentCountMismatch { expected: builtin.arity(),
                                                             found:    args.len(),
                                                             line });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }

        match builtin {
            Builtin::Print => self.builtin_print(&values[0]),
            Builtin::Println => {
                let value = self.builtin_print(&values[0])?;
                self.write_output("\n")?;
                Ok(value)
            },
            Builtin::Read => self.builtin_read(),
            Builtin::StackTrace => Ok(self.builtin_stacktrace()),
            Builtin::Len => builtin_len(&values[0], line),
            Builtin::Lower => {
                let source = expect_string(&values[0], "The argument of lower()", line)?;
                let lowered = source.borrow().to_ascii_lowercase();
                Ok(Value::from(lowered))
            },
            Builtin::Upper => {
                let source = expect_string(&values[0], "The argument of upper()", line)?;
                let raised = source.borrow().to_ascii_uppercase();
                Ok(Value::from(raised))
            },
            Builtin::Capitalize => builtin_capitalize(&values[0], line),
            Builtin::Split => builtin_split(&values[0], &values[1], line),
            Builtin::Join => builtin_join(&values[0], &values[1], line),
            Builtin::Replace => builtin_replace(&values[0], &values[1], &values[2], line),
            Builtin::Abs | Builtin::Sqrt | Builtin::Ceil | Builtin::Floor | Builtin::Round => {
                numeric_builtin(builtin, &values[0], line)
            },
            Builtin::Rnd => {
                expect_number(&values[0], "The argument of rnd()", line)?;
                Ok(Value::Number(self.rng.gen_range(0..2_147_483_648_i64) as f64))
            },
            Builtin::ParseNum => Ok(builtin_parse_num(&values[0])),
            Builtin::ToString => Ok(Value::from(values[0].to_string())),
            Builtin::Range => builtin_range(&values[0], &values[1], &values[2], line),
            Builtin::Push => {
                let list = expect_list(&values[0], "The first argument of push()", line)?;
                list.borrow_mut().push(values[1].clone());
                Ok(values[0].clone())
            },
            Builtin::Pop => builtin_pop(&values[0], line),
            Builtin::Insert => builtin_insert(&values[0], &values[1], &values[2], line),
            Builtin::Remove => builtin_remove(&values[0], &values[1], line),
            Builtin::Sort => builtin_sort(&values[0], line),
        }
    }

    /// Writes a value to the output: strings raw, everything else in its
    /// display form. Returns the value so `print(x)` evaluates to `x`.
    fn builtin_print(&mut self, value: &Value) -> EvalResult<Value> {
        let text = value.to_string();
        self.write_output(&text)?;
        Ok(value.clone())
    }

    fn write_output(&mut self, text: &str) -> EvalResult<()> {
        write!(self.output, "{text}").map_err(|e| RuntimeError::Io { details: e.to_string() })
    }

    /// Reads one line from the input, without the trailing newline.
    /// End of input yields an empty string.
    fn builtin_read(&mut self) -> EvalResult<Value> {
        let mut buffer = String::new();
        self.input
            .read_line(&mut buffer)
            .map_err(|e| RuntimeError::Io { details: e.to_string() })?;
        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(Value::from(buffer))
    }

    /// Dumps the variables of the innermost scope frame, sorted by name.
    fn builtin_stacktrace(&self) -> Value {
        let Some(scope) = self.scopes.last() else {
            return Value::from("Empty trace");
        };

        let mut names: Vec<&String> = scope.keys().collect();
        names.sort();

        let mut trace = String::new();
        for name in names {
            trace.push_str(&format!("variable name: {name}, value: {}\n", scope[name].quoted()));
        }
        Value::from(trace)
    }
}

fn expect_string(value: &Value, what: &str, line: usize) -> EvalResult<Rc<RefCell<String>>> {
    match value {
        Value::Str(s) => Ok(Rc::clone(s)),
        other => Err(RuntimeError::TypeMismatch { details: format!("{what} must be a string, found {}",
                                                                   other.type_name()),
                                                  line }),
    }
}

fn expect_list(value: &Value, what: &str, line: usize) -> EvalResult<Rc<RefCell<Vec<Value>>>> {
    match value {
        Value::List(elements) => Ok(Rc::clone(elements)),
        other => Err(RuntimeError::TypeMismatch { details: format!("{what} must be a list, found {}",
                                                                   other.type_name()),
                                                  line }),
    }
}

fn expect_number(value: &Value, what: &str, line: usize) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(RuntimeError::TypeMismatch { details: format!("{what} must be a number, found {}",
                                                                   other.type_name()),
                                                  line }),
    }
}

/// `len`: byte length of a string, element count of a list.
#[allow(clippy::cast_precision_loss)]
fn builtin_len(value: &Value, line: usize) -> EvalResult<Value> {
    match value {
        Value::Str(s) => Ok(Value::Number(s.borrow().len() as f64)),
        Value::List(elements) => Ok(Value::Number(elements.borrow().len() as f64)),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("len() can be applied only to an iterable object, found {}",
                                                              other.type_name()),
                                             line })
        },
    }
}

/// `capitalize`: upper-cases the first byte of the string in place and
/// returns the same handle, so the change is visible through every alias.
/// An empty string is returned unchanged.
fn builtin_capitalize(value: &Value, line: usize) -> EvalResult<Value> {
    let handle = expect_string(value, "The argument of capitalize()", line)?;
    {
        let mut source = handle.borrow_mut();
        if let Some(first) = source.chars().next()
           && first.is_ascii()
        {
            let upper = first.to_ascii_uppercase();
            source.replace_range(0..1, upper.encode_utf8(&mut [0; 4]));
        }
    }
    Ok(Value::Str(handle))
}

/// `split`: splits a string on a literal delimiter. A trailing delimiter
/// yields a trailing empty segment.
fn builtin_split(source: &Value, delimiter: &Value, line: usize) -> EvalResult<Value> {
    let source = expect_string(source, "The first argument of split()", line)?;
    let delimiter = expect_string(delimiter, "The second argument of split()", line)?;
    let delimiter = delimiter.borrow();
    if delimiter.is_empty() {
        return Err(RuntimeError::InvalidArgument { details: "The split() delimiter must not be empty".to_string(),
                                                   line });
    }

    let parts: Vec<Value> = source.borrow()
                                  .split(delimiter.as_str())
                                  .map(Value::from)
                                  .collect();
    Ok(Value::from(parts))
}

/// `join`: concatenates the elements of a list with a delimiter. String
/// elements join raw; everything else joins in its display form.
fn builtin_join(list: &Value, delimiter: &Value, line: usize) -> EvalResult<Value> {
    let list = expect_list(list, "The first argument of join()", line)?;
    let delimiter = expect_string(delimiter, "The second argument of join()", line)?;
    let delimiter = delimiter.borrow();

    let mut result = String::new();
    for (index, element) in list.borrow().iter().enumerate() {
        if index > 0 {
            result.push_str(&delimiter);
        }
        result.push_str(&element.to_string());
    }
    Ok(Value::from(result))
}

/// `replace`: replaces all non-overlapping occurrences, scanning left to
/// right and advancing past each replacement.
fn builtin_replace(source: &Value, old: &Value, new: &Value, line: usize) -> EvalResult<Value> {
    let mut result = expect_string(source, "The first argument of replace()", line)?.borrow()
                                                                                    .clone();
    let old = expect_string(old, "The second argument of replace()", line)?;
    let old = old.borrow();
    let new = expect_string(new, "The third argument of replace()", line)?;
    let new = new.borrow();

    if old.is_empty() {
        return Err(RuntimeError::InvalidArgument { details: "The replace() pattern must not be empty".to_string(),
                                                   line });
    }

    let mut position = 0;
    while let Some(found) = result[position..].find(old.as_str()) {
        let index = position + found;
        result.replace_range(index..index + old.len(), &new);
        position = index + new.len();
    }
    Ok(Value::from(result))
}

/// `abs`, `sqrt`, `ceil`, `floor`, `round`: numeric, one argument.
fn numeric_builtin(builtin: Builtin, value: &Value, line: usize) -> EvalResult<Value> {
    let op = match builtin {
        Builtin::Abs => f64::abs,
        Builtin::Sqrt => f64::sqrt,
        Builtin::Ceil => f64::ceil,
        Builtin::Floor => f64::floor,
        Builtin::Round => f64::round,
        _ => unreachable!(),
    };
    match value {
        Value::Number(n) => Ok(Value::Number(op(*n))),
        other => {
            Err(RuntimeError::TypeMismatch { details: format!("{}() can be applied only to a number, found {}",
                                                              builtin.name(),
                                                              other.type_name()),
                                             line })
        },
    }
}

/// `parse_num`: the whole string must parse as a double, else nil.
/// Non-string arguments are nil as well.
fn builtin_parse_num(value: &Value) -> Value {
    match value {
        Value::Str(s) => s.borrow().parse::<f64>().map_or(Value::Nil, Value::Number),
        _ => Value::Nil,
    }
}

/// `range(start, end, step)`: the half-open sequence `[start, start+step,
/// ...)` up to but excluding `end`.
fn builtin_range(start: &Value, end: &Value, step: &Value, line: usize) -> EvalResult<Value> {
    let start = expect_number(start, "All arguments of range()", line)?;
    let end = expect_number(end, "All arguments of range()", line)?;
    let step = expect_number(step, "All arguments of range()", line)?;

    if step == 0.0 {
        return Err(RuntimeError::InvalidArgument { details: "The step of range() must be non-zero".to_string(),
                                                   line });
    }
    if step > 0.0 && start >= end {
        return Err(RuntimeError::InvalidArgument { details: "The start of range() must be less than the end when the step is positive".to_string(),
                                                   line });
    }
    if step < 0.0 && start <= end {
        return Err(RuntimeError::InvalidArgument { details: "The start of range() must be greater than the end when the step is negative".to_string(),
                                                   line });
    }

    let mut sequence = Vec::new();
    let mut current = start;
    while if step > 0.0 { current < end } else { current > end } {
        sequence.push(Value::Number(current));
        current += step;
    }
    Ok(Value::from(sequence))
}

/// `pop`: removes the last element in place; popping an empty list is an
/// error. Returns the list.
fn builtin_pop(value: &Value, line: usize) -> EvalResult<Value> {
    let list = expect_list(value, "The argument of pop()", line)?;
    let mut elements = list.borrow_mut();
    if elements.is_empty() {
        return Err(RuntimeError::InvalidArgument { details: "Cannot pop from an empty list".to_string(),
                                                   line });
    }
    elements.pop();
    drop(elements);
    Ok(value.clone())
}

/// `insert(list, index, value)`: inserts in place; the index may equal the
/// length to append. Returns the list.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn builtin_insert(list: &Value, index: &Value, element: &Value, line: usize) -> EvalResult<Value> {
    let handle = expect_list(list, "The first argument of insert()", line)?;
    let position = expect_number(index, "The second argument of insert()", line)?;
    let position = crate::util::num::f64_to_i64_trunc(position, line)?;

    let mut elements = handle.borrow_mut();
    if position < 0 || position > elements.len() as i64 {
        return Err(RuntimeError::IndexOutOfBounds { index: position,
                                                    len:   elements.len(),
                                                    line });
    }
    elements.insert(position as usize, element.clone());
    drop(elements);
    Ok(list.clone())
}

/// `remove(list, index)`: removes in place, bounds-checked. Returns the
/// list.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn builtin_remove(list: &Value, index: &Value, line: usize) -> EvalResult<Value> {
    let handle = expect_list(list, "The first argument of remove()", line)?;
    let position = expect_number(index, "The second argument of remove()", line)?;
    let position = crate::util::num::f64_to_i64_trunc(position, line)?;

    let mut elements = handle.borrow_mut();
    if position < 0 || position >= elements.len() as i64 {
        return Err(RuntimeError::IndexOutOfBounds { index: position,
                                                    len:   elements.len(),
                                                    line });
    }
    elements.remove(position as usize);
    drop(elements);
    Ok(list.clone())
}

/// `sort`: sorts a homogeneous list in place and returns it.
///
/// Strings sort by bytes, numbers by value (total order, so NaN has a
/// defined place), lists by length, nils are all equal. A list containing
/// functions, or elements of more than one type, is an error.
fn builtin_sort(value: &Value, line: usize) -> EvalResult<Value> {
    let list = expect_list(value, "The argument of sort()", line)?;
    let mut elements = list.borrow_mut();

    if elements.iter().any(|e| matches!(e, Value::Function(_))) {
        return Err(RuntimeError::TypeMismatch { details: "sort() cannot be applied to a list of functions".to_string(),
                                                line });
    }
    if let Some(first) = elements.first() {
        let kind = std::mem::discriminant(first);
        if elements.iter().any(|e| std::mem::discriminant(e) != kind) {
            return Err(RuntimeError::TypeMismatch { details: "sort() can be applied only to a list of elements of the same type".to_string(),
                                                    line });
        }
    }

    elements.sort_by(|a, b| match (a, b) {
                         (Value::Number(x), Value::Number(y)) => {
                             OrderedFloat(*x).cmp(&OrderedFloat(*y))
                         },
                         (Value::Str(x), Value::Str(y)) => {
                             x.borrow().as_str().cmp(y.borrow().as_str())
                         },
                         (Value::List(x), Value::List(y)) => {
                             x.borrow().len().cmp(&y.borrow().len())
                         },
                         _ => Ordering::Equal,
                     });
    drop(elements);
    Ok(value.clone())
}
