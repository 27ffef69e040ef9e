use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Executes a `while` loop.
    ///
    /// The condition is re-evaluated in the enclosing scope before each
    /// iteration; every iteration of the body runs in a fresh scope frame.
    /// `break` ends the loop, `continue` starts the next condition check,
    /// and `return` propagates outward. Both loop signals are absorbed
    /// here, so nothing leaks to the next iteration or the enclosing
    /// construct.
    pub(crate) fn exec_while(&mut self, condition: &Node, body: &[Node]) -> EvalResult<Flow> {
        loop {
            if !self.eval(condition)?.truthy() {
                break;
            }
            self.push_scope();
            let flow = self.exec_block(body)?;
            self.pop_scope();
            match flow {
                Flow::Normal | Flow::Continue => {},
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `for` loop over a list or a string.
    ///
    /// The sequence expression is evaluated once. A list is iterated over
    /// a snapshot of its elements taken before the first iteration, so the
    /// body may mutate the list without disturbing the walk (the elements
    /// themselves stay shared). A string is iterated bytewise, binding a
    /// one-byte string each time. Each iteration binds the loop variable
    /// in a fresh scope frame.
    ///
    /// # Errors
    /// `TypeMismatch` when the sequence is neither a list nor a string.
    pub(crate) fn exec_for(&mut self,
                           variable: &str,
                           sequence: &Node,
                           body: &[Node],
                           line: usize)
                           -> EvalResult<Flow> {
        match self.eval(sequence)? {
            Value::List(elements) => {
                let snapshot = elements.borrow().clone();
                for element in snapshot {
                    match self.run_iteration(variable, element, body)? {
                        Flow::Normal | Flow::Continue => {},
                        Flow::Break => break,
                        returned @ Flow::Return(_) => return Ok(returned),
                    }
                }
            },
            Value::Str(s) => {
                let snapshot = s.borrow().clone();
                for byte in snapshot.bytes() {
                    let element = Value::from(String::from_utf8_lossy(&[byte]).into_owned());
                    match self.run_iteration(variable, element, body)? {
                        Flow::Normal | Flow::Continue => {},
                        Flow::Break => break,
                        returned @ Flow::Return(_) => return Ok(returned),
                    }
                }
            },
            other => {
                return Err(RuntimeError::TypeMismatch { details: format!("The for-loop sequence must be iterable, found {}",
                                                                         other.type_name()),
                                                        line });
            },
        }
        Ok(Flow::Normal)
    }

    /// Runs one loop iteration: fresh frame, loop variable bound locally,
    /// body executed, frame popped.
    fn run_iteration(&mut self, variable: &str, element: Value, body: &[Node]) -> EvalResult<Flow> {
        self.push_scope();
        self.define_local(variable, element);
        let flow = self.exec_block(body)?;
        self.pop_scope();
        Ok(flow)
    }
}
