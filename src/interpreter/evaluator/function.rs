use std::rc::Rc;

use crate::{
    ast::{FunctionDef, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator, Flow},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a call through a name, e.g. `f(1, 2)`.
    ///
    /// The name is resolved through the live scope chain at call time and
    /// must hold a function value.
    ///
    /// # Errors
    /// - `UnknownFunction` when the name is unbound.
    /// - `TypeMismatch` when it is bound to a non-function.
    /// - `ArgumentCountMismatch` when the argument count is wrong.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     args: &[Node],
                                     line: usize)
                                     -> EvalResult<Value> {
        let Some(callee) = self.find_variable(name).cloned() else {
            return Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                                       line });
        };
        let Value::Function(function) = callee else {
            return Err(RuntimeError::TypeMismatch { details: format!("'{name}' is not a function"),
                                                    line });
        };
        self.call_function(&function, args, line)
    }

    /// Evaluates a call whose callee is an arbitrary expression, e.g.
    /// `(make_adder(1))(2)`.
    ///
    /// # Errors
    /// - `TypeMismatch` when the callee does not evaluate to a function.
    /// - `ArgumentCountMismatch` when the argument count is wrong.
    pub(crate) fn eval_unnamed_call(&mut self,
                                    callee: &Node,
                                    args: &[Node],
                                    line: usize)
                                    -> EvalResult<Value> {
        let Value::Function(function) = self.eval(callee)? else {
            return Err(RuntimeError::TypeMismatch { details: "The '()' operator can be applied only to a function".to_string(),
                                                    line });
        };
        self.call_function(&function, args, line)
    }

    /// The shared call machinery.
    ///
    /// Arguments are evaluated left to right in the caller's scope, then a
    /// fresh frame is pushed and the parameters are bound into it. The
    /// body runs until a `return` fires; its value becomes the call
    /// result, and a body that falls off the end (or stops at a stray
    /// `break`/`continue`) yields nil. The frame is popped on exit, so
    /// every call is scope-balanced.
    fn call_function(&mut self,
                     function: &Rc<FunctionDef>,
                     args: &[Node],
                     line: usize)
                     -> EvalResult<Value> {
        if args.len() != function.arg_names.len() {
            return Err(RuntimeError::ArgumentCountMismatch { expected: function.arg_names.len(),
                                                             found:    args.len(),
                                                             line });
        }

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval(arg)?);
        }

        self.push_scope();
        for (name, value) in function.arg_names.iter().zip(arg_values) {
            self.define_local(name, value);
        }

        let mut result = Value::Nil;
        for statement in &function.body {
            match self.exec_statement(statement)? {
                Flow::Normal => {},
                Flow::Return(value) => {
                    result = value;
                    break;
                },
                Flow::Break | Flow::Continue => break,
            }
        }
        self.pop_scope();
        Ok(result)
    }
}
