use crate::{
    ast::{Node, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

impl Evaluator<'_> {
    /// Evaluates a prefix operation.
    ///
    /// `-` and `+` apply to numbers only; `not` projects any value to its
    /// truthiness and negates it, yielding `Number(1.0)` or `Number(0.0)`.
    pub(crate) fn eval_unary_op(&mut self,
                                op: UnaryOperator,
                                arg: &Node,
                                line: usize)
                                -> EvalResult<Value> {
        let value = self.eval(arg)?;
        match op {
            UnaryOperator::Negate => match value {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => {
                    Err(RuntimeError::TypeMismatch { details: format!("Unary minus can be applied only to a number, found {}",
                                                                      other.type_name()),
                                                     line })
                },
            },
            UnaryOperator::Plus => match value {
                Value::Number(n) => Ok(Value::Number(n)),
                other => {
                    Err(RuntimeError::TypeMismatch { details: format!("Unary plus can be applied only to a number, found {}",
                                                                      other.type_name()),
                                                     line })
                },
            },
            UnaryOperator::Not => Ok(Value::from(!value.truthy())),
        }
    }
}
