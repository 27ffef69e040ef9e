use std::{
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ast::{Node, Program},
    error::RuntimeError,
    interpreter::value::core::Value,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The control-flow outcome of executing one statement.
///
/// Every statement reports how execution should proceed. Loops absorb
/// `Break` and `Continue`; calls (and the top level) absorb `Return`.
/// Carrying the outcome in the return value, instead of a mutable
/// register, means no construct can forget to reset it.
#[derive(Debug)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `break` is propagating to the nearest enclosing loop.
    Break,
    /// A `continue` is propagating to the nearest enclosing loop.
    Continue,
    /// A `return` is propagating to the nearest enclosing call, carrying
    /// the returned value.
    Return(Value),
}

/// The runtime state of one program execution.
///
/// Holds the scope stack, the input the `read` builtin consumes lines
/// from, the output `print`/`println` write to, and the generator behind
/// `rnd`. The evaluator owns no parser state; it walks an immutable AST.
pub struct Evaluator<'io> {
    pub(crate) scopes: Vec<HashMap<String, Value>>,
    pub(crate) input:  &'io mut dyn BufRead,
    pub(crate) output: &'io mut dyn Write,
    pub(crate) rng:    StdRng,
}

impl<'io> Evaluator<'io> {
    /// Creates an evaluator with an empty scope stack.
    ///
    /// The first scope frame is created lazily by the first write; until
    /// then every variable read fails. The random generator is seeded from
    /// the operating system.
    pub fn new(input: &'io mut dyn BufRead, output: &'io mut dyn Write) -> Self {
        Self { scopes: Vec::new(),
               input,
               output,
               rng: StdRng::from_entropy() }
    }

    /// Creates an evaluator whose `rnd` builtin produces a reproducible
    /// sequence.
    pub fn with_seed(input: &'io mut dyn BufRead, output: &'io mut dyn Write, seed: u64) -> Self {
        Self { scopes: Vec::new(),
               input,
               output,
               rng: StdRng::seed_from_u64(seed) }
    }

    /// Executes the top-level statements of a program in order.
    ///
    /// Execution stops cleanly at the first control-flow signal that
    /// reaches the top level: a top-level `return` (or a stray `break` or
    /// `continue`) ends the program.
    ///
    /// # Errors
    /// Returns the first runtime error; nothing is recovered or rolled
    /// back.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        for statement in &program.statements {
            match self.exec_statement(statement)? {
                Flow::Normal => {},
                Flow::Break | Flow::Continue | Flow::Return(_) => break,
            }
        }
        Ok(())
    }

    /// Executes a single statement and reports its control-flow outcome.
    ///
    /// `break`, `continue` and `return` produce their signals; `if`,
    /// `while` and `for` dispatch to their handlers; any other node is an
    /// expression statement whose value is discarded.
    pub fn exec_statement(&mut self, node: &Node) -> EvalResult<Flow> {
        match node {
            Node::Break { .. } => Ok(Flow::Break),
            Node::Continue { .. } => Ok(Flow::Continue),
            Node::Return { value, .. } => Ok(Flow::Return(self.eval(value)?)),
            Node::If { condition,
                       then_branch,
                       else_branch,
                       .. } => self.exec_if(condition, then_branch, else_branch),
            Node::While { condition, body, .. } => self.exec_while(condition, body),
            Node::For { variable,
                        sequence,
                        body,
                        line, } => self.exec_for(variable, sequence, body, *line),
            expression => {
                self.eval(expression)?;
                Ok(Flow::Normal)
            },
        }
    }

    /// Executes the statements of a block in order.
    ///
    /// Stops at the first non-normal outcome and propagates it to the
    /// enclosing construct.
    pub(crate) fn exec_block(&mut self, statements: &[Node]) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.exec_statement(statement)?;
            if !matches!(flow, Flow::Normal) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes an `if` statement.
    ///
    /// The chosen branch runs in a fresh scope frame; `break`, `continue`
    /// and `return` propagate through it.
    fn exec_if(&mut self,
               condition: &Node,
               then_branch: &[Node],
               else_branch: &[Node])
               -> EvalResult<Flow> {
        let truthy = self.eval(condition)?.truthy();
        self.push_scope();
        let flow = if truthy {
            self.exec_block(then_branch)?
        } else {
            self.exec_block(else_branch)?
        };
        self.pop_scope();
        Ok(flow)
    }

    /// Evaluates an expression node and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The
    /// evaluator dispatches on the node variant: literals, variables,
    /// unary and binary operations, the three call forms, slices and
    /// function literals. Statement-only nodes cannot appear here; the
    /// parser never places them in expression position.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        match node {
            Node::NumberLiteral { value, .. } => Ok(Value::Number(*value)),
            Node::StringLiteral { value, .. } => Ok(Value::from(value.clone())),
            Node::NilLiteral { .. } => Ok(Value::Nil),
            Node::ListLiteral { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element)?);
                }
                Ok(Value::from(values))
            },
            Node::Variable { name, line } => self.eval_variable(name, *line),
            Node::FunctionImpl { function, .. } => Ok(Value::Function(Rc::clone(function))),
            Node::BinaryOp { op, lhs, rhs, line } => self.eval_binary_op(*op, lhs, rhs, *line),
            Node::UnaryOp { op, arg, line } => self.eval_unary_op(*op, arg, *line),
            Node::FunctionCall { name, args, line } => self.eval_function_call(name, args, *line),
            Node::UnnamedCall { callee, args, line } => {
                self.eval_unnamed_call(callee, args, *line)
            },
            Node::GlobalCall { builtin, args, line } => self.eval_builtin(*builtin, args, *line),
            Node::Slice { target, indices, line } => self.eval_slice(target, indices, *line),
            statement => Err(RuntimeError::UnknownExpression { line: statement.line_number() }),
        }
    }

    /// Looks up a variable and clones its value.
    ///
    /// # Errors
    /// `UnknownVariable` when no frame binds the name.
    fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.find_variable(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           line })
    }

    /// Pushes a fresh scope frame.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope frame, if any.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Finds a variable by walking the scope chain from the innermost
    /// frame outward.
    #[must_use]
    pub fn find_variable(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Binds a name in the innermost frame, creating the frame if the
    /// stack is empty.
    ///
    /// Used for function parameters and loop variables, which must shadow
    /// outer bindings of the same name rather than overwrite them.
    pub fn define_local(&mut self, name: &str, value: Value) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Assigns a name: the innermost frame that already binds it is
    /// updated in place; otherwise the binding is created in the innermost
    /// frame (created lazily when the stack is empty).
    pub fn set_variable(&mut self, name: &str, value: Value) {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
}
