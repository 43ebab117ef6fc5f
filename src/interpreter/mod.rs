//! # Interpreter
//!
//! This module evaluates a parsed Elton program by walking the AST directly.
//! Variables live in one process wide environment; function calls snapshot
//! that environment on entry and restore it on exit ("snapshot scoping" --
//! it behaves like lexical scoping for nested calls, but functions do not
//! close over their definition site). User defined functions and lambdas
//! share a function table keyed by name.

mod builtins;
mod error;
mod value;

pub use error::*;
pub use value::*;

use std::collections::HashMap;

use log::{debug, trace};

use crate::parser::ast::{BinaryOp, Expression, Param, Statement, UnaryOp};

const LAMBDA_PREFIX: &str = "_lambda_";

/// A user defined function: its parameters and body, owned by the function
/// table.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
}

/// Result of running a statement list: either a plain value or a return
/// carrier that unwinds until the nearest function call frame.
enum Flow {
    Normal(Value),
    Return(Value),
}

#[derive(Default)]
pub struct Interpreter {
    variables: HashMap<String, Value>,
    functions: HashMap<String, FunctionDef>,
    lambda_counter: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a program and yield the value of its last statement.
    pub fn evaluate(&mut self, ast: &[Statement]) -> RuntimeResult<Value> {
        match self.run_statements(ast)? {
            Flow::Normal(value) => Ok(value),
            Flow::Return(_) => Err(RuntimeError::Type(
                "Cannot return from outside a function".to_string(),
            )),
        }
    }

    /// Run a statement list. A return carrier stops the list and is handed
    /// upward untouched; only [`Interpreter::call_function`] unwraps it.
    fn run_statements(&mut self, statements: &[Statement]) -> RuntimeResult<Flow> {
        let mut result = Value::Unit;

        for statement in statements {
            match self.run_statement(statement)? {
                Flow::Normal(value) => result = value,
                carrier @ Flow::Return(_) => return Ok(carrier),
            }
        }

        Ok(Flow::Normal(result))
    }

    fn run_statement(&mut self, statement: &Statement) -> RuntimeResult<Flow> {
        match statement {
            Statement::VarDeclaration { name, value, .. } => {
                let value = self.eval_expression(value)?;
                let bound = self.bind_variable(name, value);
                Ok(Flow::Normal(bound))
            }
            Statement::Assignment { name, value } => {
                if !self.variables.contains_key(name) {
                    return Err(RuntimeError::Name(format!(
                        "Variable '{name}' is not defined"
                    )));
                }
                let value = self.eval_expression(value)?;
                let bound = self.bind_variable(name, value);
                Ok(Flow::Normal(bound))
            }
            Statement::FunctionDeclaration {
                name, params, body, ..
            } => {
                debug!("registering function '{name}'");
                self.functions.insert(
                    name.clone(),
                    FunctionDef {
                        params: params.clone(),
                        body: body.clone(),
                    },
                );
                Ok(Flow::Normal(Value::Unit))
            }
            Statement::Return { value } => {
                let value = self.eval_expression(value)?;
                Ok(Flow::Return(value))
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.run_statements(then_branch)
                } else {
                    self.run_statements(else_branch)
                }
            }
            Statement::While { condition, body } => {
                let mut result = Value::Unit;
                while self.eval_expression(condition)?.is_truthy() {
                    match self.run_statements(body)? {
                        Flow::Normal(value) => result = value,
                        carrier @ Flow::Return(_) => return Ok(carrier),
                    }
                }
                Ok(Flow::Normal(result))
            }
            Statement::For {
                iterator,
                iterable,
                body,
            } => self.run_for(iterator, iterable, body),
            Statement::TryCatch {
                try_body,
                catch_name,
                catch_body,
            } => match self.run_statements(try_body) {
                Ok(flow) => Ok(flow),
                Err(error) => {
                    trace!("caught runtime error: {error}");
                    let previous = self.variables.get(catch_name).cloned();
                    self.variables
                        .insert(catch_name.clone(), Value::Str(error.to_string()));

                    let outcome = self.run_statements(catch_body);

                    match previous {
                        Some(value) => {
                            self.variables.insert(catch_name.clone(), value);
                        }
                        None => {
                            self.variables.remove(catch_name);
                        }
                    }

                    outcome
                }
            },
            Statement::Throw { value } => {
                let value = self.eval_expression(value)?;
                Err(RuntimeError::User(value.as_str()))
            }
            Statement::Print { arguments } => {
                let mut parts = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    parts.push(self.eval_expression(argument)?.as_str());
                }
                println!("{}", parts.join(" "));
                Ok(Flow::Normal(Value::Unit))
            }
            Statement::Expression(expression) => {
                Ok(Flow::Normal(self.eval_expression(expression)?))
            }
        }
    }

    fn run_for(
        &mut self,
        iterator: &str,
        iterable: &Expression,
        body: &[Statement],
    ) -> RuntimeResult<Flow> {
        let items: Vec<Value> = match iterable {
            Expression::Range { start, end } => {
                let start = self.eval_integral(start, "Range bound")?;
                let end = self.eval_integral(end, "Range bound")?;
                (start..=end).map(|i| Value::Number(i as f64)).collect()
            }
            expression => match self.eval_expression(expression)? {
                Value::Array(elements) => elements.borrow().clone(),
                other => {
                    return Err(RuntimeError::Type(format!(
                        "Can only iterate over arrays and ranges, got {}",
                        other.type_name()
                    )));
                }
            },
        };

        // The iterator name shadows an existing binding for the duration of
        // the loop and is restored (or removed) afterwards, even when the
        // body fails or returns.
        let previous = self.variables.get(iterator).cloned();

        let mut outcome = Ok(Flow::Normal(Value::Unit));
        for item in items {
            self.variables.insert(iterator.to_string(), item);
            match self.run_statements(body) {
                Ok(Flow::Normal(value)) => outcome = Ok(Flow::Normal(value)),
                stop => {
                    outcome = stop;
                    break;
                }
            }
        }

        match previous {
            Some(value) => {
                self.variables.insert(iterator.to_string(), value);
            }
            None => {
                self.variables.remove(iterator);
            }
        }

        outcome
    }

    fn eval_expression(&mut self, expression: &Expression) -> RuntimeResult<Value> {
        match expression {
            Expression::Number(value) => Ok(Value::Number(*value)),
            Expression::Str(value) => Ok(Value::Str(value.clone())),
            Expression::Boolean(value) => Ok(Value::Bool(*value)),
            Expression::Variable { name } => self.lookup_variable(name),
            Expression::Array { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expression(element)?);
                }
                Ok(Value::array(values))
            }
            Expression::ArrayAccess { array, index } => self.eval_array_access(array, index),
            Expression::ArraySlice { array, start, end } => {
                self.eval_array_slice(array, start.as_deref(), end.as_deref())
            }
            Expression::Range { .. } => Err(RuntimeError::Type(
                "Ranges can only be used as the iterable of a for loop".to_string(),
            )),
            Expression::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expression::Unary { op, operand } => {
                let operand = self.eval_expression(operand)?;
                match (op, operand) {
                    (UnaryOp::Plus, Value::Number(value)) => Ok(Value::Number(value)),
                    (UnaryOp::Minus, Value::Number(value)) => Ok(Value::Number(-value)),
                    (op, operand) => Err(RuntimeError::Type(format!(
                        "Unary '{op}' expects a number, got {}",
                        operand.type_name()
                    ))),
                }
            }
            Expression::FunctionCall { name, arguments } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval_expression(argument)?);
                }

                if builtins::is_builtin(name) {
                    return builtins::call(self, name, args);
                }

                self.call_function(name, args)
            }
            Expression::Lambda { params, body } => {
                self.lambda_counter += 1;
                let name = format!("{LAMBDA_PREFIX}{}", self.lambda_counter);
                debug!("registering lambda '{name}'");
                self.functions.insert(
                    name.clone(),
                    FunctionDef {
                        params: params.clone(),
                        body: body.clone(),
                    },
                );
                Ok(Value::Str(name))
            }
            Expression::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.eval_expression(then_expr)
                } else if let Some(else_expr) = else_expr {
                    self.eval_expression(else_expr)
                } else {
                    Ok(Value::Unit)
                }
            }
        }
    }

    /// Call a user defined function (or registered lambda) by name. This is
    /// the only place that unwraps a return carrier.
    pub(crate) fn call_function(&mut self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        let Some(function) = self.functions.get(name).cloned() else {
            return Err(RuntimeError::Name(format!(
                "Function '{name}' is not defined"
            )));
        };

        if args.len() != function.params.len() {
            return Err(RuntimeError::Type(format!(
                "Function '{name}' expects {} arguments, got {}",
                function.params.len(),
                args.len()
            )));
        }

        trace!("calling function '{name}'");

        let snapshot = self.variables.clone();
        for (param, value) in function.params.iter().zip(args) {
            self.variables.insert(param.name.clone(), value);
        }

        let outcome = self.run_statements(&function.body);
        self.variables = snapshot;

        match outcome? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Unit),
        }
    }

    /// Bind a variable, migrating a freshly evaluated lambda: assigning the
    /// synthetic `_lambda_<n>` name moves the function table entry to the
    /// variable's name.
    fn bind_variable(&mut self, name: &str, value: Value) -> Value {
        let value = match value {
            Value::Str(lambda_name)
                if lambda_name.starts_with(LAMBDA_PREFIX)
                    && self.functions.contains_key(&lambda_name) =>
            {
                if let Some(def) = self.functions.remove(&lambda_name) {
                    self.functions.insert(name.to_string(), def);
                }
                Value::Function(name.to_string())
            }
            other => other,
        };

        self.variables.insert(name.to_string(), value.clone());
        value
    }

    fn lookup_variable(&self, name: &str) -> RuntimeResult<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::Name(format!("Variable '{name}' is not defined")))
    }

    fn eval_integral(&mut self, expression: &Expression, what: &str) -> RuntimeResult<i64> {
        match self.eval_expression(expression)? {
            Value::Number(value) if value.fract() == 0.0 => Ok(value as i64),
            _ => Err(RuntimeError::Type(format!("{what} must be an integer"))),
        }
    }

    fn eval_array_access(&mut self, array: &str, index: &Expression) -> RuntimeResult<Value> {
        let value = self.lookup_variable(array)?;
        let Value::Array(elements) = value else {
            return Err(RuntimeError::Type(format!(
                "Variable '{array}' is not an array"
            )));
        };

        let index = self.eval_integral(index, "Array index")?;
        let elements = elements.borrow();
        let normalized = if index < 0 {
            index + elements.len() as i64
        } else {
            index
        };

        if normalized < 0 || normalized >= elements.len() as i64 {
            return Err(RuntimeError::Index(format!(
                "Array index {index} out of bounds"
            )));
        }

        Ok(elements[normalized as usize].clone())
    }

    fn eval_array_slice(
        &mut self,
        array: &str,
        start: Option<&Expression>,
        end: Option<&Expression>,
    ) -> RuntimeResult<Value> {
        let value = self.lookup_variable(array)?;
        let Value::Array(elements) = value else {
            return Err(RuntimeError::Type(format!(
                "Variable '{array}' is not an array"
            )));
        };

        let start = start
            .map(|bound| self.eval_integral(bound, "Slice bound"))
            .transpose()?;
        let end = end
            .map(|bound| self.eval_integral(bound, "Slice bound"))
            .transpose()?;

        let elements = elements.borrow();
        let (start, end) = resolve_slice_bounds(elements.len(), start, end);

        Ok(Value::array(elements[start..end].to_vec()))
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
    ) -> RuntimeResult<Value> {
        let lhs = self.eval_expression(lhs)?;

        // && and || short-circuit and yield the decisive operand untouched.
        match op {
            BinaryOp::And => {
                return if lhs.is_truthy() {
                    self.eval_expression(rhs)
                } else {
                    Ok(lhs)
                };
            }
            BinaryOp::Or => {
                return if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.eval_expression(rhs)
                };
            }
            _ => {}
        }

        let rhs = self.eval_expression(rhs)?;
        apply_binary(op, lhs, rhs)
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> RuntimeResult<Value> {
    match op {
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs + rhs)),
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Ok(Value::Str(format!("{}{}", lhs.as_str(), rhs.as_str())))
            }
            _ => Err(type_mismatch(op, &lhs, &rhs)),
        },
        BinaryOp::Sub | BinaryOp::Mul => match (&lhs, &rhs) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(match op {
                BinaryOp::Sub => lhs - rhs,
                _ => lhs * rhs,
            })),
            _ => Err(type_mismatch(op, &lhs, &rhs)),
        },
        BinaryOp::Div => match (&lhs, &rhs) {
            (Value::Number(_), Value::Number(rhs)) if *rhs == 0.0 => Err(
                RuntimeError::ZeroDivision("Division by zero".to_string()),
            ),
            (Value::Number(lhs), Value::Number(rhs)) => Ok(Value::Number(lhs / rhs)),
            _ => Err(type_mismatch(op, &lhs, &rhs)),
        },
        BinaryOp::Mod => match (&lhs, &rhs) {
            (Value::Number(_), Value::Number(rhs)) if *rhs == 0.0 => {
                Err(RuntimeError::ZeroDivision("Modulo by zero".to_string()))
            }
            (Value::Number(lhs), Value::Number(rhs)) => {
                // The result takes the sign of the divisor.
                let remainder = lhs % rhs;
                let result = if remainder != 0.0 && (remainder < 0.0) != (*rhs < 0.0) {
                    remainder + rhs
                } else {
                    remainder
                };
                Ok(Value::Number(result))
            }
            _ => Err(type_mismatch(op, &lhs, &rhs)),
        },
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
            let ordering = match (&lhs, &rhs) {
                (Value::Number(lhs), Value::Number(rhs)) => lhs.partial_cmp(rhs),
                (Value::Str(lhs), Value::Str(rhs)) => Some(lhs.cmp(rhs)),
                _ => {
                    return Err(RuntimeError::Type(format!(
                        "Cannot compare {} and {}",
                        lhs.type_name(),
                        rhs.type_name()
                    )));
                }
            };

            let Some(ordering) = ordering else {
                return Ok(Value::Bool(false));
            };

            Ok(Value::Bool(match op {
                BinaryOp::Less => ordering.is_lt(),
                BinaryOp::Greater => ordering.is_gt(),
                BinaryOp::LessEqual => ordering.is_le(),
                _ => ordering.is_ge(),
            }))
        }
        BinaryOp::Equal => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEqual => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit operators are handled earlier"),
    }
}

fn type_mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::Type(format!(
        "Cannot perform {op} operation on {} and {}",
        lhs.type_name(),
        rhs.type_name()
    ))
}

/// Normalize optional slice bounds: negative values wrap from the end, the
/// result is clamped into `0..=len`, and an inverted range collapses to
/// empty.
fn resolve_slice_bounds(len: usize, start: Option<i64>, end: Option<i64>) -> (usize, usize) {
    let clamp = |bound: i64| -> usize {
        let bound = if bound < 0 { bound + len as i64 } else { bound };
        bound.clamp(0, len as i64) as usize
    };

    let start = clamp(start.unwrap_or(0));
    let end = clamp(end.unwrap_or(len as i64));

    (start, end.max(start))
}
