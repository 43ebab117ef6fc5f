//! The fixed builtin library: output, numeric, array, string, and
//! higher-order helpers. The builtin table is consulted before the user
//! function table, so these names cannot be shadowed by declarations.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use once_cell::sync::Lazy;

use super::{Interpreter, RuntimeError, RuntimeResult, Value};

static BUILTINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "print",
        "abs",
        "max",
        "min",
        "round",
        "length",
        "push",
        "pop",
        "slice",
        "reverse",
        "sort",
        "unique",
        "substring",
        "uppercase",
        "lowercase",
        "trim",
        "split",
        "join",
        "map",
        "filter",
        "reduce",
        "listcomp",
    ])
});

pub(super) fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(name)
}

/// Dispatch a builtin call. Arguments are already evaluated, left to right.
pub(super) fn call(
    interpreter: &mut Interpreter,
    name: &str,
    args: Vec<Value>,
) -> RuntimeResult<Value> {
    match name {
        "print" => {
            let parts = args.iter().map(Value::as_str).collect::<Vec<_>>();
            println!("{}", parts.join(" "));
            Ok(Value::Unit)
        }
        "abs" => abs(args),
        "max" => extremum("max", args, f64::max),
        "min" => extremum("min", args, f64::min),
        "round" => round(args),
        "length" => length(args),
        "push" => push(args),
        "pop" => pop(args),
        "slice" => slice(args),
        "reverse" => reverse(args),
        "sort" => sort(args),
        "unique" => unique(args),
        "substring" => substring(args),
        "uppercase" => single_string("uppercase", args, |s| s.to_uppercase()),
        "lowercase" => single_string("lowercase", args, |s| s.to_lowercase()),
        "trim" => single_string("trim", args, |s| s.trim().to_string()),
        "split" => split(args),
        "join" => join(args),
        "map" => map(interpreter, "map", args),
        "listcomp" => map(interpreter, "listcomp", args),
        "filter" => filter(interpreter, args),
        "reduce" => reduce(interpreter, args),
        _ => Err(RuntimeError::Name(format!(
            "Function '{name}' is not defined"
        ))),
    }
}

fn number_arg(value: &Value, message: &str) -> RuntimeResult<f64> {
    match value {
        Value::Number(number) => Ok(*number),
        _ => Err(RuntimeError::Type(message.to_string())),
    }
}

fn integral_arg(value: &Value, message: &str) -> RuntimeResult<i64> {
    match value {
        Value::Number(number) if number.fract() == 0.0 => Ok(*number as i64),
        _ => Err(RuntimeError::Type(message.to_string())),
    }
}

fn array_arg(value: &Value, message: &str) -> RuntimeResult<Rc<RefCell<Vec<Value>>>> {
    match value {
        Value::Array(elements) => Ok(Rc::clone(elements)),
        _ => Err(RuntimeError::Type(message.to_string())),
    }
}

fn abs(args: Vec<Value>) -> RuntimeResult<Value> {
    let [value] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "abs() expects 1 argument: number".to_string(),
        ));
    };

    let number = number_arg(value, "Argument to abs() must be a number")?;
    Ok(Value::Number(number.abs()))
}

/// `max`/`min` accept either multiple numeric arguments or a single array.
fn extremum(name: &str, args: Vec<Value>, pick: fn(f64, f64) -> f64) -> RuntimeResult<Value> {
    if args.is_empty() {
        return Err(RuntimeError::Type(format!(
            "{name}() expects at least 1 argument"
        )));
    }

    let values: Vec<Value> = match args.as_slice() {
        [Value::Array(elements)] => elements.borrow().clone(),
        other => other.to_vec(),
    };

    let mut result: Option<f64> = None;
    for value in &values {
        let number = number_arg(value, &format!("All arguments to {name}() must be numbers"))?;
        result = Some(match result {
            Some(current) => pick(current, number),
            None => number,
        });
    }

    result.map(Value::Number).ok_or_else(|| {
        RuntimeError::Type(format!("{name}() of an empty array is not defined"))
    })
}

fn round(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::Type(
            "round() expects 1 or 2 arguments: number, [decimals]".to_string(),
        ));
    }

    let number = number_arg(&args[0], "First argument to round() must be a number")?;

    if let Some(decimals) = args.get(1) {
        let decimals = integral_arg(decimals, "Second argument to round() must be an integer")?;
        let factor = 10f64.powi(decimals as i32);
        return Ok(Value::Number((number * factor).round() / factor));
    }

    Ok(Value::Number(number.round()))
}

fn length(args: Vec<Value>) -> RuntimeResult<Value> {
    let [value] = args.as_slice() else {
        return Err(RuntimeError::Type("length() expects 1 argument".to_string()));
    };

    match value {
        Value::Array(elements) => Ok(Value::Number(elements.borrow().len() as f64)),
        Value::Str(string) => Ok(Value::Number(string.chars().count() as f64)),
        _ => Err(RuntimeError::Type(
            "length() argument must be array or string".to_string(),
        )),
    }
}

fn push(args: Vec<Value>) -> RuntimeResult<Value> {
    let [array, value] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "push() expects 2 arguments: array and value".to_string(),
        ));
    };

    let array = array_arg(array, "First argument to push() must be an array")?;
    array.borrow_mut().push(value.clone());

    let len = array.borrow().len();
    Ok(Value::Number(len as f64))
}

fn pop(args: Vec<Value>) -> RuntimeResult<Value> {
    let [array] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "pop() expects 1 argument: array".to_string(),
        ));
    };

    let array = array_arg(array, "Argument to pop() must be an array")?;
    let popped = array.borrow_mut().pop();

    popped.ok_or_else(|| RuntimeError::Index("Cannot pop from empty array".to_string()))
}

fn slice(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.len() < 2 || args.len() > 3 {
        return Err(RuntimeError::Type(
            "slice() expects 2 or 3 arguments: array, start, [end]".to_string(),
        ));
    }

    let array = array_arg(&args[0], "First argument to slice() must be an array")?;
    let start = integral_arg(&args[1], "Second argument to slice() must be an integer")?;
    let end = args
        .get(2)
        .map(|value| integral_arg(value, "Third argument to slice() must be an integer"))
        .transpose()?;

    let elements = array.borrow();
    let (start, end) = super::resolve_slice_bounds(elements.len(), Some(start), end);

    Ok(Value::array(elements[start..end].to_vec()))
}

fn reverse(args: Vec<Value>) -> RuntimeResult<Value> {
    let [array] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "reverse() expects 1 argument: array".to_string(),
        ));
    };

    let array = array_arg(array, "Argument to reverse() must be an array")?;
    let mut elements = array.borrow().clone();
    elements.reverse();

    Ok(Value::array(elements))
}

fn sort(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::Type(
            "sort() expects 1 or 2 arguments: array, [reverse]".to_string(),
        ));
    }

    let array = array_arg(&args[0], "First argument to sort() must be an array")?;
    let descending = args.get(1).map(Value::is_truthy).unwrap_or(false);

    let mut elements = array.borrow().clone();

    // Numeric arrays sort numerically; anything else falls back to ordering
    // by display string.
    if elements
        .iter()
        .all(|value| matches!(value, Value::Number(_)))
    {
        elements.sort_by(|lhs, rhs| {
            let (Value::Number(lhs), Value::Number(rhs)) = (lhs, rhs) else {
                unreachable!("all elements checked to be numbers");
            };
            lhs.partial_cmp(rhs).unwrap_or(std::cmp::Ordering::Equal)
        });
    } else {
        elements.sort_by_key(|value| value.as_str());
    }

    if descending {
        elements.reverse();
    }

    Ok(Value::array(elements))
}

/// Order-preserving dedupe by display string.
fn unique(args: Vec<Value>) -> RuntimeResult<Value> {
    let [array] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "unique() expects 1 argument: array".to_string(),
        ));
    };

    let array = array_arg(array, "Argument to unique() must be an array")?;

    let mut seen = HashSet::new();
    let mut result = vec![];
    for value in array.borrow().iter() {
        if seen.insert(value.as_str()) {
            result.push(value.clone());
        }
    }

    Ok(Value::array(result))
}

fn substring(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.len() < 2 || args.len() > 3 {
        return Err(RuntimeError::Type(
            "substring() expects 2 or 3 arguments: string, start, [end]".to_string(),
        ));
    }

    let string = args[0].as_str();
    let start = integral_arg(&args[1], "Second argument to substring() must be an integer")?;
    let end = args
        .get(2)
        .map(|value| integral_arg(value, "Third argument to substring() must be an integer"))
        .transpose()?;

    let chars = string.chars().collect::<Vec<_>>();
    let (start, end) = super::resolve_slice_bounds(chars.len(), Some(start), end);

    Ok(Value::Str(chars[start..end].iter().collect()))
}

fn single_string(
    name: &str,
    args: Vec<Value>,
    transform: fn(&str) -> String,
) -> RuntimeResult<Value> {
    let [value] = args.as_slice() else {
        return Err(RuntimeError::Type(format!(
            "{name}() expects 1 argument: string"
        )));
    };

    Ok(Value::Str(transform(&value.as_str())))
}

fn split(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::Type(
            "split() expects 1 or 2 arguments: string, [delimiter]".to_string(),
        ));
    }

    let string = args[0].as_str();

    let parts = match args.get(1) {
        Some(delimiter) => string
            .split(&delimiter.as_str())
            .map(|part| Value::Str(part.to_string()))
            .collect(),
        // Without a delimiter, split on runs of whitespace.
        None => string
            .split_whitespace()
            .map(|part| Value::Str(part.to_string()))
            .collect(),
    };

    Ok(Value::array(parts))
}

fn join(args: Vec<Value>) -> RuntimeResult<Value> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::Type(
            "join() expects 1 or 2 arguments: array, [separator]".to_string(),
        ));
    }

    let array = array_arg(&args[0], "First argument to join() must be an array")?;
    let separator = args.get(1).map(Value::as_str).unwrap_or_default();

    let joined = array
        .borrow()
        .iter()
        .map(Value::as_str)
        .collect::<Vec<_>>()
        .join(&separator);

    Ok(Value::Str(joined))
}

/// Resolve the callee of a functional builtin: a function-name string or a
/// function value produced by a lambda assignment.
fn callee_name(builtin: &str, value: &Value) -> RuntimeResult<String> {
    match value {
        Value::Str(name) | Value::Function(name) => Ok(name.clone()),
        _ => Err(RuntimeError::Type(format!(
            "First argument to {builtin}() must be a function name"
        ))),
    }
}

fn map(interpreter: &mut Interpreter, builtin: &str, args: Vec<Value>) -> RuntimeResult<Value> {
    let [callee, array] = args.as_slice() else {
        return Err(RuntimeError::Type(format!(
            "{builtin}() expects 2 arguments: function and array"
        )));
    };

    let callee = callee_name(builtin, callee)?;
    let array = array_arg(
        array,
        &format!("Second argument to {builtin}() must be an array"),
    )?;

    let items = array.borrow().clone();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        result.push(interpreter.call_function(&callee, vec![item])?);
    }

    Ok(Value::array(result))
}

fn filter(interpreter: &mut Interpreter, args: Vec<Value>) -> RuntimeResult<Value> {
    let [callee, array] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "filter() expects 2 arguments: function and array".to_string(),
        ));
    };

    let callee = callee_name("filter", callee)?;
    let array = array_arg(array, "Second argument to filter() must be an array")?;

    let items = array.borrow().clone();
    let mut result = vec![];
    for item in items {
        if interpreter
            .call_function(&callee, vec![item.clone()])?
            .is_truthy()
        {
            result.push(item);
        }
    }

    Ok(Value::array(result))
}

fn reduce(interpreter: &mut Interpreter, args: Vec<Value>) -> RuntimeResult<Value> {
    let [callee, array, initial] = args.as_slice() else {
        return Err(RuntimeError::Type(
            "reduce() expects 3 arguments: function, array, and initial value".to_string(),
        ));
    };

    let callee = callee_name("reduce", callee)?;
    let array = array_arg(array, "Second argument to reduce() must be an array")?;

    let items = array.borrow().clone();
    let mut accumulator = initial.clone();
    for item in items {
        accumulator = interpreter.call_function(&callee, vec![accumulator, item])?;
    }

    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::super::{Interpreter, RuntimeError, RuntimeResult, Value};
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval(input: &str) -> Value {
        try_eval(input).expect("evaluation failed")
    }

    fn try_eval(input: &str) -> RuntimeResult<Value> {
        let tokens = Lexer::new(input).lex().expect("lexing failed");
        let ast = Parser::new(tokens).parse().expect("parsing failed");
        Interpreter::new().evaluate(&ast)
    }

    fn eval_err(input: &str) -> RuntimeError {
        try_eval(input).expect_err("expected a runtime error")
    }

    fn numbers(values: &[f64]) -> Value {
        Value::array(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn test_abs() {
        assert_eq!(eval("abs(-3)"), Value::Number(3.0));
        assert_eq!(
            eval_err("abs(\"x\")"),
            RuntimeError::Type("Argument to abs() must be a number".into())
        );
        assert_eq!(
            eval_err("abs(1, 2)"),
            RuntimeError::Type("abs() expects 1 argument: number".into())
        );
    }

    #[test]
    fn test_max_and_min() {
        assert_eq!(eval("max(1, 5, 3)"), Value::Number(5.0));
        assert_eq!(eval("min(4, 2, 8)"), Value::Number(2.0));
        assert_eq!(eval("max([1, 9, 4])"), Value::Number(9.0));
        assert_eq!(eval("min([7])"), Value::Number(7.0));
        assert_eq!(
            eval_err("max()"),
            RuntimeError::Type("max() expects at least 1 argument".into())
        );
        assert_eq!(
            eval_err("max(1, \"two\")"),
            RuntimeError::Type("All arguments to max() must be numbers".into())
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(eval("round(2.7)"), Value::Number(3.0));
        assert_eq!(eval("round(2.3456, 2)"), Value::Number(2.35));
        assert_eq!(
            eval_err("round()"),
            RuntimeError::Type("round() expects 1 or 2 arguments: number, [decimals]".into())
        );
    }

    #[test]
    fn test_length() {
        assert_eq!(eval("length([1, 2, 3])"), Value::Number(3.0));
        assert_eq!(eval("length(\"four\")"), Value::Number(4.0));
        assert_eq!(
            eval_err("length(1)"),
            RuntimeError::Type("length() argument must be array or string".into())
        );
    }

    #[test]
    fn test_push_mutates_and_returns_length() {
        assert_eq!(eval("var a = [1] push(a, 2)"), Value::Number(2.0));
        assert_eq!(eval("var a = [1] push(a, 2) a"), numbers(&[1.0, 2.0]));
    }

    #[test]
    fn test_pop() {
        assert_eq!(eval("var a = [1, 2] pop(a)"), Value::Number(2.0));
        assert_eq!(eval("var a = [1, 2] pop(a) a"), numbers(&[1.0]));
        assert_eq!(
            eval_err("var a = [] pop(a)"),
            RuntimeError::Index("Cannot pop from empty array".into())
        );
    }

    #[test]
    fn test_slice() {
        assert_eq!(eval("slice([1, 2, 3, 4], 1)"), numbers(&[2.0, 3.0, 4.0]));
        assert_eq!(eval("slice([1, 2, 3, 4], 1, 3)"), numbers(&[2.0, 3.0]));
        assert_eq!(eval("slice([1, 2, 3], -2)"), numbers(&[2.0, 3.0]));
    }

    #[test]
    fn test_reverse_returns_a_new_array() {
        assert_eq!(eval("reverse([1, 2, 3])"), numbers(&[3.0, 2.0, 1.0]));
        assert_eq!(eval("var a = [1, 2] reverse(a) a"), numbers(&[1.0, 2.0]));
    }

    #[test]
    fn test_sort() {
        assert_eq!(eval("sort([3, 1, 2])"), numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(eval("sort([3, 1, 2], true)"), numbers(&[3.0, 2.0, 1.0]));
        assert_eq!(
            eval("sort([\"pear\", \"apple\"])"),
            Value::array(vec![
                Value::Str("apple".into()),
                Value::Str("pear".into())
            ])
        );
    }

    #[test]
    fn test_unique_preserves_order() {
        assert_eq!(eval("unique([3, 1, 3, 2, 1])"), numbers(&[3.0, 1.0, 2.0]));
    }

    #[test]
    fn test_substring() {
        assert_eq!(eval("substring(\"hello\", 1, 3)"), Value::Str("el".into()));
        assert_eq!(eval("substring(\"hello\", 2)"), Value::Str("llo".into()));
        assert_eq!(eval("substring(\"hello\", -2)"), Value::Str("lo".into()));
    }

    #[test]
    fn test_string_case_and_trim() {
        assert_eq!(eval("uppercase(\"abc\")"), Value::Str("ABC".into()));
        assert_eq!(eval("lowercase(\"AbC\")"), Value::Str("abc".into()));
        assert_eq!(eval("trim(\"  x  \")"), Value::Str("x".into()));
    }

    #[test]
    fn test_split() {
        assert_eq!(
            eval("split(\"a,b,c\", \",\")"),
            Value::array(vec![
                Value::Str("a".into()),
                Value::Str("b".into()),
                Value::Str("c".into())
            ])
        );
        assert_eq!(
            eval("split(\"one  two\")"),
            Value::array(vec![Value::Str("one".into()), Value::Str("two".into())])
        );
    }

    #[test]
    fn test_join() {
        assert_eq!(eval("join([1, 2, 3], \"-\")"), Value::Str("1-2-3".into()));
        assert_eq!(eval("join([\"a\", \"b\"])"), Value::Str("ab".into()));
        assert_eq!(
            eval_err("join(1)"),
            RuntimeError::Type("First argument to join() must be an array".into())
        );
    }

    #[test]
    fn test_map() {
        assert_eq!(
            eval("func dbl(x: int) int { return x * 2 } map(\"dbl\", [1, 2, 3])"),
            numbers(&[2.0, 4.0, 6.0])
        );
    }

    #[test]
    fn test_listcomp_behaves_like_map() {
        assert_eq!(
            eval("func sq(x: int) int { return x * x } listcomp(\"sq\", [1, 2, 3])"),
            numbers(&[1.0, 4.0, 9.0])
        );
    }

    #[test]
    fn test_filter() {
        assert_eq!(
            eval("func odd(x: int) bool { return x % 2 == 1 } filter(\"odd\", [1, 2, 3, 4, 5])"),
            numbers(&[1.0, 3.0, 5.0])
        );
    }

    #[test]
    fn test_reduce() {
        assert_eq!(
            eval("func add(a: int, b: int) int { return a + b } reduce(\"add\", [1, 2, 3, 4], 0)"),
            Value::Number(10.0)
        );
        assert_eq!(
            eval_err("reduce(\"f\", [1])"),
            RuntimeError::Type("reduce() expects 3 arguments: function, array, and initial value".into())
        );
    }

    #[test]
    fn test_map_accepts_lambda_values() {
        assert_eq!(
            eval("map(lambda(x: int) { return x + 1 }, [1, 2])"),
            numbers(&[2.0, 3.0])
        );
        assert_eq!(
            eval("var inc = lambda(x: int) { return x + 1 } map(inc, [1, 2])"),
            numbers(&[2.0, 3.0])
        );
    }

    #[test]
    fn test_functional_builtins_reject_unknown_callees() {
        assert_eq!(
            eval_err("map(\"ghost\", [1])"),
            RuntimeError::Name("Function 'ghost' is not defined".into())
        );
        assert_eq!(
            eval_err("map(1, [1])"),
            RuntimeError::Type("First argument to map() must be a function name".into())
        );
    }
}
