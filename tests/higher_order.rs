use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_map() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/map_double.elt"),
        Expected {
            stdout: "[2, 4, 6]\n",
            stderr: "",
        },
    )
}

#[test]
fn interpret_lambdas() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/lambdas.elt"),
        Expected {
            stdout: "42\n[2, 4, 6]\n[2, 3]\n",
            stderr: "",
        },
    )
}

#[test]
fn interpret_reduce_and_numeric_builtins() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/reduce.elt"),
        Expected {
            stdout: "10\n9 2\n2.35 7\n",
            stderr: "",
        },
    )
}
