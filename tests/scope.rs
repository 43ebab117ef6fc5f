use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_call_scope_discipline() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/scope.elt"),
        Expected {
            stdout: "1\n",
            stderr: "",
        },
    )
}

#[test]
fn interpret_conditionals() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/conditionals.elt"),
        Expected {
            stdout: "yes\nstatement form too\n",
            stderr: "",
        },
    )
}
