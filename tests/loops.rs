use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_inclusive_range_sum() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/range_sum.elt"),
        Expected {
            stdout: "10\n",
            stderr: "",
        },
    )
}

#[test]
fn interpret_while_countdown() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/while.elt"),
        Expected {
            stdout: "3\n2\n1\nliftoff\n",
            stderr: "",
        },
    )
}
