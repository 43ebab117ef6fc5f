use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_string_builtins() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/strings.elt"),
        Expected {
            stdout: "Hello, Elton\nABC xyz\ninter\n[\"a\", \"b\", \"c\"]\nx-y-z\n",
            stderr: "",
        },
    )
}

#[test]
fn interpret_string_interpolation() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/interpolation.elt"),
        Expected {
            stdout: "x is 4 and double is 8!\nElton says hi\n",
            stderr: "",
        },
    )
}
