use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_try_catch() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/try_catch.elt"),
        Expected {
            stdout: "caught: boom\n",
            stderr: "",
        },
    )
}
