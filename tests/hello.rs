use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_hello() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/hello.elt"),
        Expected {
            stdout: "hello, world!\n",
            stderr: "",
        },
    )
}
