use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

#[test]
fn interpret_fact() -> Result<(), Box<dyn Error>> {
    check_run(
        Path::new("./demos/fact.elt"),
        Expected {
            stdout: "120\n",
            stderr: "",
        },
    )
}
