use std::{
    error::Error,
    io,
    path::Path,
    process::{Command, Output},
    str,
};

const ELTON_PATH: &str = "./target/debug/elton";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_interpreter(src_path: &Path) -> Result<Output, io::Error> {
    Command::new(ELTON_PATH).arg(src_path).output()
}

/// Run the interpreter on a source file and assert exact stdout/stderr plus a
/// zero exit status.
pub fn check_run(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "elton exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Run the interpreter on a source file that is expected to fail and return
/// its output so the caller can inspect the error report.
pub fn check_failing_run(src_path: &Path) -> Result<Output, Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    assert!(
        !output.status.success(),
        "elton should exit with a nonzero status"
    );

    Ok(output)
}
