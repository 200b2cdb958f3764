//! Sondear CLI: argument parsing, console output, and error types for the
//! `sondear` binary.

#![warn(missing_docs)]

mod cli;
mod error;
mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use output::Reporter;

use std::path::Path;

/// Validate the target file and turn it into a `file://` URL.
pub fn target_url(target: &Path) -> CliResult<String> {
    if !target.exists() {
        return Err(CliError::target(format!(
            "{} does not exist",
            target.display()
        )));
    }
    if !target.is_file() {
        return Err(CliError::target(format!(
            "{} is not a file",
            target.display()
        )));
    }
    let absolute = target.canonicalize()?;
    Ok(format!("file://{}", absolute.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_target_url_for_existing_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".html").unwrap();
        writeln!(file, "<html></html>").unwrap();
        let url = target_url(file.path()).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with(".html"));
    }

    #[test]
    fn test_target_url_rejects_missing_file() {
        let err = target_url(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, CliError::Target { .. }));
    }

    #[test]
    fn test_target_url_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = target_url(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }
}
