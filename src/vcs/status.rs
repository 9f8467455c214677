//! Reading and parsing the pending-change list.

use tracing::debug;

use crate::error::VcsError;

use super::executor::VcsExecutor;

/// One actionable line of status output: a status code and a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Status classification as printed by the tool (`M`, `A`, `?`, `??`, ...).
    pub status_code: String,
    /// Path relative to the repository root.
    pub file_path: String,
}

impl ChangeRecord {
    /// Parse a status line.
    ///
    /// A line is actionable only if it splits on whitespace into exactly two
    /// tokens. Headers, blank lines and paths containing whitespace yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let status_code = tokens.next()?;
        let file_path = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self {
            status_code: status_code.to_string(),
            file_path: file_path.to_string(),
        })
    }
}

/// Extract the actionable records from status lines, preserving order.
pub fn parse_status<S: AsRef<str>>(lines: &[S]) -> Vec<ChangeRecord> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let record = ChangeRecord::parse(line);
            if record.is_none() && !line.trim().is_empty() {
                debug!("Ignoring status line '{}'", line);
            }
            record
        })
        .collect()
}

/// Run the status command and return its output split into lines.
///
/// In dry-run mode the raw output is echoed before it is returned.
pub fn read_status<E: VcsExecutor + ?Sized>(
    executor: &E,
    dry_run: bool,
) -> Result<Vec<String>, VcsError> {
    let stdout = executor.status()?.into_result()?;
    if dry_run {
        println!("{}", stdout);
    }
    Ok(stdout.lines().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::executor::{CommandOutput, MockVcsExecutor};

    #[test]
    fn test_parse_two_token_line() {
        let record = ChangeRecord::parse("M src/main.rs").unwrap();
        assert_eq!(record.status_code, "M");
        assert_eq!(record.file_path, "src/main.rs");
    }

    #[test]
    fn test_parse_git_porcelain_lines() {
        let record = ChangeRecord::parse(" M src/lib.rs").unwrap();
        assert_eq!(record.status_code, "M");

        let record = ChangeRecord::parse("?? assets/big.bin").unwrap();
        assert_eq!(record.status_code, "??");
        assert_eq!(record.file_path, "assets/big.bin");
    }

    #[test]
    fn test_parse_ignores_other_shapes() {
        assert_eq!(ChangeRecord::parse(""), None);
        assert_eq!(ChangeRecord::parse("   "), None);
        assert_eq!(ChangeRecord::parse("M"), None);
        assert_eq!(ChangeRecord::parse("? path with spaces.txt"), None);
        assert_eq!(ChangeRecord::parse("R  old.txt -> new.txt"), None);
    }

    #[test]
    fn test_parse_status_keeps_order() {
        let lines = ["? b.txt", "", "M a.txt", "header line here", "A c.txt"];
        let records = parse_status(&lines);
        let paths: Vec<&str> = records.iter().map(|r| r.file_path.as_str()).collect();
        assert_eq!(paths, vec!["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_read_status_splits_lines() {
        let mut mock = MockVcsExecutor::new();
        mock.expect_status()
            .times(1)
            .returning(|| Ok(CommandOutput::ok("hg status", "M a.txt\n? b.txt\n")));

        let lines = read_status(&mock, false).unwrap();
        assert_eq!(lines, vec!["M a.txt", "? b.txt"]);
    }

    #[test]
    fn test_read_status_fails_on_non_zero_exit() {
        let mut mock = MockVcsExecutor::new();
        mock.expect_status()
            .times(1)
            .returning(|| Ok(CommandOutput::failed("hg status", 255, "abort: no repository found")));

        let err = read_status(&mock, true).unwrap_err();
        match err {
            VcsError::CommandFailed { output, .. } => {
                assert!(output.contains("no repository found"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
