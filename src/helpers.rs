// Helper utilities for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("'{cmd}' failed with exit status {code}")]
    CommandFailed { cmd: String, code: i32 },
    #[error("Not running as root")]
    NotRoot,
    #[error("Invalid size '{0}' (expected <number><G|M|K>, e.g. 2G or 512M)")]
    InvalidSize(String),
}

impl HelperError {
    /// Precondition failures abort only the current operation.
    /// NotRoot is checked once at startup and terminates the process.
    pub fn is_precondition(&self) -> bool {
        matches!(self, HelperError::InvalidSize(_))
    }

    pub fn exit_status(&self) -> i32 {
        match self {
            HelperError::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;

/// Check if running as root
pub fn am_i_root() -> Result<()> {
    if nix::unistd::geteuid().is_root() {
        Ok(())
    } else {
        Err(HelperError::NotRoot)
    }
}

/// Read entire file to string
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write string to file
/// For sysfs/procfs (virtual filesystems), writes without fsync.
/// For real filesystem paths, calls sync_all to ensure persistence.
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    let path_str = path.to_string_lossy();
    if !path_str.starts_with("/sys/") && !path_str.starts_with("/proc/") {
        file.sync_all()?;
    }
    Ok(())
}

/// Create directories recursively
pub fn makedirs<P: AsRef<Path>>(path: P) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Run a command; nonzero exit becomes CommandFailed carrying the
/// child's own exit status.
pub fn run_cmd(cmd: &[&str]) -> Result<()> {
    let status = Command::new(cmd[0])
        .args(&cmd[1..])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(HelperError::CommandFailed {
            cmd: cmd.join(" "),
            code: status.code().unwrap_or(1),
        })
    }
}

/// Run a command, ignoring failure. Used by the best-effort disable paths
/// where absence of the thing being torn down is not an error.
pub fn run_cmd_tolerant(cmd: &[&str]) -> bool {
    Command::new(cmd[0])
        .args(&cmd[1..])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a command and capture stdout
pub fn run_cmd_output(cmd: &[&str]) -> Result<String> {
    let output = Command::new(cmd[0])
        .args(&cmd[1..])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(HelperError::CommandFailed {
            cmd: cmd.join(" "),
            code: output.status.code().unwrap_or(1),
        })
    }
}

/// Check a size string: digits followed by a single G/M/K suffix,
/// case-insensitive. "512M", "2G", "100k" pass; "10", "abc", "" fail.
pub fn validate_size(size: &str) -> bool {
    let s = size.trim();
    // Last *character*, not byte: a multibyte suffix must be rejected,
    // not split mid-character.
    let suffix = match s.chars().last() {
        Some(c) => c,
        None => return false,
    };
    let num = &s[..s.len() - suffix.len_utf8()];
    matches!(suffix.to_ascii_uppercase(), 'G' | 'M' | 'K')
        && !num.is_empty()
        && num.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a validated size string into bytes
pub fn parse_size(size: &str) -> Result<u64> {
    let s = size.trim();
    if !validate_size(s) {
        return Err(HelperError::InvalidSize(size.to_string()));
    }
    let (num, suffix) = s.split_at(s.len() - 1);
    let multiplier = match suffix.chars().next().unwrap().to_ascii_uppercase() {
        'K' => 1024u64,
        'M' => 1024 * 1024,
        'G' => 1024 * 1024 * 1024,
        _ => unreachable!(),
    };
    // checked_mul: a huge count must fail validation, not wrap
    num.parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| HelperError::InvalidSize(size.to_string()))
}

/// Print a prompt and read one line from stdin (trimmed).
/// EOF is an error so a closed stdin ends the menu loop instead of
/// spinning on empty reads.
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(HelperError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "end of input",
        )));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size_accepts_suffixed_numbers() {
        assert!(validate_size("512M"));
        assert!(validate_size("2G"));
        assert!(validate_size("100k"));
        assert!(validate_size("1g"));
        assert!(validate_size(" 4G "));
    }

    #[test]
    fn test_validate_size_rejects_malformed() {
        assert!(!validate_size("abc"));
        assert!(!validate_size("10"));
        assert!(!validate_size(""));
        assert!(!validate_size("G"));
        assert!(!validate_size("1.5G"));
        assert!(!validate_size("2T"));
        // Multibyte suffixes must be rejected, not panic on a byte split
        assert!(!validate_size("1é"));
        assert!(!validate_size("é"));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100k").unwrap(), 100 * 1024);
        assert_eq!(parse_size("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert!(parse_size("10").is_err());
    }

    #[test]
    fn test_parse_size_rejects_overflowing_count() {
        // 2^54 G would be 2^84 bytes; must error, not wrap
        let err = parse_size("18014398509481984G").unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_command_failure_carries_exit_status() {
        let err = run_cmd(&["false"]).unwrap_err();
        assert_eq!(err.exit_status(), 1);
        assert!(!err.is_precondition());
    }
}
