// Disk-backed swap (file or partition) management for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::path::Path;

use thiserror::Error;

use crate::defaults::FSTAB;
use crate::helpers::{read_file, run_cmd, run_cmd_tolerant, validate_size, write_file, HelperError};
use crate::info;

#[derive(Error, Debug)]
pub enum DiskSwapError {
    #[error("{0}")]
    Helper(#[from] HelperError),
    #[error("Invalid swap kind '{0}' (expected 'partition' or 'file')")]
    InvalidKind(String),
    #[error("{0} is not a block device")]
    NotBlockDevice(String),
    #[error("Parent directory of {0} does not exist")]
    NoParentDir(String),
}

impl DiskSwapError {
    pub fn is_precondition(&self) -> bool {
        match self {
            DiskSwapError::Helper(e) => e.is_precondition(),
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiskSwapError>;

/// What backs the swap target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    Partition,
    File,
}

impl SwapKind {
    /// Parse a prompt answer. Anything unrecognized fails before
    /// any mutation.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "partition" | "p" => Ok(SwapKind::Partition),
            "file" | "f" => Ok(SwapKind::File),
            other => Err(DiskSwapError::InvalidKind(other.to_string())),
        }
    }
}

/// Create and activate a swap target, then record it in fstab
pub fn add(kind: SwapKind, location: &str, size: Option<&str>) -> Result<()> {
    match kind {
        SwapKind::Partition => {
            let is_block = fs::metadata(location)
                .map(|m| m.file_type().is_block_device())
                .unwrap_or(false);
            if !is_block {
                return Err(DiskSwapError::NotBlockDevice(location.to_string()));
            }
        }
        SwapKind::File => {
            let parent_ok = Path::new(location)
                .parent()
                .map(Path::is_dir)
                .unwrap_or(false);
            if !parent_ok {
                return Err(DiskSwapError::NoParentDir(location.to_string()));
            }
            let size = size.unwrap_or("");
            if !validate_size(size) {
                return Err(HelperError::InvalidSize(size.to_string()).into());
            }
            run_cmd(&["fallocate", "-l", size, location])?;
            fs::set_permissions(location, fs::Permissions::from_mode(0o600))
                .map_err(HelperError::from)?;
        }
    }

    run_cmd(&["mkswap", location])?;
    run_cmd(&["swapon", location])?;

    let fstab = read_file(FSTAB)?;
    write_file(FSTAB, &add_fstab_entry(&fstab, location))?;
    info!("Disk swap: {} active and recorded in {}", location, FSTAB);
    Ok(())
}

/// Deactivate a swap target, drop its fstab line, and delete the file
/// if it was file-backed. Deactivation is best-effort so removing an
/// already-inactive target still cleans up.
pub fn remove(location: &str) -> Result<()> {
    run_cmd_tolerant(&["swapoff", location]);

    let fstab = read_file(FSTAB)?;
    write_file(FSTAB, &remove_fstab_entry(&fstab, location))?;

    if Path::new(location).is_file() {
        fs::remove_file(location).map_err(HelperError::from)?;
    }
    info!("Disk swap: {} removed", location);
    Ok(())
}

fn fstab_line(location: &str) -> String {
    format!("{} none swap sw 0 0", location)
}

/// Append a swap line for the location, replacing any existing line with
/// the same first field. Re-adding never duplicates.
pub fn add_fstab_entry(content: &str, location: &str) -> String {
    let mut out = remove_fstab_entry(content, location);
    out.push_str(&fstab_line(location));
    out.push('\n');
    out
}

/// Drop lines whose first field is exactly the location. Matching on the
/// whole field, not a substring, so targets sharing a path prefix are
/// left alone.
pub fn remove_fstab_entry(content: &str, location: &str) -> String {
    let mut out = String::new();
    for line in content.lines() {
        let first = line.split_whitespace().next().unwrap_or("");
        if first == location {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "UUID=abcd / ext4 errors=remount-ro 0 1\n";

    #[test]
    fn test_add_then_remove_leaves_no_line() {
        let added = add_fstab_entry(BASE, "/swapfile");
        assert!(added.contains("/swapfile none swap sw 0 0"));
        let removed = remove_fstab_entry(&added, "/swapfile");
        assert_eq!(removed, BASE);
    }

    #[test]
    fn test_readd_does_not_duplicate() {
        let once = add_fstab_entry(BASE, "/swapfile");
        let twice = add_fstab_entry(&once, "/swapfile");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_matches_exact_first_field() {
        let content = add_fstab_entry(&add_fstab_entry(BASE, "/swapfile"), "/swapfile2");
        let removed = remove_fstab_entry(&content, "/swapfile");
        assert!(!removed.contains("/swapfile none"));
        assert!(removed.contains("/swapfile2 none swap sw 0 0"));
    }

    #[test]
    fn test_invalid_kind_fails_before_mutation() {
        let err = SwapKind::parse_str("tape").unwrap_err();
        assert!(err.is_precondition());
        assert!(SwapKind::parse_str("Partition").is_ok());
        assert!(SwapKind::parse_str("f").is_ok());
    }

    #[test]
    fn test_file_add_validates_inputs_first() {
        // Nonexistent parent directory
        let err = add(SwapKind::File, "/nonexistent-dir/swapfile", Some("1G")).unwrap_err();
        assert!(err.is_precondition());
        // Bad size string
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swapfile");
        let err = add(SwapKind::File, path.to_str().unwrap(), Some("abc")).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_partition_add_requires_block_device() {
        let err = add(SwapKind::Partition, "/etc/hostname", None).unwrap_err();
        assert!(err.is_precondition());
    }
}
