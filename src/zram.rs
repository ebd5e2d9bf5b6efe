// Compressed RAM swap (zram) management for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use thiserror::Error;

use crate::defaults::{ZRAM_DEVICE, ZRAM_SYSFS};
use crate::helpers::{parse_size, run_cmd, run_cmd_tolerant, write_file, HelperError};
use crate::systemd::{install_zram_service, remove_zram_service, SystemdError};
use crate::info;

#[derive(Error, Debug)]
pub enum ZramError {
    #[error("{0}")]
    Helper(#[from] HelperError),
    #[error("{0}")]
    Systemd(#[from] SystemdError),
}

impl ZramError {
    pub fn is_precondition(&self) -> bool {
        match self {
            ZramError::Helper(e) => e.is_precondition(),
            ZramError::Systemd(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZramError>;

/// Load the module, size the device, format and activate it.
/// Lives until reboot or disable(). A step failing mid-sequence leaves
/// the earlier steps applied; there is no rollback.
pub fn enable_session(size: &str) -> Result<()> {
    let size_bytes = parse_size(size)?;
    activate(size_bytes)?;
    info!("Zram: {} active on {} for this session", size.trim(), ZRAM_DEVICE);
    Ok(())
}

/// enable_session plus a boot service that re-runs the same steps
pub fn enable_persistent(size: &str) -> Result<()> {
    let size_bytes = parse_size(size)?;
    activate(size_bytes)?;
    install_zram_service(size_bytes)?;
    info!("Zram: {} active on {} and persistent across reboots", size.trim(), ZRAM_DEVICE);
    Ok(())
}

fn activate(size_bytes: u64) -> Result<()> {
    run_cmd(&["modprobe", "zram"])?;
    write_file(format!("{}/disksize", ZRAM_SYSFS), &size_bytes.to_string())?;
    run_cmd(&["mkswap", ZRAM_DEVICE])?;
    run_cmd(&["swapon", ZRAM_DEVICE])?;
    Ok(())
}

/// Best-effort teardown: deactivate, unload, unregister the boot service.
/// Every step tolerates absence, so repeated calls never fail.
pub fn disable() {
    run_cmd_tolerant(&["swapoff", ZRAM_DEVICE]);
    run_cmd_tolerant(&["modprobe", "-r", "zram"]);
    remove_zram_service();
    info!("Zram: disabled");
}

/// Whether a zram device currently exists with a nonzero size
pub fn is_active() -> bool {
    disksize().map(|s| s > 0).unwrap_or(false)
}

/// Current device size in bytes, if the device exists
pub fn disksize() -> Option<u64> {
    if !Path::new(ZRAM_SYSFS).is_dir() {
        return None;
    }
    std::fs::read_to_string(format!("{}/disksize", ZRAM_SYSFS))
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_rejects_bad_size_before_any_mutation() {
        let err = enable_session("abc").unwrap_err();
        assert!(err.is_precondition());
        let err = enable_persistent("10").unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_disable_is_idempotent() {
        // Never enabled in the test environment: both calls must succeed
        // and leave no service unit behind.
        disable();
        disable();
        assert!(!Path::new(crate::defaults::ZRAM_UNIT).exists());
    }
}
