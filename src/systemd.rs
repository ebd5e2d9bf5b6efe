// Systemd unit generation and control for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use thiserror::Error;

use crate::defaults::{ZRAM_DEVICE, ZRAM_SYSFS, ZRAM_UNIT, ZRAM_UNIT_NAME};
use crate::helpers::{run_cmd, run_cmd_tolerant, write_file, HelperError};
use crate::info;

#[derive(Error, Debug)]
pub enum SystemdError {
    #[error("{0}")]
    Helper(#[from] HelperError),
}

pub type Result<T> = std::result::Result<T, SystemdError>;

/// Run systemctl with an action and optional unit
pub fn systemctl(action: &str, unit: &str) -> Result<()> {
    if unit.is_empty() {
        run_cmd(&["systemctl", action])?;
    } else {
        run_cmd(&["systemctl", action, unit])?;
    }
    Ok(())
}

/// Render the oneshot unit that recreates the zram swap device at boot
/// and tears it down at shutdown. Size is in bytes.
pub fn zram_service_unit(size_bytes: u64) -> String {
    format!(
        "\
[Unit]
Description=Compressed RAM swap (zram0)
DefaultDependencies=no
After=local-fs.target

[Service]
Type=oneshot
RemainAfterExit=yes
ExecStart=/sbin/modprobe zram
ExecStart=/bin/sh -c 'echo {size} > {sysfs}/disksize'
ExecStart=/sbin/mkswap {dev}
ExecStart=/sbin/swapon {dev}
ExecStop=/sbin/swapoff {dev}
ExecStop=/sbin/modprobe -r zram

[Install]
WantedBy=swap.target
",
        size = size_bytes,
        sysfs = ZRAM_SYSFS,
        dev = ZRAM_DEVICE,
    )
}

/// Write the unit file and register it for boot
pub fn install_zram_service(size_bytes: u64) -> Result<()> {
    write_file(ZRAM_UNIT, &zram_service_unit(size_bytes))?;
    systemctl("daemon-reload", "")?;
    systemctl("enable", ZRAM_UNIT_NAME)?;
    info!("Installed and enabled {}", ZRAM_UNIT_NAME);
    Ok(())
}

/// Best-effort unregister + delete of the unit. Tolerates the unit
/// never having existed.
pub fn remove_zram_service() {
    run_cmd_tolerant(&["systemctl", "disable", ZRAM_UNIT_NAME]);
    if Path::new(ZRAM_UNIT).exists() {
        let _ = std::fs::remove_file(ZRAM_UNIT);
        run_cmd_tolerant(&["systemctl", "daemon-reload"]);
        info!("Removed {}", ZRAM_UNIT_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_recreates_and_tears_down_device() {
        let unit = zram_service_unit(2 * 1024 * 1024 * 1024);
        assert!(unit.contains("Type=oneshot"));
        assert!(unit.contains("echo 2147483648 > /sys/block/zram0/disksize"));
        assert!(unit.contains("ExecStart=/sbin/mkswap /dev/zram0"));
        assert!(unit.contains("ExecStart=/sbin/swapon /dev/zram0"));
        assert!(unit.contains("ExecStop=/sbin/swapoff /dev/zram0"));
        assert!(unit.contains("ExecStop=/sbin/modprobe -r zram"));
        assert!(unit.contains("WantedBy=swap.target"));
    }
}
