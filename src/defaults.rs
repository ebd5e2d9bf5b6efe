// Centralised default values and well-known paths.
// SPDX-License-Identifier: GPL-3.0-or-later
//
// Every module reads its paths and fallback values from here. Having them
// in one place prevents drift between the operations, the status report,
// and the generated service unit.

// ── Paths ────────────────────────────────────────────────────────────────────

pub const CONF_DIR: &str = "/etc/swap-manager";
pub const LOG_FILE: &str = "/var/log/swap-manager.log";
pub const SYSCTL_CONF: &str = "/etc/sysctl.conf";
pub const FSTAB: &str = "/etc/fstab";
pub const GRUB_CONF: &str = "/etc/default/grub";
pub const GRUB_BACKUP: &str = "/etc/default/grub.backup";
pub const ZRAM_DEVICE: &str = "/dev/zram0";
pub const ZRAM_SYSFS: &str = "/sys/block/zram0";
pub const ZSWAP_PARAMS: &str = "/sys/module/zswap/parameters";
pub const ZRAM_UNIT: &str = "/etc/systemd/system/zram-swap.service";
pub const ZRAM_UNIT_NAME: &str = "zram-swap.service";

// ── Zswap ────────────────────────────────────────────────────────────────────

pub const ZSWAP_COMPRESSOR: &str = "lz4";
pub const ZSWAP_MAX_POOL_PERCENT: u8 = 50;
pub const ZSWAP_ZPOOL: &str = "z3fold";

// ── VM tunables ──────────────────────────────────────────────────────────────

pub const SYSCTL_KEYS: [&str; 4] = [
    "vm.swappiness",
    "vm.vfs_cache_pressure",
    "vm.dirty_ratio",
    "vm.dirty_background_ratio",
];
