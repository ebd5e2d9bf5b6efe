// Kernel VM tunable presets for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

use crate::defaults::{SYSCTL_CONF, SYSCTL_KEYS};
use crate::helpers::{read_file, run_cmd, write_file, HelperError};
use crate::info;

#[derive(Error, Debug)]
pub enum SysctlError {
    #[error("{0}")]
    Helper(#[from] HelperError),
    #[error("{key} = {value} is out of range (0..={max})")]
    OutOfRange { key: &'static str, value: u32, max: u32 },
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

impl SysctlError {
    pub fn is_precondition(&self) -> bool {
        match self {
            SysctlError::OutOfRange { .. } => true,
            SysctlError::NotANumber(_) => true,
            SysctlError::Helper(e) => e.is_precondition(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SysctlError>;

/// A complete set of the four VM tunables. Always fully specified;
/// partial application is not a supported state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunableSet {
    pub swappiness: u8,
    pub cache_pressure: u16,
    pub dirty_ratio: u8,
    pub dirty_bg_ratio: u8,
}

impl TunableSet {
    /// Build a validated set from explicit values.
    /// dirty_bg_ratio < dirty_ratio is convention, not enforced.
    pub fn new(
        swappiness: u32,
        cache_pressure: u32,
        dirty_ratio: u32,
        dirty_bg_ratio: u32,
    ) -> Result<Self> {
        let check = |key: &'static str, value: u32, max: u32| -> Result<u32> {
            if value > max {
                Err(SysctlError::OutOfRange { key, value, max })
            } else {
                Ok(value)
            }
        };
        Ok(Self {
            swappiness: check("vm.swappiness", swappiness, 100)? as u8,
            cache_pressure: check("vm.vfs_cache_pressure", cache_pressure, 200)? as u16,
            dirty_ratio: check("vm.dirty_ratio", dirty_ratio, 100)? as u8,
            dirty_bg_ratio: check("vm.dirty_background_ratio", dirty_bg_ratio, 100)? as u8,
        })
    }

    /// Key/value pairs in the order they are applied and persisted
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            (SYSCTL_KEYS[0], self.swappiness.to_string()),
            (SYSCTL_KEYS[1], self.cache_pressure.to_string()),
            (SYSCTL_KEYS[2], self.dirty_ratio.to_string()),
            (SYSCTL_KEYS[3], self.dirty_bg_ratio.to_string()),
        ]
    }

    /// Apply live via sysctl -w, persist to /etc/sysctl.conf with one line
    /// per key, then reload the file. Any setter failure aborts the set.
    pub fn apply(&self) -> Result<()> {
        for (key, value) in self.pairs() {
            run_cmd(&["sysctl", "-w", &format!("{}={}", key, value)])?;
        }

        let content = read_file(SYSCTL_CONF).unwrap_or_default();
        write_file(SYSCTL_CONF, &rewrite_sysctl_conf(&content, self))?;
        run_cmd(&["sysctl", "-p"])?;

        info!(
            "Applied tunables: swappiness={} cache_pressure={} dirty_ratio={} dirty_background_ratio={}",
            self.swappiness, self.cache_pressure, self.dirty_ratio, self.dirty_bg_ratio
        );
        Ok(())
    }
}

/// Named tunable bundles. A structured lookup, never reconstructed
/// from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Aggressive,
    Moderate,
    Conservative,
}

impl Preset {
    pub fn tunables(&self) -> TunableSet {
        match self {
            Preset::Aggressive => TunableSet {
                swappiness: 100,
                cache_pressure: 200,
                dirty_ratio: 5,
                dirty_bg_ratio: 3,
            },
            Preset::Moderate => TunableSet {
                swappiness: 60,
                cache_pressure: 100,
                dirty_ratio: 20,
                dirty_bg_ratio: 10,
            },
            Preset::Conservative => TunableSet {
                swappiness: 10,
                cache_pressure: 50,
                dirty_ratio: 40,
                dirty_bg_ratio: 20,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Aggressive => "aggressive",
            Preset::Moderate => "moderate",
            Preset::Conservative => "conservative",
        }
    }
}

/// Rewrite sysctl.conf content: drop any existing line for the four managed
/// keys, keep everything else untouched, append one line per key.
/// Re-applying is idempotent.
pub fn rewrite_sysctl_conf(content: &str, set: &TunableSet) -> String {
    let mut out = String::new();
    for line in content.lines() {
        let trimmed = line.trim_start();
        let key = trimmed.split('=').next().map(str::trim).unwrap_or("");
        if !trimmed.starts_with('#') && SYSCTL_KEYS.contains(&key) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    for (key, value) in set.pairs() {
        out.push_str(&format!("{} = {}\n", key, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_literal_values() {
        let a = Preset::Aggressive.tunables();
        assert_eq!(
            (a.swappiness, a.cache_pressure, a.dirty_ratio, a.dirty_bg_ratio),
            (100, 200, 5, 3)
        );
        let m = Preset::Moderate.tunables();
        assert_eq!(
            (m.swappiness, m.cache_pressure, m.dirty_ratio, m.dirty_bg_ratio),
            (60, 100, 20, 10)
        );
        let c = Preset::Conservative.tunables();
        assert_eq!(
            (c.swappiness, c.cache_pressure, c.dirty_ratio, c.dirty_bg_ratio),
            (10, 50, 40, 20)
        );
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(TunableSet::new(101, 100, 20, 10).is_err());
        assert!(TunableSet::new(60, 201, 20, 10).is_err());
        assert!(TunableSet::new(60, 100, 120, 10).is_err());
        assert!(TunableSet::new(60, 100, 20, 10).is_ok());
    }

    #[test]
    fn test_rewrite_keeps_one_line_per_key() {
        let set = Preset::Moderate.tunables();
        let original = "net.ipv4.ip_forward = 1\nvm.swappiness=30\n# vm.dirty_ratio = 99\n";

        let once = rewrite_sysctl_conf(original, &set);
        let twice = rewrite_sysctl_conf(&once, &set);
        assert_eq!(once, twice);

        let count = |s: &str, key: &str| {
            s.lines()
                .filter(|l| !l.trim_start().starts_with('#'))
                .filter(|l| l.split('=').next().map(str::trim) == Some(key))
                .count()
        };
        for key in crate::defaults::SYSCTL_KEYS {
            assert_eq!(count(&twice, key), 1, "{}", key);
        }
        assert!(twice.contains("net.ipv4.ip_forward = 1"));
        assert!(twice.contains("vm.swappiness = 60"));
        // Commented-out lines are preserved, not treated as duplicates
        assert!(twice.contains("# vm.dirty_ratio = 99"));
    }
}
