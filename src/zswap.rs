// Zswap (compressed swap cache) boot configuration for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later
//
// Zswap parameters are injected as kernel command-line options, so changes
// are inert until the next reboot. The tool never reboots the machine.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::defaults::{
    GRUB_BACKUP, GRUB_CONF, ZSWAP_COMPRESSOR, ZSWAP_MAX_POOL_PERCENT, ZSWAP_PARAMS, ZSWAP_ZPOOL,
};
use crate::helpers::{read_file, run_cmd, write_file, HelperError};
use crate::info;

const CMDLINE_VAR: &str = "GRUB_CMDLINE_LINUX_DEFAULT";

#[derive(Error, Debug)]
pub enum ZswapError {
    #[error("{0}")]
    Helper(#[from] HelperError),
    #[error("Invalid pool percent '{0}' (expected 1..=100)")]
    InvalidPoolPercent(String),
    #[error("{CMDLINE_VAR} not found in {GRUB_CONF}")]
    MissingCmdlineVar,
}

impl ZswapError {
    pub fn is_precondition(&self) -> bool {
        match self {
            ZswapError::InvalidPoolPercent(_) => true,
            ZswapError::MissingCmdlineVar => true,
            ZswapError::Helper(e) => e.is_precondition(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZswapError>;

/// Zswap boot parameters
#[derive(Debug, Clone)]
pub struct ZswapConfig {
    pub compressor: String,
    pub pool_percent: u8,
    pub pool_type: String,
}

impl Default for ZswapConfig {
    fn default() -> Self {
        Self {
            compressor: ZSWAP_COMPRESSOR.to_string(),
            pool_percent: ZSWAP_MAX_POOL_PERCENT,
            pool_type: ZSWAP_ZPOOL.to_string(),
        }
    }
}

impl ZswapConfig {
    /// Build from prompt answers; empty fields fall back to the defaults.
    pub fn from_input(compressor: &str, pool_percent: &str, pool_type: &str) -> Result<Self> {
        let mut cfg = Self::default();
        if !compressor.is_empty() {
            cfg.compressor = compressor.to_string();
        }
        if !pool_percent.is_empty() {
            let percent: u32 = pool_percent
                .parse()
                .map_err(|_| ZswapError::InvalidPoolPercent(pool_percent.to_string()))?;
            if percent == 0 || percent > 100 {
                return Err(ZswapError::InvalidPoolPercent(pool_percent.to_string()));
            }
            cfg.pool_percent = percent as u8;
        }
        if !pool_type.is_empty() {
            cfg.pool_type = pool_type.to_string();
        }
        Ok(cfg)
    }

    fn cmdline_params(&self) -> Vec<String> {
        vec![
            "zswap.enabled=1".to_string(),
            format!("zswap.compressor={}", self.compressor),
            format!("zswap.max_pool_percent={}", self.pool_percent),
            format!("zswap.zpool={}", self.pool_type),
        ]
    }
}

/// Enable zswap at boot: back up the grub config, upsert the zswap
/// parameters into the kernel command line, regenerate grub config.
pub fn enable(cfg: &ZswapConfig) -> Result<()> {
    edit_grub_cmdline(&cfg.cmdline_params())?;
    info!(
        "Zswap: enabled (compressor={}, max_pool_percent={}, zpool={}), takes effect after reboot",
        cfg.compressor, cfg.pool_percent, cfg.pool_type
    );
    Ok(())
}

/// Remove all zswap parameters from the kernel command line
pub fn disable() -> Result<()> {
    edit_grub_cmdline(&[])?;
    info!("Zswap: boot parameters removed, takes effect after reboot");
    Ok(())
}

fn edit_grub_cmdline(params: &[String]) -> Result<()> {
    let content = read_file(GRUB_CONF)?;
    let updated = upsert_cmdline(&content, params)?;
    fs::copy(GRUB_CONF, GRUB_BACKUP).map_err(HelperError::from)?;
    write_file(GRUB_CONF, &updated)?;
    run_cmd(&["update-grub"])?;
    Ok(())
}

/// Upsert zswap options into the GRUB_CMDLINE_LINUX_DEFAULT line.
///
/// The existing value is split into whitespace tokens, all zswap.* tokens
/// are dropped, and the new parameters appended. Unrelated parameters are
/// preserved verbatim. This parses tokens instead of substituting text,
/// so a value that doesn't match an expected shape cannot be corrupted.
pub fn upsert_cmdline(content: &str, params: &[String]) -> Result<String> {
    let mut out = String::new();
    let mut found = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with('#') {
            if let Some(value) = trimmed.strip_prefix(CMDLINE_VAR).and_then(|r| r.strip_prefix('=')) {
                found = true;
                let value = value.trim().trim_matches('"');
                let mut tokens: Vec<&str> = value
                    .split_whitespace()
                    .filter(|t| !t.starts_with("zswap."))
                    .collect();
                tokens.extend(params.iter().map(String::as_str));
                out.push_str(&format!("{}=\"{}\"\n", CMDLINE_VAR, tokens.join(" ")));
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    if !found {
        return Err(ZswapError::MissingCmdlineVar);
    }
    Ok(out)
}

/// Live zswap state from sysfs
#[derive(Debug, Default)]
pub struct ZswapStatus {
    pub enabled: bool,
    pub compressor: String,
    pub zpool: String,
    pub max_pool_percent: String,
}

/// Check if the zswap module is present on this kernel
pub fn is_available() -> bool {
    Path::new(ZSWAP_PARAMS).is_dir()
}

/// Read current module parameters. None when the module is absent,
/// which the status report shows as a disabled line, not an error.
pub fn get_status() -> Option<ZswapStatus> {
    if !is_available() {
        return None;
    }
    let read_param = |name: &str| -> String {
        fs::read_to_string(format!("{}/{}", ZSWAP_PARAMS, name))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };
    let enabled = read_param("enabled");
    Some(ZswapStatus {
        enabled: enabled == "Y" || enabled == "1",
        compressor: read_param("compressor"),
        zpool: read_param("zpool"),
        max_pool_percent: read_param("max_pool_percent"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRUB: &str = "GRUB_DEFAULT=0\nGRUB_CMDLINE_LINUX_DEFAULT=\"quiet splash\"\nGRUB_CMDLINE_LINUX=\"\"\n";

    #[test]
    fn test_enable_preserves_unrelated_parameters() {
        let cfg = ZswapConfig::default();
        let out = upsert_cmdline(GRUB, &cfg.cmdline_params()).unwrap();
        assert!(out.contains(
            "GRUB_CMDLINE_LINUX_DEFAULT=\"quiet splash zswap.enabled=1 \
             zswap.compressor=lz4 zswap.max_pool_percent=50 zswap.zpool=z3fold\""
        ));
        assert!(out.contains("GRUB_DEFAULT=0"));
        assert!(out.contains("GRUB_CMDLINE_LINUX=\"\""));
    }

    #[test]
    fn test_enable_twice_does_not_duplicate() {
        let cfg = ZswapConfig::default();
        let once = upsert_cmdline(GRUB, &cfg.cmdline_params()).unwrap();
        let twice = upsert_cmdline(&once, &cfg.cmdline_params()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_disable_strips_all_zswap_tokens() {
        let cfg = ZswapConfig::default();
        let enabled = upsert_cmdline(GRUB, &cfg.cmdline_params()).unwrap();
        let disabled = upsert_cmdline(&enabled, &[]).unwrap();
        assert!(disabled.contains("GRUB_CMDLINE_LINUX_DEFAULT=\"quiet splash\""));
        assert!(!disabled.contains("zswap."));
    }

    #[test]
    fn test_missing_cmdline_var_is_precondition_error() {
        let err = upsert_cmdline("GRUB_DEFAULT=0\n", &[]).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_from_input_defaults_and_validation() {
        let cfg = ZswapConfig::from_input("", "", "").unwrap();
        assert_eq!(cfg.compressor, "lz4");
        assert_eq!(cfg.pool_percent, 50);
        assert_eq!(cfg.pool_type, "z3fold");

        let cfg = ZswapConfig::from_input("zstd", "30", "zsmalloc").unwrap();
        assert_eq!(cfg.compressor, "zstd");
        assert_eq!(cfg.pool_percent, 30);
        assert_eq!(cfg.pool_type, "zsmalloc");

        assert!(ZswapConfig::from_input("", "0", "").is_err());
        assert!(ZswapConfig::from_input("", "150", "").is_err());

        // The error names what was actually typed
        let err = ZswapConfig::from_input("", "abc", "").unwrap_err();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("'abc'"));
    }
}
