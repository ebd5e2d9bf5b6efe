// Read-only status report for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;

use crate::defaults::{SYSCTL_KEYS, ZRAM_DEVICE};
use crate::{zram, zswap};

/// An active swap area from /proc/swaps
#[derive(Debug, PartialEq, Eq)]
pub struct SwapArea {
    pub name: String,
    pub kind: String,
    pub size_bytes: u64,
    pub used_bytes: u64,
}

/// Parse /proc/swaps content. Sizes there are in KiB.
pub fn parse_swaps(content: &str) -> Vec<SwapArea> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            Some(SwapArea {
                name: fields[0].to_string(),
                kind: fields[1].to_string(),
                size_bytes: fields[2].parse::<u64>().ok()? * 1024,
                used_bytes: fields[3].parse::<u64>().ok()? * 1024,
            })
        })
        .collect()
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.0} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn proc_path(key: &str) -> String {
    format!("/proc/sys/vm/{}", key.trim_start_matches("vm."))
}

/// Current value of each managed tunable, read from procfs
pub fn read_tunables() -> Vec<(&'static str, String)> {
    SYSCTL_KEYS
        .iter()
        .map(|key| {
            let value = fs::read_to_string(proc_path(key))
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "unavailable".to_string());
            (*key, value)
        })
        .collect()
}

/// Print the full status report. Absent features are reported as
/// disabled lines, never as errors.
pub fn report() {
    println!("Zram:");
    match zram::disksize() {
        Some(size) if size > 0 => {
            println!("  Device:        {}", ZRAM_DEVICE);
            println!("  Size:          {}", format_size(size));
        }
        _ => println!("  disabled"),
    }

    println!("\nZswap:");
    match zswap::get_status() {
        Some(status) => {
            println!("  Enabled:       {}", if status.enabled { "yes" } else { "no" });
            println!("  Compressor:    {}", status.compressor);
            println!("  Pool type:     {}", status.zpool);
            println!("  Pool limit:    {}% of RAM", status.max_pool_percent);
        }
        None => println!("  module not present"),
    }

    println!("\nVM tunables:");
    for (key, value) in read_tunables() {
        println!("  {:<28} {}", key, value);
    }

    println!("\nActive swap areas:");
    let areas = fs::read_to_string("/proc/swaps")
        .map(|c| parse_swaps(&c))
        .unwrap_or_default();
    if areas.is_empty() {
        println!("  none");
    } else {
        println!("  {:<32} {:<10} {:>10} {:>10}", "Device", "Type", "Size", "Used");
        for area in areas {
            println!(
                "  {:<32} {:<10} {:>10} {:>10}",
                area.name,
                area.kind,
                format_size(area.size_bytes),
                format_size(area.used_bytes)
            );
        }
    }
}
