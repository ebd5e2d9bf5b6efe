// swap-manager - Interactive swap and VM tunable configuration for Linux
// SPDX-License-Identifier: GPL-3.0-or-later

use std::process;

use clap::Parser;

use swap_manager::defaults::{CONF_DIR, LOG_FILE};
use swap_manager::helpers::{am_i_root, makedirs, prompt};
use swap_manager::menu::{self, MenuAction};
use swap_manager::sysctl::{Preset, SysctlError, TunableSet};
use swap_manager::zswap::ZswapConfig;
use swap_manager::{diskswap, logger, status, zram, zswap};
use swap_manager::{error, info, warn, AppError};

#[derive(Parser)]
#[command(name = "swap-manager")]
#[command(about = "Interactive configuration of zram, zswap, disk swap, and kernel VM tunables")]
#[command(version)]
struct Cli {}

/// Whether the loop keeps going after an action
enum LoopControl {
    Continue,
    Exit,
}

fn main() {
    let _cli = Cli::parse();

    if let Err(e) = am_i_root() {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }

    // Terminal output still works if the log file can't be opened
    if let Err(e) = logger::init(LOG_FILE) {
        eprintln!("WARN: cannot open {}: {}", LOG_FILE, e);
    }
    if let Err(e) = makedirs(CONF_DIR) {
        warn!("Cannot create {}: {}", CONF_DIR, e);
    }

    info!("swap-manager started");

    loop {
        menu::display();
        let code = match prompt("Select an option: ") {
            Ok(code) => code,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        };

        match dispatch(&code) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => {
                info!("swap-manager exiting");
                break;
            }
            Err(e) if e.is_recoverable() => {
                // Validation failures abort only this operation
                error!("{}", e);
            }
            Err(e) => {
                error!("{}", e);
                process::exit(e.exit_status());
            }
        }
    }
}

/// Prompt for any extra fields, then run the selected operation
fn dispatch(code: &str) -> swap_manager::Result<LoopControl> {
    let action = menu::parse_selection(code)
        .ok_or_else(|| AppError::UnknownSelection(code.trim().to_string()))?;

    match action {
        MenuAction::ApplyPreset(preset) => apply_preset(preset)?,
        MenuAction::CustomTunables => apply_custom_tunables()?,
        MenuAction::ZramSession => {
            let size = prompt("Zram size (e.g. 2G, 512M): ")?;
            zram::enable_session(&size)?;
        }
        MenuAction::ZramPersistent => {
            let size = prompt("Zram size (e.g. 2G, 512M): ")?;
            zram::enable_persistent(&size)?;
        }
        MenuAction::ZramDisable => zram::disable(),
        MenuAction::ZswapEnable => {
            let compressor = prompt("Compressor [lz4]: ")?;
            let pool_percent = prompt("Max pool percent [50]: ")?;
            let pool_type = prompt("Pool type [z3fold]: ")?;
            let cfg = ZswapConfig::from_input(&compressor, &pool_percent, &pool_type)?;
            zswap::enable(&cfg)?;
        }
        MenuAction::ZswapDisable => zswap::disable()?,
        MenuAction::DiskSwapAdd => add_disk_swap()?,
        MenuAction::DiskSwapRemove => {
            let location = prompt("Swap file or partition to remove: ")?;
            diskswap::remove(&location)?;
        }
        MenuAction::Status => status::report(),
        MenuAction::Exit => return Ok(LoopControl::Exit),
    }
    Ok(LoopControl::Continue)
}

fn apply_preset(preset: Preset) -> swap_manager::Result<()> {
    info!("Applying {} preset", preset.name());
    preset.tunables().apply()?;
    Ok(())
}

fn apply_custom_tunables() -> swap_manager::Result<()> {
    let swappiness = prompt_u32("Swappiness (0-100): ")?;
    let cache_pressure = prompt_u32("Cache pressure (0-200): ")?;
    let dirty_ratio = prompt_u32("Dirty ratio (0-100): ")?;
    let dirty_bg_ratio = prompt_u32("Dirty background ratio (0-100): ")?;

    let set = TunableSet::new(swappiness, cache_pressure, dirty_ratio, dirty_bg_ratio)?;
    set.apply()?;
    Ok(())
}

fn prompt_u32(message: &str) -> swap_manager::Result<u32> {
    let answer = prompt(message)?;
    answer
        .parse()
        .map_err(|_| SysctlError::NotANumber(answer).into())
}

fn add_disk_swap() -> swap_manager::Result<()> {
    let kind_str = prompt("Kind (partition/file): ")?;
    let kind = diskswap::SwapKind::parse_str(&kind_str)?;
    match kind {
        diskswap::SwapKind::Partition => {
            let location = prompt("Partition device (e.g. /dev/sdb1): ")?;
            diskswap::add(kind, &location, None)?;
        }
        diskswap::SwapKind::File => {
            let location = prompt("Swap file path (e.g. /swapfile): ")?;
            let size = prompt("Size (e.g. 2G, 512M): ")?;
            diskswap::add(kind, &location, Some(&size))?;
        }
    }
    Ok(())
}
