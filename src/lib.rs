// swap-manager - Interactive swap and VM tunable configuration for Linux
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod defaults;
pub mod diskswap;
pub mod helpers;
pub mod logger;
pub mod menu;
pub mod status;
pub mod sysctl;
pub mod systemd;
pub mod zram;
pub mod zswap;

use thiserror::Error;

/// Top-level error for the menu loop.
///
/// Replaces an implicit global failure trap with explicit propagation:
/// every operation bubbles its module error up here, and the loop decides
/// whether to continue (validation failures) or terminate the process
/// (external command failures, carrying the child's exit status).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Helper(#[from] helpers::HelperError),
    #[error("{0}")]
    Sysctl(#[from] sysctl::SysctlError),
    #[error("{0}")]
    Zram(#[from] zram::ZramError),
    #[error("{0}")]
    Zswap(#[from] zswap::ZswapError),
    #[error("{0}")]
    DiskSwap(#[from] diskswap::DiskSwapError),
    #[error("{0}")]
    Systemd(#[from] systemd::SystemdError),
    #[error("unknown selection: {0}")]
    UnknownSelection(String),
}

impl AppError {
    /// Validation and selection failures return to the menu;
    /// everything else terminates the process.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::UnknownSelection(_) => true,
            AppError::Helper(e) => e.is_precondition(),
            AppError::Sysctl(e) => e.is_precondition(),
            AppError::Zram(e) => e.is_precondition(),
            AppError::Zswap(e) => e.is_precondition(),
            AppError::DiskSwap(e) => e.is_precondition(),
            AppError::Systemd(_) => false,
        }
    }

    /// Exit status for non-recoverable errors: the failing command's own
    /// status where known, 1 otherwise.
    pub fn exit_status(&self) -> i32 {
        match self {
            AppError::Helper(e) => e.exit_status(),
            AppError::Sysctl(sysctl::SysctlError::Helper(e)) => e.exit_status(),
            AppError::Zram(zram::ZramError::Helper(e)) => e.exit_status(),
            AppError::Zswap(zswap::ZswapError::Helper(e)) => e.exit_status(),
            AppError::DiskSwap(diskswap::DiskSwapError::Helper(e)) => e.exit_status(),
            AppError::Systemd(systemd::SystemdError::Helper(e)) => e.exit_status(),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
