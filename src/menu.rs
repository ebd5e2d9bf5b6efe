// Menu rendering and selection parsing for swap-manager
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::sysctl::Preset;

/// One recognized menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ApplyPreset(Preset),
    CustomTunables,
    ZramSession,
    ZramPersistent,
    ZramDisable,
    ZswapEnable,
    ZswapDisable,
    DiskSwapAdd,
    DiskSwapRemove,
    Status,
    Exit,
}

/// Map a two-character code (or 5/6) to its action.
/// None for anything unrecognized; the loop logs and redisplays.
pub fn parse_selection(code: &str) -> Option<MenuAction> {
    match code.trim().to_lowercase().as_str() {
        "1a" => Some(MenuAction::ApplyPreset(Preset::Aggressive)),
        "1b" => Some(MenuAction::ApplyPreset(Preset::Moderate)),
        "1c" => Some(MenuAction::ApplyPreset(Preset::Conservative)),
        "1d" => Some(MenuAction::CustomTunables),
        "2a" => Some(MenuAction::ZramSession),
        "2b" => Some(MenuAction::ZramPersistent),
        "2c" => Some(MenuAction::ZramDisable),
        "3a" => Some(MenuAction::ZswapEnable),
        "3b" => Some(MenuAction::ZswapDisable),
        "4a" => Some(MenuAction::DiskSwapAdd),
        "4b" => Some(MenuAction::DiskSwapRemove),
        "5" => Some(MenuAction::Status),
        "6" => Some(MenuAction::Exit),
        _ => None,
    }
}

pub fn display() {
    println!(
        "
==================== swap-manager ====================
 1) VM tunable presets
    1a) Aggressive    (swappiness 100, cache pressure 200)
    1b) Moderate      (swappiness 60, cache pressure 100)
    1c) Conservative  (swappiness 10, cache pressure 50)
    1d) Custom values
 2) Compressed RAM swap (zram)
    2a) Enable for this session
    2b) Enable persistently (boot service)
    2c) Disable
 3) Compressed swap cache (zswap, needs reboot)
    3a) Enable
    3b) Disable
 4) Disk swap
    4a) Add swap file or partition
    4b) Remove swap file or partition
 5) Show status
 6) Exit
======================================================"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_map() {
        assert_eq!(
            parse_selection("1a"),
            Some(MenuAction::ApplyPreset(Preset::Aggressive))
        );
        assert_eq!(
            parse_selection("1c"),
            Some(MenuAction::ApplyPreset(Preset::Conservative))
        );
        assert_eq!(parse_selection("1d"), Some(MenuAction::CustomTunables));
        assert_eq!(parse_selection("2a"), Some(MenuAction::ZramSession));
        assert_eq!(parse_selection("2b"), Some(MenuAction::ZramPersistent));
        assert_eq!(parse_selection("2c"), Some(MenuAction::ZramDisable));
        assert_eq!(parse_selection("3a"), Some(MenuAction::ZswapEnable));
        assert_eq!(parse_selection("3b"), Some(MenuAction::ZswapDisable));
        assert_eq!(parse_selection("4a"), Some(MenuAction::DiskSwapAdd));
        assert_eq!(parse_selection("4b"), Some(MenuAction::DiskSwapRemove));
        assert_eq!(parse_selection("5"), Some(MenuAction::Status));
        assert_eq!(parse_selection("6"), Some(MenuAction::Exit));
    }

    #[test]
    fn test_selection_is_case_insensitive_and_trimmed() {
        assert_eq!(parse_selection(" 2A "), Some(MenuAction::ZramSession));
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert_eq!(parse_selection("9z"), None);
        assert_eq!(parse_selection(""), None);
        assert_eq!(parse_selection("1"), None);
        assert_eq!(parse_selection("exit"), None);
    }
}
