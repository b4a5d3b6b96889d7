//! Editing modes: the interpretation context for incoming chords

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::KeymapError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Collecting repeat-count digits
    Count,
    /// Waiting for a register name after `"`
    Register,
    /// Waiting for the replacement character after `r`
    Replace,
    /// Operator-pending: yank
    Yank,
    /// Operator-pending: change
    Change,
    /// Operator-pending: delete
    Delete,
    Select,
    BlockSelect,
    /// Waiting for the key after `g`
    GoPrefix,
}

impl Mode {
    pub const ALL: [Mode; 11] = [
        Mode::Normal,
        Mode::Insert,
        Mode::Count,
        Mode::Register,
        Mode::Replace,
        Mode::Yank,
        Mode::Change,
        Mode::Delete,
        Mode::Select,
        Mode::BlockSelect,
        Mode::GoPrefix,
    ];

    /// Stable name used in config files and reported to the host
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Count => "count",
            Mode::Register => "register",
            Mode::Replace => "replace",
            Mode::Yank => "yank",
            Mode::Change => "change",
            Mode::Delete => "delete",
            Mode::Select => "select",
            Mode::BlockSelect => "blockSelect",
            Mode::GoPrefix => "goPrefix",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| KeymapError::InvalidMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_mode() {
        assert!(matches!(
            "visual".parse::<Mode>(),
            Err(KeymapError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_serde_name_matches() {
        let mode: Mode = serde_yaml::from_str("blockSelect").unwrap();
        assert_eq!(mode, Mode::BlockSelect);
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
