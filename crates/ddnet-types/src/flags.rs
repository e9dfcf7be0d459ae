use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitset of `CFGFLAG_*` values.
///
/// Commands and config variables carry a set of these, and every executed
/// line carries a mask. A command only runs when the two intersect, which is
/// how the console tells client-side input apart from server or econ input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFlags(u32);

impl ConfigFlags {
    pub const SAVE: Self = Self(1 << 0);
    pub const CLIENT: Self = Self(1 << 1);
    pub const SERVER: Self = Self(1 << 2);
    pub const STORE: Self = Self(1 << 3);
    pub const MASTER: Self = Self(1 << 4);
    pub const ECON: Self = Self(1 << 5);
    pub const GAME: Self = Self(1 << 6);
    pub const NONTEEHISTORIC: Self = Self(1 << 7);
    pub const COLLIGHT: Self = Self(1 << 8);
    pub const COLALPHA: Self = Self(1 << 9);
    pub const INSENSITIVE: Self = Self(1 << 10);
    pub const CHAT: Self = Self(1 << 11);

    const NAMES: [(Self, &'static str); 12] = [
        (Self::SAVE, "SAVE"),
        (Self::CLIENT, "CLIENT"),
        (Self::SERVER, "SERVER"),
        (Self::STORE, "STORE"),
        (Self::MASTER, "MASTER"),
        (Self::ECON, "ECON"),
        (Self::GAME, "GAME"),
        (Self::NONTEEHISTORIC, "NONTEEHISTORIC"),
        (Self::COLLIGHT, "COLLIGHT"),
        (Self::COLALPHA, "COLALPHA"),
        (Self::INSENSITIVE, "INSENSITIVE"),
        (Self::CHAT, "CHAT"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every known flag set.
    pub const fn all() -> Self {
        Self((1 << 12) - 1)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for ConfigFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConfigFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ConfigFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for ConfigFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("ConfigFlags(empty)");
        }
        let mut names = Vec::new();
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                names.push(name);
            }
        }
        let unknown = self.0 & !Self::all().0;
        if unknown != 0 {
            return write!(f, "ConfigFlags({} | {:#x})", names.join(" | "), unknown);
        }
        write!(f, "ConfigFlags({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values_match_cfgflag_constants() {
        assert_eq!(ConfigFlags::SAVE.bits(), 1);
        assert_eq!(ConfigFlags::CLIENT.bits(), 2);
        assert_eq!(ConfigFlags::SERVER.bits(), 4);
        assert_eq!(ConfigFlags::ECON.bits(), 32);
        assert_eq!(ConfigFlags::CHAT.bits(), 2048);
    }

    #[test]
    fn test_contains_and_intersects() {
        let flags = ConfigFlags::CLIENT | ConfigFlags::SAVE;
        assert!(flags.contains(ConfigFlags::CLIENT));
        assert!(!flags.contains(ConfigFlags::CLIENT | ConfigFlags::SERVER));
        assert!(flags.intersects(ConfigFlags::CLIENT | ConfigFlags::SERVER));
        assert!(!flags.intersects(ConfigFlags::SERVER));
        assert!(!flags.intersects(ConfigFlags::empty()));
    }

    #[test]
    fn test_bit_ops() {
        let mut flags = ConfigFlags::empty();
        assert!(flags.is_empty());
        flags |= ConfigFlags::SERVER;
        assert_eq!(flags & ConfigFlags::SERVER, ConfigFlags::SERVER);
        assert_eq!(flags & ConfigFlags::CLIENT, ConfigFlags::empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let flags = ConfigFlags::CLIENT | ConfigFlags::SAVE;
        assert_eq!(format!("{flags:?}"), "ConfigFlags(SAVE | CLIENT)");
        assert_eq!(format!("{:?}", ConfigFlags::empty()), "ConfigFlags(empty)");
        let odd = ConfigFlags::from_bits(ConfigFlags::ECON.bits() | 1 << 20);
        assert_eq!(format!("{odd:?}"), "ConfigFlags(ECON | 0x100000)");
    }

    #[test]
    fn test_serde_is_plain_integer() {
        let json = serde_json::to_string(&(ConfigFlags::CLIENT | ConfigFlags::SAVE)).unwrap();
        assert_eq!(json, "3");
        let back: ConfigFlags = serde_json::from_str("4").unwrap();
        assert_eq!(back, ConfigFlags::SERVER);
    }
}
