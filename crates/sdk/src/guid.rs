//! Object identity
//!
//! Host objects are addressed by a 64-bit guid packing the object's high
//! type, template entry and per-type counter. Identities are plain values:
//! holding one never keeps the host object alive.

use std::fmt;

/// High part of a guid, identifying the object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HighGuid {
    Player = 0x0000,
    Item = 0x4000,
    Corpse = 0xF101,
    GameObject = 0xF110,
    Transport = 0xF120,
    Unit = 0xF130,
    Pet = 0xF140,
    Vehicle = 0xF150,
}

impl HighGuid {
    /// Decode the high part of a raw guid
    pub const fn from_raw(high: u16) -> Option<Self> {
        match high {
            0x0000 => Some(Self::Player),
            0x4000 => Some(Self::Item),
            0xF101 => Some(Self::Corpse),
            0xF110 => Some(Self::GameObject),
            0xF120 => Some(Self::Transport),
            0xF130 => Some(Self::Unit),
            0xF140 => Some(Self::Pet),
            0xF150 => Some(Self::Vehicle),
            _ => None,
        }
    }

    /// Whether guids of this type carry a template entry
    pub const fn has_entry(self) -> bool {
        matches!(
            self,
            Self::GameObject | Self::Transport | Self::Unit | Self::Pet | Self::Vehicle
        )
    }
}

/// 64-bit object identity: `high << 48 | entry << 24 | counter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectGuid(u64);

impl ObjectGuid {
    /// The empty guid (no object)
    pub const EMPTY: Self = Self(0);

    /// Build a guid from its parts
    ///
    /// `entry` is truncated to 24 bits and ignored for types without an
    /// entry; `counter` is truncated to 24 bits for types with one.
    pub const fn new(high: HighGuid, entry: u32, counter: u32) -> Self {
        let high_bits = (high as u64) << 48;
        if high.has_entry() {
            Self(high_bits | ((entry as u64 & 0x00FF_FFFF) << 24) | (counter as u64 & 0x00FF_FFFF))
        } else {
            Self(high_bits | counter as u64)
        }
    }

    /// Wrap a raw 64-bit value received from the host
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decoded high type, `None` for unknown bit patterns
    pub const fn high(self) -> Option<HighGuid> {
        HighGuid::from_raw((self.0 >> 48) as u16)
    }

    /// Template entry, 0 for types without one
    pub const fn entry(self) -> u32 {
        match self.high() {
            Some(high) if high.has_entry() => ((self.0 >> 24) & 0x00FF_FFFF) as u32,
            _ => 0,
        }
    }

    /// Per-type low counter
    pub const fn counter(self) -> u32 {
        match self.high() {
            Some(high) if high.has_entry() => (self.0 & 0x00FF_FFFF) as u32,
            _ => self.0 as u32,
        }
    }

    pub const fn is_player(self) -> bool {
        !self.is_empty() && matches!(self.high(), Some(HighGuid::Player))
    }

    /// Creatures, pets and vehicles all resolve to a creature handle
    pub const fn is_creature(self) -> bool {
        matches!(self.high(), Some(HighGuid::Unit | HighGuid::Pet | HighGuid::Vehicle))
    }

    pub const fn is_game_object(self) -> bool {
        matches!(self.high(), Some(HighGuid::GameObject | HighGuid::Transport))
    }
}

impl From<u64> for ObjectGuid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = match self.high() {
            _ if self.is_empty() => "None",
            Some(HighGuid::Player) => "Player",
            Some(HighGuid::Item) => "Item",
            Some(HighGuid::Corpse) => "Corpse",
            Some(HighGuid::GameObject) => "GameObject",
            Some(HighGuid::Transport) => "Transport",
            Some(HighGuid::Unit) => "Creature",
            Some(HighGuid::Pet) => "Pet",
            Some(HighGuid::Vehicle) => "Vehicle",
            None => "Unknown",
        };
        write!(
            f,
            "GUID Full: 0x{:016X} Type: {}",
            self.0, type_name
        )?;
        if self.entry() != 0 {
            write!(f, " Entry: {}", self.entry())?;
        }
        write!(f, " Low: {}", self.counter())
    }
}
