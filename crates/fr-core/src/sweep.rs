//! Sweep direction of a face traversal.

/// Which way(s) a packet is travelling around the current face.
///
/// `Right` rotates clockwise at every hop, `Left` counter-clockwise.  `Both`
/// marks a packet that must explore the face in both directions from the
/// next node.  `None` is a packet that is not sweeping at all (greedy
/// forwarding, last-mile delivery, hellos).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sweep {
    #[default]
    None,
    Right,
    Left,
    Both,
}

impl Sweep {
    /// `true` for `Right` and `Left`.
    #[inline]
    pub fn is_single(self) -> bool {
        matches!(self, Sweep::Right | Sweep::Left)
    }

    /// `true` for anything but `None`.
    #[inline]
    pub fn is_sweep(self) -> bool {
        !matches!(self, Sweep::None)
    }

    /// Does a packet travelling `self` already explore what `other` would?
    #[inline]
    pub fn covers(self, other: Sweep) -> bool {
        self == other || (self == Sweep::Both && other.is_sweep())
    }

    /// Smallest direction covering both `self` and `other`.
    pub fn union(self, other: Sweep) -> Sweep {
        match (self, other) {
            (Sweep::None, x) | (x, Sweep::None) => x,
            (a, b) if a == b                     => a,
            _                                    => Sweep::Both,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sweep::None  => "none",
            Sweep::Right => "right",
            Sweep::Left  => "left",
            Sweep::Both  => "both",
        }
    }
}

impl std::fmt::Display for Sweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rotation sense used by the face navigator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    /// Clockwise.
    Right,
    /// Counter-clockwise.
    Left,
}

impl Turn {
    pub const BOTH: [Turn; 2] = [Turn::Right, Turn::Left];

    #[inline]
    pub fn sweep(self) -> Sweep {
        match self {
            Turn::Right => Sweep::Right,
            Turn::Left  => Sweep::Left,
        }
    }
}
