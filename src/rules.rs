use crate::Age;

/// Neighbor counts that bring a dead cell to life, one bit per count. Life is B3.
const BIRTHS: u16 = 0b0_0000_1000;

/// Neighbor counts that keep a live cell alive, one bit per count. Life is S23.
const SURVIVALS: u16 = 0b0_0000_1100;

/// Whether a cell keeps counting generations while it lives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Aging {
    /// Live cells carry the number of generations they've been alive for.
    #[default]
    Tracked,

    /// Every live cell is `1`. Useful when only alive/dead matters.
    Binary,
}

impl Aging {
    /// Age of a cell that has just survived or been born, given its previous age.
    pub fn advance(self, alive_for: Age) -> Age {
        match self {
            Aging::Tracked => alive_for.saturating_add(1),
            Aging::Binary => 1,
        }
    }
}

/// The Life transition rule with an age counter.
///
/// A cell is born on exactly 3 neighbors and survives on 2 or 3. A cell that is alive afterwards
/// is `alive_for + 1`, anything else is `0`. The age never influences the rule itself.
pub fn next_state(alive_for: Age, neighbor_count: u8) -> Age {
    next_state_with(Aging::Tracked, alive_for, neighbor_count)
}

pub(crate) fn next_state_with(aging: Aging, alive_for: Age, neighbor_count: u8) -> Age {
    if neighbor_count > 8 {
        return 0;
    }

    let mask = 1u16 << neighbor_count;

    let lives = if alive_for == 0 {
        BIRTHS & mask == mask
    } else {
        SURVIVALS & mask == mask
    };

    if lives { aging.advance(alive_for) } else { 0 }
}
