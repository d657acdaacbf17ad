//! Finding the local player's blob in each snapshot

use shared::{Color, Handshake, Player};

/// Guesses which player in a snapshot belongs to this client.
///
/// Snapshots carry no player id. Candidates must match the name and color
/// sent in the handshake; when several match, the one closest to where the
/// local player was last seen wins.
#[derive(Debug, Clone)]
pub struct LocalPlayerTracker {
    name: String,
    color: Color,
    last_position: Option<(u16, u16)>,
}

impl LocalPlayerTracker {
    pub fn new(handshake: &Handshake) -> Self {
        Self {
            name: handshake.name.clone(),
            color: handshake.color,
            last_position: None,
        }
    }

    pub fn last_position(&self) -> Option<(u16, u16)> {
        self.last_position
    }

    /// Returns the index of the local player in `players`, if present.
    pub fn locate(&mut self, players: &[Player]) -> Option<usize> {
        let mut candidates = players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.color == self.color && p.name == self.name);

        let found = match self.last_position {
            Some(last) => candidates.min_by_key(|(_, p)| distance_squared(last, p.position())),
            None => candidates.next(),
        };

        let (index, player) = found?;
        self.last_position = Some(player.position());
        Some(index)
    }
}

fn distance_squared(a: (u16, u16), b: (u16, u16)) -> u64 {
    let dx = a.0.abs_diff(b.0) as u64;
    let dy = a.1.abs_diff(b.1) as u64;
    dx * dx + dy * dy
}
