use serde::{Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod error;

pub use codec::{
    decode_handshake, decode_intent, decode_snapshot, encode_handshake, encode_intent,
    encode_snapshot,
};
pub use error::{ProtocolError, WireError};

pub const DEFAULT_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const TERMINATOR: u8 = b'\n';
/// x[2] y[2] color[3] radius[4]
pub const RECORD_PREFIX_LEN: usize = 11;
pub const MAX_ENTITIES_PER_LIST: usize = u8::MAX as usize;
pub const DEFAULT_MAX_NAME_OCTETS: usize = 1024;
pub const MAX_HANDSHAKE_NAME_CHARS: usize = 15;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Food {
    pub x: u16,
    pub y: u16,
    pub color: Color,
    pub radius: f32,
}

impl Food {
    pub fn new(x: u16, y: u16, color: Color, radius: f32) -> Self {
        Self {
            x,
            y,
            color,
            radius,
        }
    }
}

/// A player blob as seen in one snapshot.
///
/// The protocol carries no player id, so two `Player` values from different
/// snapshots can only be related by comparing their attributes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub x: u16,
    pub y: u16,
    pub color: Color,
    pub radius: f32,
    pub name: String,
}

impl Player {
    pub fn new(x: u16, y: u16, color: Color, radius: f32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color,
            radius,
            name: name.into(),
        }
    }

    pub fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

/// Full world state for a single server tick.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub status: u8,
    pub food: Vec<Food>,
    pub players: Vec<Player>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub color: Color,
    pub name: String,
}

impl Handshake {
    pub fn new(color: Color, name: impl Into<String>) -> Self {
        Self {
            color,
            name: name.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Encoding order on the wire.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn code(self) -> u8 {
        match self {
            Direction::Up => b'u',
            Direction::Down => b'd',
            Direction::Left => b'l',
            Direction::Right => b'r',
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'u' => Some(Direction::Up),
            b'd' => Some(Direction::Down),
            b'l' => Some(Direction::Left),
            b'r' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Set of movement directions active during one tick.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_directions(directions: impl IntoIterator<Item = Direction>) -> Self {
        let mut intent = Self::none();
        for direction in directions {
            intent.set(direction, true);
        }
        intent
    }

    pub fn set(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Up => self.up = active,
            Direction::Down => self.down = active,
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
        }
    }

    pub fn contains(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Active directions in wire order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for direction in self.directions() {
            write!(f, "{}", direction.code() as char)?;
        }
        Ok(())
    }
}

/// Size limits applied by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireLimits {
    /// Longest name (in octets, terminator excluded) accepted while decoding.
    pub max_name_octets: usize,
    /// Longest name (in characters) the client will put in a handshake.
    pub max_handshake_name_chars: usize,
}

impl Default for WireLimits {
    fn default() -> Self {
        Self {
            max_name_octets: DEFAULT_MAX_NAME_OCTETS,
            max_handshake_name_chars: MAX_HANDSHAKE_NAME_CHARS,
        }
    }
}
