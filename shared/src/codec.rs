//! Binary wire codec for the game protocol
//!
//! ```text
//! Snapshot  (server -> client)
//! ┌────────┬────────────┬─────────────────┬──────────────┬───────────────────┐
//! │ status │ food_count │ FoodRecord * N  │ player_count │ PlayerRecord * M  │
//! │ u8     │ u8         │ 11 octets each  │ u8           │ 11 octets + name  │
//! └────────┴────────────┴─────────────────┴──────────────┴───────────────────┘
//!
//! Record prefix: x u16 | y u16 | r g b | radius f32   (all little-endian)
//! Player name:   octets ... 0x0A
//!
//! Handshake (client -> server): r g b | name ... 0x0A
//! Intent    (client -> server): [u][d][l][r] 0x0A
//! ```
//!
//! Decoders work on any [`AsyncBufRead`], so the same code reads from an
//! in-memory `&[u8]` or a buffered socket. Names are scanned out of the reader's
//! internal buffer chunk by chunk instead of one read call per octet.

use crate::error::{ProtocolError, WireError};
use crate::{
    Color, Direction, Food, Handshake, Intent, Player, Snapshot, WireLimits,
    MAX_ENTITIES_PER_LIST, RECORD_PREFIX_LEN, TERMINATOR,
};
use serde::{Deserialize, Serialize};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt};

/// Longest intent line a well-behaved client can produce, with headroom for repeats.
const MAX_INTENT_OCTETS: usize = 16;

/// Fixed part shared by food and player records. bincode's default fixint
/// little-endian layout is exactly the 11-octet wire layout.
#[derive(Debug, Serialize, Deserialize)]
struct RecordPrefix {
    x: u16,
    y: u16,
    color: Color,
    radius: f32,
}

/// Reads one snapshot message, consuming exactly its octets from `source`.
pub async fn decode_snapshot<R>(source: &mut R, limits: &WireLimits) -> Result<Snapshot, WireError>
where
    R: AsyncBufRead + Unpin,
{
    let [status] = read_field::<_, 1>(source, "status").await?;

    let [food_count] = read_field::<_, 1>(source, "food count").await?;
    let mut food = Vec::with_capacity(food_count as usize);
    for _ in 0..food_count {
        let prefix = read_prefix(source, "food record").await?;
        food.push(Food::new(prefix.x, prefix.y, prefix.color, prefix.radius));
    }

    let [player_count] = read_field::<_, 1>(source, "player count").await?;
    let mut players = Vec::with_capacity(player_count as usize);
    for _ in 0..player_count {
        let prefix = read_prefix(source, "player record").await?;
        let name = read_text(source, limits.max_name_octets, "player name").await?;
        players.push(Player::new(
            prefix.x,
            prefix.y,
            prefix.color,
            prefix.radius,
            name,
        ));
    }

    Ok(Snapshot {
        status,
        food,
        players,
    })
}

pub fn encode_handshake(
    color: Color,
    name: &str,
    limits: &WireLimits,
) -> Result<Vec<u8>, ProtocolError> {
    if name.as_bytes().contains(&TERMINATOR) {
        return Err(ProtocolError::InvalidName {
            reason: "name contains the terminator octet",
        });
    }
    if name.chars().count() > limits.max_handshake_name_chars {
        return Err(ProtocolError::InvalidName {
            reason: "name is longer than the handshake limit",
        });
    }

    let mut out = Vec::with_capacity(3 + name.len() + 1);
    out.extend_from_slice(&[color.r, color.g, color.b]);
    out.extend_from_slice(name.as_bytes());
    out.push(TERMINATOR);
    Ok(out)
}

/// Encodes active directions in the fixed order up, down, left, right.
pub fn encode_intent(intent: &Intent) -> Vec<u8> {
    let mut out = Vec::with_capacity(Direction::ALL.len() + 1);
    out.extend(intent.directions().map(Direction::code));
    out.push(TERMINATOR);
    out
}

/// Server-side encoding of a snapshot. Used to feed the decoder in tests and
/// local tooling.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, ProtocolError> {
    let food_count = list_count("food", snapshot.food.len())?;
    let player_count = list_count("player", snapshot.players.len())?;

    let mut out = Vec::with_capacity(
        3 + RECORD_PREFIX_LEN * (snapshot.food.len() + snapshot.players.len()),
    );
    out.push(snapshot.status);

    out.push(food_count);
    for food in &snapshot.food {
        write_prefix(
            &mut out,
            &RecordPrefix {
                x: food.x,
                y: food.y,
                color: food.color,
                radius: food.radius,
            },
        )?;
    }

    out.push(player_count);
    for player in &snapshot.players {
        if player.name.as_bytes().contains(&TERMINATOR) {
            return Err(ProtocolError::InvalidName {
                reason: "name contains the terminator octet",
            });
        }
        write_prefix(
            &mut out,
            &RecordPrefix {
                x: player.x,
                y: player.y,
                color: player.color,
                radius: player.radius,
            },
        )?;
        out.extend_from_slice(player.name.as_bytes());
        out.push(TERMINATOR);
    }

    Ok(out)
}

/// Server-side view of the handshake.
pub async fn decode_handshake<R>(source: &mut R, limits: &WireLimits) -> Result<Handshake, WireError>
where
    R: AsyncBufRead + Unpin,
{
    let [r, g, b] = read_field::<_, 3>(source, "handshake color").await?;
    let name = read_text(source, limits.max_name_octets, "handshake name").await?;
    Ok(Handshake::new(Color::new(r, g, b), name))
}

/// Server-side view of an intent line. Letter order is not significant.
pub async fn decode_intent<R>(source: &mut R) -> Result<Intent, WireError>
where
    R: AsyncBufRead + Unpin,
{
    let overflow = ProtocolError::OverlongIntent {
        budget: MAX_INTENT_OCTETS,
    };
    let line = read_terminated(source, MAX_INTENT_OCTETS, "intent", overflow).await?;
    let mut intent = Intent::none();
    for code in line {
        let direction = Direction::from_code(code).ok_or(ProtocolError::UnknownDirection(code))?;
        intent.set(direction, true);
    }
    Ok(intent)
}

fn list_count(kind: &'static str, count: usize) -> Result<u8, ProtocolError> {
    if count > MAX_ENTITIES_PER_LIST {
        return Err(ProtocolError::TooManyEntities { kind, count });
    }
    Ok(count as u8)
}

fn write_prefix(out: &mut Vec<u8>, prefix: &RecordPrefix) -> Result<(), ProtocolError> {
    bincode::serialize_into(&mut *out, prefix)?;
    Ok(())
}

async fn read_field<R, const N: usize>(
    source: &mut R,
    field: &'static str,
) -> Result<[u8; N], WireError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; N];
    match source.read_exact(&mut buf).await {
        Ok(_) => Ok(buf),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::Truncated { field }.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn read_prefix<R>(source: &mut R, field: &'static str) -> Result<RecordPrefix, WireError>
where
    R: AsyncRead + Unpin,
{
    let bytes = read_field::<_, RECORD_PREFIX_LEN>(source, field).await?;
    let prefix = bincode::deserialize(&bytes).map_err(ProtocolError::from)?;
    Ok(prefix)
}

async fn read_text<R>(source: &mut R, budget: usize, field: &'static str) -> Result<String, WireError>
where
    R: AsyncBufRead + Unpin,
{
    let overflow = ProtocolError::UnterminatedName { budget };
    let bytes = read_terminated(source, budget, field, overflow).await?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Reads up to the next terminator, which is consumed but not returned.
/// `overflow` is returned once more than `budget` octets precede it.
async fn read_terminated<R>(
    source: &mut R,
    budget: usize,
    field: &'static str,
    overflow: ProtocolError,
) -> Result<Vec<u8>, WireError>
where
    R: AsyncBufRead + Unpin,
{
    let mut out = Vec::new();
    loop {
        let chunk = source.fill_buf().await?;
        if chunk.is_empty() {
            return Err(ProtocolError::Truncated { field }.into());
        }

        let (taken, done) = match chunk.iter().position(|&b| b == TERMINATOR) {
            Some(end) => {
                if out.len() + end > budget {
                    return Err(overflow.into());
                }
                out.extend_from_slice(&chunk[..end]);
                (end + 1, true)
            }
            None => {
                if out.len() + chunk.len() > budget {
                    return Err(overflow.into());
                }
                out.extend_from_slice(chunk);
                (chunk.len(), false)
            }
        };
        source.consume(taken);

        if done {
            return Ok(out);
        }
    }
}
