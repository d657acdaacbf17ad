//! # Game Client Library
//!
//! Client side of a blob-eating arena game. The client joins a server with a
//! name and a color, then runs a lockstep loop: the server pushes a snapshot of
//! every food pellet and player each tick, the client answers with the
//! directions the player is currently pressing.
//!
//! ## Architecture Overview
//!
//! ### Session
//! A [`session::Session`] owns the connection and the most recent snapshot. It
//! moves through `Connecting → Handshaking → Ticking → Closed`; any I/O or
//! protocol failure closes it for good. There is no reconnect and no attempt to
//! resynchronize a damaged stream, since the protocol has no framing to
//! recover on.
//!
//! ### Tick Loop
//! Each call to [`session::Session::tick`]:
//! 1. blocks until a complete snapshot has been decoded,
//! 2. hands it to a [`rendering::RenderSurface`],
//! 3. samples the keyboard through an [`input::InputSampler`],
//! 4. sends the encoded intent back.
//!
//! The loop is single threaded and can only be stopped between ticks.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! Buffered TCP transport with an optional read timeout. Names in snapshots are
//! scanned out of the read buffer in chunks rather than one read per octet.
//!
//! ### Input Module (`input`)
//! Maps held keys to an [`shared::Intent`], either every tick while held
//! (level mode, the default) or once per key press (edge mode).
//!
//! ### Game Module (`game`)
//! Picks the local player's blob out of each snapshot by name, color and
//! proximity to where it was last seen.
//!
//! ### Menu Module (`menu`)
//! Name entry and color selection that produce the handshake.
//!
//! ### Rendering Module (`rendering`)
//! The render surface trait plus a macroquad implementation.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::config::ClientConfig;
//! use client::input::{InputSampler, MacroquadKeys};
//! use client::rendering::Renderer;
//! use client::session::Session;
//! use shared::{Color, Handshake};
//!
//! # async fn run() -> Result<(), client::error::ClientError> {
//! let config = ClientConfig::default();
//! let mut session = Session::connect(&config).await?;
//! session
//!     .handshake(Some(&Handshake::new(Color::new(255, 0, 0), "Bob")))
//!     .await?;
//!
//! let mut renderer = Renderer::new(config.window_width, config.window_height);
//! let mut input = InputSampler::new(MacroquadKeys, config.input_mode);
//! loop {
//!     session.tick(&mut renderer, &mut input).await?;
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod menu;
pub mod network;
pub mod rendering;
pub mod session;
