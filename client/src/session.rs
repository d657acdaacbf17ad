//! Session state machine driving the handshake and the per-tick exchange
//!
//! ```text
//! Connecting ──connect ok──▶ Handshaking ──handshake sent──▶ Ticking
//!      │                        │                              │
//!      └─ ConnectionError       └─ cancel / I/O error ──▶ Closed ◀── I/O or protocol error, close()
//! ```

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::input::{InputSampler, KeySource};
use crate::network::Transport;
use crate::rendering::RenderSurface;
use log::{debug, info, warn};
use shared::{encode_handshake, encode_intent, Handshake, Snapshot, WireLimits};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Handshaking,
    Ticking,
    Closed,
}

/// One connection to the game server and everything it owns.
pub struct Session<S> {
    state: SessionState,
    // Dropped on close so no further I/O can be issued
    transport: Option<Transport<S>>,
    limits: WireLimits,
    snapshot: Option<Snapshot>,
    ticks: u64,
}

impl Session<BufReader<TcpStream>> {
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let mut session = Self::connecting(config.limits.clone());
        let transport =
            Transport::connect(&config.server_addr, config.port, config.read_timeout).await?;
        session.attach(transport)?;
        Ok(session)
    }
}

impl<S> Session<S>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    /// A session with no transport yet. Only [`Session::attach`] is allowed.
    pub fn connecting(limits: WireLimits) -> Self {
        debug!("Session state: {:?}", SessionState::Connecting);
        Self {
            state: SessionState::Connecting,
            transport: None,
            limits,
            snapshot: None,
            ticks: 0,
        }
    }

    /// Wraps an established transport; the session starts in `Handshaking`.
    pub fn new(transport: Transport<S>, limits: WireLimits) -> Self {
        Self {
            state: SessionState::Handshaking,
            transport: Some(transport),
            limits,
            snapshot: None,
            ticks: 0,
        }
    }

    /// Hands the connected transport over and moves on to `Handshaking`.
    pub fn attach(&mut self, transport: Transport<S>) -> Result<()> {
        self.expect_state(SessionState::Connecting)?;
        self.transport = Some(transport);
        self.transition(SessionState::Handshaking);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Most recently decoded snapshot.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sends the handshake, or closes without sending anything when `None`.
    ///
    /// A name the codec rejects leaves the session in `Handshaking` so the
    /// caller can prompt again.
    pub async fn handshake(&mut self, handshake: Option<&Handshake>) -> Result<()> {
        self.expect_state(SessionState::Handshaking)?;

        let Some(handshake) = handshake else {
            info!("Handshake cancelled");
            self.close();
            return Ok(());
        };

        let bytes = match encode_handshake(handshake.color, &handshake.name, &self.limits) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Rejected name {:?}: {}", handshake.name, e);
                return Err(e.into());
            }
        };

        let result = match self.transport.as_mut() {
            Some(transport) => transport.send(&bytes).await,
            None => Err(ClientError::InvalidState(SessionState::Closed)),
        };
        if let Err(e) = result {
            return Err(self.fail(e));
        }

        info!("Joined as {:?}", handshake.name);
        self.transition(SessionState::Ticking);
        Ok(())
    }

    /// Runs one request/response cycle: snapshot in, render, intent out.
    pub async fn tick<R, K>(&mut self, surface: &mut R, input: &mut InputSampler<K>) -> Result<()>
    where
        R: RenderSurface + ?Sized,
        K: KeySource,
    {
        self.expect_state(SessionState::Ticking)?;
        let Some(transport) = self.transport.as_mut() else {
            return Err(ClientError::InvalidState(SessionState::Closed));
        };

        let snapshot = match transport.read_snapshot(&self.limits).await {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.fail(e)),
        };
        let snapshot = self.snapshot.insert(snapshot);
        surface.render(snapshot.status, &snapshot.food, &snapshot.players);

        let intent = input.sample();
        debug!("Tick {}: sending intent {}", self.ticks, intent);
        let bytes = encode_intent(&intent);
        if let Err(e) = transport.send(&bytes).await {
            return Err(self.fail(e));
        }

        self.ticks += 1;
        Ok(())
    }

    /// Stops the session between ticks. Idempotent.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            self.transport = None;
            self.transition(SessionState::Closed);
        }
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ClientError::InvalidState(self.state))
        }
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        warn!("Closing session: {}", error);
        self.close();
        error
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
