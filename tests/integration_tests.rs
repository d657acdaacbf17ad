//! Integration tests for the client session against a real TCP peer
//!
//! Each test runs a scripted server on an ephemeral port and drives the
//! client session against it.

use assert_approx_eq::assert_approx_eq;
use client::config::ClientConfig;
use client::error::ClientError;
use client::input::{InputMode, InputSampler, KeySource};
use client::rendering::RenderSurface;
use client::session::{Session, SessionState};
use shared::{
    decode_handshake, decode_intent, encode_snapshot, Color, Direction, Food, Handshake, Intent,
    Player, ProtocolError, Snapshot, WireLimits,
};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

#[derive(Default)]
struct RecordingSurface {
    frames: Vec<Snapshot>,
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, status: u8, food: &[Food], players: &[Player]) {
        self.frames.push(Snapshot {
            status,
            food: food.to_vec(),
            players: players.to_vec(),
        });
    }
}

#[derive(Default)]
struct HeldKeys {
    held: Intent,
}

impl KeySource for HeldKeys {
    fn is_down(&self, direction: Direction) -> bool {
        self.held.contains(direction)
    }
}

async fn listen() -> (TcpListener, ClientConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig {
        server_addr: "127.0.0.1".to_string(),
        port,
        read_timeout: Some(Duration::from_secs(5)),
        ..ClientConfig::default()
    };
    (listener, config)
}

fn world(tick: u8) -> Snapshot {
    Snapshot {
        status: 1,
        food: (0..tick)
            .map(|i| Food::new(10 * i as u16, 20, Color::new(i, 100, 200), 4.0))
            .collect(),
        players: vec![
            Player::new(50 + tick as u16, 60, Color::new(255, 0, 0), 12.5, "Bob"),
            Player::new(300, 300, Color::new(0, 0, 255), 30.0, "Eve"),
        ],
    }
}

/// FULL SESSION TESTS
mod session_tests {
    use super::*;

    /// Runs handshake and several ticks, then the server hangs up
    #[tokio::test]
    async fn full_session_over_tcp() {
        let (listener, config) = listen().await;

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(socket);
            let limits = WireLimits::default();

            let handshake = decode_handshake(&mut stream, &limits).await.unwrap();
            let mut intents = Vec::new();
            for tick in 0..3 {
                let bytes = encode_snapshot(&world(tick)).unwrap();
                stream.write_all(&bytes).await.unwrap();
                intents.push(decode_intent(&mut stream).await.unwrap());
            }
            (handshake, intents)
        });

        let mut session = Session::connect(&config).await.unwrap();
        assert_eq!(session.state(), SessionState::Handshaking);

        session
            .handshake(Some(&Handshake::new(Color::new(255, 0, 0), "Bob")))
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut input = InputSampler::new(HeldKeys::default(), InputMode::Level);
        let held = [
            Intent::from_directions([Direction::Up]),
            Intent::from_directions([Direction::Right, Direction::Down]),
            Intent::none(),
        ];
        for keys in held {
            input.keys_mut().held = keys;
            session.tick(&mut surface, &mut input).await.unwrap();
        }

        let (handshake, intents) = server.await.unwrap();
        assert_eq!(handshake, Handshake::new(Color::new(255, 0, 0), "Bob"));
        assert_eq!(intents, held.to_vec());
        assert_eq!(surface.frames, vec![world(0), world(1), world(2)]);
        let last = session.snapshot().unwrap();
        assert_approx_eq!(last.players[0].radius, 12.5);
        assert_approx_eq!(last.players[1].radius, 30.0);
        assert_eq!(session.ticks(), 3);

        let result = session.tick(&mut surface, &mut input).await;
        assert!(matches!(result, Err(ClientError::ConnectionLost(_))));
        assert_eq!(session.state(), SessionState::Closed);
    }

    /// Checks the exact octets the server sees
    #[tokio::test]
    async fn wire_bytes_seen_by_server() {
        let (listener, config) = listen().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut handshake = [0u8; 7];
            socket.read_exact(&mut handshake).await.unwrap();

            let empty = Snapshot::default();
            socket
                .write_all(&encode_snapshot(&empty).unwrap())
                .await
                .unwrap();

            let mut intent = [0u8; 3];
            socket.read_exact(&mut intent).await.unwrap();
            (handshake, intent)
        });

        let mut session = Session::connect(&config).await.unwrap();
        session
            .handshake(Some(&Handshake::new(Color::new(255, 0, 0), "Bob")))
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut input = InputSampler::new(HeldKeys::default(), InputMode::Level);
        input.keys_mut().held = Intent::from_directions([Direction::Left, Direction::Up]);
        session.tick(&mut surface, &mut input).await.unwrap();

        let (handshake, intent) = server.await.unwrap();
        assert_eq!(handshake, [0xFF, 0x00, 0x00, 0x42, 0x6F, 0x62, 0x0A]);
        assert_eq!(&intent, b"ul\n");
        assert_eq!(surface.frames, vec![Snapshot::default()]);
    }

    /// Edge-triggered input sends a direction only on the tick it is pressed
    #[tokio::test]
    async fn edge_mode_over_tcp() {
        let (listener, config) = listen().await;

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(socket);
            decode_handshake(&mut stream, &WireLimits::default())
                .await
                .unwrap();

            let mut intents = Vec::new();
            for _ in 0..2 {
                let bytes = encode_snapshot(&Snapshot::default()).unwrap();
                stream.write_all(&bytes).await.unwrap();
                intents.push(decode_intent(&mut stream).await.unwrap());
            }
            intents
        });

        let mut session = Session::connect(&config).await.unwrap();
        session
            .handshake(Some(&Handshake::new(Color::new(1, 2, 3), "Al")))
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut input = InputSampler::new(HeldKeys::default(), InputMode::Edge);
        input.keys_mut().held = Intent::from_directions([Direction::Left]);
        session.tick(&mut surface, &mut input).await.unwrap();
        session.tick(&mut surface, &mut input).await.unwrap();

        let intents = server.await.unwrap();
        assert_eq!(
            intents,
            vec![Intent::from_directions([Direction::Left]), Intent::none()]
        );
    }
}

/// FAILURE HANDLING TESTS
mod failure_tests {
    use super::*;

    /// Connecting to a closed port fails with a connection error
    #[tokio::test]
    async fn connection_refused() {
        let (listener, config) = listen().await;
        drop(listener);

        let result = Session::connect(&config).await;
        assert!(matches!(result, Err(ClientError::Connection { .. })));
    }

    /// A silent server trips the read timeout
    #[tokio::test]
    async fn silent_server_times_out() {
        let (listener, mut config) = listen().await;
        config.read_timeout = Some(Duration::from_millis(50));

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(socket);
            decode_handshake(&mut stream, &WireLimits::default())
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(stream);
        });

        let mut session = Session::connect(&config).await.unwrap();
        session
            .handshake(Some(&Handshake::new(Color::new(1, 2, 3), "Al")))
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut input = InputSampler::new(HeldKeys::default(), InputMode::Level);
        match session.tick(&mut surface, &mut input).await {
            Err(ClientError::ConnectionLost(e)) => assert_eq!(e.kind(), io::ErrorKind::TimedOut),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Closed);

        server.await.unwrap();
    }

    /// A name with no terminator is cut off at the configured budget
    #[tokio::test]
    async fn oversized_name_is_rejected() {
        let (listener, mut config) = listen().await;
        config.limits = WireLimits {
            max_name_octets: 64,
            ..WireLimits::default()
        };

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(socket);
            decode_handshake(&mut stream, &WireLimits::default())
                .await
                .unwrap();

            let mut bytes = vec![1, 0, 1];
            bytes.extend_from_slice(&[0u8; shared::RECORD_PREFIX_LEN]);
            bytes.extend(std::iter::repeat(b'a').take(4096));
            // The client may hang up before everything is written
            let _ = stream.write_all(&bytes).await;
        });

        let mut session = Session::connect(&config).await.unwrap();
        session
            .handshake(Some(&Handshake::new(Color::new(1, 2, 3), "Al")))
            .await
            .unwrap();

        let mut surface = RecordingSurface::default();
        let mut input = InputSampler::new(HeldKeys::default(), InputMode::Level);
        let result = session.tick(&mut surface, &mut input).await;
        assert!(matches!(
            result,
            Err(ClientError::Protocol(ProtocolError::UnterminatedName {
                budget: 64
            }))
        ));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(surface.frames.is_empty());

        server.await.unwrap();
    }

    /// Cancelling at the menu closes without writing anything
    #[tokio::test]
    async fn cancelled_handshake_sends_nothing() {
        let (listener, config) = listen().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let mut session = Session::connect(&config).await.unwrap();
        session.handshake(None).await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        drop(session);

        let received = server.await.unwrap();
        assert!(received.is_empty());
    }
}
