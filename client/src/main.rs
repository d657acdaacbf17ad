use clap::Parser;
use client::config::ClientConfig;
use client::input::{InputMode, InputSampler, MacroquadKeys};
use client::menu::{MenuEvent, MenuOutcome, MenuState};
use client::rendering::Renderer;
use client::session::Session;
use log::{error, info, warn};
use macroquad::prelude::*;
use macroquad::window::Conf;
use shared::{WireLimits, DEFAULT_ADDR, DEFAULT_MAX_NAME_OCTETS, DEFAULT_PORT};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 'a', long, default_value = DEFAULT_ADDR)]
    addr: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Give up when no snapshot arrives for this long (0 waits forever)
    #[arg(long, default_value = "10000")]
    read_timeout_ms: u64,

    /// How held movement keys are turned into intents
    #[arg(short = 'i', long, value_enum, default_value_t = InputMode::Level)]
    input_mode: InputMode,

    /// Longest player name accepted from the server, in octets
    #[arg(long, default_value_t = DEFAULT_MAX_NAME_OCTETS)]
    max_name_octets: usize,

    /// Window width
    #[arg(short = 'w', long, default_value = "1440")]
    width: usize,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "900")]
    height: usize,
}

impl Args {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            server_addr: self.addr,
            port: self.port,
            read_timeout: (self.read_timeout_ms > 0)
                .then(|| Duration::from_millis(self.read_timeout_ms)),
            input_mode: self.input_mode,
            limits: WireLimits {
                max_name_octets: self.max_name_octets,
                ..WireLimits::default()
            },
            window_width: self.width,
            window_height: self.height,
        }
    }
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "Agar.IO".to_owned(),
        window_width: args.width as i32,
        window_height: args.height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    if let Err(e) = run(Args::parse().into_config()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Socket I/O runs on a current-thread runtime driven from the frame loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut session = runtime.block_on(Session::connect(&config))?;
    let mut renderer = Renderer::new(config.window_width, config.window_height);
    let mut menu = MenuState::new(
        ::rand::thread_rng(),
        config.limits.max_handshake_name_chars,
    );

    prevent_quit();
    info!("Controls: arrow keys or WASD to move, Escape to quit");

    loop {
        match menu.handle_all(menu_events()) {
            MenuOutcome::Continue => {}
            MenuOutcome::Quit => {
                runtime.block_on(session.handshake(None))?;
                return Ok(());
            }
            MenuOutcome::Submit(handshake) => {
                match runtime.block_on(session.handshake(Some(&handshake))) {
                    Ok(()) => {
                        renderer.track_local_player(&handshake);
                        break;
                    }
                    Err(e) if e.is_recoverable() => warn!("{}", e),
                    Err(e) => return Err(e.into()),
                }
            }
        }

        renderer.draw_menu(&menu);
        next_frame().await;
    }

    let mut input = InputSampler::new(MacroquadKeys, config.input_mode);
    info!("Input mode: {:?}", input.mode());

    while !(is_quit_requested() || is_key_pressed(KeyCode::Escape)) {
        runtime.block_on(session.tick(&mut renderer, &mut input))?;
        next_frame().await;
    }

    info!("Leaving after {} ticks", session.ticks());
    session.close();
    Ok(())
}

fn menu_events() -> Vec<MenuEvent> {
    let mut events = Vec::new();

    while let Some(c) = get_char_pressed() {
        events.push(MenuEvent::Char(c));
    }
    if is_key_pressed(KeyCode::Backspace) {
        events.push(MenuEvent::Backspace);
    }
    if is_key_pressed(KeyCode::LeftControl) || is_key_pressed(KeyCode::RightControl) {
        events.push(MenuEvent::RerollColor);
    }
    if is_key_pressed(KeyCode::Enter) {
        events.push(MenuEvent::Submit);
    }
    if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
        events.push(MenuEvent::Quit);
    }

    events
}
