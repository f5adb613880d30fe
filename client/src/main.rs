use clap::Parser;
use log::info;
use macroquad::window::Conf;
use server::{Server, ServerConfig};
use shared::{MatchConfig, DEFAULT_SEED, WORLD_HEIGHT, WORLD_WIDTH};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run headless and serve the match to an agent over TCP
    #[arg(long)]
    server: bool,

    /// Address to bind in server mode
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on in server mode
    #[arg(short, long, default_value = "6000")]
    port: u16,

    /// Server ticks per second, 0 for unthrottled (default: one tick per 16 ms)
    #[arg(short, long)]
    tick_rate: Option<u32>,

    /// Seed for ball directions and power-up positions
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// End a session if the agent does not answer within this many milliseconds
    #[arg(long)]
    recv_timeout_ms: Option<u64>,

    /// Send power-ups and active effects instead of empty lists
    #[arg(long)]
    report_power_ups: bool,
}

fn match_config(args: &Args) -> MatchConfig {
    MatchConfig {
        seed: args.seed,
        ..MatchConfig::default()
    }
}

fn server_config(args: &Args) -> ServerConfig {
    let defaults = ServerConfig::default();
    let tick_duration = match args.tick_rate {
        Some(0) => Duration::ZERO,
        Some(rate) => Duration::from_secs_f64(1.0 / rate as f64),
        None => defaults.tick_duration,
    };

    ServerConfig {
        addr: format!("{}:{}", args.host, args.port),
        tick_duration,
        recv_timeout: args.recv_timeout_ms.map(Duration::from_millis),
        report_power_ups: args.report_power_ups,
        match_config: match_config(args),
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Pong Evolved".to_string(),
        window_width: WORLD_WIDTH as i32,
        window_height: WORLD_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    if args.server {
        let config = server_config(&args);
        info!("Starting server on {}", config.addr);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async {
            let mut server = Server::bind(config).await?;
            server.run().await
        })?;
    } else {
        info!("Starting local game");
        info!("Controls: W/S or Up/Down to move, P to pause, Escape to quit");
        macroquad::Window::from_config(window_conf(), client::game::run(match_config(&args)));
    }

    Ok(())
}
