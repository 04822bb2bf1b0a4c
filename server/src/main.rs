use clap::Parser;
use log::info;
use server::network::MatchServer;
use shared::{CubePool, DEFAULT_COHORT_SIZE, DEFAULT_PORT};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Players per match
    #[arg(short = 'n', long, default_value_t = DEFAULT_COHORT_SIZE)]
    players: usize,

    /// Cube file: 16 lines of 6 letters
    #[arg(short, long, default_value = "resources/cubes.txt")]
    cubes: PathBuf,

    /// Use the built-in classic cube set instead of a cube file
    #[arg(long)]
    classic_cubes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let pool = if args.classic_cubes {
        CubePool::classic()
    } else {
        CubePool::load(&args.cubes)?
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = MatchServer::bind(&address, args.players, pool).await?;

    tokio::select! {
        _ = server.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
