use clap::Parser;
use client::dictionary::Dictionary;
use client::game::RoundController;
use client::input::player_name;
use client::network;
use client::rendering::Renderer;
use log::info;
use shared::TokenReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:2983")]
    server: String,

    /// Sorted word list, one word per line
    #[arg(short = 'd', long, default_value = "resources/words.txt")]
    dictionary: PathBuf,

    /// Round length in seconds
    #[arg(short = 't', long, default_value = "180")]
    round_secs: u64,

    /// Player name; asked for at startup when omitted
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let dictionary = Dictionary::load(&args.dictionary)?;
    info!(
        "Loaded {} words from {}",
        dictionary.len(),
        args.dictionary.display()
    );

    let mut input = TokenReader::new(BufReader::new(tokio::io::stdin()));

    // Blank names are asked for again so the name shown as "You" is the one
    // the server records
    let name = match args.name.as_deref().and_then(player_name) {
        Some(name) => name,
        None => loop {
            println!("Please enter your name:");
            if let Some(name) = player_name(&input.next_line().await?) {
                break name;
            }
        },
    };
    let renderer = Renderer::new(name.as_str());
    println!("{}", renderer.welcome());

    let joined = network::connect(&args.server, &name).await?;

    let controller = RoundController::new(
        joined,
        input,
        Arc::new(dictionary),
        renderer,
        Duration::from_secs(args.round_secs),
    );
    let rounds = controller.run().await?;

    println!("Thanks for playing! ({} rounds)", rounds);
    Ok(())
}
