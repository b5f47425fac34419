use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blackstone::api::routes::build_router_with_cors;
use blackstone::api::state::AppState;
use blackstone::config::AppConfig;
use blackstone::engine::Engine;
use blackstone::models::{EntityId, PairingMethod};
use blackstone::roster::{PlayerDetails, Roster};
use blackstone::storage::{JsonlStore, StorageConfig};

#[derive(Parser)]
#[command(name = "blackstone")]
#[command(about = "Tabletop tournament engine - pairings, results, standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Populate a demo tournament roster
    Seed {
        /// Tournament ID to seed
        #[arg(long, default_value = "demo-gt")]
        tournament: String,

        /// Number of players to add
        #[arg(long, default_value = "8")]
        players: usize,

        /// Check everyone in after seeding
        #[arg(long)]
        check_in: bool,
    },

    /// Generate pairings for a round
    Pair {
        /// Tournament ID
        tournament: String,

        /// Round number
        #[arg(long, default_value = "1")]
        round: u32,

        /// Pairing method
        #[arg(long, default_value = "random")]
        method: PairingMethod,
    },

    /// Print the current standings table
    Placings {
        /// Tournament ID
        tournament: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting blackstone v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = PathBuf::from(data_dir);
    }

    let store = Arc::new(JsonlStore::new(StorageConfig::new(
        config.storage.data_dir.clone(),
    )));
    let engine = Engine::new(store.clone());
    let roster = Roster::new(store);

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState {
                engine,
                roster,
                default_pairing_method: config.pairing.default_method,
            };
            let app = build_router_with_cors(state, &config.server.cors_origin);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Seed {
            tournament,
            players,
            check_in,
        } => {
            let tournament_id = EntityId::from(tournament.as_str());
            let seeded = seed_roster(&roster, &tournament_id, players).await?;

            println!("\n=== Seed Results ===");
            println!("Tournament:  {}", tournament);
            println!("Players:     {}", seeded);

            if check_in {
                let checked_in = roster.check_in_all(&tournament_id).await?;
                println!("Checked in:  {}", checked_in);
            }
        }
        Commands::Pair {
            tournament,
            round,
            method,
        } => {
            let tournament_id = EntityId::from(tournament.as_str());
            let pairings = engine
                .generate_pairings(&tournament_id, round, method, StdRng::from_entropy())
                .await?;

            println!("\n=== Round {} Pairings ===", round);
            for pairing in &pairings {
                match &pairing.player2_id {
                    Some(player2) => println!(
                        "Table {:>2}: {} vs {}",
                        pairing.table_number, pairing.player1_id, player2
                    ),
                    None => println!(
                        "Table {:>2}: {} has a bye",
                        pairing.table_number, pairing.player1_id
                    ),
                }
            }
        }
        Commands::Placings { tournament } => {
            let tournament_id = EntityId::from(tournament.as_str());
            let placings = engine.get_tournament_placings(&tournament_id).await?;

            if placings.is_empty() {
                println!("No participants for tournament {}", tournament);
                return Ok(());
            }

            println!("\n=== Standings ===");
            println!("{:>4}  {:<24} {:>3} {:>3} {:>3} {:>6}", "Rank", "Player", "W", "L", "D", "BP");
            for standing in &placings {
                println!(
                    "{:>4}  {:<24} {:>3} {:>3} {:>3} {:>6}",
                    standing.rank,
                    standing.player_name,
                    standing.record.wins,
                    standing.record.losses,
                    standing.record.draws,
                    standing.total_battle_points
                );
            }
        }
    }

    Ok(())
}

const SEED_PLAYERS: &[(&str, &str, &str)] = &[
    ("Alice", "Ashford", "Aeldari"),
    ("Bob", "Barrow", "Death Guard"),
    ("Carol", "Chen", "Necrons"),
    ("Dave", "Drummond", "Orks"),
    ("Erin", "Ellis", "Space Marines"),
    ("Frank", "Fisher", "Tyranids"),
    ("Grace", "Gupta", "T'au Empire"),
    ("Hector", "Hale", "Chaos Knights"),
    ("Imogen", "Ito", "Adepta Sororitas"),
    ("Jonas", "Jensen", "World Eaters"),
    ("Kara", "Kowalski", "Astra Militarum"),
    ("Liam", "Lowe", "Grey Knights"),
];

async fn seed_roster(
    roster: &Roster,
    tournament_id: &EntityId,
    players: usize,
) -> Result<usize> {
    let mut count = 0;
    for i in 0..players {
        let (first, last, faction) = SEED_PLAYERS[i % SEED_PLAYERS.len()];
        let (first, last) = if i < SEED_PLAYERS.len() {
            (first.to_string(), last.to_string())
        } else {
            // Wrap around with numbered surnames to keep names unique
            (first.to_string(), format!("{} {}", last, i / SEED_PLAYERS.len() + 1))
        };

        roster
            .add_participant(
                tournament_id,
                PlayerDetails::new(first, last).with_faction(faction),
            )
            .await?;
        count += 1;
    }
    Ok(count)
}
