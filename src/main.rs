use chess_core::config::AppConfig;
use chess_core::service::{MatchStore, ServiceError};

const WHITE: &str = "ai-white";
const BLACK: &str = "ai-black";

#[tokio::main]
async fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info".into()),
        )
        .init();

    if let Err(e) = run(AppConfig::from_env()).await {
        eprintln!("Self-play failed: {e}");
        std::process::exit(1);
    }
}

/// Two AI identities play each other until the game ends or the ply cap is
/// reached. Prints the PGN and the final JSON state.
async fn run(config: AppConfig) -> Result<(), ServiceError> {
    let max_plies = config.self_play_max_plies;
    let difficulty = config.default_difficulty;
    let store = MatchStore::new(config);

    tracing::info!(
        "chess-core v{} self-play at {difficulty}, up to {max_plies} plies",
        env!("CARGO_PKG_VERSION")
    );

    let id = store.create_match(WHITE, BLACK).await;
    for _ in 0..max_plies {
        if store.state(&id).await?.status.is_game_over() {
            break;
        }
        if store.play_ai_turn(&id, Some(difficulty)).await?.is_none() {
            break;
        }
    }

    println!("{}", store.pgn(&id).await?);
    let full = store.full_state(&id).await?;
    match serde_json::to_string_pretty(&full) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Could not serialize final state: {e}"),
    }
    Ok(())
}
