//! Tavli self-play simulator.
//!
//! Plays bot-versus-bot matches and logs the outcome of each one.

use rand::Rng;
use tavli_core::{Bot, Color, GameEvent, Match, RngDice, Variant};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turns after which a match is abandoned
const MAX_TURNS: u32 = 2_000;

/// Outcome of one simulated match
struct MatchSummary {
    winner: Option<Color>,
    turns: u32,
    moves: usize,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let variant: Variant = std::env::var("TAVLI_VARIANT")
        .unwrap_or_else(|_| "portes".into())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let games: u32 = std::env::var("TAVLI_GAMES")
        .unwrap_or_else(|_| "10".into())
        .parse()?;
    let seed: u64 = match std::env::var("TAVLI_SEED") {
        Ok(seed) => seed.parse()?,
        Err(_) => rand::thread_rng().gen(),
    };

    info!(%variant, games, seed, "Starting Tavli self-play");

    let mut dice = RngDice::with_seed(seed);
    let mut wins = [0u32; 2];
    let mut abandoned = 0;

    for game in 1..=games {
        let summary = play_match(variant, &mut dice)?;
        match summary.winner {
            Some(Color::White) => wins[0] += 1,
            Some(Color::Black) => wins[1] += 1,
            None => abandoned += 1,
        }
        info!(
            game,
            winner = ?summary.winner,
            turns = summary.turns,
            moves = summary.moves,
            "Match finished"
        );
    }

    info!(
        %variant,
        white = wins[0],
        black = wins[1],
        abandoned,
        "Self-play complete"
    );
    Ok(())
}

/// Play one match to completion (or until the turn cap)
fn play_match(
    variant: Variant,
    dice: &mut RngDice<rand::rngs::StdRng>,
) -> anyhow::Result<MatchSummary> {
    let mut game = Match::new(variant);
    let white = Bot::new(Color::White);
    let black = Bot::new(Color::Black);

    while !game.is_finished() && game.state().turn_number <= MAX_TURNS {
        let player = game.state().current_player;
        let bot = match player {
            Color::White => &white,
            Color::Black => &black,
        };

        let events = game.roll(player, dice)?;
        for event in &events {
            if let GameEvent::TurnForfeited { unused, .. } = event {
                debug!(match_id = %game.id, %player, ?unused, "No legal move");
            }
        }

        while !game.is_finished() && game.state().current_player == player {
            let Some(mv) = game.ai_move(bot) else {
                anyhow::bail!("bot found no move mid-turn in match {}", game.id);
            };
            game.play(player, mv)?;
        }
    }

    if !game.is_finished() {
        warn!(match_id = %game.id, "Match abandoned after {} turns", MAX_TURNS);
    }

    Ok(MatchSummary {
        winner: game.state().winner,
        turns: game.state().turn_number,
        moves: game.history().len(),
    })
}
