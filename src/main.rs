//! Target Rush entry point
//!
//! The browser build is driven from page scripts through `platform::web`.
//! Natively this plays one headless round with a scripted clicker.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Target Rush (native) starting...");
    log::info!("Native mode runs a headless demo round - build for wasm32 to play");

    if let Err(e) = demo::run() {
        eprintln!("demo failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use target_rush::identity::{Credentials, SignInMode, sign_in};
    use target_rush::ranking::{Aggregator, rank_label};
    use target_rush::sim::{Clock, GameEvent, GamePhase, GameSession, ManualClock};
    use target_rush::{GameConfig, MemoryStore};

    /// Demo frame step (ms)
    const FRAME_MS: u64 = 100;
    /// Chance the scripted player clicks something each frame
    const CLICK_CHANCE: f64 = 0.15;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let seed = std::env::var("TARGET_RUSH_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2024);
        let area = Vec2::new(800.0, 500.0);

        let mut store = MemoryStore::new();
        let credentials = Credentials {
            username: "HeadlessHero".to_string(),
            email: String::new(),
            password: "demo".to_string(),
        };
        sign_in(&mut store, &credentials, SignInMode::Login)?;

        let config = GameConfig::load();
        let mut session = GameSession::new(store, config, seed)?;
        let clock = ManualClock::new(0);
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);

        session.start(clock.now_ms());
        let (mut spawned, mut hits) = (0, 0);
        while session.phase() == GamePhase::Running {
            clock.advance(FRAME_MS);
            for event in session.advance_to(clock.now_ms(), &area) {
                match event {
                    GameEvent::TargetSpawned { .. } => spawned += 1,
                    GameEvent::RoundEnded { score } => println!("Round over: {score} pts"),
                    GameEvent::ScoreCommitted { total } => println!("Total points: {total}"),
                    _ => {}
                }
            }

            if player.random_bool(CLICK_CHANCE) {
                let live = session.targets();
                if !live.is_empty() {
                    let pick = live[player.random_range(0..live.len())];
                    let click = pick.pos + Vec2::splat(pick.size / 2.0);
                    if session.hit_at(click).is_some() {
                        hits += 1;
                    }
                }
            }
        }
        println!("Hit {hits} of {spawned} targets");

        let aggregator = Aggregator::with_reference_players(session.config());
        let ranking = aggregator.aggregate(session.user(), &mut player);
        println!("\nLeaderboard:");
        for standing in &ranking.standings {
            let marker = if ranking.is_user(standing) { ">" } else { " " };
            let status = if standing.qualified { "qualified" } else { "" };
            println!(
                "{marker} {:>2}. {:<14} {:>6}  {status}",
                standing.position, standing.username, standing.points
            );
        }
        println!(
            "\nYou: {} ({})",
            rank_label(ranking.user.position),
            if ranking.user.qualified {
                "qualified"
            } else {
                "keep playing to reach the top 10"
            }
        );
        Ok(())
    }
}
