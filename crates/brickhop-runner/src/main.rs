use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use brickhop_core::game_trait::{Game, GameEvent};
use brickhop_platformer::physics::PlatformerConfig;
use brickhop_platformer::{Platformer, PlatformerState};
use brickhop_runner::{
    FrameBroadcast, FrameCommand, FrameDriver, LoopOptions, RunnerConfig, RunnerError,
    spawn_frame_loop,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Brickhop exited with an error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), RunnerError> {
    let mut config = RunnerConfig::load();
    config.apply_args(std::env::args().skip(1));
    config.validate()?;

    let mut game = Platformer::with_config(PlatformerConfig::load());
    if let Some(lives) = config.lives {
        game.reset_with_lives(lives)?;
    }

    let meta = game.metadata();
    tracing::info!(
        name = %meta.name,
        tick_rate = game.tick_rate(),
        max_ticks = ?config.max_ticks,
        "{}",
        meta.instructions
    );

    let driver = FrameDriver::new(Box::new(game), CancellationToken::new());
    let cancel = driver.cancel_token();
    let options = LoopOptions {
        max_ticks: config.max_ticks,
        auto_reset: config.auto_reset,
    };
    let (cmd_tx, mut broadcast_rx, handle) = spawn_frame_loop(driver, options);

    for key in &config.hold_keys {
        let _ = cmd_tx.send(FrameCommand::KeyDown(key.clone()));
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping");
            cancel.cancel();
        }
    });

    while let Some(msg) = broadcast_rx.recv().await {
        match msg {
            FrameBroadcast::Frame {
                tick,
                state,
                session,
                events,
            } => {
                for event in &events {
                    log_event(tick, event);
                }
                if tick % config.log_every_ticks == 0 {
                    match rmp_serde::from_slice::<PlatformerState>(&state) {
                        Ok(s) => tracing::info!(
                            tick,
                            score = session.score,
                            lives = session.lives,
                            x = s.player.x,
                            y = s.player.y,
                            grounded = s.player.grounded,
                            enemies = s.enemies.len(),
                            "Frame"
                        ),
                        Err(e) => tracing::warn!(tick, error = %e, "Undecodable frame state"),
                    }
                }
            },
            FrameBroadcast::GameOver { final_score } => {
                if !config.auto_reset {
                    tracing::info!(final_score, "Session over, stopping");
                    let _ = cmd_tx.send(FrameCommand::Stop);
                }
            },
            FrameBroadcast::Stopped => break,
        }
    }

    let summary = handle.await?;
    tracing::info!(
        ticks = summary.ticks,
        score = summary.session.score,
        lives = summary.session.lives,
        reason = ?summary.reason,
        "Brickhop finished"
    );
    Ok(())
}

fn log_event(tick: u64, event: &GameEvent) {
    match event {
        GameEvent::CoinCollected { index, score } => {
            tracing::debug!(tick, index, score, "Coin collected");
        },
        GameEvent::EnemyStomped { score } => tracing::debug!(tick, score, "Enemy stomped"),
        GameEvent::LifeLost { lives } => tracing::info!(tick, lives, "Life lost"),
        GameEvent::LevelCleared { score } => tracing::info!(tick, score, "Level cleared"),
        GameEvent::GameOver { final_score } => tracing::info!(tick, final_score, "Game over"),
    }
}
