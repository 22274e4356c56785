use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use brickhop_core::game_trait::{Game, GameEvent, SessionStatus};
use brickhop_core::input::InputState;

const DEFAULT_TICK_RATE_HZ: f32 = 60.0;

/// Commands sent from the input side (keyboard, tests, the binary) to the
/// frame loop.
#[derive(Debug)]
pub enum FrameCommand {
    KeyDown(String),
    KeyUp(String),
    /// Restart the session. Resumes ticking after game over.
    Reset,
    Stop,
}

/// Messages the frame loop publishes to whoever draws or logs frames.
#[derive(Debug, Clone)]
pub enum FrameBroadcast {
    /// One rendered frame. `state` is the game's serialized state and
    /// uses `Bytes` so observers can clone it cheaply.
    Frame {
        tick: u64,
        state: Bytes,
        session: SessionStatus,
        events: Vec<GameEvent>,
    },
    /// The session just ended. No frames follow until a reset.
    GameOver { final_score: u32 },
    /// The loop has exited.
    Stopped,
}

/// Receives every frame right after its update.
pub trait Renderer {
    fn render(&mut self, tick: u64, game: &dyn Game, events: &[GameEvent]);
}

/// Renderer that publishes each frame on an mpsc channel.
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<FrameBroadcast>,
}

impl ChannelRenderer {
    pub fn new(tx: mpsc::UnboundedSender<FrameBroadcast>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, tick: u64, game: &dyn Game, events: &[GameEvent]) {
        let _ = self.tx.send(FrameBroadcast::Frame {
            tick,
            state: Bytes::from(game.serialize_state()),
            session: game.session(),
            events: events.to_vec(),
        });
    }
}

/// Result of asking the driver for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Update and render ran; the session goes on.
    Continued,
    /// Update and render ran, and this tick ended the session.
    GameOver,
    /// The session was already over; nothing ran.
    Halted,
    /// The cancellation token fired; nothing ran.
    Cancelled,
}

/// Synchronous core of the frame loop: owns the game, the held-key map and
/// the cancellation token, and runs exactly one update plus one render per
/// tick.
pub struct FrameDriver {
    game: Box<dyn Game>,
    input: InputState,
    cancel: CancellationToken,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(game: Box<dyn Game>, cancel: CancellationToken) -> Self {
        Self {
            game,
            input: InputState::new(),
            cancel,
            ticks: 0,
        }
    }

    pub fn game(&self) -> &dyn Game {
        &*self.game
    }

    /// Frames rendered since the driver was created, across resets.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.on_key_down(code)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.on_key_up(code)
    }

    /// Reset the session and forget held keys.
    pub fn reset(&mut self) {
        self.game.reset();
        self.input.clear();
    }

    /// Run one tick. Cancellation is checked first, so a tick never fires
    /// after the token is cancelled.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> TickOutcome {
        if self.cancel.is_cancelled() {
            return TickOutcome::Cancelled;
        }
        if self.game.is_game_over() {
            return TickOutcome::Halted;
        }

        let input = self.input.take_frame();
        let events = self.game.update(&input);
        self.ticks += 1;
        renderer.render(self.ticks, &*self.game, &events);

        if self.game.is_game_over() {
            TickOutcome::GameOver
        } else {
            TickOutcome::Continued
        }
    }
}

/// Options for the async loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Stop once the driver has rendered this many frames.
    pub max_ticks: Option<u64>,
    /// Reset immediately after game over instead of waiting for `Reset`.
    pub auto_reset: bool,
}

/// Why the loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `Stop` command, or every command sender was dropped.
    Stopped,
    Cancelled,
    MaxTicks,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopSummary {
    pub ticks: u64,
    pub session: SessionStatus,
    pub reason: StopReason,
}

/// Spawn the frame loop as a tokio task.
/// Returns the command sender, the broadcast receiver and the task handle.
pub fn spawn_frame_loop(
    driver: FrameDriver,
    options: LoopOptions,
) -> (
    mpsc::UnboundedSender<FrameCommand>,
    mpsc::UnboundedReceiver<FrameBroadcast>,
    JoinHandle<LoopSummary>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(run_frame_loop(driver, options, cmd_rx, broadcast_tx));

    (cmd_tx, broadcast_rx, handle)
}

/// Period for one tick at `tick_rate` Hz. Rates with no usable period
/// (zero, negative, non-finite, or fast enough to round to zero) fall back
/// to 60 Hz.
pub fn tick_period(tick_rate: f32) -> Duration {
    match Duration::try_from_secs_f32(1.0 / tick_rate) {
        Ok(period) if !period.is_zero() => period,
        _ => {
            tracing::warn!(tick_rate, "Unusable tick rate, using {DEFAULT_TICK_RATE_HZ} Hz");
            Duration::from_secs_f32(1.0 / DEFAULT_TICK_RATE_HZ)
        },
    }
}

/// Fixed-step loop: one tick per display refresh until stopped, cancelled
/// or out of ticks. Ticking pauses while the session is over.
pub async fn run_frame_loop(
    mut driver: FrameDriver,
    options: LoopOptions,
    mut cmd_rx: mpsc::UnboundedReceiver<FrameCommand>,
    broadcast_tx: mpsc::UnboundedSender<FrameBroadcast>,
) -> LoopSummary {
    let cancel = driver.cancel_token();
    let mut renderer = ChannelRenderer::new(broadcast_tx.clone());

    let tick_rate = driver.game().tick_rate();
    let tick_interval = tick_period(tick_rate);
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut halted = driver.game().is_game_over();
    tracing::info!(tick_rate, "Frame loop started");

    let reason = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break StopReason::Cancelled,
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(FrameCommand::KeyDown(code)) => {
                        driver.key_down(&code);
                    },
                    Some(FrameCommand::KeyUp(code)) => {
                        driver.key_up(&code);
                    },
                    Some(FrameCommand::Reset) => {
                        driver.reset();
                        if halted {
                            halted = false;
                            interval.reset();
                        }
                    },
                    Some(FrameCommand::Stop) | None => break StopReason::Stopped,
                }
            }
            _ = interval.tick(), if !halted => {
                match driver.tick(&mut renderer) {
                    TickOutcome::Continued => {},
                    TickOutcome::GameOver => {
                        let final_score = driver.game().session().score;
                        let _ = broadcast_tx.send(FrameBroadcast::GameOver { final_score });
                        if options.auto_reset {
                            tracing::info!(tick = driver.ticks(), final_score, "Auto-reset after game over");
                            driver.reset();
                        } else {
                            tracing::info!(tick = driver.ticks(), final_score, "Game over, waiting for reset");
                            halted = true;
                        }
                    },
                    TickOutcome::Halted => halted = true,
                    TickOutcome::Cancelled => break StopReason::Cancelled,
                }
            }
        }

        if let Some(max) = options.max_ticks
            && driver.ticks() >= max
        {
            break StopReason::MaxTicks;
        }
    };

    let summary = LoopSummary {
        ticks: driver.ticks(),
        session: driver.game().session(),
        reason,
    };
    tracing::info!(
        tick = summary.ticks,
        score = summary.session.score,
        reason = ?summary.reason,
        "Frame loop stopped"
    );
    let _ = broadcast_tx.send(FrameBroadcast::Stopped);
    summary
}
