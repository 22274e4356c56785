pub mod config;
pub mod error;
pub mod frame_loop;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use frame_loop::{
    FrameBroadcast, FrameCommand, FrameDriver, LoopOptions, LoopSummary, Renderer, StopReason,
    TickOutcome, spawn_frame_loop,
};
