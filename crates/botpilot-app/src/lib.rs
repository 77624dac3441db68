//! BotPilot Application
//!
//! Headless control-panel shell: a directional pad and a status label wired to
//! a robot transport, driven by pointer events read from stdin.

mod app;

pub use app::{AppError, AppResult, Pilot, run};
