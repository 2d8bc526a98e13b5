//! NTAC Engine - Game state machine for N x N tic-tac-toe
//!
//! This crate wraps the pure game logic in an engine instance:
//! - Immutable state snapshots and the closed action set
//! - The reducer (moves, resets, undo by history replay)
//! - Listener registry notified after every transition
//! - Cancellable deferred machine replies in single-player mode
//! - Sync port for mirroring a game with a remote peer

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod listeners;
pub mod reducer;
pub mod scheduler;
pub mod state;
pub mod sync;

pub use action::Action;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use listeners::{Subscription, SubscriptionId};
pub use reducer::reduce;
pub use scheduler::AiTurnTicket;
pub use state::{GameMode, GameState, Score, HUMAN, MACHINE};
pub use sync::{decode, encode, ChannelSync, SyncMessage, SyncPort};
