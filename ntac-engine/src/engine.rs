//! The engine instance: current state, listeners, pending machine reply
//!
//! All methods take `&self` so a listener holding a handle to the engine
//! may dispatch from inside its callback. No borrow of the state or the
//! registry is held while listeners run.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use ntac_core::{MinimaxAI, Position};

use crate::action::Action;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::listeners::{broadcast, Listeners, Subscription};
use crate::reducer::reduce;
use crate::scheduler::{AiScheduler, AiTurnTicket};
use crate::state::{GameMode, GameState, Score, MACHINE};
use crate::sync::{SyncMessage, SyncPort};

/// N x N tic-tac-toe engine
pub struct Engine {
    state: RefCell<GameState>,
    listeners: Rc<RefCell<Listeners>>,
    scheduler: RefCell<AiScheduler>,
    ai: RefCell<MinimaxAI>,
    sync: RefCell<Option<Box<dyn SyncPort>>>,
    score: Cell<Score>,
    ai_delay: Duration,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let state = GameState::fresh(config.board_size, config.game_mode, config.difficulty, None)?;
        let ai = match config.seed {
            Some(seed) => MinimaxAI::with_seed(MACHINE, seed),
            None => MinimaxAI::new(MACHINE),
        };
        Ok(Self {
            state: RefCell::new(state),
            listeners: Rc::new(RefCell::new(Listeners::new())),
            scheduler: RefCell::new(AiScheduler::new()),
            ai: RefCell::new(ai),
            sync: RefCell::new(None),
            score: Cell::new(Score::default()),
            ai_delay: config.ai_delay(),
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Snapshot of the current state
    pub fn state(&self) -> GameState {
        self.state.borrow().clone()
    }

    pub fn score(&self) -> Score {
        self.score.get()
    }

    pub fn is_valid_move(&self, pos: Position) -> bool {
        self.state.borrow().is_valid_move(pos)
    }

    pub fn available_moves(&self) -> Vec<Position> {
        self.state.borrow().available_moves()
    }

    /// Move the difficulty policy picks for the side to move.
    ///
    /// None if the game is over or the board is full. Does not change state.
    pub fn best_move(&self) -> Option<Position> {
        let state = self.state();
        if state.is_game_over {
            return None;
        }
        self.ai
            .borrow_mut()
            .choose_move_for(state.current_player, &state.board, state.difficulty)
    }

    // ========================================================================
    // SUBSCRIPTIONS
    // ========================================================================

    /// Register a listener called after every state change
    pub fn subscribe(&self, listener: impl Fn(&GameState) + 'static) -> Subscription {
        let id = self.listeners.borrow_mut().insert(Rc::new(listener));
        Subscription::new(id, &self.listeners)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Attach the remote collaborator that receives forwarded actions
    pub fn attach_sync(&self, port: impl SyncPort + 'static) {
        *self.sync.borrow_mut() = Some(Box::new(port));
    }

    pub fn detach_sync(&self) {
        self.sync.borrow_mut().take();
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Apply a locally originated action.
    ///
    /// In remote mode the action is also forwarded to the sync port. Only a
    /// bad board size is an error; the state is then left as it was.
    pub fn dispatch(&self, action: Action) -> Result<(), EngineError> {
        let was_remote = self.state.borrow().game_mode == GameMode::Remote;
        let changed = self.transition(&action)?;
        let is_remote = self.state.borrow().game_mode == GameMode::Remote;

        if was_remote || is_remote {
            self.forward(&action);
        }
        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Handle a message from the remote collaborator. Never forwarded back.
    pub fn receive(&self, message: SyncMessage) -> Result<(), EngineError> {
        match message {
            SyncMessage::SyncState { state } => {
                if let Err(e) = state.validate() {
                    tracing::warn!("Rejected remote snapshot: {}", e);
                    return Err(e);
                }
                tracing::info!("Adopted remote snapshot ({} moves)", state.move_history.len());
                self.scheduler.borrow_mut().cancel();
                self.replace(state);
                self.notify();
            }
            SyncMessage::Action { action } => {
                if self.transition(&action)? {
                    self.notify();
                }
            }
        }
        Ok(())
    }

    /// Decode and handle a JSON sync message
    pub fn receive_json(&self, text: &str) -> Result<(), EngineError> {
        self.receive(crate::sync::decode(text)?)
    }

    /// Message carrying the full current state, for pushing to a peer
    pub fn sync_snapshot(&self) -> SyncMessage {
        SyncMessage::SyncState {
            state: self.state(),
        }
    }

    /// Run the reducer and commit the result. Returns false for the no-op
    /// branches (rejected move, undo with no history, unknown action),
    /// which leave the state alone and notify nobody.
    fn transition(&self, action: &Action) -> Result<bool, EngineError> {
        let current = self.state();
        let next = reduce(&current, action)?;

        let applied = match action {
            Action::MakeMove { .. } | Action::UndoMove => next != current,
            Action::Unknown => false,
            _ => true,
        };

        if action.cancels_ai_turn() {
            self.scheduler.borrow_mut().cancel();
        }
        if action.clears_score() {
            self.score.set(Score::default());
        }
        if !applied {
            return Ok(false);
        }
        if matches!(action, Action::MakeMove { .. }) {
            self.scheduler.borrow_mut().cancel();
        }

        if let Action::JoinRemoteGame { room_id } = action {
            tracing::info!("Joined remote room {}", room_id);
        }
        tracing::debug!("{:?}: {} moves played", action, next.move_history.len());
        self.replace(next);
        Ok(true)
    }

    fn replace(&self, next: GameState) {
        let finished = !self.state.borrow().is_game_over && next.is_game_over;
        if finished {
            self.score.set(self.score.get().record(&next));
            tracing::debug!("Game over: winner={:?} draw={}", next.winner, next.is_draw);
        }
        let machine_turn = next.machine_to_move();
        *self.state.borrow_mut() = next;

        // A reply already pending stays valid across difficulty changes
        let mut scheduler = self.scheduler.borrow_mut();
        if machine_turn && scheduler.pending().is_none() {
            scheduler.schedule(self.ai_delay);
        }
    }

    fn forward(&self, action: &Action) {
        if let Some(port) = self.sync.borrow().as_ref() {
            port.forward(action);
        }
    }

    fn notify(&self) {
        let snapshot = self.listeners.borrow().snapshot();
        let state = self.state();
        broadcast(&snapshot, &state);
    }

    // ========================================================================
    // MACHINE TURN
    // ========================================================================

    /// Machine reply waiting to run, if any
    pub fn pending_ai_turn(&self) -> Option<AiTurnTicket> {
        self.scheduler.borrow().pending()
    }

    /// Play the machine reply for `ticket` now.
    ///
    /// Returns None without touching the state if the ticket was cancelled
    /// or already used.
    pub fn run_ai_turn(&self, ticket: AiTurnTicket) -> Option<Position> {
        if !self.scheduler.borrow_mut().claim(ticket) {
            tracing::debug!("Dropping stale machine reply (generation {})", ticket.generation);
            return None;
        }

        let state = self.state();
        if !state.machine_to_move() {
            return None;
        }
        let choice = self
            .ai
            .borrow_mut()
            .choose_move(&state.board, state.difficulty)?;

        if let Err(e) = self.dispatch(Action::MakeMove { position: choice }) {
            tracing::warn!("Machine reply failed: {}", e);
            return None;
        }
        Some(choice)
    }

    /// Wait until the pending reply is due, then run it
    pub async fn await_ai_turn(&self) -> Option<Position> {
        let ticket = self.pending_ai_turn()?;
        tokio::time::sleep_until(tokio::time::Instant::from_std(ticket.due)).await;
        self.run_ai_turn(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntac_core::{Difficulty, Mark};

    fn single(seed: u64) -> Engine {
        let config = EngineConfig::default().with_ai_delay_ms(0).with_seed(seed);
        Engine::new(&config).unwrap()
    }

    #[test]
    fn test_human_move_schedules_reply() {
        let engine = single(1);
        assert!(engine.pending_ai_turn().is_none());
        engine.dispatch(Action::make_move(1, 1)).unwrap();
        let ticket = engine.pending_ai_turn().unwrap();

        let reply = engine.run_ai_turn(ticket).unwrap();
        let state = engine.state();
        assert_eq!(state.board.mark_at(reply), Some(Mark::O));
        assert_eq!(state.current_player, Mark::X);
        assert!(engine.pending_ai_turn().is_none());
    }

    #[test]
    fn test_cancelled_reply_never_lands() {
        let engine = single(2);
        engine.dispatch(Action::make_move(0, 0)).unwrap();
        let ticket = engine.pending_ai_turn().unwrap();
        engine.dispatch(Action::ResetGame).unwrap();

        assert_eq!(engine.run_ai_turn(ticket), None);
        assert!(engine.state().board.is_empty());
    }

    #[test]
    fn test_difficulty_change_keeps_pending_reply() {
        let engine = single(3);
        engine.dispatch(Action::make_move(0, 0)).unwrap();
        let ticket = engine.pending_ai_turn().unwrap();
        engine
            .dispatch(Action::ChangeDifficulty {
                difficulty: Difficulty::Easy,
            })
            .unwrap();
        assert_eq!(engine.pending_ai_turn(), Some(ticket));

        let reply = engine.run_ai_turn(ticket).unwrap();
        let state = engine.state();
        assert_eq!(state.move_history.len(), 2);
        assert_eq!(state.board.mark_at(reply), Some(Mark::O));
        assert_eq!(state.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_repeated_difficulty_changes_keep_ticket() {
        let engine = single(6);
        engine.dispatch(Action::make_move(1, 1)).unwrap();
        let ticket = engine.pending_ai_turn().unwrap();
        for difficulty in [Difficulty::Hard, Difficulty::Medium, Difficulty::Unbeatable] {
            engine.dispatch(Action::ChangeDifficulty { difficulty }).unwrap();
            assert_eq!(engine.pending_ai_turn(), Some(ticket));
        }
        assert!(engine.run_ai_turn(ticket).is_some());
        assert!(engine.pending_ai_turn().is_none());
    }

    #[test]
    fn test_best_move_has_no_side_effects() {
        let engine = single(4);
        let before = engine.state();
        let mv = engine.best_move().unwrap();
        assert!(before.is_valid_move(mv));
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn test_bad_board_size_leaves_state() {
        let engine = single(5);
        engine.dispatch(Action::make_move(2, 2)).unwrap();
        let before = engine.state();
        let err = engine.dispatch(Action::ChangeBoardSize { size: 12 });
        assert!(err.is_err());
        assert_eq!(engine.state(), before);
        assert!(engine.pending_ai_turn().is_some());
    }
}
