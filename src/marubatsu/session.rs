use web_time::{SystemTime, UNIX_EPOCH};

use crate::marubatsu::board::Mark;
use crate::marubatsu::search;
use crate::marubatsu::state::{GameState, Screen};
use crate::progress::{CURRENT_LEVEL_KEY, HIGHEST_UNLOCKED_LEVEL_KEY, ProgressStore};
use crate::types::MarubatsuState;

pub const MARK_X: u8 = 1;
pub const MARK_O: u8 = 2;

/// Runs marubatsu rounds end to end: taps go through the state machine,
/// the computer answers on the levels that have one, and finished rounds
/// advance the level through the progress store.
///
/// The session only ever swaps whole `GameState` snapshots; it never
/// mutates one.
pub struct GameSession<S: ProgressStore> {
    state: GameState,
    store: S,
    seeder: fn() -> u64,
}

impl<S: ProgressStore> GameSession<S> {
    /// Resumes from the store's saved level, seeding each round's blocked
    /// cells from the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_seeder(store, clock_seed)
    }

    pub fn with_seeder(store: S, seeder: fn() -> u64) -> Self {
        let level = store.read_int(CURRENT_LEVEL_KEY);
        let highest = store.read_int(HIGHEST_UNLOCKED_LEVEL_KEY);
        let state = GameState::new_game(level, highest, seeder());
        Self {
            state,
            store,
            seeder,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Routes one tap through the state machine, then lets the computer
    /// answer and applies progression when the round ends.
    pub fn on_cell_tap(&mut self, row: u8, col: u8) -> Result<(), String> {
        let size = self.state.board.size();
        if row as usize >= size || col as usize >= size {
            return Err("row/col out of range".to_string());
        }

        self.state = self.state.on_cell_tap(row as usize, col as usize);
        if self.state.is_over() {
            self.finish_round();
        } else {
            self.run_ai_if_due();
        }
        Ok(())
    }

    pub fn activate_ability(&mut self) {
        self.state = self.state.activate_ability();
    }

    /// Restarts the current level with a fresh board.
    pub fn restart(&mut self) {
        self.state = GameState::new_game(
            self.state.level,
            self.state.highest_unlocked_level,
            (self.seeder)(),
        );
    }

    /// Jumps to a level picked on the level-select screen. The highest
    /// unlocked level is re-read from the store, as another session may
    /// have raised it.
    pub fn play_selected_level(&mut self, level: u32) {
        let highest = self.store.read_int(HIGHEST_UNLOCKED_LEVEL_KEY);
        self.state = GameState::new_game(level, highest, (self.seeder)());
    }

    pub fn navigate_to_level_select(&mut self) {
        self.state = self.state.to_level_select();
    }

    pub fn navigate_to_game(&mut self) {
        self.state = self.state.to_game();
    }

    pub fn snapshot(&self) -> MarubatsuState {
        let state = &self.state;
        let mut blocked: Vec<_> = state.board.blocked().iter().copied().collect();
        blocked.sort_by_key(|p| (p.row, p.col));

        MarubatsuState {
            level: state.level,
            board_size: state.board.size() as u8,
            board: state.board.to_array(),
            blocked,
            current_player: mark_code(state.current_player),
            winner: state.winner.map(mark_code).unwrap_or(0),
            is_draw: state.is_draw,
            x_ability_used: state.x_ability_used,
            ability_selection: state.ability_selection,
            highest_unlocked_level: state.highest_unlocked_level,
            screen: match state.screen {
                Screen::Game => 0,
                Screen::LevelSelect => 1,
            },
        }
    }

    fn run_ai_if_due(&mut self) {
        if self.state.level >= 5 && self.state.current_player == Mark::O && !self.state.is_over()
        {
            self.ai_move();
        }
    }

    fn ai_move(&mut self) {
        match search::find_best_move(&self.state.board) {
            Some(mv) => {
                self.state = self.state.on_cell_tap(mv.row as usize, mv.col as usize);
                if self.state.is_over() {
                    self.finish_round();
                }
            }
            None => {
                // Nowhere left to play: resolve as a draw on a spent board.
                if self.state.winner.is_none() && self.state.board.is_full() {
                    let mut next = self.state.clone();
                    next.is_draw = true;
                    self.state = next;
                    self.finish_round();
                }
            }
        }
    }

    /// A won round advances to the next level and persists it, raising the
    /// unlock ceiling when passed; a draw restarts the same level.
    fn finish_round(&mut self) {
        if self.state.winner.is_some() {
            let next_level = self.state.level + 1;
            self.store.write_int(CURRENT_LEVEL_KEY, next_level);
            let mut highest = self.state.highest_unlocked_level;
            if next_level > highest {
                highest = next_level;
                self.store.write_int(HIGHEST_UNLOCKED_LEVEL_KEY, highest);
            }
            self.state = GameState::new_game(next_level, highest, (self.seeder)());
        } else if self.state.is_draw {
            self.state = GameState::new_game(
                self.state.level,
                self.state.highest_unlocked_level,
                (self.seeder)(),
            );
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
    }
}

fn mark_code(mark: Mark) -> u8 {
    match mark {
        Mark::X => MARK_X,
        Mark::O => MARK_O,
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::marubatsu::board::Board;
    use crate::progress::MemoryProgress;

    fn fixed_seed() -> u64 {
        7
    }

    fn session() -> GameSession<MemoryProgress> {
        GameSession::with_seeder(MemoryProgress::new(), fixed_seed)
    }

    /// A hand-built state the session can continue from; no blocked cells,
    /// so the coordinates below are always playable.
    fn custom_state(level: u32, x: &[(usize, usize)], o: &[(usize, usize)]) -> GameState {
        let mut board = Board::new(3, HashSet::new());
        for &(row, col) in x {
            assert!(board.apply_move(row, col, Mark::X));
        }
        for &(row, col) in o {
            assert!(board.apply_move(row, col, Mark::O));
        }
        GameState {
            level,
            board,
            current_player: Mark::X,
            winner: None,
            is_draw: false,
            x_ability_used: false,
            ability_selection: false,
            highest_unlocked_level: level,
            screen: Screen::Game,
        }
    }

    #[test]
    fn fresh_session_starts_at_the_stored_defaults() {
        let session = session();

        assert_eq!(session.state().level, 1);
        assert_eq!(session.state().board.size(), 3);
        assert!(session.state().board.blocked().is_empty());
        assert_eq!(session.snapshot().current_player, MARK_X);
    }

    #[test]
    fn saved_progress_is_picked_up_at_start() {
        let store = MemoryProgress::with_values(3, 6);
        let session = GameSession::with_seeder(store, fixed_seed);

        assert_eq!(session.state().level, 3);
        assert_eq!(session.state().highest_unlocked_level, 6);
        assert_eq!(session.state().board.size(), 4);
        assert_eq!(session.state().board.blocked().len(), 2);
    }

    #[test]
    fn t10_winning_a_round_persists_the_next_level_and_starts_it() {
        let mut session = session();
        for (row, col) in [(1, 1), (0, 0), (1, 0), (2, 2), (1, 2)] {
            session.on_cell_tap(row, col).unwrap();
        }

        assert_eq!(session.store().read_int(CURRENT_LEVEL_KEY), 2);
        assert_eq!(session.store().read_int(HIGHEST_UNLOCKED_LEVEL_KEY), 2);
        assert_eq!(session.state().level, 2);
        assert_eq!(session.state().board.size(), 4);
        assert_eq!(session.state().winner, None);
    }

    #[test]
    fn a_draw_restarts_the_same_level() {
        let mut session = session();
        for (row, col) in [
            (0, 0),
            (0, 2),
            (0, 1),
            (1, 0),
            (1, 2),
            (1, 1),
            (2, 0),
            (2, 1),
            (2, 2),
        ] {
            session.on_cell_tap(row, col).unwrap();
        }

        assert_eq!(session.state().level, 1);
        assert_eq!(session.store().read_int(CURRENT_LEVEL_KEY), 1);
        assert!(!session.state().is_draw);
        assert!(session.state().board.playable_cells().len() == 9);
    }

    #[test]
    fn computer_answers_immediately_from_level_five() {
        let mut session = session();
        session.set_state_for_test(custom_state(5, &[(0, 0)], &[(1, 1)]));

        session.on_cell_tap(0, 1).unwrap();

        // X threatened (0,2); O must have taken it and handed the turn back.
        assert_eq!(session.state().board.mark(0, 2), Some(Mark::O));
        assert_eq!(session.state().current_player, Mark::X);
    }

    #[test]
    fn computer_win_also_advances_the_level() {
        let mut session = session();
        session.set_state_for_test(custom_state(
            5,
            &[(0, 0), (0, 1), (2, 1)],
            &[(1, 0), (1, 1)],
        ));

        session.on_cell_tap(2, 2).unwrap();

        // O completed the middle row and the round rolled over to level 6.
        assert_eq!(session.store().read_int(CURRENT_LEVEL_KEY), 6);
        assert_eq!(session.store().read_int(HIGHEST_UNLOCKED_LEVEL_KEY), 6);
        assert_eq!(session.state().level, 6);
        assert_eq!(session.state().board.blocked().len(), 3);
    }

    #[test]
    fn ability_hand_off_lets_the_computer_reply() {
        let mut session = session();
        session.set_state_for_test(custom_state(5, &[(0, 0), (1, 1)], &[(2, 2)]));

        session.activate_ability();
        assert!(session.state().ability_selection);
        session.on_cell_tap(0, 0).unwrap();

        let state = session.state();
        assert!(state.x_ability_used);
        assert_eq!(state.board.mark(0, 0), None);
        // O moved after the ability consumed X's turn.
        assert_eq!(
            state.board.to_array().iter().filter(|&&c| c == 2).count(),
            2
        );
        assert_eq!(state.current_player, Mark::X);
    }

    #[test]
    fn out_of_range_tap_is_rejected() {
        let mut session = session();
        let err = session.on_cell_tap(3, 0).unwrap_err();

        assert!(err.contains("out of range"));
        assert_eq!(session.state().board.playable_cells().len(), 9);
    }

    #[test]
    fn level_select_round_trip_keeps_progress() {
        let store = MemoryProgress::with_values(2, 4);
        let mut session = GameSession::with_seeder(store, fixed_seed);

        session.navigate_to_level_select();
        assert_eq!(session.snapshot().screen, 1);

        session.play_selected_level(4);
        assert_eq!(session.state().level, 4);
        assert_eq!(session.state().highest_unlocked_level, 4);
        assert_eq!(session.snapshot().screen, 0);
    }

    #[test]
    fn restart_rebuilds_the_current_level() {
        let mut session = session();
        session.on_cell_tap(0, 0).unwrap();
        assert_eq!(session.state().board.playable_cells().len(), 8);

        session.restart();

        assert_eq!(session.state().level, 1);
        assert_eq!(session.state().board.playable_cells().len(), 9);
    }
}
