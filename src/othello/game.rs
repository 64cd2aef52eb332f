use crate::othello::board::{Board, Player};
use crate::othello::search::{AiPlayer, Difficulty};
use crate::types::{OthelloResult, OthelloState, Position};

const BOARD_SIZE: usize = 8;
pub const PLAYER_BLACK: u8 = 1;
pub const PLAYER_WHITE: u8 = 2;

/// One live Othello match: the human plays black, the computer white.
///
/// The instance owns the only mutable board; the AI works on value copies
/// and never touches it until its chosen move is applied here.
pub struct GameInstance {
    board: Board,
    pub current_player: Player,
    pub is_game_over: bool,
    pub is_pass: bool,
    flipped: Vec<Position>,
    ai: AiPlayer,
}

impl GameInstance {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Black,
            is_game_over: false,
            is_pass: false,
            flipped: Vec::new(),
            ai: AiPlayer::new(difficulty),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Applies the human (black) move.
    pub fn place(&mut self, row: u8, col: u8) -> Result<(), String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if self.current_player != Player::Black {
            return Err("it is not the player's turn".to_string());
        }
        if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
            return Err("row/col out of range".to_string());
        }

        self.apply_move(row as usize, col as usize, Player::Black)
    }

    /// Runs the computer turn. Returns the move made, `None` when the
    /// computer had to pass.
    pub fn do_ai_move(&mut self) -> Result<Option<Position>, String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if self.current_player != Player::White {
            return Err("it is not AI's turn".to_string());
        }

        match self.ai.choose_move(&self.board, Player::White) {
            Some(mv) => {
                self.apply_move(mv.row as usize, mv.col as usize, Player::White)?;
                Ok(Some(mv))
            }
            None => {
                self.pass();
                Ok(None)
            }
        }
    }

    pub fn has_legal_moves_for_current(&self) -> bool {
        self.board.has_valid_move(self.current_player)
    }

    /// Gives up the turn. Caller contract: only meaningful when the current
    /// player has no legal move.
    pub fn pass(&mut self) {
        self.is_pass = true;
        self.flipped.clear();
        self.current_player = self.current_player.opposite();
        self.refresh_game_over();
    }

    pub fn get_legal_moves(&self) -> Vec<Position> {
        self.board.valid_moves(self.current_player)
    }

    pub fn to_state(&self) -> OthelloState {
        OthelloState {
            board: self.board.to_array().to_vec(),
            current_player: player_code(self.current_player),
            black_count: self.board.count_pieces(Player::Black) as u8,
            white_count: self.board.count_pieces(Player::White) as u8,
            is_game_over: self.is_game_over,
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
        }
    }

    pub fn to_result(&self) -> OthelloResult {
        let black_count = self.board.count_pieces(Player::Black) as u8;
        let white_count = self.board.count_pieces(Player::White) as u8;
        OthelloResult {
            winner: if black_count > white_count {
                PLAYER_BLACK
            } else if white_count > black_count {
                PLAYER_WHITE
            } else {
                0
            },
            black_count,
            white_count,
        }
    }

    fn apply_move(&mut self, row: usize, col: usize, player: Player) -> Result<(), String> {
        let before = self.board;
        if !self.board.place_piece(row, col, player) {
            return Err("illegal move".to_string());
        }

        self.is_pass = false;
        self.flipped = flipped_between(&before, &self.board, row, col);
        self.current_player = player.opposite();
        self.refresh_game_over();

        Ok(())
    }

    fn refresh_game_over(&mut self) {
        // The game ends only when neither side has a legal move left.
        if !self.board.has_valid_move(Player::Black) && !self.board.has_valid_move(Player::White)
        {
            self.is_game_over = true;
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Player) {
        self.board = board;
        self.current_player = current_player;
        self.is_game_over = false;
        self.is_pass = false;
        self.flipped.clear();
    }
}

fn player_code(player: Player) -> u8 {
    match player {
        Player::Black => PLAYER_BLACK,
        Player::White => PLAYER_WHITE,
    }
}

/// Cells that changed color with the move at `(row, col)`, the placed disc
/// itself excluded.
fn flipped_between(before: &Board, after: &Board, row: usize, col: usize) -> Vec<Position> {
    let mut out = Vec::new();
    for r in 0..BOARD_SIZE {
        for c in 0..BOARD_SIZE {
            if (r, c) == (row, col) {
                continue;
            }
            if before.cell(r, c) != after.cell(r, c) {
                out.push(Position {
                    row: r as u8,
                    col: c as u8,
                });
            }
        }
    }
    out
}
