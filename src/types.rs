use serde::Serialize;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// Public Othello state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OthelloState {
    /// Row-major cells, 0=empty, 1=black, 2=white.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the previous action was a pass.
    /// - `false` when the previous action was a normal move.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: positions flipped by it.
    /// - Pass: must be an empty list.
    pub flipped: Vec<Position>,
}

/// Final Othello result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OthelloResult {
    /// 1=black, 2=white, 0=draw.
    pub winner: u8,
    pub black_count: u8,
    pub white_count: u8,
}

/// Public marubatsu state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarubatsuState {
    pub level: u32,
    pub board_size: u8,
    /// Row-major cells, 0=empty, 1=X, 2=O. Blocked cells stay 0; they are
    /// listed separately in `blocked`.
    pub board: Vec<u8>,
    pub blocked: Vec<Position>,
    /// 1=X, 2=O.
    pub current_player: u8,
    /// 1=X, 2=O, 0=no winner yet.
    pub winner: u8,
    pub is_draw: bool,
    pub x_ability_used: bool,
    pub ability_selection: bool,
    pub highest_unlocked_level: u32,
    /// 0=game screen, 1=level select.
    pub screen: u8,
}
