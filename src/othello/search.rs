use std::str::FromStr;

use crate::othello::board::{Board, Player};
use crate::types::Position;

const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

/// Computer strength tier. Each tier fixes the search depth and whether
/// alpha-beta pruning is applied; there is no other tuning knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// Greedy: takes the move flipping the most discs right now.
    Beginner,
    /// Depth-2 minimax, unpruned.
    Easy,
    /// Depth-3 minimax with alpha-beta.
    Medium,
    /// Depth-4 minimax with alpha-beta.
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Computer opponent for one fixed difficulty.
pub struct AiPlayer {
    difficulty: Difficulty,
}

impl AiPlayer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Picks a move for `player`, or `None` when `player` must pass.
    /// The search runs to completion synchronously on the caller's thread.
    pub fn choose_move(&self, board: &Board, player: Player) -> Option<Position> {
        let moves = board.valid_moves(player);
        if moves.is_empty() {
            return None;
        }

        let chosen = match self.difficulty {
            Difficulty::Beginner => best_flip(board, &moves, player),
            Difficulty::Easy => minimax_move(board, &moves, player, 2, false),
            Difficulty::Medium => minimax_move(board, &moves, player, 3, true),
            Difficulty::Hard => minimax_move(board, &moves, player, 4, true),
        };
        Some(chosen)
    }
}

/// Greedy tier: maximum immediate flip count. Ties keep the first move in
/// scan order so repeated games stay deterministic.
fn best_flip(board: &Board, moves: &[Position], player: Player) -> Position {
    let mut best = moves[0];
    let mut best_flips = 0;

    for &mv in moves {
        let flips = board.flipped_pieces(mv.row as usize, mv.col as usize, player);
        if flips > best_flips {
            best_flips = flips;
            best = mv;
        }
    }

    best
}

/// Root of the fixed-depth search: tries every legal move for `player` and
/// keeps the strictly best score, so the first of equal moves wins.
fn minimax_move(
    board: &Board,
    moves: &[Position],
    player: Player,
    depth: u8,
    use_alpha_beta: bool,
) -> Position {
    let mut best_score = MIN_SCORE;
    let mut best_move = moves[0];
    let mut alpha = MIN_SCORE;
    let beta = MAX_SCORE;

    for &mv in moves {
        let mut next = *board;
        next.place_piece(mv.row as usize, mv.col as usize, player);
        let score = minimax(&next, player, depth - 1, false, alpha, beta, use_alpha_beta);

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if use_alpha_beta {
            alpha = alpha.max(best_score);
            if beta <= alpha {
                break;
            }
        }
    }

    best_move
}

/// Depth-bounded minimax. `player` is the side the root is choosing for
/// and never changes through the recursion; the side to move at each node
/// is derived from `maximizing`. Leaves are scored as material difference
/// from `player`'s perspective.
fn minimax(
    board: &Board,
    player: Player,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    use_alpha_beta: bool,
) -> i32 {
    let game_over =
        !board.has_valid_move(Player::Black) && !board.has_valid_move(Player::White);
    if depth == 0 || game_over {
        return evaluate(board, player);
    }

    let mover = if maximizing { player } else { player.opposite() };
    let moves = board.valid_moves(mover);
    if moves.is_empty() {
        // Pass: the turn flips and a ply is consumed, the board stays as is.
        return minimax(board, player, depth - 1, !maximizing, alpha, beta, use_alpha_beta);
    }

    if maximizing {
        let mut max_eval = MIN_SCORE;
        for mv in moves {
            let mut next = *board;
            next.place_piece(mv.row as usize, mv.col as usize, mover);
            let eval = minimax(&next, player, depth - 1, false, alpha, beta, use_alpha_beta);
            max_eval = max_eval.max(eval);
            if use_alpha_beta {
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
        }
        max_eval
    } else {
        let mut min_eval = MAX_SCORE;
        for mv in moves {
            let mut next = *board;
            next.place_piece(mv.row as usize, mv.col as usize, mover);
            let eval = minimax(&next, player, depth - 1, true, alpha, beta, use_alpha_beta);
            min_eval = min_eval.min(eval);
            if use_alpha_beta {
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
        }
        min_eval
    }
}

/// Material difference seen from `player`, the side the search was asked
/// to choose for.
fn evaluate(board: &Board, player: Player) -> i32 {
    board.count_pieces(player) as i32 - board.count_pieces(player.opposite()) as i32
}
