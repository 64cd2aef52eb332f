//! WASM API surface. The web shell drives both games through these free
//! functions; all state lives in the module-level sessions below.

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::marubatsu::session::GameSession;
use crate::othello::game::GameInstance;
use crate::othello::search::Difficulty;
use crate::progress::MemoryProgress;

static OTHELLO: Lazy<Mutex<Option<GameInstance>>> = Lazy::new(|| Mutex::new(None));
static MARUBATSU: Lazy<Mutex<Option<GameSession<MemoryProgress>>>> =
    Lazy::new(|| Mutex::new(None));

fn lock<T>(slot: &Mutex<Option<T>>) -> Result<MutexGuard<'_, Option<T>>, JsValue> {
    slot.lock()
        .map_err(|_| JsValue::from_str("game state lock poisoned"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn err(message: &str) -> JsValue {
    JsValue::from_str(message)
}

/// Starts a new Othello match against the given difficulty
/// ("beginner" | "easy" | "medium" | "hard") and returns the initial state.
#[wasm_bindgen]
pub fn othello_new_game(difficulty: &str) -> Result<JsValue, JsValue> {
    let difficulty = Difficulty::from_str(difficulty).map_err(|e| err(&e))?;
    let mut slot = lock(&OTHELLO)?;
    let game = GameInstance::new(difficulty);
    let state = game.to_state();
    *slot = Some(game);
    to_js(&state)
}

/// Applies the human (black) move and returns the updated state.
#[wasm_bindgen]
pub fn othello_place(row: u8, col: u8) -> Result<JsValue, JsValue> {
    let mut slot = lock(&OTHELLO)?;
    let game = slot.as_mut().ok_or_else(|| err("no active othello game"))?;
    game.place(row, col).map_err(|e| err(&e))?;
    to_js(&game.to_state())
}

/// Runs the computer (white) turn and returns the updated state. A state
/// with `is_pass` set means the computer had no legal move.
#[wasm_bindgen]
pub fn othello_ai_move() -> Result<JsValue, JsValue> {
    let mut slot = lock(&OTHELLO)?;
    let game = slot.as_mut().ok_or_else(|| err("no active othello game"))?;
    game.do_ai_move().map_err(|e| err(&e))?;
    to_js(&game.to_state())
}

/// Passes the human turn. Rejected while the human still has a legal move.
#[wasm_bindgen]
pub fn othello_pass() -> Result<JsValue, JsValue> {
    let mut slot = lock(&OTHELLO)?;
    let game = slot.as_mut().ok_or_else(|| err("no active othello game"))?;
    if game.has_legal_moves_for_current() {
        return Err(err("cannot pass: legal moves remain"));
    }
    game.pass();
    to_js(&game.to_state())
}

#[wasm_bindgen]
pub fn othello_legal_moves() -> Result<JsValue, JsValue> {
    let slot = lock(&OTHELLO)?;
    let game = slot.as_ref().ok_or_else(|| err("no active othello game"))?;
    to_js(&game.get_legal_moves())
}

#[wasm_bindgen]
pub fn othello_state() -> Result<JsValue, JsValue> {
    let slot = lock(&OTHELLO)?;
    let game = slot.as_ref().ok_or_else(|| err("no active othello game"))?;
    to_js(&game.to_state())
}

#[wasm_bindgen]
pub fn othello_result() -> Result<JsValue, JsValue> {
    let slot = lock(&OTHELLO)?;
    let game = slot.as_ref().ok_or_else(|| err("no active othello game"))?;
    to_js(&game.to_result())
}

/// Starts a marubatsu session from the host's persisted progress values
/// and returns the initial state. The host reads `level` and
/// `highest_unlocked_level` back out of every snapshot to persist them.
#[wasm_bindgen]
pub fn marubatsu_new_session(saved_level: u32, saved_highest: u32) -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let store = MemoryProgress::with_values(saved_level, saved_highest);
    let session = GameSession::new(store);
    let snapshot = session.snapshot();
    *slot = Some(session);
    to_js(&snapshot)
}

/// Routes a tap at `(row, col)` through the game, computer reply included,
/// and returns the updated state.
#[wasm_bindgen]
pub fn marubatsu_tap(row: u8, col: u8) -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.on_cell_tap(row, col).map_err(|e| err(&e))?;
    to_js(&session.snapshot())
}

/// Arms the one-time X removal ability when it is available.
#[wasm_bindgen]
pub fn marubatsu_activate_ability() -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.activate_ability();
    to_js(&session.snapshot())
}

#[wasm_bindgen]
pub fn marubatsu_restart() -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.restart();
    to_js(&session.snapshot())
}

#[wasm_bindgen]
pub fn marubatsu_play_level(level: u32) -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.play_selected_level(level);
    to_js(&session.snapshot())
}

#[wasm_bindgen]
pub fn marubatsu_level_select() -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.navigate_to_level_select();
    to_js(&session.snapshot())
}

#[wasm_bindgen]
pub fn marubatsu_back_to_game() -> Result<JsValue, JsValue> {
    let mut slot = lock(&MARUBATSU)?;
    let session = slot
        .as_mut()
        .ok_or_else(|| err("no active marubatsu session"))?;
    session.navigate_to_game();
    to_js(&session.snapshot())
}

#[wasm_bindgen]
pub fn marubatsu_state() -> Result<JsValue, JsValue> {
    let slot = lock(&MARUBATSU)?;
    let session = slot
        .as_ref()
        .ok_or_else(|| err("no active marubatsu session"))?;
    to_js(&session.snapshot())
}
