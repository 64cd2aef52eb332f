use wasm_bindgen::prelude::*;

pub mod bindings;
pub mod marubatsu;
pub mod othello;
pub mod progress;
pub mod types;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
