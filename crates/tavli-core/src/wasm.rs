//! WebAssembly bindings for the Tavli rules engine.
//!
//! This module exposes the engine to JavaScript through wasm-bindgen.
//! Values cross the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::Move;
#[cfg(feature = "wasm")]
use crate::ai::{AiWeights, Bot};
#[cfg(feature = "wasm")]
use crate::board::Color;
#[cfg(feature = "wasm")]
use crate::dice::RngDice;
#[cfg(feature = "wasm")]
use crate::game::{GameState, Match};
#[cfg(feature = "wasm")]
use crate::rules;
#[cfg(feature = "wasm")]
use crate::variant::Variant;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn parse_variant(variant: &str) -> Result<Variant, JsValue> {
    variant.parse::<Variant>().map_err(|e| JsValue::from_str(&e))
}

#[cfg(feature = "wasm")]
fn parse_color(color: &str) -> Result<Color, JsValue> {
    serde_json::from_str(&format!("\"{}\"", color.trim().to_ascii_lowercase()))
        .map_err(|e| JsValue::from_str(&format!("Invalid color: {}", e)))
}

/// Check a move against a state; malformed input is simply illegal
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = validateMove)]
pub fn validate_move(move_json: &str, state_json: &str, variant: &str, color: &str) -> bool {
    let (Ok(mv), Ok(state), Ok(variant), Ok(color)) = (
        serde_json::from_str::<Move>(move_json),
        serde_json::from_str::<GameState>(state_json),
        parse_variant(variant),
        parse_color(color),
    ) else {
        return false;
    };
    rules::validate_move(&mv, &state, variant, color)
}

/// Legal moves as a JSON array (empty on malformed input)
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = calculateAvailableMoves)]
pub fn calculate_available_moves(state_json: &str, variant: &str, color: &str, dice: &[u8]) -> String {
    let (Ok(state), Ok(variant), Ok(color)) = (
        serde_json::from_str::<GameState>(state_json),
        parse_variant(variant),
        parse_color(color),
    ) else {
        return "[]".to_string();
    };
    let moves = rules::calculate_available_moves(&state, variant, color, dice);
    serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
}

/// Winner as a JSON string, or `null`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = checkWinCondition)]
pub fn check_win_condition(state_json: &str, variant: &str) -> String {
    let (Ok(state), Ok(variant)) = (
        serde_json::from_str::<GameState>(state_json),
        parse_variant(variant),
    ) else {
        return "null".to_string();
    };
    serde_json::to_string(&crate::check_win_condition(&state, variant))
        .unwrap_or_else(|_| "null".to_string())
}

/// WASM-exposed match wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmMatch {
    inner: Match,
    dice: RngDice<rand::rngs::StdRng>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmMatch {
    /// Create a new match for "portes", "plakoto" or "fevga"
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> Result<WasmMatch, JsValue> {
        Ok(WasmMatch {
            inner: Match::new(parse_variant(variant)?),
            dice: RngDice::from_entropy(),
        })
    }

    /// Match id
    #[wasm_bindgen(js_name = getId)]
    pub fn get_id(&self) -> String {
        self.inner.id.to_string()
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.inner.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the move history as JSON
    #[wasm_bindgen(js_name = getHistory)]
    pub fn get_history(&self) -> String {
        serde_json::to_string(self.inner.history()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Legal moves for the player to act as JSON
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> String {
        let moves = self.inner.state().legal_moves(self.inner.variant);
        serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
    }

    /// Roll for a player, returns events JSON or error
    #[wasm_bindgen(js_name = roll)]
    pub fn roll(&mut self, color: &str) -> Result<String, JsValue> {
        let color = parse_color(color)?;
        match self.inner.roll(color, &mut self.dice) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Roll failed: {}", e))),
        }
    }

    /// Apply a move from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, color: &str, move_json: &str) -> Result<String, JsValue> {
        let color = parse_color(color)?;
        let mv: Move = serde_json::from_str(move_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid move JSON: {}", e)))?;

        match self.inner.play(color, mv) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Move failed: {}", e))),
        }
    }

    /// Get a bot's suggested move for a player, `null` if none is legal.
    /// `weights_json` may be empty to use the default heuristic.
    #[wasm_bindgen(js_name = getAiMove)]
    pub fn get_ai_move(&self, color: &str, weights_json: &str) -> Result<String, JsValue> {
        let color = parse_color(color)?;
        let weights = if weights_json.trim().is_empty() {
            AiWeights::default()
        } else {
            AiWeights::from_json(weights_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid weights: {}", e)))?
        };

        let bot = Bot::with_weights(color, weights);
        match self.inner.ai_move(&bot) {
            Some(mv) => Ok(serde_json::to_string(&mv).unwrap_or_else(|_| "null".to_string())),
            None => Ok("null".to_string()),
        }
    }

    /// Check if the match is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Get the winner ("white"/"black") if the match is finished
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<String> {
        self.inner.state().winner.map(|c| c.to_string())
    }
}
