pub mod annotate;
pub mod card;
pub mod dictionary;
pub mod export;
pub mod measure;
pub mod parser;
pub mod report;
pub mod session;
pub mod stats;
pub mod suggest;
pub mod svg;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use dictionary::Dictionary;
use measure::{byte_to_utf16_offset, utf16_to_byte_offset};
use session::DeckSession;
use suggest::MatchMode;
use svg::CurveChart;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

// Maps (flattened entries, symbol and type tallies) must arrive as plain
// objects, not JS `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn console_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

#[derive(Serialize)]
struct SuggestionList<'a> {
    matches: &'a [&'a str],
    /// False when there is nothing to show or the name is already complete.
    display: bool,
}

#[derive(Serialize)]
struct CompletionResult<'a> {
    text: &'a str,
    cursor: usize,
    changed: bool,
}

/// Deck editor state for the browser page.
///
/// The page fetches the card data files itself and passes their text in
/// source order. Cursor offsets are UTF-16 offsets, as reported by
/// `selectionStart`.
#[wasm_bindgen]
pub struct DeckEditor {
    session: DeckSession,
    chart: CurveChart,
}

impl Default for DeckEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl DeckEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: DeckSession::new(),
            chart: CurveChart::default(),
        }
    }

    /// Load fetched card data documents; later documents win on name collision.
    #[wasm_bindgen(js_name = "loadSources")]
    pub fn load_sources(
        &mut self,
        locations: Vec<String>,
        documents: Vec<String>,
    ) -> Result<usize, JsValue> {
        if locations.len() != documents.len() {
            return Err(js_error("loadSources: locations and documents differ in length"));
        }
        let sources = locations
            .iter()
            .map(String::as_str)
            .zip(documents.iter().map(String::as_str));

        match Dictionary::from_json_sources(sources) {
            Ok(dictionary) => {
                let cards = dictionary.len();
                self.session.finish_load(Ok(dictionary));
                Ok(cards)
            }
            Err(err) => {
                let message = err.to_string();
                console_error(&message);
                self.session.fail_load(message.clone());
                Err(js_error(message))
            }
        }
    }

    /// Report that fetching a source failed before its text was available.
    #[wasm_bindgen(js_name = "loadFailed")]
    pub fn load_failed(&mut self, reason: String) {
        console_error(&reason);
        self.session.fail_load(reason);
    }

    /// Switch fragment matching between `"pattern"` and `"literal"`.
    #[wasm_bindgen(js_name = "setMatchMode")]
    pub fn set_match_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = MatchMode::from_str(mode)
            .ok_or_else(|| js_error(format!("unknown match mode: {}", mode)))?;
        self.session.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = "isReady")]
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Full analysis: `{ entries: [...], stats: { total, symbols, types, curve } }`.
    pub fn analyze(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.session.analyze(text))
    }

    pub fn suggest(&self, buffer: &str, cursor: usize) -> Result<JsValue, JsValue> {
        let cursor = utf16_to_byte_offset(buffer, cursor);
        let suggestions = self.session.suggest(buffer, cursor).map_err(js_error)?;
        to_js(&SuggestionList {
            matches: &suggestions.matches,
            display: suggestions.should_display(),
        })
    }

    pub fn complete(&self, buffer: &str, cursor: usize) -> Result<JsValue, JsValue> {
        let cursor = utf16_to_byte_offset(buffer, cursor);
        let completion = self.session.complete(buffer, cursor).map_err(js_error)?;
        to_js(&CompletionResult {
            text: &completion.text,
            cursor: byte_to_utf16_offset(&completion.text, completion.cursor),
            changed: completion.is_changed(),
        })
    }

    /// The deck as `count name` lines, sorted by mana value, for download.
    #[wasm_bindgen(js_name = "exportText")]
    pub fn export_text(&self, text: &str) -> String {
        self.session.analyze(text).export()
    }

    /// SVG bar chart of the mana curve, or an empty string while hidden.
    #[wasm_bindgen(js_name = "curveSvg")]
    pub fn curve_svg(&self, text: &str) -> String {
        if !self.session.show_curve() {
            return String::new();
        }
        self.chart.render(&self.session.analyze(text).stats)
    }

    #[wasm_bindgen(js_name = "toggleCurve")]
    pub fn toggle_curve(&mut self) -> bool {
        self.session.toggle_curve()
    }

    #[wasm_bindgen(js_name = "curveToggleLabel")]
    pub fn curve_toggle_label(&self) -> String {
        self.session.curve_toggle_label().to_string()
    }

    /// `beforeunload` guard: true when the buffer holds unsaved text.
    #[wasm_bindgen(js_name = "hasUnsavedWork")]
    pub fn has_unsaved_work(text: &str) -> bool {
        session::has_unsaved_work(text)
    }
}
