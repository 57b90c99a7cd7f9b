use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    /// An element the feature depends on is not present in the document.
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("invalid root margin `{0}`")]
    InvalidRootMargin(String),
    #[error("host call failed: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for BehaviorError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}
