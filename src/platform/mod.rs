//! Browser glue: LocalStorage and fetch
//!
//! Everything here is wasm-only. Native builds get no-op storage so callers
//! don't need their own cfg gates.

use crate::persistence::{ScoreRecord, ScoreSink, SubmitError};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Request, RequestInit, Response};

    use crate::persistence::{ScoreRecord, SubmitError, encode};

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }

    pub fn storage_get(key: &str) -> Option<String> {
        storage()?.get_item(key).ok().flatten()
    }

    pub fn storage_set(key: &str, value: &str) -> bool {
        storage().is_some_and(|s| s.set_item(key, value).is_ok())
    }

    fn js_error(value: JsValue) -> String {
        value.as_string().unwrap_or_else(|| format!("{:?}", value))
    }

    pub fn post(endpoint: &str, record: &ScoreRecord) -> Result<(), SubmitError> {
        let body = encode(record)?;
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(endpoint, &opts)
            .map_err(|e| SubmitError::Transport(js_error(e)))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| SubmitError::Transport(js_error(e)))?;

        let window = web_sys::window().ok_or_else(|| SubmitError::Transport("no window".into()))?;
        let promise = window.fetch_with_request(&request);
        let category = record.category.as_str();
        wasm_bindgen_futures::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(resp) => {
                    if let Ok(resp) = resp.dyn_into::<Response>() {
                        if !resp.ok() {
                            log::warn!("Score submission ({}) rejected: HTTP {}", category, resp.status());
                        }
                    }
                }
                Err(e) => log::warn!("Score submission ({}) failed: {}", category, js_error(e)),
            }
        });
        Ok(())
    }

    pub async fn fetch_text(url: &str) -> Result<String, String> {
        let window = web_sys::window().ok_or("no window")?;
        let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error)?;
        let resp: Response = resp.dyn_into().map_err(js_error)?;
        if !resp.ok() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string().ok_or_else(|| "non-text body".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{fetch_text, storage_get, storage_set};

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(_key: &str, _value: &str) -> bool {
    false
}

/// POSTs each record to a leaderboard endpoint without waiting for the reply
#[derive(Debug, Clone)]
pub struct FetchSink {
    pub endpoint: String,
}

impl FetchSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl ScoreSink for FetchSink {
    #[cfg(target_arch = "wasm32")]
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError> {
        web::post(&self.endpoint, record)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn submit(&mut self, _record: &ScoreRecord) -> Result<(), SubmitError> {
        Err(SubmitError::Transport(format!(
            "fetch unavailable on native ({})",
            self.endpoint
        )))
    }
}
