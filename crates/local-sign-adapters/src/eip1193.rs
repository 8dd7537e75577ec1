use std::sync::{Arc, Mutex};

use alloy::primitives::keccak256;
use async_trait::async_trait;
use serde_json::Value;

use local_sign_core::{PortError, ProviderError, ProviderPort, TxRequest, USER_REJECTED_CODE};

use crate::LocalSignConfig;

const DETERMINISTIC_ACCOUNT: &str = "0x1000000000000000000000000000000000000001";

/// EIP-1193 wallet handle: an injected browser provider, a JSON-RPC proxy,
/// or a deterministic stand-in.
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser(wasm_bindgen::JsValue),
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<String>,
    reject_sends: bool,
    request_log: Vec<String>,
    next_id: u64,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![DETERMINISTIC_ACCOUNT.to_owned()],
            reject_sends: false,
            request_log: Vec::new(),
            next_id: 0,
        }
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: LocalSignConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref url) = config.eip1193_proxy_url {
            let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
            match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    url: url.clone(),
                    client,
                }),
                Err(e) if config.strict_runtime_required() => ProviderMode::Disabled(format!(
                    "failed to initialize EIP-1193 proxy client in production profile: {e}"
                )),
                Err(_) => ProviderMode::Deterministic,
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        // Browser wallets arrive through announcements (`from_js`).
        #[cfg(target_arch = "wasm32")]
        let mode = if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "configured providers are unavailable in the browser runtime".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        Self::with_mode(mode)
    }

    pub fn deterministic() -> Self {
        Self::with_mode(ProviderMode::Deterministic)
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::with_mode(ProviderMode::Disabled(reason.into()))
    }

    /// Wraps the `provider` object of an EIP-6963 announcement.
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(provider: wasm_bindgen::JsValue) -> Self {
        Self::with_mode(ProviderMode::Browser(provider))
    }

    fn with_mode(mode: ProviderMode) -> Self {
        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self.mode {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => "proxy",
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser(_) => "browser",
        }
    }

    pub fn debug_set_accounts(&self, accounts: Vec<String>) -> Result<(), PortError> {
        let mut g = self
            .state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))?;
        g.accounts = accounts;
        Ok(())
    }

    pub fn debug_reject_sends(&self, reject: bool) -> Result<(), PortError> {
        let mut g = self
            .state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))?;
        g.reject_sends = reject;
        Ok(())
    }

    /// Methods requested so far, oldest first.
    pub fn request_log(&self) -> Result<Vec<String>, PortError> {
        let g = self
            .state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))?;
        Ok(g.request_log.clone())
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.lock_state()?.request_log.push(method.to_owned());

        match &self.mode {
            ProviderMode::Disabled(reason) => Err(ProviderError::Other(reason.clone())),
            ProviderMode::Deterministic => self.deterministic_request(method, &params),
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(proxy) => {
                let id = {
                    let mut g = self.lock_state()?;
                    g.next_id = g.next_id.saturating_add(1);
                    g.next_id
                };
                proxy_call(proxy, id, method, params).await
            }
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser(provider) => browser_request(provider, method, params).await,
        }
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, ProviderState>, ProviderError> {
        self.state
            .lock()
            .map_err(|e| ProviderError::Other(format!("provider lock poisoned: {e}")))
    }

    fn deterministic_request(&self, method: &str, params: &Value) -> Result<Value, ProviderError> {
        let g = self.lock_state()?;
        match method {
            "eth_requestAccounts" => Ok(serde_json::json!(g.accounts)),
            "eth_sendTransaction" => {
                if g.reject_sends {
                    return Err(ProviderError::UserRejected {
                        code: USER_REJECTED_CODE,
                        message: "User denied transaction signature.".to_owned(),
                    });
                }
                let tx = params.get(0).unwrap_or(&Value::Null);
                let canonical = serde_json::to_vec(tx)
                    .map_err(|e| ProviderError::Other(format!("tx serialization failed: {e}")))?;
                Ok(Value::String(keccak256(canonical).to_string()))
            }
            other => Err(ProviderError::Other(format!(
                "method {other} not supported by deterministic provider"
            ))),
        }
    }
}

#[async_trait(?Send)]
impl ProviderPort for Eip1193Adapter {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let result = self.request("eth_requestAccounts", Value::Null).await?;
        parse_accounts(&result)
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String, ProviderError> {
        let tx = serde_json::to_value(tx)
            .map_err(|e| ProviderError::Other(format!("tx encode failed: {e}")))?;
        let result = self
            .request("eth_sendTransaction", serde_json::json!([tx]))
            .await?;
        result.as_str().map(str::to_owned).ok_or_else(|| {
            ProviderError::Other("eth_sendTransaction must return tx hash".to_owned())
        })
    }
}

fn parse_accounts(result: &Value) -> Result<Vec<String>, ProviderError> {
    let arr = result.as_array().ok_or_else(|| {
        ProviderError::Other("eth_requestAccounts result must be array".to_owned())
    })?;
    arr.iter()
        .map(|item| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                ProviderError::Other("eth_requestAccounts item must be string".to_owned())
            })
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
fn rpc_error(err: &Value) -> ProviderError {
    let code = err.get("code").and_then(Value::as_i64);
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown provider error");
    ProviderError::from_rpc(code, message)
}

#[cfg(not(target_arch = "wasm32"))]
async fn proxy_call(
    proxy: &ProxyRuntime,
    id: u64,
    method: &str,
    params: Value,
) -> Result<Value, ProviderError> {
    let params = if params.is_null() {
        serde_json::json!([])
    } else {
        params
    };
    let payload = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    });
    let response = proxy
        .client
        .post(&proxy.url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| ProviderError::Other(format!("eip1193 proxy request failed: {e}")))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| ProviderError::Other(format!("eip1193 proxy json decode failed: {e}")))?;
    if let Some(err) = body.get("error") {
        return Err(rpc_error(err));
    }
    if !status.is_success() {
        return Err(ProviderError::Other(format!(
            "eip1193 proxy status {status}: {body}"
        )));
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| ProviderError::Other("eip1193 proxy missing result".to_owned()))
}

#[cfg(target_arch = "wasm32")]
async fn browser_request(
    provider: &wasm_bindgen::JsValue,
    method: &str,
    params: Value,
) -> Result<Value, ProviderError> {
    use serde::Serialize;
    use wasm_bindgen::JsCast;

    let request_fn = get_prop(provider, "request")
        .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| ProviderError::Other("provider.request is unavailable".to_owned()))?;

    let mut request = serde_json::json!({ "method": method });
    if !params.is_null() {
        request["params"] = params;
    }
    let request_js = request
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ProviderError::Other(format!("failed to encode wasm request: {e}")))?;
    let promise = request_fn
        .call1(provider, &request_js)
        .map_err(js_provider_error)?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| ProviderError::Other("provider request did not return Promise".to_owned()))?;
    let result_js = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(js_provider_error)?;
    serde_wasm_bindgen::from_value(result_js)
        .map_err(|e| ProviderError::Other(format!("failed to decode wasm response: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn js_provider_error(err: wasm_bindgen::JsValue) -> ProviderError {
    let code = get_prop(&err, "code")
        .and_then(|v| v.as_f64())
        .map(|c| c as i64);
    let message = get_prop(&err, "message")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    ProviderError::from_rpc(code, message)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Option<wasm_bindgen::JsValue> {
    if !target.is_object() {
        return None;
    }
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}
