use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use local_sign_core::{CompletionSignal, PortError, ServerPort, TxParams};

use crate::LocalSignConfig;

/// Client for the page's own origin: `GET /params` and `GET /done`.
#[derive(Debug, Clone)]
pub struct HttpServerAdapter {
    origin: String,
    client: reqwest::Client,
}

impl HttpServerAdapter {
    /// In the browser the origin is the page's; natively it comes from `config`.
    pub fn with_config(config: &LocalSignConfig) -> Result<Self, PortError> {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = config;
            let origin = web_sys::window()
                .ok_or_else(|| PortError::NotFound("window".to_owned()))?
                .location()
                .origin()
                .map_err(|e| PortError::Transport(format!("read location.origin failed: {e:?}")))?;
            return Ok(Self::new(origin, reqwest::Client::new()));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
                .build()
                .map_err(|e| PortError::Transport(format!("http client init failed: {e}")))?;
            Ok(Self::new(config.server_origin.clone(), client))
        }
    }

    pub fn new(origin: impl Into<String>, client: reqwest::Client) -> Self {
        let origin = origin.into().trim_end_matches('/').to_owned();
        Self { origin, client }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.origin)
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, PortError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("GET {url} failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response)
    }
}

#[async_trait(?Send)]
impl ServerPort for HttpServerAdapter {
    async fn fetch_params(&self) -> Result<TxParams, PortError> {
        let url = self.endpoint("params");
        self.get(&url, &[])
            .await?
            .json()
            .await
            .map_err(|e| PortError::Decode(format!("{url}: {e}")))
    }

    async fn report_done(&self, signal: &CompletionSignal) -> Result<(), PortError> {
        let url = self.endpoint("done");
        let _: Value = self
            .get(&url, &[("txHash", signal.as_query_value())])
            .await?
            .json()
            .await
            .map_err(|e| PortError::Decode(format!("{url}: {e}")))?;
        Ok(())
    }
}
