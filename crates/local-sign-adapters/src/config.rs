#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct LocalSignConfig {
    pub runtime_profile: RuntimeProfile,
    pub server_origin: String,
    pub request_timeout_ms: u64,
    pub eip1193_proxy_url: Option<String>,
    pub mount_element_id: String,
    pub wallet_name: Option<String>,
}

impl Default for LocalSignConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            server_origin: "http://127.0.0.1:8000".to_owned(),
            request_timeout_ms: 15_000,
            eip1193_proxy_url: None,
            mount_element_id: "providers".to_owned(),
            wallet_name: None,
        }
    }
}

impl LocalSignConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or invalid values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let runtime_profile = match non_empty("LOCAL_SIGN_PROFILE")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("production") | Some("prod") => RuntimeProfile::Production,
            _ => RuntimeProfile::Development,
        };

        Self {
            runtime_profile,
            server_origin: non_empty("LOCAL_SIGN_ORIGIN")
                .map(|v| v.trim().trim_end_matches('/').to_owned())
                .unwrap_or(defaults.server_origin),
            request_timeout_ms: non_empty("LOCAL_SIGN_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            eip1193_proxy_url: non_empty("LOCAL_SIGN_EIP1193_PROXY_URL"),
            mount_element_id: non_empty("LOCAL_SIGN_MOUNT_ID").unwrap_or(defaults.mount_element_id),
            wallet_name: non_empty("LOCAL_SIGN_WALLET"),
        }
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}
