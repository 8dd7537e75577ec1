use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `txHash` value reported when the wallet did not send the transaction.
pub const REJECTED_TX_HASH: &str = "rejected";

/// EIP-6963 provider metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub rdns: String,
}

/// Payload of one provider announcement.
#[derive(Debug, Clone)]
pub struct ProviderDetail<P> {
    pub info: ProviderInfo,
    pub provider: P,
}

/// Transaction parameters served by `GET /params`. Values are passed through
/// untouched: an absent field stays absent, an explicit `null` stays `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParams {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
}

// Only called for keys that are present, so `null` becomes `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `eth_sendTransaction` payload. Without a `from` the wallet picks the sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRequest {
    #[serde(flatten)]
    pub params: TxParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl TxRequest {
    pub fn new(params: TxParams, from: Option<String>) -> Self {
        Self { params, from }
    }
}

/// Final report for one connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSignal {
    TxHash(String),
    Rejected,
}

impl CompletionSignal {
    pub fn as_query_value(&self) -> &str {
        match self {
            Self::TxHash(hash) => hash,
            Self::Rejected => REJECTED_TX_HASH,
        }
    }
}

/// What a provider button shows: the wallet icon and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderButton {
    pub icon: String,
    pub name: String,
}

impl ProviderButton {
    pub fn from_info(info: &ProviderInfo) -> Self {
        Self {
            icon: info.icon.clone(),
            name: info.name.clone(),
        }
    }

    /// Inner markup of the button. Announced strings are escaped.
    pub fn to_html(&self) -> String {
        format!(
            "<img src=\"{}\" alt=\"{}\"><div>{}</div>",
            escape_html(&self.icon),
            escape_html(&self.name),
            escape_html(&self.name)
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
