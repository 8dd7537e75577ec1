#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

/// One canned reply, keyed by request path (query stripped) or JSON-RPC method.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorded {
    /// Request targets as received, including the query string.
    pub urls: Vec<String>,
    /// Content-Type header of each request, if any.
    pub content_types: Vec<Option<String>>,
    /// JSON-RPC methods, for POSTed bodies.
    pub rpc_methods: Vec<String>,
    pub rpc_bodies: Vec<Value>,
}

pub struct MockServer {
    pub base_url: String,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl MockServer {
    pub fn urls(&self) -> Vec<String> {
        self.recorded.lock().expect("recorded lock").urls.clone()
    }

    pub fn done_calls(&self) -> Vec<String> {
        self.urls()
            .into_iter()
            .filter(|u| u.starts_with("/done"))
            .collect()
    }

    pub fn rpc_methods(&self) -> Vec<String> {
        self.recorded.lock().expect("recorded lock").rpc_methods.clone()
    }

    pub fn rpc_bodies(&self) -> Vec<Value> {
        self.recorded.lock().expect("recorded lock").rpc_bodies.clone()
    }
}

/// Local sign server with the default happy-path answers.
pub fn sign_server() -> MockServer {
    sign_server_with(HashMap::new())
}

pub fn sign_server_with(overrides: HashMap<&'static str, Reply>) -> MockServer {
    let mut routes: HashMap<String, Reply> = HashMap::new();
    routes.insert("/params".to_owned(), Reply::json(200, params_fixture()));
    routes.insert("/done".to_owned(), Reply::json(200, json!({"status": "ok"})));
    for (k, v) in overrides {
        routes.insert(k.to_owned(), v);
    }
    spawn_mock_server(routes)
}

/// JSON-RPC wallet proxy answering by method name.
pub fn wallet_proxy(methods: HashMap<&'static str, Reply>) -> MockServer {
    spawn_mock_server(
        methods
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect(),
    )
}

pub fn params_fixture() -> Value {
    json!({
        "to": "0x000000000000000000000000000000000000CAFE",
        "value": "0x2386f26fc10000",
        "data": "0x4d49e87d",
        "chainId": "0x4268"
    })
}

pub fn rpc_result(result: Value) -> Reply {
    Reply::json(200, json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

pub fn rpc_error(code: i64, message: &str) -> Reply {
    Reply::json(
        200,
        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": code, "message": message}}),
    )
}

fn spawn_mock_server(routes: HashMap<String, Reply>) -> MockServer {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let base_url = format!("http://{}", server.server_addr());
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = Arc::clone(&recorded);

    thread::spawn(move || {
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let url = req.url().to_owned();
            let path = url.split('?').next().unwrap_or_default().to_owned();
            let content_type = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_owned());

            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let rpc: Option<Value> = serde_json::from_str(&body).ok();
            let rpc_method = rpc
                .as_ref()
                .and_then(|v| v.get("method"))
                .and_then(Value::as_str)
                .map(str::to_owned);

            if let Ok(mut g) = state.lock() {
                g.urls.push(url.clone());
                g.content_types.push(content_type);
                if let (Some(method), Some(body)) = (rpc_method.clone(), rpc) {
                    g.rpc_methods.push(method);
                    g.rpc_bodies.push(body);
                }
            }

            let reply = rpc_method
                .as_deref()
                .and_then(|m| routes.get(m))
                .or_else(|| routes.get(&path))
                .cloned()
                .unwrap_or_else(|| Reply::json(404, json!({"error": "not found"})));

            let response =
                Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
            let _ = req.respond(response);
        }
    });

    MockServer { base_url, recorded }
}
