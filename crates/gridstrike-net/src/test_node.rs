//! A local JSON-RPC node serving canned answers, one request per connection.

use crate::client::LedgerClient;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

type Reply = Result<Value, (i64, String)>;
type Handler = dyn Fn(&str, &Value) -> Reply + Send + Sync;

pub(crate) struct TestNode {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl TestNode {
    /// Listens on an ephemeral port and answers each request with
    /// `handler(method, params)`; `Err((code, message))` becomes a JSON-RPC
    /// error object.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let endpoint = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, handler.clone(), seen.clone()));
            }
        });
        Self { endpoint, requests }
    }

    /// A client for this node that ignores proxy settings.
    pub fn client(&self) -> LedgerClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("http client");
        LedgerClient::with_http_client(http, self.endpoint.clone())
    }

    /// Params of every request for `method`, oldest first.
    pub fn params(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .expect("requests")
            .iter()
            .filter(|request| request["method"] == method)
            .map(|request| request["params"].clone())
            .collect()
    }
}

async fn serve(stream: TcpStream, handler: Arc<Handler>, seen: Arc<Mutex<Vec<Value>>>) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.expect("header") == 0 {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("content length");
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await.expect("body");
    let request: Value = serde_json::from_slice(&body).expect("json body");

    let method = request["method"].as_str().unwrap_or_default().to_string();
    let reply = match (*handler)(&method, &request["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": code, "message": message }
        }),
    };
    seen.lock().expect("requests").push(request);

    let payload = reply.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await.expect("write");
    let _ = stream.shutdown().await;
}
