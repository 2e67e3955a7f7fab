//! Shared utilities for integration testing.
//!
//! The mock ledger speaks just enough HTTP/1.1 for one request per connection:
//! it reads the headers and the `Content-Length` body, asks the script what to do
//! with call number N, and answers with `Connection: close`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use reserve_funds::accounts::{Account, DebitCard, InMemoryAccountStore};
use reserve_funds::accounts::memory::InstructionRow;
use reserve_funds::config::ServiceConfig;
use reserve_funds::lifecycle::Shutdown;
use reserve_funds::reservation::ReservationService;
use reserve_funds::resilience::{RetryPolicy, RetryingLedger};
use reserve_funds::ledger::HttpLedgerClient;
use reserve_funds::HttpServer;

/// A request as seen by the mock ledger.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn account_number(&self) -> &str {
        self.body["account_number"].as_str().unwrap_or_default()
    }
}

/// What the mock does with one call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with status and body.
    Respond(u16, String),
    /// Wait, then answer. Longer than the client timeout means a timeout.
    Delay(Duration, u16, String),
    /// Drop the connection without answering.
    Close,
}

/// Handle to a running mock ledger.
pub struct MockLedger {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockLedger {
    pub fn url(&self) -> String {
        format!("http://{}/Reservation", self.addr)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a programmable mock ledger on an ephemeral port.
///
/// `script` gets the request and its zero-based call index.
pub async fn start_mock_ledger<F>(script: F) -> MockLedger
where
    F: Fn(&RecordedRequest, usize) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(script);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let script = script.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        handle_connection(socket, script, recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockLedger { addr, requests }
}

async fn handle_connection<F>(
    mut socket: TcpStream,
    script: Arc<F>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) where
    F: Fn(&RecordedRequest, usize) -> MockReply + Send + Sync + 'static,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };

    let reply = {
        let mut seen = recorded.lock().unwrap();
        let index = seen.len();
        seen.push(request.clone());
        script(&request, index)
    };

    let (status, body) = match reply {
        MockReply::Respond(status, body) => (status, body),
        MockReply::Delay(delay, status, body) => {
            tokio::time::sleep(delay).await;
            (status, body)
        }
        MockReply::Close => {
            let _ = socket.shutdown().await;
            return;
        }
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let headers: HashMap<String, String> = head
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[header_end..header_end + content_length])
        .unwrap_or(Value::Null);
    Some(RecordedRequest { headers, body })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// A ledger answer for `request`, wrapped the way the ledger wraps it.
pub fn ledger_reply(request: &RecordedRequest, status: &str) -> String {
    let body = &request.body;
    let type_code = if status == "SUCCESS" { "RS" } else { "RJ" };
    json!({
        "service_time_elapsed": 3,
        "payload": {
            "status": status,
            "resource": {
                "transaction_uuid": uuid::Uuid::new_v4(),
                "request_uuid": body["request_uuid"],
                "reservation_uuid": uuid::Uuid::new_v4(),
                "account_number": body["account_number"],
                "debit_card_number": body.get("debit_card_number").cloned().unwrap_or(Value::Null),
                "transaction_amount": body["transaction_amount"],
                "running_balance_amount": 1000,
                "transaction_meta_data_json": body["transaction_meta_data_json"],
                "transaction_type_code": type_code,
                "insert_timestamp": "2024-05-01T12:00:00Z",
            }
        }
    })
    .to_string()
}

/// Success for every call.
pub fn approve(request: &RecordedRequest, _index: usize) -> MockReply {
    MockReply::Respond(200, ledger_reply(request, "SUCCESS"))
}

/// Config pointing at `ledger`, with fast retries and short timeouts.
pub fn test_config(ledger: &MockLedger) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.ledger.url = ledger.url();
    config.ledger.connect_timeout_ms = 200;
    config.ledger.request_timeout_ms = 300;
    config.retries.max_attempts = 3;
    config.retries.initial_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config.service.ait_id = "reserve-funds-test".to_string();
    config
}

/// Accounts used by the end-to-end tests.
///
/// - `PRIMARY` (EF) with card `CARD-PRIMARY` and overdraft chain `OD-1`, `OD-CLOSED`, `OD-2`
/// - `CLOSED` (CL) with card `CARD-CLOSED`
/// - `LONELY` (EF) without overdraft instructions
pub fn seeded_store() -> InMemoryAccountStore {
    let store = InMemoryAccountStore::new();
    for (number, status) in [
        ("PRIMARY", "EF"),
        ("CLOSED", "CL"),
        ("LONELY", "EF"),
        ("OD-1", "EF"),
        ("OD-2", "EF"),
        ("OD-CLOSED", "CL"),
    ] {
        store.insert_account(Account {
            account_number: number.to_string(),
            lifecycle_status: status.into(),
        });
    }
    store.insert_debit_card(DebitCard {
        debit_card_number: "CARD-PRIMARY".to_string(),
        lifecycle_status: "EF".into(),
        account_number: "PRIMARY".to_string(),
    });
    store.insert_debit_card(DebitCard {
        debit_card_number: "CARD-CLOSED".to_string(),
        lifecycle_status: "EF".into(),
        account_number: "CLOSED".to_string(),
    });

    let now = chrono::Utc::now();
    for (target, sequence) in [("OD-2", 3), ("OD-1", 1), ("OD-CLOSED", 2)] {
        store.insert_instruction(InstructionRow {
            account_number: "PRIMARY".to_string(),
            overdraft_account_number: target.to_string(),
            lifecycle_status: "EF".into(),
            sequence,
            effective_start: now - chrono::Duration::days(30),
            effective_end: None,
        });
    }
    store
}

/// Start the full service on an ephemeral port. Returns its base URL.
pub async fn start_service(config: ServiceConfig, store: InMemoryAccountStore) -> (String, Shutdown) {
    let client = HttpLedgerClient::new(config.ledger.clone(), config.service.ait_id.clone()).unwrap();
    let ledger = RetryingLedger::new(client, RetryPolicy::from(&config.retries));
    let service = ReservationService::new(Arc::new(store), Arc::new(ledger));

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, service);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (format!("http://{}", addr), shutdown)
}
