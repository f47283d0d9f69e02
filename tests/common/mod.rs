#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use token_desk::api::{Backoff, CompletionBackend, RetryConfig, TokenInfo, TokenInfoSource};
use token_desk::error::{CompletionError, FetchError, LookupError};
use token_desk::users::{UserRecord, UserSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const SOLANA_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
pub const EVM_ADDRESS: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff: Backoff::Linear,
    }
}

pub fn make_token(name: &str, symbol: &str, price: f64) -> TokenInfo {
    TokenInfo {
        address: EVM_ADDRESS.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        price,
        chain: "ethereum".to_string(),
        dex: "uniswap".to_string(),
        volume_24h: 0.0,
        liquidity_usd: 0.0,
        price_change_24h: 0.0,
        buys_24h: 0,
        sells_24h: 0,
    }
}

/// A throwaway HTTP/1.1 server that answers each connection with the next
/// canned response (the last one repeats) and records raw requests.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let raw = read_request(&mut stream).await.unwrap_or_default();
                recorded.lock().unwrap().push(raw);

                let (status, body) = responses
                    .get(served)
                    .or_else(|| responses.last())
                    .cloned()
                    .unwrap_or((500, String::new()));
                served += 1;

                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            if buf.len() >= end + 4 + content_length(&head) {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buf).to_string())
}

// --- fakes ---

pub struct FakeTokens {
    pub result: Result<TokenInfo, String>,
    pub calls: AtomicUsize,
}

impl FakeTokens {
    pub fn ok(info: TokenInfo) -> Self {
        Self {
            result: Ok(info),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result: Err("missing".to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TokenInfoSource for FakeTokens {
    async fn lookup(&self, address: &str) -> Result<TokenInfo, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(info) => Ok(info.clone()),
            Err(_) => Err(LookupError::NotFound(address.to_string())),
        }
    }
}

/// Fails the first `failures` calls with a 503, then answers `reply`.
pub struct FlakyBackend {
    pub failures: usize,
    pub reply: String,
    pub calls: Arc<AtomicUsize>,
}

impl FlakyBackend {
    pub fn new(failures: usize, reply: &str) -> Self {
        Self {
            failures,
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CompletionBackend for FlakyBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(CompletionError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })
        } else {
            Ok(self.reply.clone())
        }
    }
}

pub struct BrokenBackend;

#[async_trait]
impl CompletionBackend for BrokenBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::MissingCredential)
    }
}

pub struct FailingUsers;

#[async_trait]
impl UserSource for FailingUsers {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        Err(FetchError::Unavailable("database offline".to_string()))
    }
}

pub struct DuplicateUsers;

#[async_trait]
impl UserSource for DuplicateUsers {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        let user = UserRecord {
            id: 7,
            username: "twin".to_string(),
            email: "twin@example.com".to_string(),
        };
        Ok(vec![user.clone(), user])
    }
}
