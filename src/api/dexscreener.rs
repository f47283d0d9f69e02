use crate::api::retry::{with_retry, RetryConfig};
use crate::error::LookupError;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com/latest/dex";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    // Market data from the most liquid pair
    pub chain: String,
    pub dex: String,
    pub volume_24h: f64,
    pub liquidity_usd: f64,
    pub price_change_24h: f64,
    pub buys_24h: u64,
    pub sells_24h: u64,
}

/// Anything that can resolve a token address.
#[async_trait]
pub trait TokenInfoSource: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<TokenInfo, LookupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// `0x` followed by 40 hex digits
    Evm,
    /// base58 mint, 32-44 characters
    Solana,
}

fn is_base58(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

pub fn classify_address(address: &str) -> Result<AddressKind, LookupError> {
    let address = address.trim();
    if let Some(hex) = address.strip_prefix("0x") {
        if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(AddressKind::Evm);
        }
    } else if (32..=44).contains(&address.len()) && address.chars().all(is_base58) {
        return Ok(AddressKind::Solana);
    }
    Err(LookupError::InvalidAddress(address.to_string()))
}

// DexScreener response structures
#[derive(Debug, Deserialize)]
struct TokensResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
struct Pair {
    #[serde(rename = "chainId", default)]
    chain_id: String,
    #[serde(rename = "dexId", default)]
    dex_id: String,
    #[serde(rename = "baseToken")]
    base_token: BaseToken,
    #[serde(rename = "priceUsd", default)]
    price_usd: Option<String>,
    #[serde(default)]
    volume: Option<Windowed>,
    #[serde(default)]
    liquidity: Option<Liquidity>,
    #[serde(rename = "priceChange", default)]
    price_change: Option<Windowed>,
    #[serde(default)]
    txns: Option<Txns>,
}

#[derive(Debug, Deserialize)]
struct BaseToken {
    #[serde(default)]
    address: Option<String>,
    name: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct Windowed {
    #[serde(default)]
    h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Liquidity {
    #[serde(default)]
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Txns {
    #[serde(default)]
    h24: Option<TxnCounts>,
}

#[derive(Debug, Deserialize)]
struct TxnCounts {
    #[serde(default)]
    buys: u64,
    #[serde(default)]
    sells: u64,
}

impl Pair {
    fn volume_24h(&self) -> f64 {
        self.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0)
    }
}

/// Human-facing DEX name. Solana DEX ids are lowercase slugs.
fn dex_display_name(chain_id: &str, dex_id: &str) -> String {
    if chain_id != "solana" {
        return dex_id.to_string();
    }
    match dex_id {
        "raydium" => "Raydium".to_string(),
        "orca" => "Orca".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

/// Pick the highest-volume pair (Solana pairs only for Solana mints) and
/// flatten it into a [`TokenInfo`].
pub(crate) fn parse_tokens_response(
    address: &str,
    kind: AddressKind,
    body: &str,
) -> Result<TokenInfo, LookupError> {
    let data: TokensResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let mut pairs = data.pairs.unwrap_or_default();
    if kind == AddressKind::Solana {
        pairs.retain(|p| p.chain_id == "solana");
    }

    // min_by on the reversed order keeps the earliest pair among equal volumes
    let pair = pairs
        .into_iter()
        .min_by(|a, b| b.volume_24h().total_cmp(&a.volume_24h()))
        .ok_or_else(|| LookupError::NotFound(address.to_string()))?;

    let price = pair
        .price_usd
        .as_deref()
        .ok_or_else(|| LookupError::Decode("pair has no priceUsd".to_string()))?
        .parse::<f64>()
        .map_err(|e| LookupError::Decode(format!("priceUsd: {}", e)))?;

    let txns = pair.txns.as_ref().and_then(|t| t.h24.as_ref());

    Ok(TokenInfo {
        address: pair
            .base_token
            .address
            .clone()
            .unwrap_or_else(|| address.to_string()),
        name: pair.base_token.name.clone(),
        symbol: pair.base_token.symbol.clone(),
        price,
        dex: dex_display_name(&pair.chain_id, &pair.dex_id),
        volume_24h: pair.volume_24h(),
        liquidity_usd: pair.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0),
        price_change_24h: pair.price_change.as_ref().and_then(|p| p.h24).unwrap_or(0.0),
        buys_24h: txns.map(|t| t.buys).unwrap_or(0),
        sells_24h: txns.map(|t| t.sells).unwrap_or(0),
        chain: pair.chain_id,
    })
}

pub struct DexScreenerClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl DexScreenerClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TokenInfoSource for DexScreenerClient {
    async fn lookup(&self, address: &str) -> Result<TokenInfo, LookupError> {
        let address = address.trim();
        let kind = classify_address(address)?;
        let url = format!("{}/tokens/{}", self.base_url, address);
        info!("Requesting DexScreener: {}", url);

        let body = with_retry(
            &self.retry,
            "DexScreener lookup",
            LookupError::is_retryable,
            || self.fetch(&url),
        )
        .await?;
        debug!("DexScreener returned {} bytes for {}", body.len(), address);

        parse_tokens_response(address, kind, &body)
    }
}
