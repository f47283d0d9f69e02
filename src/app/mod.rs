use crate::api::{
    AiTextClient, CompletionBackend, DexScreenerClient, OpenAiBackend, TokenInfo, TokenInfoSource,
};
use crate::config::Config;
use crate::error::LookupError;
use crate::fetch::FetchState;
use crate::users::{MockUserSource, UserListProvider, UserRecord, UserSource};
use anyhow::{Context, Result};
use chrono::Local;
use futures::stream::BoxStream;
use log::{info, warn};
use std::sync::Arc;

/// Owns the configuration and one instance of each collaborator. Every
/// network-origin failure ends up in `status_message` rather than
/// propagating further.
pub struct App {
    pub config: Config,
    pub token: Option<TokenInfo>,
    pub users: FetchState<Vec<UserRecord>>,
    pub status_message: Option<String>,
    pub last_updated: Option<String>,
    tokens: Box<dyn TokenInfoSource>,
    user_provider: UserListProvider,
    ai: AiTextClient,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let tokens = DexScreenerClient::new(
            config.dexscreener_base_url.clone(),
            config.request_timeout(),
            config.lookup_retry(),
        )
        .context("Failed to build DexScreener client")?;

        let api_key = Config::api_key();
        if api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; AI replies will use the fallback");
        }
        let backend = OpenAiBackend::new(
            config.completion_base_url.clone(),
            api_key,
            config.completion_settings(),
            config.request_timeout(),
        )
        .context("Failed to build completion client")?;

        let users = Arc::new(MockUserSource::new(config.user_fetch_delay()));

        Ok(Self::with_collaborators(
            config,
            Box::new(tokens),
            users,
            Box::new(backend),
        ))
    }

    pub fn with_collaborators(
        config: Config,
        tokens: Box<dyn TokenInfoSource>,
        users: Arc<dyn UserSource>,
        backend: Box<dyn CompletionBackend>,
    ) -> Self {
        let ai = AiTextClient::new(backend, config.completion_retry())
            .with_fallback(config.fallback_reply.clone());
        Self {
            config,
            token: None,
            users: FetchState::Loading,
            status_message: None,
            last_updated: None,
            tokens,
            user_provider: UserListProvider::new(users),
            ai,
        }
    }

    pub async fn lookup_token(&mut self, address: &str) -> Result<TokenInfo, LookupError> {
        match self.tokens.lookup(address).await {
            Ok(info) => {
                info!("Resolved {} to {} ({})", address.trim(), info.name, info.symbol);
                self.token = Some(info.clone());
                self.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
                self.status_message = None;
                Ok(info)
            }
            Err(e) => {
                warn!("Token lookup failed for {}: {}", address.trim(), e);
                self.token = None;
                self.status_message = Some(format!("Error: {}", e));
                Err(e)
            }
        }
    }

    pub fn subscribe_users(&self) -> BoxStream<'static, FetchState<Vec<UserRecord>>> {
        self.user_provider.subscribe()
    }

    pub async fn load_users(&mut self) -> &FetchState<Vec<UserRecord>> {
        self.users = FetchState::Loading;
        self.users = self.user_provider.load().await;
        self.status_message = self.users.error().map(|e| format!("Error: {}", e));
        &self.users
    }

    pub async fn ask(&self, prompt: &str) -> String {
        self.ai.complete(prompt).await
    }
}
