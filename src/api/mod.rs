pub mod completion;
pub mod dexscreener;
pub mod retry;

pub use completion::{AiTextClient, CompletionBackend, CompletionSettings, OpenAiBackend};
pub use dexscreener::{AddressKind, DexScreenerClient, TokenInfo, TokenInfoSource};
pub use retry::{Backoff, RetryConfig};
