pub mod confirmation;
pub mod database;
pub mod dispatch;
pub mod metrics;
pub mod providers;

pub use database::{MemoryUserStore, MongoUserStore, UserStore};
pub use metrics::{get_metrics, init_metrics, record_chat_request, record_provider_call};
pub use providers::{
    CompletionProvider, FcmProvider, MockCompletionProvider, MockPredictionProvider,
    MockPushProvider, OneSignalProvider, OpenAiProvider, PredictionProvider, ProviderError,
    ProviderResponse, PushMessage, PushProvider, ReplicateProvider,
};
