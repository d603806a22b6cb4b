use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub openai: OpenAiConfig,
    pub fcm: FcmConfig,
    pub onesignal: OneSignalConfig,
    pub replicate: ReplicateConfig,
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    pub project_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneSignalConfig {
    pub api_key: String,
    pub app_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplicateConfig {
    pub api_token: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(AppConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None)?,
                database: get_env("MONGODB_DATABASE", Some("asistente_db"))?,
            },
            openai: OpenAiConfig {
                // A missing key degrades the chat endpoint to an immediate
                // error; it never prevents startup.
                api_key: get_env("OPENAI_API_KEY", Some(""))?,
                model: get_env("OPENAI_MODEL", Some("gpt-4o"))?,
            },
            fcm: FcmConfig {
                project_id: get_env("FCM_PROJECT_ID", Some(""))?,
                access_token: get_env("FCM_ACCESS_TOKEN", Some(""))?,
            },
            onesignal: OneSignalConfig {
                api_key: get_env("ONESIGNAL_API_KEY", Some(""))?,
                app_id: get_env("ONESIGNAL_APP_ID", Some(""))?,
            },
            replicate: ReplicateConfig {
                api_token: get_env("REPLICATE_API_TOKEN", Some(""))?,
            },
            static_dir: get_env("STATIC_DIR", Some("assistant-service/public"))?,
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
