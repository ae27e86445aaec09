use serde::Deserialize;

/// Replicate version pin for the music generation model (meta/musicgen).
const DEFAULT_MUSIC_VERSION: &str =
    "671ac645ce5e552cc63a54a2bbff63fcf798043055d2dac5fc9e36a837eedcfb";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(flatten)]
    pub server: muse_core::config::Config,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub replicate: ReplicateSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Sessions expire after this many hours of inactivity.
    #[serde(default = "default_inactivity_hours")]
    pub inactivity_hours: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inactivity_hours: default_inactivity_hours(),
        }
    }
}

fn default_inactivity_hours() -> i64 {
    24
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    /// Base URL of the external identity service that issues sessions.
    #[serde(default = "default_identity_url")]
    pub url: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            url: default_identity_url(),
        }
    }
}

fn default_identity_url() -> String {
    "http://localhost:9005".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiSettings {
    /// Absence is tolerated at startup; the endpoints report a
    /// configuration error when the credential is first needed.
    pub api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_chat_model(),
            image_model: default_image_model(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_image_model() -> String {
    "dall-e-2".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplicateSettings {
    pub api_token: Option<String>,
    #[serde(default = "default_music_version")]
    pub music_version: String,
}

impl Default for ReplicateSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            music_version: default_music_version(),
        }
    }
}

fn default_music_version() -> String {
    DEFAULT_MUSIC_VERSION.to_string()
}

pub fn get_configuration() -> Result<Settings, muse_core::error::AppError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
