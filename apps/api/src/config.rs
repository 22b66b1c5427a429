use anyhow::{Context, Result};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_CLIPDROP_BASE_URL: &str = "https://clipdrop-api.co";
const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";
const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub clipdrop_api_key: String,
    pub clipdrop_base_url: String,
    pub cloudinary: CloudinaryConfig,
    pub clerk_secret_key: String,
    /// PEM-encoded RS256 public key of the Clerk instance.
    pub clerk_jwt_key: String,
    pub clerk_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            clipdrop_api_key: require_env("CLIPDROP_API_KEY")?,
            clipdrop_base_url: env_or("CLIPDROP_BASE_URL", DEFAULT_CLIPDROP_BASE_URL),
            cloudinary: CloudinaryConfig {
                cloud_name: require_env("CLOUDINARY_CLOUD_NAME")?,
                api_key: require_env("CLOUDINARY_API_KEY")?,
                api_secret: require_env("CLOUDINARY_API_SECRET")?,
                base_url: env_or("CLOUDINARY_BASE_URL", DEFAULT_CLOUDINARY_BASE_URL),
            },
            clerk_secret_key: require_env("CLERK_SECRET_KEY")?,
            // .env files usually carry the PEM on one line with literal "\n"
            clerk_jwt_key: require_env("CLERK_JWT_KEY")?.replace("\\n", "\n"),
            clerk_api_url: env_or("CLERK_API_URL", DEFAULT_CLERK_API_URL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}
