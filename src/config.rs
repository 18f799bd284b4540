use crate::ai::opponent::Strength;

/// Application configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the UCI engine binary.
    pub engine_path: String,
    /// Default opponent strength when not specified on the command line.
    pub default_strength: Strength,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            engine_path: std::env::var("CHESS_ENGINE_PATH")
                .unwrap_or_else(|_| "stockfish".to_string()),
            default_strength: std::env::var("CHESS_DEFAULT_STRENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            engine_path: "stockfish".to_string(),
            default_strength: Strength::Medium,
        }
    }
}
