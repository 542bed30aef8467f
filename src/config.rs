//! Runtime configuration, read once from the environment.

#[derive(Debug, Clone)]
pub struct Config {
    /// Knowledge-engine credential. Absent means the session runs in the
    /// credential-missing guard mode and never dispatches a request.
    pub api_key: Option<String>,
    pub gemini_base: String,
    pub model: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_base: std::env::var("GEMINI_BASE")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Credential presence check. Polled at startup and whenever the
    /// frontend regains visibility.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_counts_as_absent() {
        let cfg = Config {
            api_key: None,
            gemini_base: String::new(),
            model: String::new(),
            http_timeout_secs: 30,
        };
        assert!(!cfg.has_credential());
    }
}
