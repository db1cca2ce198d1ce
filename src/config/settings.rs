#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub default_buy_in: i64,
    pub page_size: usize,
    pub max_page_size: usize,
    pub page_window: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_buy_in: 500,
            page_size: 10,
            max_page_size: 100,
            page_window: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_secs: 3600, // 1h
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "poker_ledger.db".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ledger: LedgerSettings,
    pub auth: AuthSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ledger: LedgerSettings::default(),
            auth: AuthSettings::default(),
            database: DatabaseSettings::default(),
        }
    }

    /// Defaults overridden by `DATABASE_PATH`, `JWT_SECRET` and `TOKEN_TTL_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database.path = path;
        }
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => config.auth.jwt_secret = secret,
            _ => log::warn!("JWT_SECRET is not set, using the built-in development secret"),
        }
        if let Some(ttl) = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|ttl| *ttl > 0)
        {
            config.auth.token_ttl_secs = ttl;
        }

        config
    }
}
