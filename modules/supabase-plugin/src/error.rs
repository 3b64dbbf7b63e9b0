/// Invalid Supabase settings. Raised once, at start-up.
#[derive(Debug, thiserror::Error)]
pub enum SupabaseConfigError {
    #[error("invalid supabase url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("supabase anon key is not set")]
    MissingAnonKey,

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("supabase timeout must be greater than zero")]
    ZeroTimeout,

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
