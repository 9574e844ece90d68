use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("request not found or already processed")]
    NotFoundOrAlreadyProcessed,

    #[error("request not found or not pending")]
    NotFoundOrNotPending,

    #[error("{0}")]
    Validation(String),

    #[error("captcha verification failed")]
    CaptchaFailed,

    #[error("name is required")]
    NameRequired,

    #[error("vote cooldown has not elapsed")]
    TooSoon,

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
