use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid search target: {0}")]
    InvalidTarget(String),

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Post not found after {scrolls} scroll attempts. The post may have been deleted or its text may have changed.")]
    PostNotFound { scrolls: u32 },

    #[error("Failed to click the matched post: {0}")]
    ClickFailed(String),

    #[error("Navigation timed out: {0}")]
    NavigationTimeout(String),

    #[error("Could not extract a status identifier from the final URL: {0}")]
    IdentifierUnextractable(String),

    #[error("Browser session error: {0}")]
    Session(String),
}

pub type Result<T> = std::result::Result<T, Error>;
