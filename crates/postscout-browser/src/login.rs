//! One-time interactive login bootstrap.
//!
//! Automating a social-media login form trips bot detection far more often
//! than a human doing it once, so the bootstrap opens a headed browser,
//! lets the operator log in (solving any CAPTCHA by hand), and relies on the
//! persistent profile directory to keep the session.

use std::time::Duration;

use async_trait::async_trait;
use console::Term;
use tracing::info;

use crate::error::{Error, Result};
use crate::profile::ProfileStore;
use crate::session::{BrowserOptions, ChromeSession};

/// Grace period before closing the browser so cookies finish flushing to
/// the profile directory.
const COOKIE_FLUSH_WAIT: Duration = Duration::from_secs(3);

/// Something that can guarantee a logged-in session exists before a search
/// runs.
#[async_trait]
pub trait SessionProvider {
    async fn ensure_authenticated(&self) -> Result<()>;
}

/// Interactive bootstrap: a no-op when the profile already holds a session,
/// otherwise a headed browser plus an operator.
pub struct InteractiveLogin {
    store: ProfileStore,
    profile_name: String,
    login_url: String,
    options: BrowserOptions,
}

impl InteractiveLogin {
    pub fn new(
        store: ProfileStore,
        profile_name: impl Into<String>,
        login_url: impl Into<String>,
        mut options: BrowserOptions,
    ) -> Self {
        // The operator has to see and drive the login page.
        options.headless = false;
        Self {
            store,
            profile_name: profile_name.into(),
            login_url: login_url.into(),
            options,
        }
    }

    async fn run_interactive(&self) -> Result<()> {
        let profile_dir = self.store.persistent(&self.profile_name)?;

        let mut options = self.options.clone();
        options.profile_dir = Some(profile_dir);

        let session = ChromeSession::launch(&options).await?;

        println!("A browser window has opened at {}.", self.login_url);
        println!("Log in there; solve any CAPTCHA or 'robot' check by hand.");
        println!("When you can see your logged-in home page, press ENTER here.");

        use postscout_core::BrowserSession;
        session
            .navigate(&self.login_url)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;

        // Block on the operator without stalling the runtime.
        tokio::task::spawn_blocking(|| Term::stdout().read_line())
            .await
            .map_err(|e| Error::Browser(format!("input task failed: {e}")))??;

        info!("waiting {COOKIE_FLUSH_WAIT:?} for session state to flush");
        tokio::time::sleep(COOKIE_FLUSH_WAIT).await;

        session.close().await?;
        println!(
            "Login session saved to profile '{}'. You can now run searches with it.",
            self.profile_name
        );
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for InteractiveLogin {
    async fn ensure_authenticated(&self) -> Result<()> {
        if self.store.has_session(&self.profile_name) {
            info!(profile = %self.profile_name, "existing login session found");
            return Ok(());
        }
        self.run_interactive().await
    }
}
