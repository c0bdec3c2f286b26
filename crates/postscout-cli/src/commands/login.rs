use std::path::PathBuf;

use anyhow::Result;
use postscout_browser::{BrowserOptions, InteractiveLogin, ProfileStore, SessionProvider};

pub fn execute(
    profile: String,
    login_url: String,
    chrome_path: Option<PathBuf>,
    user_agent: String,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let store = ProfileStore::open_default()?;

        if store.has_session(&profile) {
            println!(
                "✅ Profile '{}' already holds a login session (under {}).",
                profile,
                store.root().display()
            );
            println!("   Delete its directory to log in from scratch.");
            return Ok(());
        }

        let options = BrowserOptions {
            headless: false,
            chrome_path,
            profile_dir: None,
            user_agent,
        };

        println!("🔐 No saved session for profile '{profile}'; starting interactive login.");
        let login = InteractiveLogin::new(store, &profile, &login_url, options);
        login.ensure_authenticated().await?;
        Ok(())
    })
}
