use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use postscout_browser::{BrowserOptions, ChromeSession, ProfileStore, TempProfile};
use postscout_core::{MatchStrategy, SearchQuery, locate_post};
use url::Url;

pub struct FindArgs {
    pub url: String,
    pub text: String,
    pub exact: bool,
    pub threshold: f64,
    pub early_stop: f64,
    pub max_scrolls: u32,
    pub min_text_len: usize,
    pub profile: Option<String>,
    pub headed: bool,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: String,
}

pub fn execute(args: FindArgs) -> Result<()> {
    let url = Url::parse(&args.url)
        .with_context(|| format!("'{}' is not a valid profile URL", args.url))?;

    let strategy = if args.exact {
        MatchStrategy::Exact
    } else {
        MatchStrategy::Fuzzy {
            threshold: args.threshold,
            early_stop: args.early_stop,
        }
    };

    let mut query = SearchQuery::new(url.as_str(), &args.text, strategy);
    query.max_scrolls = args.max_scrolls;
    query.min_text_len = args.min_text_len;

    // Reject bad targets before any browser work happens.
    query.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        // Keep a temporary profile alive for the whole search.
        let _temp_profile;
        let profile_dir = match &args.profile {
            Some(name) => {
                let store = ProfileStore::open_default()?;
                if !store.has_session(name) {
                    println!(
                        "⚠️  Profile '{name}' has no saved login session. Run `postscout login --profile {name}` first if the feed requires one."
                    );
                }
                store.persistent(name)?
            }
            None => {
                _temp_profile = TempProfile::new()?;
                _temp_profile.path().to_path_buf()
            }
        };

        let options = BrowserOptions {
            headless: !args.headed,
            chrome_path: args.chrome_path.clone(),
            profile_dir: Some(profile_dir),
            user_agent: args.user_agent.clone(),
        };

        println!("🚀 Launching browser...");
        let session = ChromeSession::launch(&options).await?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("static template"),
        );
        spinner.set_message(format!("Scrolling {url} for the target post..."));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = locate_post(&session, &query).await;

        spinner.finish_and_clear();
        if let Err(e) = session.close().await {
            tracing::warn!("browser shutdown failed: {e}");
        }

        let post = result?;
        println!(
            "✅ Found post after {} scroll attempt(s) (score {:.3})",
            post.scrolls, post.score
        );
        println!("{}", post.id);
        Ok(())
    })
}
