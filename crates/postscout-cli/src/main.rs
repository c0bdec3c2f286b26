use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "postscout")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Find a post on a profile feed by its text and print its status id",
    long_about = "Postscout drives a Chrome browser to scroll a profile feed, match a post by \
                  exact or fuzzy text comparison, click it, and print the numeric status \
                  identifier embedded in the post's URL. Run `login` once to store a session \
                  in a named profile, then `find` to search with it."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in interactively once and keep the session in a named profile
    Login {
        /// Profile to store the session under
        #[arg(long, default_value = "default")]
        profile: String,

        /// Login page to open
        #[arg(long, default_value = "https://x.com/login")]
        login_url: String,

        /// Path to the Chrome binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// User-agent string for the browser
        #[arg(long, default_value = postscout_browser::DEFAULT_USER_AGENT)]
        user_agent: String,
    },

    /// Search a profile feed for a post and print its status identifier
    Find {
        /// Profile page to search, e.g. https://x.com/SomeUser
        #[arg(value_name = "URL")]
        url: String,

        /// Post text to look for
        #[arg(value_name = "TEXT")]
        text: String,

        /// Require an exact text match instead of fuzzy scoring
        #[arg(long)]
        exact: bool,

        /// Minimum similarity for a fuzzy candidate to qualify
        #[arg(long, default_value_t = postscout_core::query::DEFAULT_FUZZY_THRESHOLD, value_parser = parse_ratio)]
        threshold: f64,

        /// Similarity at which the search stops scrolling for a better match
        #[arg(long, default_value_t = postscout_core::query::DEFAULT_EARLY_STOP, value_parser = parse_ratio)]
        early_stop: f64,

        /// Scroll budget before giving up
        #[arg(long, default_value_t = postscout_core::query::DEFAULT_MAX_SCROLLS)]
        max_scrolls: u32,

        /// Minimum candidate text length, in characters
        #[arg(long, default_value_t = postscout_core::query::DEFAULT_MIN_TEXT_LEN)]
        min_text_len: usize,

        /// Named login profile to search with
        #[arg(long)]
        profile: Option<String>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Path to the Chrome binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,

        /// User-agent string for the browser
        #[arg(long, default_value = postscout_browser::DEFAULT_USER_AGENT)]
        user_agent: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Login {
            profile,
            login_url,
            chrome_path,
            user_agent,
        } => commands::login::execute(profile, login_url, chrome_path, user_agent),
        Commands::Find {
            url,
            text,
            exact,
            threshold,
            early_stop,
            max_scrolls,
            min_text_len,
            profile,
            headed,
            chrome_path,
            user_agent,
        } => commands::find::execute(commands::find::FindArgs {
            url,
            text,
            exact,
            threshold,
            early_stop,
            max_scrolls,
            min_text_len,
            profile,
            headed,
            chrome_path,
            user_agent,
        }),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Parse a similarity ratio, rejecting values outside [0, 1].
fn parse_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("postscout=debug,postscout_core=debug,postscout_browser=debug")
    } else {
        EnvFilter::new("postscout=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
