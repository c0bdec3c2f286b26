mod chrome;
mod error;
mod login;
mod profile;
mod session;

pub use chrome::find_chrome;
pub use error::{Error, Result};
pub use login::{InteractiveLogin, SessionProvider};
pub use profile::{ProfileStore, TempProfile};
pub use session::{BrowserOptions, ChromeSession, DEFAULT_USER_AGENT};
