mod client;
mod errors;
mod user_agent;
pub use self::client::{Client, CRAWL_DELAY, DEFAULT_BASE_URL, INDEX_PATH};
pub use self::errors::Error;
