pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetcher;
pub mod http;
pub mod normalize;
pub mod retry;
pub mod source;
pub mod storage;

pub use config::FetchConfig;
pub use fetcher::{fetch_and_write, FetchReport};
