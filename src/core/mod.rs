pub mod config;
pub mod dispatch;
pub mod feed;
pub mod filter;
pub mod format;
pub mod identity;
pub mod relay;
pub mod sources;
pub mod storage;
