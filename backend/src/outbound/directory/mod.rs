//! Remote user directory adapter.

pub mod http_user_directory;

pub use http_user_directory::HttpUserDirectory;
