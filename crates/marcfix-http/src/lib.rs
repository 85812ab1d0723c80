//! marcfix-http - Record API client over HTTP(S).

mod client;
mod credentials;

pub use client::HttpRecordClient;
pub use credentials::Credentials;
