pub mod api;
pub mod client;
pub mod error;

pub use api::ChatApi;
pub use client::ChatClient;
