mod client;
mod models;

pub use client::NotionClient;
pub use models::{DatabaseSchema, PropertySchema};
