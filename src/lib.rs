pub mod browser;
pub mod config;
pub mod consent;
pub mod extract;
pub mod humanize;
pub mod orchestrator;
pub mod pricing;
pub mod profiles;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use orchestrator::{RetailerReport, RunOrchestrator, RunSummary};
pub use pricing::PriceQuote;
pub use profiles::{ConsentStrategy, RetailerProfile};
pub use store::{Inventory, Snapshot, Wishlist};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
