pub mod allowlist;
pub mod api_error;
pub mod claim;
pub mod client;
pub mod contract;
pub mod eligibility;
pub mod error;
pub mod merkle;
pub mod server;
pub mod signature;
pub mod state;
pub mod telemetry;
