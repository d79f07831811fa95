//! Record store, financial ratios, persistence seam and configuration

pub mod api;
pub mod config;
pub mod log;
pub mod ratios;
pub mod record;
pub mod store;

// Re-export main types for cleaner imports
pub use api::{DetachedApi, InvestmentApi, Route};
pub use ratios::{FinancialRatios, FinancialStatement};
pub use record::{Investment, InvestmentFields, InvestmentId, Status};
pub use store::{RecordStore, SortColumn, SortState};
