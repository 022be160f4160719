pub mod api_client;
pub mod auth;
pub mod fetch;
pub mod prober;

pub use crate::domain::model::ProbeReport;
pub use crate::domain::ports::{HealthCheck, UserStore};
pub use crate::utils::error::Result;
