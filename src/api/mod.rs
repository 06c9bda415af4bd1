//! HTTP API module for the Calculator Engine.
//!
//! This module provides the REST endpoints for browsing the calculator
//! catalog and running calculators.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{HealthResponse, create_router};
pub use request::{CalculationRequest, LocaleQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
