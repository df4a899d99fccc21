//! Transport-layer types shared between the backend crates.
//! The metric structs mirror what the handlers return so the compute
//! crate, the HTTP layer and the tests all agree on one shape.

mod metrics;

pub use metrics::{BalanceFilter, BalanceSign, CropMetrics, LedgerBalance, ProfitabilityFilter};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The requesting principal as supplied by the external identity
/// provider: a user id plus the single unrestricted-role flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub is_superuser: bool,
}

impl Principal {
    pub fn restricted(user_id: i32) -> Self {
        Self {
            user_id,
            is_superuser: false,
        }
    }

    pub fn superuser(user_id: i32) -> Self {
        Self {
            user_id,
            is_superuser: true,
        }
    }
}

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}
