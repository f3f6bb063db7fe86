//! Beverage DTOs for listing and serving.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Beverage;

/// Request body for `POST /beverages/{id}/servings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddServingRequest {
    /// Servings to add. Must be positive. Defaults to 1.
    #[serde(default = "default_amount")]
    pub amount: i64,
}

fn default_amount() -> i64 {
    1
}

/// Response body for `GET /beverages`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeverageListResponse {
    /// Beverages passing the filter, in catalog order.
    pub beverages: Vec<Beverage>,
    /// Live event total over all beverages, filtered or not.
    pub total_served: u64,
}
