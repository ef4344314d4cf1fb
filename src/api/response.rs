//! Success envelope shared by every endpoint

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{car::CategorySummary, Booking, BookingDetails, Car, Extra, Pagination},
    rental::AvailabilityResponse,
};

/// `{ success: true, data, message?, pagination? }`
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookingEnvelope = ApiResponse<Booking>,
    BookingDetailsEnvelope = ApiResponse<BookingDetails>,
    BookingListEnvelope = ApiResponse<Vec<Booking>>,
    CarEnvelope = ApiResponse<Car>,
    CarListEnvelope = ApiResponse<Vec<Car>>,
    CategoryListEnvelope = ApiResponse<Vec<CategorySummary>>,
    ExtraListEnvelope = ApiResponse<Vec<Extra>>,
    AvailabilityEnvelope = ApiResponse<AvailabilityResponse>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}
