//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, cars, extras, health, response};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Car Rental Syria API",
        version = "1.0.0",
        description = "Car rental booking platform REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Cars
        cars::list_cars,
        cars::list_available_cars,
        cars::list_featured_cars,
        cars::list_categories,
        cars::get_car,
        cars::create_car,
        cars::update_car,
        cars::update_car_status,
        cars::delete_car,
        cars::check_availability,
        // Extras
        extras::list_extras,
        // Bookings
        bookings::create_booking,
        bookings::my_bookings,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        bookings::confirm_booking,
        bookings::reject_booking,
        bookings::activate_booking,
        bookings::complete_booking,
    ),
    components(
        schemas(
            // Cars
            crate::models::car::Car,
            crate::models::car::CreateCar,
            crate::models::car::UpdateCar,
            crate::models::car::UpdateCarStatus,
            crate::models::car::CheckAvailabilityRequest,
            crate::models::car::CategorySummary,
            crate::models::enums::CarStatus,
            crate::models::enums::CarCategory,
            crate::models::enums::Transmission,
            crate::models::enums::FuelType,
            crate::rental::AvailabilityResponse,
            crate::rental::PriceQuote,
            // Extras
            crate::models::extra::Extra,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingExtraLine,
            crate::models::booking::CreateBookingRequest,
            crate::models::booking::CancelBookingRequest,
            crate::models::booking::RejectBookingRequest,
            crate::models::booking::VehicleConditionRequest,
            crate::models::booking::InspectionType,
            crate::models::enums::BookingStatus,
            // Envelopes
            crate::models::pagination::Pagination,
            response::BookingEnvelope,
            response::BookingDetailsEnvelope,
            response::BookingListEnvelope,
            response::CarEnvelope,
            response::CarListEnvelope,
            response::CategoryListEnvelope,
            response::ExtraListEnvelope,
            response::AvailabilityEnvelope,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cars", description = "Fleet catalogue and availability"),
        (name = "extras", description = "Optional booking add-ons"),
        (name = "bookings", description = "Booking requests and rental lifecycle")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by protected endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_booking_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/bookings/{id}/confirm"]["post"].is_object());
        assert!(doc["paths"]["/cars/{id}/check-availability"]["post"].is_object());
        assert!(doc["paths"]["/cars/featured"]["get"].is_object());
        assert!(doc["paths"]["/cars/categories"]["get"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
