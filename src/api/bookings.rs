//! Booking endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::booking::{
        Booking, BookingDetails, BookingQuery, CancelBookingRequest, CreateBookingRequest,
        MyBookingsQuery, RejectBookingRequest, VehicleConditionRequest,
    },
    AppState,
};

use super::{ApiJson, ApiPath, ApiQuery, ApiResponse, AuthenticatedUser, OptionalJson};

/// Create a booking request for a car
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = crate::api::response::BookingDetailsEnvelope),
        (status = 400, description = "Invalid request or car unavailable", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse),
        (status = 429, description = "Too many booking attempts")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookingDetails>>)> {
    let outcome = state.services.bookings.create(&claims, request).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            outcome.value,
            "Booking created successfully",
        )),
    ))
}

/// List the caller's bookings
#[utoipa::path(
    get,
    path = "/bookings/my-bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(MyBookingsQuery),
    responses(
        (status = 200, description = "Caller's bookings", body = crate::api::response::BookingListEnvelope),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiQuery(query): ApiQuery<MyBookingsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let (bookings, pagination) = state.services.bookings.list_mine(&claims, &query).await?;
    Ok(Json(ApiResponse::paginated(bookings, pagination)))
}

/// List all bookings (admin)
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings", body = crate::api::response::BookingListEnvelope),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiQuery(query): ApiQuery<BookingQuery>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    claims.require_admin()?;

    let (bookings, pagination) = state.services.bookings.list_all(&query).await?;
    Ok(Json(ApiResponse::paginated(bookings, pagination)))
}

/// Get booking details
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = crate::api::response::BookingDetailsEnvelope),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetails>>> {
    let booking = state.services.bookings.get(id, &claims).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// Cancel a booking (owner, or administrator)
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = crate::api::response::BookingEnvelope),
        (status = 400, description = "Booking cannot be cancelled in its state", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(request): OptionalJson<CancelBookingRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    validator::Validate::validate(&request)?;

    let outcome = state.services.bookings.cancel(id, &claims, request.reason).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok(Json(ApiResponse::with_message(outcome.value, "Booking cancelled")))
}

/// Confirm a pending booking (admin)
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = crate::api::response::BookingEnvelope),
        (status = 400, description = "Booking is not pending", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    claims.require_admin()?;

    let outcome = state.services.bookings.confirm(id).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok(Json(ApiResponse::with_message(outcome.value, "Booking confirmed")))
}

/// Reject a pending booking (admin)
#[utoipa::path(
    post,
    path = "/bookings/{id}/reject",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = RejectBookingRequest,
    responses(
        (status = 200, description = "Booking rejected", body = crate::api::response::BookingEnvelope),
        (status = 400, description = "Booking is not pending", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(request): OptionalJson<RejectBookingRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    claims.require_admin()?;
    validator::Validate::validate(&request)?;

    let outcome = state.services.bookings.reject(id, &claims, request.reason).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok(Json(ApiResponse::with_message(outcome.value, "Booking rejected")))
}

/// Hand the car over to the customer (admin)
#[utoipa::path(
    post,
    path = "/bookings/{id}/activate",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = VehicleConditionRequest,
    responses(
        (status = 200, description = "Rental started", body = crate::api::response::BookingEnvelope),
        (status = 400, description = "Invalid inspection or booking not confirmed", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn activate_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(inspection): ApiJson<VehicleConditionRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    claims.require_admin()?;

    let outcome = state.services.bookings.activate(id, inspection).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok(Json(ApiResponse::with_message(outcome.value, "Rental started")))
}

/// Take the car back from the customer (admin)
#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = VehicleConditionRequest,
    responses(
        (status = 200, description = "Rental completed", body = crate::api::response::BookingEnvelope),
        (status = 400, description = "Invalid inspection or booking not active", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(inspection): ApiJson<VehicleConditionRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    claims.require_admin()?;

    let outcome = state.services.bookings.complete(id, inspection).await?;
    state.services.notifications.dispatch(outcome.notifications);

    Ok(Json(ApiResponse::with_message(outcome.value, "Rental completed")))
}
