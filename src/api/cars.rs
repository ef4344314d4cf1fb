//! Fleet endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::car::{
        AvailableCarsQuery, Car, CarQuery, CategorySummary, CheckAvailabilityRequest, CreateCar,
        FeaturedCarsQuery, UpdateCar, UpdateCarStatus,
    },
    rental::AvailabilityResponse,
    AppState,
};

use super::{ApiJson, ApiPath, ApiQuery, ApiResponse, AuthenticatedUser};

/// List active cars with filters
#[utoipa::path(
    get,
    path = "/cars",
    tag = "cars",
    params(CarQuery),
    responses(
        (status = 200, description = "Cars matching the filters", body = crate::api::response::CarListEnvelope)
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CarQuery>,
) -> AppResult<Json<ApiResponse<Vec<Car>>>> {
    let (cars, pagination) = state.services.cars.list(&query).await?;
    Ok(Json(ApiResponse::paginated(cars, pagination)))
}

/// List cars free for a rental period
#[utoipa::path(
    get,
    path = "/cars/available",
    tag = "cars",
    params(AvailableCarsQuery),
    responses(
        (status = 200, description = "Cars with no overlapping booking", body = crate::api::response::CarListEnvelope),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_available_cars(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AvailableCarsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Car>>>> {
    let (cars, pagination) = state.services.cars.list_available(&query).await?;
    Ok(Json(ApiResponse::paginated(cars, pagination)))
}

/// Featured cars ready to rent
#[utoipa::path(
    get,
    path = "/cars/featured",
    tag = "cars",
    params(FeaturedCarsQuery),
    responses(
        (status = 200, description = "Active featured cars with status AVAILABLE", body = crate::api::response::CarListEnvelope)
    )
)]
pub async fn list_featured_cars(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FeaturedCarsQuery>,
) -> AppResult<Json<ApiResponse<Vec<Car>>>> {
    let cars = state.services.cars.featured(&query).await?;
    Ok(Json(ApiResponse::ok(cars)))
}

/// Car categories with active car counts
#[utoipa::path(
    get,
    path = "/cars/categories",
    tag = "cars",
    responses(
        (status = 200, description = "All categories with their display names", body = crate::api::response::CategoryListEnvelope)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CategorySummary>>>> {
    let categories = state.services.cars.categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// Get car by ID
#[utoipa::path(
    get,
    path = "/cars/{id}",
    tag = "cars",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = crate::api::response::CarEnvelope),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_car(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let car = state.services.cars.get(id).await?;
    Ok(Json(ApiResponse::ok(car)))
}

/// Add a car to the fleet (admin)
#[utoipa::path(
    post,
    path = "/cars",
    tag = "cars",
    security(("bearer_auth" = [])),
    request_body = CreateCar,
    responses(
        (status = 201, description = "Car created", body = crate::api::response::CarEnvelope),
        (status = 400, description = "Invalid car data", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateCar>,
) -> AppResult<(StatusCode, Json<ApiResponse<Car>>)> {
    claims.require_admin()?;

    let car = state.services.cars.create(data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(car, "Car created")),
    ))
}

/// Update a car (admin)
#[utoipa::path(
    put,
    path = "/cars/{id}",
    tag = "cars",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = UpdateCar,
    responses(
        (status = 200, description = "Car updated", body = crate::api::response::CarEnvelope),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateCar>,
) -> AppResult<Json<ApiResponse<Car>>> {
    claims.require_admin()?;

    let car = state.services.cars.update(id, data).await?;
    Ok(Json(ApiResponse::with_message(car, "Car updated")))
}

/// Change the operational status of a car (admin)
#[utoipa::path(
    patch,
    path = "/cars/{id}/status",
    tag = "cars",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = UpdateCarStatus,
    responses(
        (status = 200, description = "Status updated", body = crate::api::response::CarEnvelope),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_car_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateCarStatus>,
) -> AppResult<Json<ApiResponse<Car>>> {
    claims.require_admin()?;

    let car = state.services.cars.update_status(id, data.status).await?;
    Ok(Json(ApiResponse::with_message(car, "Car status updated")))
}

/// Delete a car (admin)
#[utoipa::path(
    delete,
    path = "/cars/{id}",
    tag = "cars",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car deleted"),
        (status = 400, description = "Car has confirmed or active bookings", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;

    state.services.cars.delete(id).await?;
    Ok(Json(ApiResponse::with_message((), "Car deleted")))
}

/// Check whether a car can be booked for a period
#[utoipa::path(
    post,
    path = "/cars/{id}/check-availability",
    tag = "cars",
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = CheckAvailabilityRequest,
    responses(
        (status = 200, description = "Availability and price quote", body = crate::api::response::AvailabilityEnvelope),
        (status = 400, description = "Invalid period", body = crate::error::ErrorResponse),
        (status = 404, description = "Car not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<CheckAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    let availability = state.services.cars.check_availability(id, &request).await?;
    Ok(Json(ApiResponse::ok(availability.into())))
}
