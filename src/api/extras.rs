//! Optional add-on endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::Extra, AppState};

use super::ApiResponse;

/// List the extras that can be added to a booking
#[utoipa::path(
    get,
    path = "/extras",
    tag = "extras",
    responses(
        (status = 200, description = "Active extras", body = crate::api::response::ExtraListEnvelope)
    )
)]
pub async fn list_extras(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Extra>>>> {
    let extras = state.services.extras.list_active().await?;
    Ok(Json(ApiResponse::ok(extras)))
}
