//! Reservation routes

use axum::{Router, extract::State, routing::get};
use salon_db::NewReservation;
use tracing::info;

use crate::error::ApiError;
use crate::response::{ApiJson, ApiSuccess};
use crate::state::AppState;
use crate::validation::parse_reservation_datetime;

use super::allow_only;
use super::auth::RequireSession;
use super::types::{CreateReservationRequest, ReservationResponse};

/// GET /api/reservations
///
/// Admins see every reservation, customers only their own. Oldest first.
async fn list_reservations(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Result<ApiSuccess<Vec<ReservationResponse>>, ApiError> {
    let reservations = if session.current_role().is_admin() {
        state.db.list_reservations().await?
    } else {
        state
            .db
            .list_reservations_for_customer(session.subject())
            .await?
    };

    Ok(ApiSuccess::ok(
        reservations.into_iter().map(ReservationResponse::from).collect(),
    ))
}

/// POST /api/reservations
async fn create_reservation(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let datetime = parse_reservation_datetime(&request.date, &request.time)?;

    let id = state
        .db
        .insert_reservation(NewReservation {
            customer_id: session.subject().to_string(),
            service_type: request.service_type,
            datetime,
        })
        .await?;

    info!(
        "Reservation {} created for {} at {}",
        id,
        session.subject(),
        datetime
    );
    Ok(ApiSuccess::ok(()))
}

/// Create reservation routes
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/reservations",
        allow_only(
            "GET, POST",
            get(list_reservations).post(create_reservation),
        ),
    )
}
