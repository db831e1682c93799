//! Review routes

use axum::{Router, extract::State, routing::get};
use salon_db::NewReview;
use tracing::info;

use crate::error::ApiError;
use crate::response::{ApiJson, ApiSuccess};
use crate::state::AppState;
use crate::validation::{validate_description, validate_rating};

use super::allow_only;
use super::auth::RequireSession;
use super::types::{CreateReviewRequest, ReviewResponse};

/// GET /api/reviews - public, newest first
async fn list_reviews(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ReviewResponse>>, ApiError> {
    let reviews = state.db.list_reviews().await?;
    Ok(ApiSuccess::ok(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

/// POST /api/reviews
async fn create_review(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    validate_rating(request.rating)?;
    validate_description(&request.description)?;

    let review = state
        .db
        .insert_review(NewReview {
            reviewer_id: session.subject().to_string(),
            rating: request.rating,
            description: request.description,
        })
        .await?;

    info!("Review {} posted by {}", review.id, session.subject());
    Ok(ApiSuccess::created(()))
}

/// Create review routes
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/reviews",
        allow_only("GET, POST", get(list_reviews).post(create_review)),
    )
}
