//! Request/Response DTOs for the JSON API

use salon_db::{Reservation, Review, ServiceType, UserRole};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response; the token itself only travels in the cookie
#[derive(Serialize)]
pub struct LoginResponse {
    pub role: UserRole,
}

/// Registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

// ==================== User Types ====================

/// Profile of the signed-in user
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub full_name: String,
    pub phone_number: String,
}

// ==================== Reservation Types ====================

/// Create reservation request; date and time are UTC
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub service_type: ServiceType,
    pub date: String,
    pub time: String,
}

/// Reservation row as shown in the dashboard table
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: ServiceType,
    pub date: String,
    pub time: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            customer_name: reservation.customer_name,
            phone_number: reservation.phone_number,
            service_type: reservation.service_type,
            date: reservation.datetime.format("%Y-%m-%d").to_string(),
            time: reservation.datetime.format("%H:%M:%S").to_string(),
        }
    }
}

// ==================== Review Types ====================

/// Create review request
#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub description: String,
}

/// Published review
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub rating: i64,
    pub description: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            rating: review.rating,
            description: review.description,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}
