//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidUserRole(String),
    InvalidServiceType(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUserRole(s) => write!(f, "Invalid user role: {}", s),
            ParseError::InvalidServiceType(s) => write!(f, "Invalid service type: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "admin" => Ok(UserRole::Admin),
            _ => Err(ParseError::InvalidUserRole(s.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Salon service offered for reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    HaircutsAndStyling,
    ManicureAndPedicure,
    FacialTreatments,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::HaircutsAndStyling => "haircuts_and_styling",
            ServiceType::ManicureAndPedicure => "manicure_and_pedicure",
            ServiceType::FacialTreatments => "facial_treatments",
        }
    }
}

impl FromStr for ServiceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "haircuts_and_styling" => Ok(ServiceType::HaircutsAndStyling),
            "manicure_and_pedicure" => Ok(ServiceType::ManicureAndPedicure),
            "facial_treatments" => Ok(ServiceType::FacialTreatments),
            _ => Err(ParseError::InvalidServiceType(s.to_string())),
        }
    }
}

/// Reservation joined with the booking customer's contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: ServiceType,
    pub datetime: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// New reservation (for insertion)
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_id: String,
    pub service_type: ServiceType,
    pub datetime: DateTime<Utc>,
}

/// Review model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub reviewer_id: String,
    pub rating: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// New review (for insertion)
#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_id: String,
    pub rating: i64,
    pub description: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            password_hash: row.try_get("password_hash")?,
            // Unknown roles degrade to the least privileged one
            role: UserRole::from_str(&role_str).unwrap_or(UserRole::Customer),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Reservation {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let service_type_str: String = row.try_get("service_type")?;
        let service_type = ServiceType::from_str(&service_type_str).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "service_type".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Reservation {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            customer_name: row.try_get("full_name")?,
            phone_number: row.try_get("phone_number")?,
            service_type,
            datetime: parse_datetime_or_now(&row.try_get::<String, _>("datetime")?),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Review {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: row.try_get("id")?,
            reviewer_id: row.try_get("reviewer_id")?,
            rating: row.try_get("rating")?,
            description: row.try_get("description")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_round_trip_through_str() {
        assert_eq!("customer".parse::<UserRole>().unwrap(), UserRole::Customer);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("Admin".parse::<UserRole>().is_err());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Customer.is_admin());
    }

    #[test]
    fn test_service_type_from_str() {
        assert_eq!(
            "facial_treatments".parse::<ServiceType>().unwrap(),
            ServiceType::FacialTreatments
        );
        assert!("massage".parse::<ServiceType>().is_err());
    }
}
