//! Reservation operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewReservation, Reservation};
use crate::repository::Database;

const RESERVATION_SELECT: &str = r#"
    SELECT r.id, r.customer_id, r.service_type, r.datetime, r.created_at, u.full_name, u.phone_number
    FROM reservations r
    JOIN users u ON u.id = r.customer_id
"#;

impl Database {
    // ==================== Reservation Operations ====================

    /// Insert a new reservation for an existing customer
    pub async fn insert_reservation(&self, reservation: NewReservation) -> Result<i64, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO reservations (customer_id, service_type, datetime, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&reservation.customer_id)
        .bind(reservation.service_type.as_str())
        .bind(reservation.datetime.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.try_get("id")?)
    }

    /// List every reservation, earliest appointment first
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, DbError> {
        let rows = sqlx::query(&format!("{RESERVATION_SELECT} ORDER BY r.datetime ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Reservation::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List the reservations booked by one customer, earliest appointment first
    pub async fn list_reservations_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<Reservation>, DbError> {
        let rows = sqlx::query(&format!(
            "{RESERVATION_SELECT} WHERE r.customer_id = ? ORDER BY r.datetime ASC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Reservation::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::models::{NewReservation, NewUser, ServiceType, UserRole};
    use crate::repository::test_support::temp_database;

    #[tokio::test]
    async fn test_reservations_are_listed_in_datetime_order() {
        let (_dir, db) = temp_database().await;

        let ayu = db
            .insert_user(NewUser {
                full_name: "Ayu".to_string(),
                email: "ayu@example.com".to_string(),
                phone_number: "081111111111".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Customer,
            })
            .await
            .unwrap();
        let budi = db
            .insert_user(NewUser {
                full_name: "Budi".to_string(),
                email: "budi@example.com".to_string(),
                phone_number: "082222222222".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Customer,
            })
            .await
            .unwrap();

        db.insert_reservation(NewReservation {
            customer_id: ayu.id.clone(),
            service_type: ServiceType::FacialTreatments,
            datetime: Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap(),
        })
        .await
        .unwrap();
        db.insert_reservation(NewReservation {
            customer_id: budi.id.clone(),
            service_type: ServiceType::HaircutsAndStyling,
            datetime: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
        })
        .await
        .unwrap();

        let all = db.list_reservations().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].customer_name, "Budi");
        assert_eq!(all[0].service_type, ServiceType::HaircutsAndStyling);
        assert_eq!(all[1].phone_number, "081111111111");

        let own = db.list_reservations_for_customer(&ayu.id).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].customer_id, ayu.id);
    }
}
