//! Review operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewReview, Review};
use crate::repository::Database;

impl Database {
    // ==================== Review Operations ====================

    /// Insert a new review
    pub async fn insert_review(&self, review: NewReview) -> Result<Review, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO reviews (reviewer_id, rating, description, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&review.reviewer_id)
        .bind(review.rating)
        .bind(&review.description)
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(Review {
            id: result.try_get("id")?,
            reviewer_id: review.reviewer_id,
            rating: review.rating,
            description: review.description,
            created_at: now,
        })
    }

    /// List reviews, newest first
    pub async fn list_reviews(&self) -> Result<Vec<Review>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, reviewer_id, rating, description, created_at
            FROM reviews
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Review::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{NewReview, NewUser, UserRole};
    use crate::repository::test_support::temp_database;

    #[tokio::test]
    async fn test_insert_review_and_list() {
        let (_dir, db) = temp_database().await;
        let user = db
            .insert_user(NewUser {
                full_name: "Citra".to_string(),
                email: "citra@example.com".to_string(),
                phone_number: "083333333333".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Customer,
            })
            .await
            .unwrap();

        let review = db
            .insert_review(NewReview {
                reviewer_id: user.id.clone(),
                rating: 5,
                description: "Lovely facial".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(review.rating, 5);

        let reviews = db.list_reviews().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].reviewer_id, user.id);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected_by_schema() {
        let (_dir, db) = temp_database().await;
        let user = db
            .insert_user(NewUser {
                full_name: "Citra".to_string(),
                email: "citra@example.com".to_string(),
                phone_number: "083333333333".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Customer,
            })
            .await
            .unwrap();

        let result = db
            .insert_review(NewReview {
                reviewer_id: user.id,
                rating: 6,
                description: "Too good".to_string(),
            })
            .await;
        assert!(result.is_err());
    }
}
