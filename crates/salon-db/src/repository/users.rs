//! User (credential record) operations

use chrono::Utc;
use uuid::Uuid;

use crate::error::{DbError, UniqueField, map_unique_violation};
use crate::models::{NewUser, User};
use crate::repository::Database;

const USER_COLUMNS: &str =
    "id, full_name, email, phone_number, password_hash, role, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Email is checked before phone number, so a request colliding on both
    /// reports the email.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(DbError::Duplicate(UniqueField::Email));
        }
        if self.get_user_by_phone_number(&user.phone_number).await?.is_some() {
            return Err(DbError::Duplicate(UniqueField::PhoneNumber));
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        // A concurrent registration can still win the race; the UNIQUE
        // constraints catch it here.
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, phone_number, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(User {
            id,
            full_name: user.full_name,
            email: user.email,
            phone_number: user.phone_number,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by phone number
    pub async fn get_user_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?"
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::UserRole;
    use crate::repository::test_support::temp_database;
    use crate::{DbError, NewUser, UniqueField};

    fn new_customer(email: &str, phone_number: &str) -> NewUser {
        NewUser {
            full_name: "Dewi Lestari".to_string(),
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: UserRole::Customer,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_user() {
        let (_dir, db) = temp_database().await;

        let user = db
            .insert_user(new_customer("dewi@example.com", "081234567890"))
            .await
            .unwrap();

        let by_email = db.get_user_by_email("dewi@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, UserRole::Customer);

        let by_id = db.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.phone_number, "081234567890");

        assert!(db.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_reported_as_email() {
        let (_dir, db) = temp_database().await;
        db.insert_user(new_customer("dewi@example.com", "081234567890"))
            .await
            .unwrap();

        let err = db
            .insert_user(new_customer("dewi@example.com", "089999999999"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(UniqueField::Email)));

        // Colliding on both columns still names the email
        let err = db
            .insert_user(new_customer("dewi@example.com", "081234567890"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(UniqueField::Email)));
    }

    #[tokio::test]
    async fn test_duplicate_phone_number_is_reported_as_phone() {
        let (_dir, db) = temp_database().await;
        db.insert_user(new_customer("dewi@example.com", "081234567890"))
            .await
            .unwrap();

        let err = db
            .insert_user(new_customer("sari@example.com", "081234567890"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(UniqueField::PhoneNumber)));
    }
}
