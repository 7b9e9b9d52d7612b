/// Contact model and database operations
///
/// Every query in this module is scoped by the owning user's ID. A contact
/// that exists but belongs to someone else is indistinguishable from one that
/// does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contacts (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100),
///     email VARCHAR(200),
///     phone VARCHAR(20),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Columns selected for every contact query
const CONTACT_COLUMNS: &str =
    "id, user_id, first_name, last_name, email, phone, created_at, updated_at";

/// Default page size for contact searches
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a search may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// A contact owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Surrogate key
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// First name (required)
    pub first_name: String,

    /// Last name
    pub last_name: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContact {
    /// Owning user
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Replacement values for an existing contact
///
/// Every field is written, so `None` clears the stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Search filters and paging for listing a user's contacts
///
/// Text filters are case-insensitive substring matches. `name` matches
/// either the first or the last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// 1-based page number
    pub page: u32,

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`
    pub size: u32,
}

impl Default for ContactFilter {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            phone: None,
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ContactFilter {
    /// Returns a copy with page and size forced into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.size = self.size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Number of rows to skip for the current page
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.size)
    }

    /// Checks whether a contact satisfies the text filters
    ///
    /// Used by backends that filter in process rather than in SQL.
    pub fn matches(&self, contact: &Contact) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |needle| {
            contains_ignore_case(&contact.first_name, needle)
                || contact
                    .last_name
                    .as_deref()
                    .is_some_and(|last| contains_ignore_case(last, needle))
        });
        let email_ok = self.email.as_deref().map_or(true, |needle| {
            contact
                .email
                .as_deref()
                .is_some_and(|email| contains_ignore_case(email, needle))
        });
        let phone_ok = self.phone.as_deref().map_or(true, |needle| {
            contact
                .phone
                .as_deref()
                .is_some_and(|phone| contains_ignore_case(phone, needle))
        });

        name_ok && email_ok && phone_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Builds an ILIKE substring pattern, escaping the LIKE wildcards
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Contact {
    /// Creates a new contact
    ///
    /// # Errors
    ///
    /// Returns an error if the owning user does not exist (foreign key
    /// violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateContact) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO contacts (user_id, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );

        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(data.user_id)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.email)
            .bind(data.phone)
            .fetch_one(pool)
            .await?;

        Ok(contact)
    }

    /// Finds a contact by ID, only if it belongs to `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM contacts WHERE id = $1 AND user_id = $2",
            CONTACT_COLUMNS
        );

        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(contact)
    }

    /// Replaces the fields of a contact owned by `user_id`
    ///
    /// # Returns
    ///
    /// The updated contact, or None if no contact with that ID belongs to the
    /// user
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn update_for_user(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        data: UpdateContact,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE contacts
            SET first_name = $3, last_name = $4, email = $5, phone = $6, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        );

        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(user_id)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.email)
            .bind(data.phone)
            .fetch_optional(pool)
            .await?;

        Ok(contact)
    }

    /// Deletes a contact owned by `user_id`
    ///
    /// # Returns
    ///
    /// True if a contact was deleted, false if none matched
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete_for_user(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches a user's contacts
    ///
    /// # Returns
    ///
    /// The requested page ordered by ID, and the total number of matches
    /// across all pages
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn search(
        pool: &PgPool,
        user_id: i64,
        filter: &ContactFilter,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let conditions = r#"
            user_id = $1
            AND ($2::TEXT IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2)
            AND ($3::TEXT IS NULL OR email ILIKE $3)
            AND ($4::TEXT IS NULL OR phone ILIKE $4)
        "#;

        let name = filter.name.as_deref().map(like_pattern);
        let email = filter.email.as_deref().map(like_pattern);
        let phone = filter.phone.as_deref().map(like_pattern);

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM contacts WHERE {}", conditions))
                .bind(user_id)
                .bind(&name)
                .bind(&email)
                .bind(&phone)
                .fetch_one(pool)
                .await?;

        let query = format!(
            "SELECT {} FROM contacts WHERE {} ORDER BY id ASC LIMIT $5 OFFSET $6",
            CONTACT_COLUMNS, conditions
        );

        let contacts = sqlx::query_as::<_, Contact>(&query)
            .bind(user_id)
            .bind(&name)
            .bind(&email)
            .bind(&phone)
            .bind(i64::from(filter.size))
            .bind(filter.offset())
            .fetch_all(pool)
            .await?;

        Ok((contacts, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(first: &str, last: Option<&str>, email: Option<&str>) -> Contact {
        Contact {
            id: 1,
            user_id: 1,
            first_name: first.to_string(),
            last_name: last.map(str::to_string),
            email: email.map(str::to_string),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_normalized_clamps_paging() {
        let filter = ContactFilter {
            page: 0,
            size: 1000,
            ..Default::default()
        }
        .normalized();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.size, MAX_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_filter_offset() {
        let filter = ContactFilter {
            page: 3,
            size: 10,
            ..Default::default()
        };
        assert_eq!(filter.offset(), 20);
    }

    #[test]
    fn test_filter_matches_name_on_first_or_last() {
        let filter = ContactFilter {
            name: Some("aug".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&contact("Furqon", Some("August"), None)));
        assert!(filter.matches(&contact("Augustus", None, None)));
        assert!(!filter.matches(&contact("Budi", Some("Santoso"), None)));
    }

    #[test]
    fn test_filter_email_requires_present_value() {
        let filter = ContactFilter {
            email: Some("@mail.com".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&contact("A", None, Some("a@MAIL.com"))));
        assert!(!filter.matches(&contact("A", None, None)));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
