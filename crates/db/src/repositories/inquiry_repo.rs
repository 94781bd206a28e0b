//! Repository for the `inquiries` table.

use gharpayy_core::error::CoreError;
use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::{CreateInquiry, Inquiry};
use crate::DbError;

const COLUMNS: &str = "id, tenant_id, listing_id, owner_id, message, is_read, response, \
                       created_at, responded_at";

/// Tenant to owner messages about a listing.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Create an unread inquiry addressed to the listing's owner.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateInquiry,
    ) -> Result<Inquiry, DbError> {
        let query = format!(
            "INSERT INTO inquiries (tenant_id, listing_id, owner_id, message)
             SELECT $1, l.id, l.owner_id, $3 FROM listings l WHERE l.id = $2
             RETURNING {COLUMNS}"
        );
        let inquiry = sqlx::query_as::<_, Inquiry>(&query)
            .bind(tenant_id)
            .bind(input.listing_id)
            .bind(&input.message)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Listing",
                id: input.listing_id,
            })?;
        Ok(inquiry)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the owner's answer. An inquiry can be answered once.
    pub async fn respond(pool: &PgPool, id: DbId, response: &str) -> Result<Inquiry, DbError> {
        let query = format!(
            "UPDATE inquiries SET response = $2, is_read = true, responded_at = NOW()
             WHERE id = $1 AND response IS NULL
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .bind(response)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(inquiry) => Ok(inquiry),
            None => match Self::find_by_id(pool, id).await? {
                Some(_) => Err(CoreError::Conflict(format!(
                    "Inquiry {id} has already been answered"
                ))
                .into()),
                None => Err(CoreError::NotFound {
                    entity: "Inquiry",
                    id,
                }
                .into()),
            },
        }
    }

    /// Returns `true` if the inquiry exists.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE inquiries SET is_read = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_by_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries WHERE listing_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries WHERE tenant_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
