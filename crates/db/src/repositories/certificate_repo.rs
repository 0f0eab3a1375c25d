//! Repository for the `certificates` table.

use skillstack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::certificate::CertificateRow;

/// Column list for certificates queries.
const COLUMNS: &str = "id, user_id, skill_id, issued_at, certificate_url";

/// Provides read access to certificates. Inserts happen during skill completion.
pub struct CertificateRepo;

impl CertificateRepo {
    /// List a user's certificates, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CertificateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificates WHERE user_id = $1 ORDER BY issued_at DESC, id DESC"
        );
        sqlx::query_as::<_, CertificateRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List the certificates issued for a skill, oldest first.
    pub async fn list_by_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<CertificateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificates WHERE skill_id = $1 ORDER BY issued_at ASC, id ASC"
        );
        sqlx::query_as::<_, CertificateRow>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a certificate inside an open transaction.
    ///
    /// A second certificate for the same (user, skill) violates
    /// `uq_certificates_user_skill`.
    pub(crate) async fn insert_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        skill_id: DbId,
        issued_at: Timestamp,
    ) -> Result<CertificateRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO certificates (user_id, skill_id, issued_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CertificateRow>(&query)
            .bind(user_id)
            .bind(skill_id)
            .bind(issued_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete every certificate of a skill inside an open transaction.
    pub(crate) async fn delete_by_skill_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        skill_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM certificates WHERE skill_id = $1")
            .bind(skill_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
