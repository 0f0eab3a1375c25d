//! Certificate model.

use skillstack_core::certificate::Certificate;
use skillstack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `certificates` table.
#[derive(Debug, Clone, FromRow)]
pub struct CertificateRow {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_id: DbId,
    pub issued_at: Timestamp,
    pub certificate_url: Option<String>,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Certificate {
            id: row.id,
            user_id: row.user_id,
            skill_id: row.skill_id,
            issued_at: row.issued_at,
            certificate_url: row.certificate_url,
        }
    }
}
