//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw rows.

pub mod certificate_repo;
pub mod session_repo;
pub mod skill_repo;
pub mod subtopic_repo;
pub mod user_repo;

pub use certificate_repo::CertificateRepo;
pub use session_repo::SessionRepo;
pub use skill_repo::SkillRepo;
pub use subtopic_repo::SubtopicRepo;
pub use user_repo::UserRepo;
