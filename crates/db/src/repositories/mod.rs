//! Repository layer: one zero-sized struct per table.
//!
//! Methods take `&PgPool` first. Plain reads and writes return
//! `sqlx::Error`; methods that enforce domain rules inside a transaction
//! return [`DbError`](crate::DbError).

pub mod booking_repo;
pub mod credential_repo;
pub mod event_repo;
pub mod favorite_repo;
pub mod inquiry_repo;
pub mod listing_repo;
pub mod owner_repo;
pub mod review_repo;
pub mod session_repo;
pub mod support_ticket_repo;
pub mod tenant_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use credential_repo::{CredentialRepo, PasswordResetRepo};
pub use event_repo::EventRepo;
pub use favorite_repo::FavoriteRepo;
pub use inquiry_repo::InquiryRepo;
pub use listing_repo::ListingRepo;
pub use owner_repo::OwnerRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use support_ticket_repo::SupportTicketRepo;
pub use tenant_repo::TenantRepo;
pub use user_repo::UserRepo;
