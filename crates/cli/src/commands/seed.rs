//! Seed the bookstore with users and books from a YAML file.
//!
//! # Usage
//!
//! ```bash
//! bookstore-cli seed --file catalog.yaml
//! ```
//!
//! # File Format
//!
//! ```yaml
//! users:
//!   - UserID: 1
//!     Username: Ada
//!     Email: ada@example.com
//!     UserType: Admin
//! books:
//!   - title: SPQR
//!     author: Mary Beard
//!     price: 22.50
//!     genre: History
//!     published_year: 2015
//!     publisher: Profile
//! ```
//!
//! Books get IDs from the book sequence. Users whose ID is taken and books
//! whose title exists are skipped, so seeding twice is harmless.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use bookstore_core::User;
use bookstore_storefront::db::{Collection, Gateway, PgGateway};
use bookstore_storefront::services::{
    AccountDraft, BookDraft, CatalogService, IdentityService, ServiceError,
};

use super::{CommandError, connect};

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub books: Vec<BookDraft>,
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_added: usize,
    pub users_skipped: usize,
    pub books_added: usize,
    pub books_skipped: usize,
}

/// Seed from the YAML file at `file_path`.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be read or parsed, or the
/// database fails.
pub async fn from_file(file_path: &str) -> Result<SeedReport, CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading seed data from file");

    // Read and parse before connecting to the database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_owned(),
            source,
        })?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(users = seed.users.len(), books = seed.books.len(), "Parsed seed file");

    let gateway = PgGateway::new(connect().await?);
    let report = seed_records(&gateway, seed).await?;

    let total_users = gateway
        .count(Collection::Users)
        .await
        .map_err(ServiceError::from)?;
    let total_books = gateway
        .count(Collection::Books)
        .await
        .map_err(ServiceError::from)?;
    info!(
        users_added = report.users_added,
        users_skipped = report.users_skipped,
        books_added = report.books_added,
        books_skipped = report.books_skipped,
        total_users,
        total_books,
        "Seeding complete"
    );
    Ok(report)
}

/// Insert `seed` through the identity and catalog services.
///
/// # Errors
///
/// Returns the first error other than a duplicate user or title.
pub async fn seed_records(
    gateway: &dyn Gateway,
    seed: SeedFile,
) -> Result<SeedReport, CommandError> {
    let identity = IdentityService::new(gateway);
    let catalog = CatalogService::new(gateway);
    let mut report = SeedReport::default();

    for user in seed.users {
        let draft = AccountDraft {
            name: Some(user.username),
            email: Some(user.email),
            id: Some(user.id.to_string()),
        };
        match identity.create_account(user.user_type, &draft).await {
            Ok(_) => report.users_added += 1,
            Err(ServiceError::DuplicateUserId) => {
                warn!(user_id = %user.id, "User ID already exists, skipping");
                report.users_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    for draft in seed.books {
        match catalog.add_book(&draft).await {
            Ok(_) => report.books_added += 1,
            Err(ServiceError::DuplicateTitle) => {
                warn!(title = ?draft.title, "Title already exists, skipping");
                report.books_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report)
}
