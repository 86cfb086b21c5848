//! # bill-kit
//!
//! A type-safe, backend-agnostic invoicing core for Rust.
//!
//! ## Features
//!
//! - **Explicit state:** One [`AppState`] object threads the session and
//!   all collections through every operation - no ambient globals
//! - **Backend agnostic:** Whole-collection persistence over any
//!   [`StorageBackend`]; in-memory and file backends included
//! - **Scoped storage:** Every collection is partitioned per
//!   authenticated user, with first-run seeding of a starter catalog
//! - **Checked invariants:** Line totals and invoice totals are
//!   recomputed by a closed set of update operations, never by hand
//! - **Hardened identity:** Salted Argon2 password hashes, generic
//!   credential errors, a single sanitized session record
//!
//! ## Quick Start
//!
//! ```ignore
//! use bill_kit::{App, InvoiceComposer, backend::InMemoryBackend};
//!
//! #[tokio::main]
//! async fn main() -> bill_kit::Result<()> {
//!     let mut app = App::new(InMemoryBackend::new());
//!
//!     // Register (and auto-login); the scope is seeded with a starter
//!     // catalog of products and customers.
//!     app.register("owner@example.com", "secret", "Acme Studio").await?;
//!
//!     // Compose an invoice against the catalog.
//!     let mut composer = InvoiceComposer::new();
//!     composer.select_customer("2");
//!     composer.add_item(&app.state().products);
//!
//!     // Persist it (and optionally export a document artifact).
//!     let invoice = app.save_invoice(&mut composer, None).await?;
//!     println!("saved {} for {}", invoice.invoice_number, invoice.total);
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod app;
pub mod auth;
pub mod backend;
pub mod collection;
pub mod composer;
pub mod document;
pub mod error;
#[cfg(feature = "insights")]
pub mod insight;
pub mod model;
pub mod store;

// Re-exports for convenience
pub use app::{App, AppState};
pub use auth::AuthService;
pub use backend::StorageBackend;
pub use collection::CollectionManager;
pub use composer::{InvoiceComposer, DEFAULT_TAX_RATE};
pub use document::DocumentLabels;
pub use error::{Error, Result};
#[cfg(feature = "insights")]
pub use insight::InsightClient;
pub use model::{Customer, Invoice, InvoiceItem, InvoiceStatus, Product, User};
pub use store::{Collection, Scope, Store};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
