//! Application state and control flow.
//!
//! All session and collection state lives in one explicit [`AppState`]
//! owned by [`App`], which threads it through every operation; nothing
//! reads ambient storage behind the caller's back. Each user action runs
//! to completion (load, mutate, persist) before returning.

use std::path::Path;

use crate::auth::AuthService;
use crate::backend::StorageBackend;
use crate::collection::CollectionManager;
use crate::composer::InvoiceComposer;
use crate::document::{self, DocumentLabels};
use crate::error::Result;
use crate::model::{Customer, Invoice, Product, User};
use crate::store::{Scope, Store};

/// Shop name used on exports when no user is active.
pub const DEFAULT_SHOP_NAME: &str = "BillKit";

/// The session plus the three in-memory collections for its scope.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub user: Option<User>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
}

/// The application: identity, state and the persistence gateway.
pub struct App<B: StorageBackend> {
    store: Store<B>,
    auth: AuthService<B>,
    state: AppState,
}

impl<B: StorageBackend> App<B> {
    /// Create an application over the given backend.
    pub fn new(backend: B) -> Self {
        App {
            store: Store::new(backend.clone()),
            auth: AuthService::new(backend),
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn auth(&self) -> &AuthService<B> {
        &self.auth
    }

    /// Shop name for exports: the active user's, or the fixed default.
    pub fn shop_name(&self) -> String {
        self.state
            .user
            .as_ref()
            .map(|user| user.shop_name.clone())
            .unwrap_or_else(|| DEFAULT_SHOP_NAME.to_string())
    }

    fn scope(&self) -> Scope {
        Scope::for_session(self.state.user.as_ref())
    }

    fn manager(&self) -> CollectionManager<B> {
        CollectionManager::new(self.store.clone(), self.scope())
    }

    /// Restore a prior session, if one exists, and load its collections.
    pub async fn start(&mut self) -> Result<Option<User>> {
        if let Some(user) = self.auth.current_user().await? {
            info!("Restored session for user {}", user.id);
            self.state.user = Some(user);
            self.load_collections().await?;
        }
        Ok(self.state.user.clone())
    }

    /// Register a new account, establish its session and load its
    /// (freshly seeded) collections.
    pub async fn register(&mut self, email: &str, password: &str, shop_name: &str) -> Result<User> {
        let user = self.auth.register(email, password, shop_name).await?;
        self.state.user = Some(user.clone());
        self.load_collections().await?;
        Ok(user)
    }

    /// Log in, establish the session and load that scope's collections.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.auth.login(email, password).await?;
        self.state.user = Some(user.clone());
        self.load_collections().await?;
        Ok(user)
    }

    /// Clear the session and all in-memory state.
    pub async fn logout(&mut self) -> Result<()> {
        self.auth.logout().await?;
        self.state = AppState::default();
        Ok(())
    }

    async fn load_collections(&mut self) -> Result<()> {
        let scope = self.scope();
        self.store.seed_defaults(&scope).await?;
        self.state.products = self.store.get(&scope).await?;
        self.state.customers = self.store.get(&scope).await?;
        self.state.invoices = self.store.get(&scope).await?;
        Ok(())
    }

    // --- Product catalog ---

    pub async fn add_product(&mut self, product: Product) -> Result<()> {
        let manager = self.manager();
        manager.add(&mut self.state.products, product).await
    }

    pub async fn update_product(&mut self, product: Product) -> Result<bool> {
        let manager = self.manager();
        manager.update(&mut self.state.products, product).await
    }

    pub async fn delete_product(&mut self, id: &str) -> Result<bool> {
        let manager = self.manager();
        manager.delete(&mut self.state.products, id).await
    }

    // --- Customers ---

    pub async fn add_customer(&mut self, customer: Customer) -> Result<()> {
        let manager = self.manager();
        manager.add(&mut self.state.customers, customer).await
    }

    pub async fn update_customer(&mut self, customer: Customer) -> Result<bool> {
        let manager = self.manager();
        manager.update(&mut self.state.customers, customer).await
    }

    pub async fn delete_customer(&mut self, id: &str) -> Result<bool> {
        let manager = self.manager();
        manager.delete(&mut self.state.customers, id).await
    }

    // --- Invoices ---

    /// Start an editing draft for a saved invoice.
    pub fn edit_invoice(&self, id: &str) -> Option<InvoiceComposer> {
        self.state
            .invoices
            .iter()
            .find(|invoice| invoice.id == id)
            .map(InvoiceComposer::edit)
    }

    /// Finalize the composer's draft and persist it.
    ///
    /// A new draft is prepended to the invoice list; an edited draft
    /// replaces its saved invoice in place. With `export_dir` set, the
    /// document artifact is written there after the save, always with the
    /// fixed English labels. On success the draft resets (create) or
    /// exits editing mode (edit).
    ///
    /// # Errors
    /// Validation failures from [`InvoiceComposer::build`] persist
    /// nothing and leave the draft untouched.
    pub async fn save_invoice(
        &mut self,
        composer: &mut InvoiceComposer,
        export_dir: Option<&Path>,
    ) -> Result<Invoice> {
        let invoice = composer.build(&self.state.customers)?;

        let manager = self.manager();
        if composer.is_editing() {
            manager
                .update(&mut self.state.invoices, invoice.clone())
                .await?;
        } else {
            manager
                .add(&mut self.state.invoices, invoice.clone())
                .await?;
        }

        if let Some(dir) = export_dir {
            document::write_invoice(&invoice, &DocumentLabels::english(), &self.shop_name(), dir)
                .await?;
        }

        composer.complete_save();
        Ok(invoice)
    }

    /// Flip an invoice between paid and pending and persist.
    ///
    /// Returns whether an invoice with that id existed.
    pub async fn toggle_invoice_status(&mut self, id: &str) -> Result<bool> {
        let mut found = false;
        for invoice in &mut self.state.invoices {
            if invoice.id == id {
                invoice.toggle_status();
                found = true;
            }
        }
        let scope = self.scope();
        self.store.save(&scope, &self.state.invoices).await?;
        Ok(found)
    }

    /// Invoices sorted by date, most recent first.
    pub fn sorted_invoices(&self) -> Vec<&Invoice> {
        let mut sorted: Vec<&Invoice> = self.state.invoices.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }
}
