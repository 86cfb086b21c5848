//! Persistence gateway: whole-collection reads and writes, scoped per user.
//!
//! Every collection is stored as one JSON array under a composite key
//! `billkit:<scope>:<collection>`. There is no partial update, no query
//! language and no indexing: `get` and `save` always move the entire
//! collection. Malformed stored data fails the read of that collection;
//! no partial recovery is attempted.

use serde_json::Value;

use crate::backend::StorageBackend;
use crate::error::{Error, Result};
use crate::model::{Customer, Product, StoreRecord, User};

/// Namespace prefix for every storage key.
pub const KEY_NAMESPACE: &str = "billkit";

/// Fixed default unit list, returned when a scope has never saved units.
pub const DEFAULT_UNITS: [&str; 6] = ["pcs", "hrs", "kg", "lb", "box", "service"];

/// The logical collections the gateway manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Customers,
    Invoices,
    Units,
}

impl Collection {
    /// Key segment for this collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Customers => "customers",
            Collection::Invoices => "invoices",
            Collection::Units => "units",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The partition of stored collections belonging to one identity.
///
/// `Public` is the sentinel used when no user is active; collections under
/// it never mix with any authenticated user's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Public,
    User(String),
}

impl Scope {
    /// Scope for an optional session: the user's id, or the public
    /// sentinel when logged out.
    pub fn for_session(user: Option<&User>) -> Self {
        match user {
            Some(user) => Scope::User(user.id.clone()),
            None => Scope::Public,
        }
    }

    fn key_part(&self) -> &str {
        match self {
            Scope::Public => "public",
            Scope::User(id) => id,
        }
    }
}

/// Join key segments into a composite storage key.
pub(crate) fn compose_key(parts: &[&str]) -> String {
    parts.join(":")
}

/// Whole-collection persistence over a [`StorageBackend`].
///
/// Reads of Products/Customers/Invoices normalize every record's `id` to a
/// string representation before typed deserialization, guarding against
/// numeric/string identity mismatches introduced by prior storage
/// round-trips.
#[derive(Clone)]
pub struct Store<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Store<B> {
    /// Create a store over the given backend.
    pub fn new(backend: B) -> Self {
        Store { backend }
    }

    /// Direct access to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn collection_key(&self, scope: &Scope, collection: Collection) -> String {
        compose_key(&[KEY_NAMESPACE, scope.key_part(), collection.key()])
    }

    /// Load the whole collection of `T` for `scope`.
    ///
    /// A collection never saved for this scope reads as empty.
    ///
    /// # Errors
    /// - `Error::DeserializationError` if the stored data is malformed;
    ///   the read fails as a whole
    /// - `Error::BackendError` if the backend is unavailable
    pub async fn get<T: StoreRecord>(&self, scope: &Scope) -> Result<Vec<T>> {
        let key = self.collection_key(scope, T::collection());
        let Some(bytes) = self.backend.get(&key).await? else {
            return Ok(Vec::new());
        };

        let mut values: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::DeserializationError(format!("{}: {}", T::collection(), e)))?;
        for value in &mut values {
            normalize_record_id(value);
        }

        values
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).map_err(|e| {
                    Error::DeserializationError(format!("{}: {}", T::collection(), e))
                })
            })
            .collect()
    }

    /// Replace the whole collection of `T` for `scope`.
    ///
    /// # Errors
    /// Returns `Err` if serialization or the backend write fails.
    pub async fn save<T: StoreRecord>(&self, scope: &Scope, records: &[T]) -> Result<()> {
        let key = self.collection_key(scope, T::collection());
        let bytes = serde_json::to_vec(records)
            .map_err(|e| Error::SerializationError(format!("{}: {}", T::collection(), e)))?;
        self.backend.set(&key, bytes).await
    }

    /// The unit list for `scope`, or the fixed default when absent.
    pub async fn units(&self, scope: &Scope) -> Result<Vec<String>> {
        let key = self.collection_key(scope, Collection::Units);
        match self.backend.get(&key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::DeserializationError(format!("units: {}", e))),
            None => Ok(DEFAULT_UNITS.iter().map(|u| u.to_string()).collect()),
        }
    }

    /// Replace the unit list for `scope`.
    pub async fn save_units(&self, scope: &Scope, units: &[String]) -> Result<()> {
        let key = self.collection_key(scope, Collection::Units);
        let bytes = serde_json::to_vec(units)
            .map_err(|e| Error::SerializationError(format!("units: {}", e)))?;
        self.backend.set(&key, bytes).await
    }

    /// One-time seeding of the starter catalog for a scope.
    ///
    /// Products and Customers each get a fixed starter set, but only when
    /// that scope currently holds no stored entry for the collection.
    /// Collections the scope has already written (even as empty arrays)
    /// are left untouched, so seeding is idempotent.
    pub async fn seed_defaults(&self, scope: &Scope) -> Result<()> {
        let products_key = self.collection_key(scope, Collection::Products);
        if !self.backend.exists(&products_key).await? {
            info!("Seeding starter products for scope {:?}", scope);
            self.save(scope, &starter_products()).await?;
        }

        let customers_key = self.collection_key(scope, Collection::Customers);
        if !self.backend.exists(&customers_key).await? {
            info!("Seeding starter customers for scope {:?}", scope);
            self.save(scope, &starter_customers()).await?;
        }

        Ok(())
    }
}

/// Rewrite a non-string `id` field to its string form.
fn normalize_record_id(value: &mut Value) {
    if let Some(object) = value.as_object_mut() {
        if let Some(id) = object.get("id") {
            if !id.is_string() {
                let normalized = id.to_string();
                object.insert("id".to_string(), Value::String(normalized));
            }
        }
    }
}

/// The starter product catalog seeded for a new scope.
pub fn starter_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Web Design Basic".to_string(),
            price: 500.0,
            unit: "service".to_string(),
            category: "Service".to_string(),
            description: Some("5 page static site".to_string()),
        },
        Product {
            id: "2".to_string(),
            name: "SEO Audit".to_string(),
            price: 250.0,
            unit: "service".to_string(),
            category: "Consulting".to_string(),
            description: Some("Comprehensive site audit".to_string()),
        },
        Product {
            id: "3".to_string(),
            name: "Logo Design".to_string(),
            price: 150.0,
            unit: "pcs".to_string(),
            category: "Design".to_string(),
            description: Some("Vector logo with 3 revisions".to_string()),
        },
    ]
}

/// The starter customer list seeded for a new scope.
pub fn starter_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "1".to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.com".to_string(),
            phone: Some("555-0123".to_string()),
            address: Some("123 Innovation Dr".to_string()),
        },
        Customer {
            id: "2".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("555-0199".to_string()),
            address: Some("456 Resident St".to_string()),
        },
    ]
}
