//! Domain model: products, customers, invoices, users.
//!
//! All persisted types serialize with camelCase field names so the stored
//! JSON matches the layout consumers of the store expect (`productId`,
//! `invoiceNumber`, `shopName`, ...). Monetary amounts and quantities are
//! `f64`; quantities may be fractional (hours, kilograms).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Collection;

/// Generate a fresh opaque record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_unit() -> String {
    "pcs".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

/// Trait implemented by every record type the store persists.
///
/// The analog of a keyed entity: each record exposes its opaque string id
/// and names the logical collection it belongs to. The store compares ids
/// as strings everywhere, guarding against numeric/string drift introduced
/// by prior storage round-trips.
pub trait StoreRecord: Send + Sync + Serialize + for<'de> Deserialize<'de> + Clone {
    /// The record's unique id within its collection.
    fn record_id(&self) -> &str;

    /// The logical collection this record type is stored in.
    fn collection() -> Collection;
}

/// A catalog product.
///
/// Deleting a product does not cascade: invoice items keep their snapshot
/// of the product's name, price and unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Non-negative unit price.
    pub price: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Create a product with a fresh id and the default unit/category.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Product {
            id: new_record_id(),
            name: name.into(),
            price,
            unit: default_unit(),
            category: default_category(),
            description: None,
        }
    }
}

impl StoreRecord for Product {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn collection() -> Collection {
        Collection::Products
    }
}

/// A customer. Email uniqueness is not enforced; duplicates are permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Customer {
    /// Create a customer with a fresh id.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Customer {
            id: new_record_id(),
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }
}

impl StoreRecord for Customer {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn collection() -> Collection {
        Collection::Customers
    }
}

/// One line of an invoice.
///
/// `product_id` is a reference, not ownership: the product may later be
/// deleted, and `product_name`/`price`/`unit` are snapshots taken when the
/// line was last edited. The item's own `id` is independent of
/// `product_id`, so an invoice may carry the same product twice as separate
/// lines.
///
/// Invariant: `total == quantity * price` after every edit. The setters
/// below are the only supported mutations; each recomputes `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit: String,
    pub price: f64,
    pub quantity: f64,
    pub total: f64,
}

impl InvoiceItem {
    /// Create a line for `product` with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        InvoiceItem {
            id: new_record_id(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit: product.unit.clone(),
            price: product.price,
            quantity: 1.0,
            total: product.price,
        }
    }

    /// Change the quantity and recompute the line total.
    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.total = self.quantity * self.price;
    }

    /// Change the unit price and recompute the line total.
    pub fn set_price(&mut self, price: f64) {
        self.price = price;
        self.total = self.quantity * self.price;
    }

    /// Re-point the line at `product`, refreshing the snapshot fields and
    /// recomputing the total with the new price. The quantity is kept.
    pub fn set_product(&mut self, product: &Product) {
        self.product_id = product.id.clone();
        self.product_name = product.name.clone();
        self.unit = product.unit.clone();
        self.price = product.price;
        self.total = self.quantity * self.price;
    }
}

/// Invoice payment status. `Draft` is reachable in the type but no current
/// flow assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Draft,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

/// A saved invoice.
///
/// `invoice_number` and `date` are fixed at creation. The customer fields
/// are snapshots captured at save time; later edits to the customer record
/// do not retroactively update past invoices.
///
/// Invariants: `subtotal == sum of item totals`,
/// `tax_amount == subtotal * tax_rate`, `total == subtotal + tax_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Human-facing number, `INV-<4 digits>`, immutable after creation.
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Flip the payment status: paid becomes pending, anything else
    /// becomes paid.
    pub fn toggle_status(&mut self) {
        self.status = match self.status {
            InvoiceStatus::Paid => InvoiceStatus::Pending,
            _ => InvoiceStatus::Paid,
        };
    }
}

impl StoreRecord for Invoice {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn collection() -> Collection {
        Collection::Invoices
    }
}

/// A registered account. `email` is the login key, matched by exact string
/// equality. The password is stored only as a salted hash; `sanitized`
/// strips it before the user is exposed or placed in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub shop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl User {
    /// Copy of this user with all credential material removed.
    pub fn sanitized(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            shop_name: self.shop_name.clone(),
            password_hash: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64) -> Product {
        Product::new("Logo Design", price)
    }

    #[test]
    fn test_product_defaults() {
        let p = product(150.0);
        assert_eq!(p.unit, "pcs");
        assert_eq!(p.category, "General");
        assert!(p.description.is_none());
    }

    #[test]
    fn test_item_from_product() {
        let p = product(150.0);
        let item = InvoiceItem::from_product(&p);
        assert_eq!(item.product_id, p.id);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.total, 150.0);
    }

    #[test]
    fn test_item_total_follows_quantity() {
        let mut item = InvoiceItem::from_product(&product(150.0));
        item.set_quantity(2.0);
        assert_eq!(item.total, 300.0);
        item.set_quantity(0.5);
        assert_eq!(item.total, 75.0);
    }

    #[test]
    fn test_item_total_follows_price() {
        let mut item = InvoiceItem::from_product(&product(150.0));
        item.set_quantity(3.0);
        item.set_price(10.0);
        assert_eq!(item.total, 30.0);
    }

    #[test]
    fn test_item_set_product_keeps_quantity() {
        let mut item = InvoiceItem::from_product(&product(150.0));
        item.set_quantity(4.0);

        let other = Product::new("SEO Audit", 250.0);
        item.set_product(&other);

        assert_eq!(item.product_id, other.id);
        assert_eq!(item.product_name, "SEO Audit");
        assert_eq!(item.quantity, 4.0);
        assert_eq!(item.total, 1000.0);
    }

    #[test]
    fn test_status_toggle_round_trip() {
        let mut status = InvoiceStatus::Pending;
        let mut invoice = sample_invoice(status);
        invoice.toggle_status();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        invoice.toggle_status();
        assert_eq!(invoice.status, InvoiceStatus::Pending);

        // Draft is never produced by current flows, but toggling one marks
        // it paid, same as pending.
        status = InvoiceStatus::Draft;
        let mut draft = sample_invoice(status);
        draft.toggle_status();
        assert_eq!(draft.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Pending).expect("Failed to serialize");
        assert_eq!(json, "\"pending\"");
        let back: InvoiceStatus = serde_json::from_str("\"paid\"").expect("Failed to deserialize");
        assert_eq!(back, InvoiceStatus::Paid);
    }

    #[test]
    fn test_invoice_serializes_camel_case() {
        let invoice = sample_invoice(InvoiceStatus::Pending);
        let value = serde_json::to_value(&invoice).expect("Failed to serialize");
        assert!(value.get("invoiceNumber").is_some());
        assert!(value.get("customerId").is_some());
        assert!(value.get("taxRate").is_some());
        assert!(value.get("invoice_number").is_none());
    }

    #[test]
    fn test_user_sanitized_drops_hash() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            shop_name: "Acme".to_string(),
            password_hash: Some("$argon2id$...".to_string()),
        };
        let clean = user.sanitized();
        assert!(clean.password_hash.is_none());
        assert_eq!(clean.email, user.email);

        let json = serde_json::to_value(&clean).expect("Failed to serialize");
        assert!(json.get("passwordHash").is_none());
    }

    fn sample_invoice(status: InvoiceStatus) -> Invoice {
        let item = InvoiceItem::from_product(&product(150.0));
        Invoice {
            id: new_record_id(),
            invoice_number: "INV-1234".to_string(),
            date: Utc::now(),
            customer_id: "1".to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_address: None,
            customer_phone: None,
            subtotal: item.total,
            tax_rate: 0.0,
            tax_amount: 0.0,
            total: item.total,
            items: vec![item],
            status,
        }
    }
}
