//! Invoice composer: the draft being built or edited.
//!
//! A composer moves from Empty (no customer, no items) to Building as a
//! customer is chosen and lines are added, and produces a finalized
//! [`Invoice`] on `build`. Editing a saved invoice starts a fresh draft
//! seeded from it; the saved invoice's id, number, date and status are
//! preserved through the rebuild.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{Error, Result};
use crate::model::{new_record_id, Customer, Invoice, InvoiceItem, InvoiceStatus, Product};

/// Effective tax rate applied when none is configured.
///
/// Zero is what the computation path of the source system actually used;
/// any advertised non-zero rate was display-only. Pass a different rate
/// through [`InvoiceComposer::with_tax_rate`] to change it.
pub const DEFAULT_TAX_RATE: f64 = 0.0;

/// Generate a human-facing invoice number, `INV-` plus four digits.
pub fn new_invoice_number() -> String {
    format!("INV-{}", rand::thread_rng().gen_range(1000..10000))
}

/// Identity carried over from a saved invoice while it is re-edited.
#[derive(Debug, Clone)]
struct EditContext {
    id: String,
    invoice_number: String,
    date: DateTime<Utc>,
    status: InvoiceStatus,
}

/// State machine over a single in-progress invoice draft.
#[derive(Debug, Clone)]
pub struct InvoiceComposer {
    customer_id: Option<String>,
    items: Vec<InvoiceItem>,
    editing: Option<EditContext>,
    tax_rate: f64,
}

impl Default for InvoiceComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceComposer {
    /// Start an empty draft with the default tax rate.
    pub fn new() -> Self {
        InvoiceComposer {
            customer_id: None,
            items: Vec::new(),
            editing: None,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Start a draft seeded from a saved invoice.
    ///
    /// The invoice's customer and items become the draft; its id, number,
    /// date and status survive the next `build` unchanged.
    pub fn edit(invoice: &Invoice) -> Self {
        InvoiceComposer {
            customer_id: Some(invoice.customer_id.clone()),
            items: invoice.items.clone(),
            editing: Some(EditContext {
                id: invoice.id.clone(),
                invoice_number: invoice.invoice_number.clone(),
                date: invoice.date,
                status: invoice.status,
            }),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Override the effective tax rate for this draft.
    pub fn with_tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Select the customer the invoice is billed to.
    pub fn select_customer(&mut self, customer_id: impl Into<String>) {
        self.customer_id = Some(customer_id.into());
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    /// True while the draft re-edits a saved invoice.
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// True when no customer is selected and no lines exist.
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.items.is_empty()
    }

    /// Append a line for the first catalog product, quantity 1.
    ///
    /// A no-op when the catalog is empty; returns the new line otherwise.
    pub fn add_item(&mut self, catalog: &[Product]) -> Option<&InvoiceItem> {
        let product = catalog.first()?;
        self.items.push(InvoiceItem::from_product(product));
        self.items.last()
    }

    /// Re-point a line at another catalog product.
    ///
    /// The product is resolved by string-compared id; on a hit the line's
    /// snapshot fields refresh and its total recomputes with the new
    /// price. If the id no longer resolves (the product was deleted),
    /// only the reference changes and the snapshot stays. Unknown item
    /// ids are ignored.
    pub fn set_item_product(&mut self, item_id: &str, product_id: &str, catalog: &[Product]) {
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return;
        };
        match catalog.iter().find(|p| p.id == product_id) {
            Some(product) => item.set_product(product),
            None => item.product_id = product_id.to_string(),
        }
    }

    /// Change a line's quantity; the line total recomputes.
    pub fn set_item_quantity(&mut self, item_id: &str, quantity: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.set_quantity(quantity);
        }
    }

    /// Change a line's unit price; the line total recomputes.
    pub fn set_item_price(&mut self, item_id: &str, price: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.set_price(price);
        }
    }

    /// Drop a line. Unknown ids are ignored.
    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|i| i.id != item_id);
    }

    /// Sum of line totals, computed on read.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|i| i.total).sum()
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn tax_amount(&self) -> f64 {
        self.subtotal() * self.tax_rate
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }

    /// Produce the finalized invoice for this draft.
    ///
    /// Snapshot fields are captured from the selected customer at this
    /// moment; later customer edits will not touch the saved invoice. A
    /// new draft gets a fresh id, an `INV-<4 digit>` number, the current
    /// timestamp and status pending; an edited draft keeps all four from
    /// the original.
    ///
    /// # Errors
    /// Returns `Error::ValidationError` (and persists nothing) when no
    /// customer is selected, the item list is empty, or the selected
    /// customer no longer exists.
    pub fn build(&self, customers: &[Customer]) -> Result<Invoice> {
        let Some(customer_id) = self.customer_id.as_deref() else {
            return Err(Error::ValidationError(
                "Please select a customer and add at least one item.".to_string(),
            ));
        };
        if self.items.is_empty() {
            return Err(Error::ValidationError(
                "Please select a customer and add at least one item.".to_string(),
            ));
        }

        let customer = customers
            .iter()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| {
                Error::ValidationError("Selected customer no longer exists.".to_string())
            })?;

        let subtotal = self.subtotal();
        let tax_amount = subtotal * self.tax_rate;

        let (id, invoice_number, date, status) = match &self.editing {
            Some(ctx) => (
                ctx.id.clone(),
                ctx.invoice_number.clone(),
                ctx.date,
                ctx.status,
            ),
            None => (
                new_record_id(),
                new_invoice_number(),
                Utc::now(),
                InvoiceStatus::Pending,
            ),
        };

        Ok(Invoice {
            id,
            invoice_number,
            date,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_address: customer.address.clone(),
            customer_phone: customer.phone.clone(),
            items: self.items.clone(),
            subtotal,
            tax_rate: self.tax_rate,
            tax_amount,
            total: subtotal + tax_amount,
            status,
        })
    }

    /// Mark the draft saved: a created draft resets to empty, an edited
    /// draft exits editing mode.
    pub fn complete_save(&mut self) {
        if self.editing.take().is_none() {
            self.reset();
        }
    }

    /// Clear the draft back to the empty state.
    pub fn reset(&mut self) {
        self.customer_id = None;
        self.items.clear();
        self.editing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{starter_customers, starter_products};

    #[test]
    fn test_add_item_empty_catalog_is_noop() {
        let mut composer = InvoiceComposer::new();
        assert!(composer.add_item(&[]).is_none());
        assert!(composer.items().is_empty());
    }

    #[test]
    fn test_add_item_defaults_to_first_product() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();

        let item = composer.add_item(&catalog).expect("No item added");
        assert_eq!(item.product_name, "Web Design Basic");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.price, 500.0);
        assert_eq!(item.total, 500.0);
    }

    #[test]
    fn test_same_product_twice_as_separate_lines() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();

        composer.add_item(&catalog);
        composer.add_item(&catalog);

        assert_eq!(composer.items().len(), 2);
        assert_ne!(composer.items()[0].id, composer.items()[1].id);
        assert_eq!(
            composer.items()[0].product_id,
            composer.items()[1].product_id
        );
    }

    #[test]
    fn test_quantity_edit_recomputes_total() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();

        composer.set_item_quantity(&item_id, 2.5);
        assert_eq!(composer.items()[0].total, 1250.0);
    }

    #[test]
    fn test_product_change_recomputes_with_new_price() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();
        composer.set_item_quantity(&item_id, 3.0);

        // Switch to Logo Design (150.0).
        composer.set_item_product(&item_id, "3", &catalog);

        let item = &composer.items()[0];
        assert_eq!(item.product_name, "Logo Design");
        assert_eq!(item.unit, "pcs");
        assert_eq!(item.quantity, 3.0);
        assert_eq!(item.total, 450.0);
    }

    #[test]
    fn test_product_change_to_deleted_product_keeps_snapshot() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();

        composer.set_item_product(&item_id, "gone", &catalog);

        let item = &composer.items()[0];
        assert_eq!(item.product_id, "gone");
        assert_eq!(item.product_name, "Web Design Basic");
        assert_eq!(item.price, 500.0);
        assert_eq!(item.total, 500.0);
    }

    #[test]
    fn test_remove_item() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();

        composer.remove_item(&item_id);
        assert!(composer.items().is_empty());
        assert_eq!(composer.subtotal(), 0.0);
    }

    #[test]
    fn test_build_requires_customer_and_items() {
        let catalog = starter_products();
        let customers = starter_customers();

        let composer = InvoiceComposer::new();
        assert!(matches!(
            composer.build(&customers),
            Err(Error::ValidationError(_))
        ));

        let mut with_customer = InvoiceComposer::new();
        with_customer.select_customer("2");
        assert!(matches!(
            with_customer.build(&customers),
            Err(Error::ValidationError(_))
        ));

        let mut with_items = InvoiceComposer::new();
        with_items.add_item(&catalog);
        assert!(matches!(
            with_items.build(&customers),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_build_missing_customer_record() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        composer.select_customer("404");
        composer.add_item(&catalog);

        assert!(matches!(
            composer.build(&starter_customers()),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_build_invoice_for_jane_doe() {
        let catalog = starter_products();
        let customers = starter_customers();

        let mut composer = InvoiceComposer::new();
        composer.select_customer("2"); // Jane Doe
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();
        composer.set_item_quantity(&item_id, 2.0);
        composer.set_item_price(&item_id, 150.0);

        let invoice = composer.build(&customers).expect("Failed to build");

        assert_eq!(invoice.subtotal, 300.0);
        assert_eq!(invoice.tax_amount, 0.0);
        assert_eq!(invoice.total, 300.0);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.customer_name, "Jane Doe");
        assert_eq!(invoice.customer_address.as_deref(), Some("456 Resident St"));
        assert_eq!(invoice.customer_phone.as_deref(), Some("555-0199"));
        assert!(invoice.invoice_number.starts_with("INV-"));
    }

    #[test]
    fn test_build_with_configured_tax_rate() {
        let catalog = starter_products();
        let customers = starter_customers();

        let mut composer = InvoiceComposer::new().with_tax_rate(0.10);
        composer.select_customer("1");
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();
        composer.set_item_quantity(&item_id, 2.0);
        composer.set_item_price(&item_id, 150.0);

        let invoice = composer.build(&customers).expect("Failed to build");
        assert_eq!(invoice.subtotal, 300.0);
        assert_eq!(invoice.tax_amount, 30.0);
        assert_eq!(invoice.total, 330.0);
    }

    #[test]
    fn test_edit_preserves_identity_fields() {
        let catalog = starter_products();
        let customers = starter_customers();

        let mut composer = InvoiceComposer::new();
        composer.select_customer("1");
        composer.add_item(&catalog);
        let mut original = composer.build(&customers).expect("Failed to build");
        original.toggle_status(); // paid

        let mut editing = InvoiceComposer::edit(&original);
        assert!(editing.is_editing());
        assert_eq!(editing.items().len(), 1);

        let item_id = editing.items()[0].id.clone();
        editing.set_item_quantity(&item_id, 4.0);
        let updated = editing.build(&customers).expect("Failed to build");

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.invoice_number, original.invoice_number);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.status, original.status);
        assert_eq!(updated.subtotal, 2000.0);
    }

    #[test]
    fn test_complete_save_resets_created_draft() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        composer.select_customer("1");
        composer.add_item(&catalog);

        composer.complete_save();
        assert!(composer.is_empty());
    }

    #[test]
    fn test_complete_save_exits_editing_mode() {
        let catalog = starter_products();
        let customers = starter_customers();

        let mut composer = InvoiceComposer::new();
        composer.select_customer("1");
        composer.add_item(&catalog);
        let invoice = composer.build(&customers).expect("Failed to build");

        let mut editing = InvoiceComposer::edit(&invoice);
        editing.complete_save();
        assert!(!editing.is_editing());
        assert!(!editing.is_empty());
    }

    #[test]
    fn test_totals_computed_on_read() {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new().with_tax_rate(0.10);
        composer.add_item(&catalog);
        composer.add_item(&catalog);

        assert_eq!(composer.subtotal(), 1000.0);
        assert_eq!(composer.tax_amount(), 100.0);
        assert_eq!(composer.total(), 1100.0);
    }

    #[test]
    fn test_invoice_number_format() {
        for _ in 0..32 {
            let number = new_invoice_number();
            let digits = number.strip_prefix("INV-").expect("Missing prefix");
            assert_eq!(digits.len(), 4);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
