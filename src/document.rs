//! Export adapter: render an invoice to a fixed-layout text document.
//!
//! Rendering is a pure function of its inputs: the same invoice, labels
//! and shop name always produce the same bytes. Absent optional fields
//! (customer address, phone) are omitted rather than failing the whole
//! document. One artifact is written per invoice, named deterministically
//! from the invoice number.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Invoice;

/// Label set for a rendered document.
///
/// Exports always use a fixed label language regardless of any active
/// display language; [`DocumentLabels::english`] is that fixed set.
#[derive(Debug, Clone)]
pub struct DocumentLabels {
    pub title: String,
    pub invoice_num: String,
    pub date: String,
    pub bill_to: String,
    pub item: String,
    pub quantity: String,
    pub price: String,
    pub total: String,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
}

impl DocumentLabels {
    /// The fixed English label set used for every export.
    pub fn english() -> Self {
        DocumentLabels {
            title: "INVOICE".to_string(),
            invoice_num: "Invoice #".to_string(),
            date: "Date".to_string(),
            bill_to: "Bill To".to_string(),
            item: "Item".to_string(),
            quantity: "Qty".to_string(),
            price: "Price".to_string(),
            total: "Total".to_string(),
            subtotal: "Subtotal".to_string(),
            tax: "Tax".to_string(),
            grand_total: "Grand Total".to_string(),
        }
    }
}

impl Default for DocumentLabels {
    fn default() -> Self {
        Self::english()
    }
}

const RULE_WIDTH: usize = 76;

/// Deterministic artifact name for an invoice: `invoice_<number>.txt`.
pub fn artifact_name(invoice: &Invoice) -> String {
    format!("invoice_{}.txt", invoice.invoice_number)
}

/// Render an invoice into the fixed document layout.
///
/// Header (shop name, title, number, date), bill-to block, item table and
/// totals block, in that order. Pure and read-only.
pub fn render_invoice(invoice: &Invoice, labels: &DocumentLabels, shop_name: &str) -> String {
    let mut doc = String::new();

    // --- Header section ---
    doc.push_str(shop_name);
    doc.push('\n');
    doc.push_str(&format!("{:>width$}\n", labels.title, width = RULE_WIDTH));
    doc.push_str(&format!(
        "{:>width$}\n",
        format!("{} {}", labels.invoice_num, invoice.invoice_number),
        width = RULE_WIDTH
    ));
    doc.push_str(&format!(
        "{:>width$}\n",
        format!("{}: {}", labels.date, invoice.date.format("%Y-%m-%d")),
        width = RULE_WIDTH
    ));
    doc.push('\n');

    // --- Bill-to section ---
    doc.push_str(&labels.bill_to);
    doc.push('\n');
    doc.push_str(&invoice.customer_name);
    doc.push('\n');
    if let Some(address) = &invoice.customer_address {
        doc.push_str(address);
        doc.push('\n');
    }
    if let Some(phone) = &invoice.customer_phone {
        doc.push_str(&format!("Ph: {}\n", phone));
    }
    doc.push('\n');

    // --- Item table ---
    doc.push_str(&format!(
        "{:<34} {:>12} {:>13} {:>14}\n",
        labels.item, labels.quantity, labels.price, labels.total
    ));
    doc.push_str(&"-".repeat(RULE_WIDTH));
    doc.push('\n');
    for item in &invoice.items {
        let quantity = if item.unit.is_empty() {
            item.quantity.to_string()
        } else {
            format!("{} {}", item.quantity, item.unit)
        };
        doc.push_str(&format!(
            "{:<34} {:>12} {:>13} {:>14}\n",
            item.product_name,
            quantity,
            format!("Rs. {:.2}", item.price),
            format!("Rs. {:.2}", item.total)
        ));
    }
    doc.push_str(&"-".repeat(RULE_WIDTH));
    doc.push('\n');

    // --- Totals section ---
    doc.push_str(&format!(
        "{:>width$}\n",
        format!("{}: Rs. {:.2}", labels.subtotal, invoice.subtotal),
        width = RULE_WIDTH
    ));
    doc.push_str(&format!(
        "{:>width$}\n",
        format!("{}: Rs. {:.2}", labels.tax, invoice.tax_amount),
        width = RULE_WIDTH
    ));
    doc.push_str(&format!(
        "{:>width$}\n",
        format!("{}: Rs. {:.2}", labels.grand_total, invoice.total),
        width = RULE_WIDTH
    ));

    doc.push('\n');
    doc.push_str("Thank you for your business!\n");

    doc
}

/// Render `invoice` and write the artifact into `dir`.
///
/// Returns the path of the written file.
///
/// # Errors
/// Returns `Error::BackendError` if the file cannot be written.
pub async fn write_invoice(
    invoice: &Invoice,
    labels: &DocumentLabels,
    shop_name: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let rendered = render_invoice(invoice, labels, shop_name);
    let path = dir.join(artifact_name(invoice));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, rendered).await?;
    info!("Exported {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::InvoiceComposer;
    use crate::store::{starter_customers, starter_products};
    use uuid::Uuid;

    fn sample_invoice() -> Invoice {
        let catalog = starter_products();
        let mut composer = InvoiceComposer::new();
        composer.select_customer("2");
        let item_id = composer.add_item(&catalog).expect("No item").id.clone();
        composer.set_item_quantity(&item_id, 2.0);
        composer.set_item_price(&item_id, 150.0);
        composer.build(&starter_customers()).expect("Failed to build")
    }

    #[test]
    fn test_render_contains_all_blocks() {
        let invoice = sample_invoice();
        let doc = render_invoice(&invoice, &DocumentLabels::english(), "Acme Studio");

        assert!(doc.starts_with("Acme Studio\n"));
        assert!(doc.contains("INVOICE"));
        assert!(doc.contains(&invoice.invoice_number));
        assert!(doc.contains("Bill To"));
        assert!(doc.contains("Jane Doe"));
        assert!(doc.contains("456 Resident St"));
        assert!(doc.contains("Ph: 555-0199"));
        assert!(doc.contains("Web Design Basic"));
        assert!(doc.contains("Subtotal: Rs. 300.00"));
        assert!(doc.contains("Tax: Rs. 0.00"));
        assert!(doc.contains("Grand Total: Rs. 300.00"));
        assert!(doc.contains("Thank you for your business!"));
    }

    #[test]
    fn test_render_omits_absent_optional_lines() {
        let mut invoice = sample_invoice();
        invoice.customer_address = None;
        invoice.customer_phone = None;

        let doc = render_invoice(&invoice, &DocumentLabels::english(), "Acme Studio");
        assert!(!doc.contains("456 Resident St"));
        assert!(!doc.contains("Ph:"));
        // The rest of the document is intact.
        assert!(doc.contains("Jane Doe"));
        assert!(doc.contains("Grand Total"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let invoice = sample_invoice();
        let labels = DocumentLabels::english();
        let a = render_invoice(&invoice, &labels, "Acme Studio");
        let b = render_invoice(&invoice, &labels, "Acme Studio");
        assert_eq!(a, b);
    }

    #[test]
    fn test_artifact_name_follows_invoice_number() {
        let invoice = sample_invoice();
        assert_eq!(
            artifact_name(&invoice),
            format!("invoice_{}.txt", invoice.invoice_number)
        );
    }

    #[tokio::test]
    async fn test_write_invoice_creates_artifact() {
        let invoice = sample_invoice();
        let dir = std::env::temp_dir().join(format!("bill-kit-test-{}", Uuid::new_v4()));

        let path = write_invoice(&invoice, &DocumentLabels::english(), "Acme Studio", &dir)
            .await
            .expect("Failed to write");

        assert_eq!(path, dir.join(artifact_name(&invoice)));
        let contents = tokio::fs::read_to_string(&path)
            .await
            .expect("Failed to read back");
        assert!(contents.contains("Grand Total"));
    }
}
