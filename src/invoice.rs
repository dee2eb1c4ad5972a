//! Extracted invoice payloads returned by the inference endpoint

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One line item of an extracted invoice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// What was billed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Billed quantity, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Price per unit, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,

    /// Line total, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// The open-schema payload the inference endpoint extracts from a document.
///
/// The shape is dictated entirely by the backend: every field may be absent
/// and nothing is validated client-side. Amount fields other than
/// `total_amount` arrive as strings and may be malformed; they are rendered
/// verbatim in that case rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Invoice classification (purchase, sale, return, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<String>,

    /// Cost center the invoice is booked against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,

    /// Payment method named on the invoice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Free-form item descriptions found in the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_items: Option<Vec<String>>,

    /// Invoice total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,

    /// ISO currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Issue date, nominally YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,

    /// Issuing party
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,

    /// Name of the processed file, echoed back by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Invoice number printed on the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Supplier address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_address: Option<String>,

    /// Billed party
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Billed party's address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,

    /// Structured line items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,

    /// Tax amount, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<String>,

    /// Subtotal before tax, as reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,

    /// Payment terms named on the invoice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,

    /// Payment due date, nominally YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Fields the backend returns that this client does not model
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_payload() {
        let data: InvoiceData = serde_json::from_str(
            r#"{ "file_name": "invoice.pdf", "total_amount": 125.50, "currency": "USD" }"#,
        )
        .unwrap();

        assert_eq!(data.file_name.as_deref(), Some("invoice.pdf"));
        assert_eq!(data.total_amount, Some(125.50));
        assert_eq!(data.currency.as_deref(), Some("USD"));
        assert!(data.supplier_name.is_none());
        assert!(data.items.is_none());
    }

    #[test]
    fn preserves_unmodeled_fields() {
        let data: InvoiceData = serde_json::from_str(
            r#"{ "currency": "EUR", "confidence": 0.93, "page_count": 2 }"#,
        )
        .unwrap();

        assert_eq!(data.extra.get("confidence").and_then(|v| v.as_f64()), Some(0.93));
        assert_eq!(data.extra.get("page_count").and_then(|v| v.as_i64()), Some(2));

        let round_tripped = serde_json::to_value(&data).unwrap();
        assert_eq!(round_tripped["confidence"], 0.93);
    }
}
