//! Presentation of extracted invoice data
//!
//! Maps an [`InvoiceData`] payload onto a fixed set of labeled sections.
//! Purely a function of its inputs: absent fields become a placeholder,
//! malformed amounts and dates are shown verbatim, and nothing is decided
//! here beyond formatting.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Error;
use crate::invoice::InvoiceData;

/// Placeholder shown for any absent field
pub const PLACEHOLDER: &str = "N/A";

/// A rendered view of one processed invoice
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Name of the file the data was extracted from
    pub file_name: String,

    /// Display sections in fixed order
    pub sections: Vec<Section>,
}

/// One titled display section
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Section heading
    pub title: String,

    /// Section contents
    pub body: SectionBody,
}

/// The contents of a display section
#[derive(Debug, Clone, Serialize)]
pub enum SectionBody {
    /// Labeled rows; absent values are already replaced by the placeholder
    Fields(Vec<Row>),

    /// Flat list of extracted item descriptions
    List(Vec<String>),

    /// Structured line items
    Table(Vec<TableRow>),
}

/// One labeled row
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    /// Row label
    pub label: String,

    /// Formatted value
    pub value: String,
}

/// One formatted line item
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// What was billed
    pub description: String,

    /// Billed quantity
    pub quantity: String,

    /// Price per unit
    pub unit_price: String,

    /// Line total
    pub total: String,
}

impl Report {
    /// Serialize the report for download or export
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the display report for an extracted payload.
///
/// `default_currency` is assumed when the payload does not declare a
/// currency of its own.
pub fn build_report(data: &InvoiceData, file_name: &str, default_currency: &str) -> Report {
    let currency = data
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(default_currency);

    let total = data
        .total_amount
        .map(|value| format_amount(value, currency))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut sections = vec![
        Section {
            title: "Basic information".to_string(),
            body: SectionBody::Fields(vec![
                row("Invoice type", field(&data.invoice_type)),
                row("Date", format_date(data.invoice_date.as_deref())),
                row("Total", total.clone()),
                row("Currency", field(&data.currency)),
                row("Cost center", field(&data.cost_center)),
                row("Payment method", field(&data.payment_method)),
            ]),
        },
        Section {
            title: "Supplier".to_string(),
            body: SectionBody::Fields(vec![
                row("Name", field(&data.supplier_name)),
                row("Address", field(&data.vendor_address)),
            ]),
        },
        Section {
            title: "Customer".to_string(),
            body: SectionBody::Fields(vec![
                row("Name", field(&data.customer_name)),
                row("Address", field(&data.customer_address)),
            ]),
        },
    ];

    if let Some(items) = data.extracted_items.as_ref().filter(|i| !i.is_empty()) {
        sections.push(Section {
            title: "Extracted items".to_string(),
            body: SectionBody::List(items.clone()),
        });
    }

    if let Some(items) = data.items.as_ref().filter(|i| !i.is_empty()) {
        let rows = items
            .iter()
            .map(|item| TableRow {
                description: field(&item.description),
                quantity: field(&item.quantity),
                unit_price: format_currency(item.unit_price.as_deref(), currency),
                total: format_currency(item.total.as_deref(), currency),
            })
            .collect();
        sections.push(Section {
            title: "Line items".to_string(),
            body: SectionBody::Table(rows),
        });
    }

    sections.push(Section {
        title: "Totals".to_string(),
        body: SectionBody::Fields(vec![
            row("Subtotal", format_currency(data.subtotal.as_deref(), currency)),
            row("Tax", format_currency(data.tax_amount.as_deref(), currency)),
            row("Total", total),
        ]),
    });

    sections.push(Section {
        title: "Payment".to_string(),
        body: SectionBody::Fields(vec![
            row("Payment terms", field(&data.payment_terms)),
            row("Due date", format_date(data.due_date.as_deref())),
        ]),
    });

    Report {
        file_name: file_name.to_string(),
        sections,
    }
}

/// Format a backend-reported amount in the given currency. Absent values
/// render the placeholder; malformed numeric strings render verbatim.
pub fn format_currency(raw: Option<&str>, currency: &str) -> String {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return PLACEHOLDER.to_string(),
    };

    match raw.trim().parse::<f64>() {
        Ok(value) => format_amount(value, currency),
        Err(_) => raw.to_string(),
    }
}

/// Format a numeric amount in the given currency
pub fn format_amount(value: f64, currency: &str) -> String {
    let digits = group_digits(value);
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}", symbol, digits),
        None => format!("{} {}", currency, digits),
    }
}

/// Reformat a YYYY-MM-DD date to its long form. Unparsable input renders
/// verbatim; absent input renders the placeholder.
pub fn format_date(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return PLACEHOLDER.to_string(),
    };

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn row(label: &str, value: String) -> Row {
    Row {
        label: label.to_string(),
        value,
    }
}

fn field(value: &Option<String>) -> String {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

fn group_digits(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Extracted data: {}", self.file_name)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            match &section.body {
                SectionBody::Fields(rows) => {
                    for row in rows {
                        writeln!(f, "  {}: {}", row.label, row.value)?;
                    }
                }
                SectionBody::List(items) => {
                    for item in items {
                        writeln!(f, "  - {}", item)?;
                    }
                }
                SectionBody::Table(rows) => {
                    for row in rows {
                        writeln!(
                            f,
                            "  {} | {} | {} | {}",
                            row.description, row.quantity, row.unit_price, row.total
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::LineItem;

    fn find_row<'a>(report: &'a Report, section: &str, label: &str) -> &'a str {
        for s in &report.sections {
            if s.title == section {
                if let SectionBody::Fields(rows) = &s.body {
                    for row in rows {
                        if row.label == label {
                            return &row.value;
                        }
                    }
                }
            }
        }
        panic!("row {label} not found in section {section}");
    }

    #[test]
    fn formats_known_currency_with_symbol() {
        assert_eq!(format_currency(Some("125.50"), "USD"), "$125.50");
        assert_eq!(format_currency(Some("99"), "EUR"), "€99.00");
        assert_eq!(format_currency(Some("1234567.5"), "USD"), "$1,234,567.50");
    }

    #[test]
    fn unknown_currency_keeps_the_code() {
        assert_eq!(format_currency(Some("10"), "CHF"), "CHF 10.00");
    }

    #[test]
    fn malformed_amount_renders_verbatim() {
        assert_eq!(format_currency(Some("12,50 approx"), "USD"), "12,50 approx");
        assert_eq!(format_currency(None, "USD"), PLACEHOLDER);
        assert_eq!(format_currency(Some(""), "USD"), PLACEHOLDER);
    }

    #[test]
    fn dates_reformat_or_pass_through() {
        assert_eq!(format_date(Some("2024-01-15")), "January 15, 2024");
        assert_eq!(format_date(Some("15/01/2024")), "15/01/2024");
        assert_eq!(format_date(None), PLACEHOLDER);
    }

    #[test]
    fn absent_fields_render_the_placeholder() {
        let report = build_report(&InvoiceData::default(), "empty.pdf", "USD");
        assert_eq!(find_row(&report, "Basic information", "Invoice type"), PLACEHOLDER);
        assert_eq!(find_row(&report, "Basic information", "Total"), PLACEHOLDER);
        assert_eq!(find_row(&report, "Supplier", "Name"), PLACEHOLDER);
        assert_eq!(find_row(&report, "Payment", "Due date"), PLACEHOLDER);
        // optional sections are omitted entirely when empty
        assert!(report.sections.iter().all(|s| s.title != "Line items"));
        assert!(report.sections.iter().all(|s| s.title != "Extracted items"));
    }

    #[test]
    fn total_uses_payload_currency_with_default_fallback() {
        let data = InvoiceData {
            total_amount: Some(125.50),
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        let report = build_report(&data, "invoice.pdf", "EUR");
        assert_eq!(find_row(&report, "Basic information", "Total"), "$125.50");

        let no_currency = InvoiceData {
            total_amount: Some(125.50),
            ..Default::default()
        };
        let report = build_report(&no_currency, "invoice.pdf", "USD");
        assert_eq!(find_row(&report, "Basic information", "Total"), "$125.50");
        assert_eq!(find_row(&report, "Basic information", "Currency"), PLACEHOLDER);
    }

    #[test]
    fn line_items_and_extracted_items_render_independently() {
        let data = InvoiceData {
            currency: Some("USD".to_string()),
            extracted_items: Some(vec!["Paper".to_string(), "Toner".to_string()]),
            items: Some(vec![LineItem {
                description: Some("Toner cartridge".to_string()),
                quantity: Some("2".to_string()),
                unit_price: Some("45.00".to_string()),
                total: Some("90.00".to_string()),
            }]),
            ..Default::default()
        };

        let report = build_report(&data, "invoice.pdf", "USD");
        let list = report
            .sections
            .iter()
            .find(|s| s.title == "Extracted items")
            .expect("list section");
        assert!(matches!(&list.body, SectionBody::List(items) if items.len() == 2));

        let table = report
            .sections
            .iter()
            .find(|s| s.title == "Line items")
            .expect("table section");
        match &table.body {
            SectionBody::Table(rows) => {
                assert_eq!(rows[0].unit_price, "$45.00");
                assert_eq!(rows[0].total, "$90.00");
            }
            other => panic!("expected table, got {other:?}"),
        }
    }
}
