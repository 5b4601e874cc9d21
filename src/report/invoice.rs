//! Invoice data: template contexts and the direct (template-free) summary

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::format::format_currency;
use crate::template::render_value;

const NOT_AVAILABLE: &str = "N/A";

/// Contents of an invoice data file: `{"invoices": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceBook {
    #[serde(default)]
    pub invoices: Vec<Value>,
}

impl InvoiceBook {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.invoices.get(index)
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

/// Template context for one invoice.
///
/// The invoice object is kept whole (`$header.invoiceNumber`,
/// `@foreach(items)`), and each header field is also promoted to the root
/// (`$invoiceNumber`) unless the root already has that key.
pub fn invoice_context(invoice: &Value) -> Value {
    let mut ctx = invoice.clone();

    if let (Some(root), Some(header)) = (
        ctx.as_object_mut(),
        invoice.get("header").and_then(Value::as_object),
    ) {
        for (key, value) in header {
            root.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    ctx
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceHeader {
    invoice_number: Option<Value>,
    date: Option<Value>,
    due_date: Option<Value>,
    company_name: Option<Value>,
    company_address: Option<Value>,
    client_name: Option<Value>,
    client_address: Option<Value>,
    notes: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct InvoiceItem {
    name: Option<Value>,
    #[serde(default)]
    quantity: f64,
    #[serde(default)]
    price: f64,
}

#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    #[serde(default)]
    header: InvoiceHeader,
    #[serde(default)]
    items: Vec<InvoiceItem>,
}

/// Sender or recipient block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Party {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One priced line of an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: f64,
    pub price: String,
    pub total: String,
    #[serde(skip)]
    pub amount: f64,
}

/// Invoice fields and totals ready for a document collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Party>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Party>,
    pub lines: Vec<InvoiceLine>,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoiceSummary {
    /// Compute line totals and the grand total of an invoice.
    pub fn from_invoice(invoice: &Value) -> Result<Self, serde_json::Error> {
        let record: InvoiceRecord = serde_json::from_value(invoice.clone())?;
        let header = record.header;

        let lines: Vec<InvoiceLine> = record
            .items
            .iter()
            .map(|item| {
                let amount = item.quantity * item.price;
                InvoiceLine {
                    name: text_or_na(item.name.as_ref()),
                    quantity: item.quantity,
                    price: format_currency(item.price),
                    total: format_currency(amount),
                    amount,
                }
            })
            .collect();
        let grand_total: f64 = lines.iter().map(|line| line.amount).sum();

        Ok(InvoiceSummary {
            invoice_number: text_or_na(header.invoice_number.as_ref()),
            date: text_or_na(header.date.as_ref()),
            due_date: text_or_na(header.due_date.as_ref()),
            from: party(header.company_name.as_ref(), header.company_address.as_ref()),
            to: party(header.client_name.as_ref(), header.client_address.as_ref()),
            lines,
            total: format_currency(grand_total),
            notes: non_empty(header.notes.as_ref()),
        })
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value.map(render_value).filter(|text| !text.is_empty())
}

fn text_or_na(value: Option<&Value>) -> String {
    non_empty(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn party(name: Option<&Value>, address: Option<&Value>) -> Option<Party> {
    non_empty(name).map(|name| Party {
        name,
        address: non_empty(address),
    })
}
