//! Business report data: weekly sales activity and invoices.
//!
//! Each report type can be turned into a template context, and the direct
//! rendering path turns it into a layout or summary that document writers
//! consume without going through a template.

mod format;
mod invoice;
mod layout;
mod weekly;

pub use format::{amount_value, format_currency, key_fragment};
pub use invoice::{invoice_context, InvoiceBook, InvoiceLine, InvoiceSummary, Party};
pub use layout::{LayoutField, LayoutRow, ReportLayout, RowKind};
pub use weekly::{DayActivity, ReportError, ReportItem, WeeklySalesReport};
