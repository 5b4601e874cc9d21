//! Draw-instruction model handed to PDF and spreadsheet writers

use serde::Serialize;

use super::format::format_currency;
use super::weekly::WeeklySalesReport;

const TITLE: &str = "WEEKLY SALES ACTIVITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Day,
    Totals,
    Goal,
    Variance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRow {
    pub kind: RowKind,
    pub label: String,
    pub cells: Vec<String>,
}

/// Report content in reading order, with every cell already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub title: String,
    pub fields: Vec<LayoutField>,
    pub columns: Vec<String>,
    pub rows: Vec<LayoutRow>,
    pub footer: Vec<String>,
}

impl ReportLayout {
    pub fn weekly(report: &WeeklySalesReport) -> Self {
        let field = |label: &str, value: &str| LayoutField {
            label: label.to_string(),
            value: value.to_string(),
        };
        let row = |kind: RowKind, label: &str, values: &[f64]| LayoutRow {
            kind,
            label: label.to_string(),
            cells: values.iter().copied().map(format_currency).collect(),
        };

        let columns = std::iter::once("DAYS".to_string())
            .chain(report.categories.iter().cloned())
            .collect();

        let mut rows: Vec<LayoutRow> = report
            .days
            .iter()
            .map(|day| row(RowKind::Day, &day.name, &day.values))
            .collect();
        rows.push(row(RowKind::Totals, "Totals", &report.totals));
        rows.push(row(RowKind::Goal, "GOAL", &report.goal));
        rows.push(row(RowKind::Variance, "VARIANCE", &report.variance));

        let mut footer = vec!["*EXPLANATION".to_string()];
        if !report.explanation.is_empty() {
            footer.push(report.explanation.clone());
        }
        footer.push("Approval".to_string());

        ReportLayout {
            title: TITLE.to_string(),
            fields: vec![
                field("SALESPERSON", &report.salesperson),
                field("WEEK ENDING", &report.week_ending),
                field("LOCATION", &report.location),
                field("TODAY'S DATE", &report.today),
            ],
            columns,
            rows,
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_layout() {
        let layout = ReportLayout::weekly(&WeeklySalesReport::sample());

        assert_eq!(layout.title, "WEEKLY SALES ACTIVITY");
        assert_eq!(layout.columns.len(), 12);
        assert_eq!(layout.columns[0], "DAYS");
        assert_eq!(layout.rows.len(), 10);

        let monday = &layout.rows[0];
        assert_eq!(monday.kind, RowKind::Day);
        assert_eq!(monday.cells[0], "$14.00");

        let saturday = &layout.rows[5];
        assert_eq!(saturday.cells[3], "$0.00");

        let variance = layout.rows.last().unwrap();
        assert_eq!(variance.kind, RowKind::Variance);
        assert_eq!(variance.cells[0], "-$24.00");
        assert_eq!(variance.cells[3], "$112.00");

        assert_eq!(layout.fields[0].value, "Name");
        assert_eq!(layout.footer, vec!["*EXPLANATION", "Approval"]);
    }

    #[test]
    fn test_layout_includes_explanation() {
        let mut report = WeeklySalesReport::sample();
        report.explanation = "Trade show week".to_string();
        let layout = ReportLayout::weekly(&report);
        assert_eq!(layout.footer[1], "Trade show week");
    }

    #[test]
    fn test_layout_serializes_row_kind() {
        let layout = ReportLayout::weekly(&WeeklySalesReport::sample());
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["rows"][7]["kind"], "totals");
    }
}
