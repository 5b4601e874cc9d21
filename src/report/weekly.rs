//! Weekly sales activity report data

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::format::{amount_value, key_fragment};

/// One row of the activity table
/// Inconsistent weekly report data
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{row} has {actual} values but there are {expected} categories")]
    RowLength {
        row: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("day '{day}' has {actual} values but there are {expected} categories")]
    DayLength {
        day: String,
        actual: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub name: String,
    /// One amount per category, in category order
    pub values: Vec<f64>,
}

/// Free-form line item listed under the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub name: String,
    pub value: f64,
}

/// A salesperson's weekly activity report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySalesReport {
    pub week_ending: String,
    pub today: String,
    pub salesperson: String,
    pub location: String,
    pub days: Vec<DayActivity>,
    pub categories: Vec<String>,
    pub totals: Vec<f64>,
    pub goal: Vec<f64>,
    pub variance: Vec<f64>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub items: Vec<ReportItem>,
}

impl WeeklySalesReport {
    /// The placeholder report served when no data file is configured.
    pub fn sample() -> Self {
        let day = |name: &str, values: [f64; 11]| DayActivity {
            name: name.to_string(),
            values: values.to_vec(),
        };

        WeeklySalesReport {
            week_ending: "Date".to_string(),
            today: "Date".to_string(),
            salesperson: "Name".to_string(),
            location: "Location".to_string(),
            days: vec![
                day("Monday", [14.0, 23.0, 4.0, 45.0, 22.0, 2.0, 100.0, 0.0, 0.0, 0.0, 210.0]),
                day("Tuesday", [23.0, 76.0, 10.0, 50.0, 54.0, 45.0, 80.0, 0.0, 0.0, 0.0, 338.0]),
                day("Wednesday", [4.0, 130.0, 11.0, 33.0, 67.0, 65.0, 400.0, 0.0, 0.0, 0.0, 710.0]),
                day("Thursday", [102.0, 40.0, 18.0, 0.0, 86.0, 82.0, 97.0, 0.0, 0.0, 0.0, 425.0]),
                day("Friday", [33.0, 55.0, 22.0, 49.0, 143.0, 26.0, 50.0, 0.0, 0.0, 0.0, 378.0]),
                day("Saturday", [0.0; 11]),
                day("Sunday", [0.0; 11]),
            ],
            categories: [
                "IN SALES OFFICE",
                "OUTSIDE OFFICE",
                "IN OFFICE VISITS",
                "OUTSIDE CALLS",
                "FILE PHONE CALLS",
                "NEW ACCT. PHONE",
                "GUEST ROOMS",
                "FOOD & BEVERAGE",
                "MTG. ROOM RENTAL",
                "OTHER*",
                "TOTAL",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            totals: vec![176.0, 324.0, 65.0, 177.0, 372.0, 220.0, 727.0, 0.0, 0.0, 0.0, 2061.0],
            goal: vec![200.0, 400.0, 300.0, 65.0, 500.0, 300.0, 400.0, 600.0, 300.0, 300.0, 3365.0],
            variance: vec![
                -24.0, -76.0, -235.0, 112.0, -128.0, -80.0, 327.0, -600.0, -300.0, -300.0, -1304.0,
            ],
            explanation: String::new(),
            items: vec![
                ReportItem { name: "Item 1".to_string(), value: 100.0 },
                ReportItem { name: "Item 2".to_string(), value: 200.0 },
                ReportItem { name: "Item 3".to_string(), value: 300.0 },
            ],
        }
    }

    /// Check that every amount row has one value per category.
    pub fn validate(&self) -> Result<(), ReportError> {
        let expected = self.categories.len();
        let rows = [
            ("totals", self.totals.len()),
            ("goal", self.goal.len()),
            ("variance", self.variance.len()),
        ];

        for (name, len) in rows {
            if len != expected {
                return Err(ReportError::RowLength {
                    row: name,
                    actual: len,
                    expected,
                });
            }
        }

        for day in &self.days {
            if day.values.len() != expected {
                return Err(ReportError::DayLength {
                    day: day.name.clone(),
                    actual: day.values.len(),
                    expected,
                });
            }
        }

        Ok(())
    }

    /// Template context for the report.
    ///
    /// Besides the header fields and the `days`, `items` and `categories`
    /// collections, every amount is exposed under a flat key built from the
    /// category name stripped to alphanumerics: `totals_INSALESOFFICE`,
    /// `goal_<Cat>`, `variance_<Cat>` and `day_<Day>_<Cat>`.
    pub fn to_context(&self) -> Value {
        let mut ctx = Map::new();
        ctx.insert("weekEnding".into(), Value::from(self.week_ending.as_str()));
        ctx.insert("today".into(), Value::from(self.today.as_str()));
        ctx.insert("salesperson".into(), Value::from(self.salesperson.as_str()));
        ctx.insert("location".into(), Value::from(self.location.as_str()));
        ctx.insert("explanation".into(), Value::from(self.explanation.as_str()));
        ctx.insert(
            "categories".into(),
            Value::from(self.categories.clone()),
        );
        ctx.insert(
            "days".into(),
            Value::Array(
                self.days
                    .iter()
                    .map(|day| {
                        serde_json::json!({
                            "name": day.name,
                            "values": day.values.iter().copied().map(amount_value).collect::<Vec<_>>(),
                        })
                    })
                    .collect(),
            ),
        );
        ctx.insert(
            "items".into(),
            Value::Array(
                self.items
                    .iter()
                    .map(|item| serde_json::json!({"name": item.name, "value": amount_value(item.value)}))
                    .collect(),
            ),
        );

        for (i, category) in self.categories.iter().enumerate() {
            let cat = key_fragment(category);
            let rows = [
                ("totals", &self.totals),
                ("goal", &self.goal),
                ("variance", &self.variance),
            ];
            for (prefix, values) in rows {
                if let Some(&amount) = values.get(i) {
                    ctx.insert(format!("{}_{}", prefix, cat), amount_value(amount));
                }
            }
            for day in &self.days {
                if let Some(&amount) = day.values.get(i) {
                    ctx.insert(format!("day_{}_{}", day.name, cat), amount_value(amount));
                }
            }
        }

        Value::Object(ctx)
    }
}

impl Default for WeeklySalesReport {
    fn default() -> Self {
        Self::sample()
    }
}
