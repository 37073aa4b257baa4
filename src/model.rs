use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceLine {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub apply_discount: bool,
}

impl InvoiceLine {
    /// Fresh blank line: qty 1, price 0, discount enabled.
    pub fn new() -> Self {
        InvoiceLine {
            id: Uuid::new_v4(),
            name: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
            apply_discount: true,
        }
    }

    // Never stored, always recomputed.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

impl Default for InvoiceLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Derived totals for the whole invoice. Recomputed from scratch on every
/// edit; never persisted.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CalcSummary {
    pub total_pre_discount: f64,
    pub discountable_total: f64,
    pub non_discountable_total: f64,
    pub discount_percentage: f64,
    pub total_discount_amount: f64,
    pub calculated_final_amount: f64,
}

/// One row of the JSON export: the line plus its derived totals.
#[derive(Debug, Serialize)]
pub struct LineBreakdown {
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub apply_discount: bool,
    pub line_total: f64,
    pub discounted_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_serializes_with_its_id() {
        let line = InvoiceLine {
            name: "Consulting".to_string(),
            quantity: 2.0,
            unit_price: 300.0,
            ..InvoiceLine::new()
        };

        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains(&format!("\"id\":\"{}\"", line.id)));

        let restored: InvoiceLine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, line);
    }

    #[test]
    fn test_line_total_is_recomputed() {
        let mut line = InvoiceLine::new();
        line.quantity = 3.0;
        line.unit_price = 19.99;
        assert!((line.line_total() - 59.97).abs() < 1e-9);

        line.quantity = 0.0;
        assert_eq!(line.line_total(), 0.0);
    }
}
