use crate::model::{CalcSummary, InvoiceLine};

/// Derives the uniform discount rate that reconciles the discountable lines
/// with the target final amount, plus the display totals around it.
///
/// Total over all finite inputs: an empty collection yields an all-zero
/// summary, and the percentage path is guarded so nothing ever divides by
/// zero or produces a negative rate. The rate is deliberately NOT capped at
/// 100: a target far below the non-discountable subtotal still produces the
/// mathematically implied percentage.
pub fn compute_summary(lines: &[InvoiceLine], final_amount: f64) -> CalcSummary {
    let mut total_pre_discount = 0.0;
    let mut discountable_total = 0.0;
    let mut non_discountable_total = 0.0;

    for line in lines {
        let line_total = line.line_total();
        total_pre_discount += line_total;
        if line.apply_discount {
            discountable_total += line_total;
        } else {
            non_discountable_total += line_total;
        }
    }

    // The slice of the target the discountable pool has to absorb once the
    // fixed lines are paid in full.
    let remainder_for_discountable = final_amount - non_discountable_total;
    let total_discount_value = discountable_total - remainder_for_discountable;

    let mut discount_percentage = 0.0;
    if discountable_total > 0.0 && total_discount_value > 0.0 {
        discount_percentage = (total_discount_value / discountable_total) * 100.0;
    }

    // Whole-invoice display aggregate. Defined on its own terms, not derived
    // from the percentage: the two can disagree when fixed lines alone exceed
    // the target and the rate above is zero-guarded.
    let total_discount_amount = if final_amount > 0.0 && total_pre_discount > final_amount {
        total_pre_discount - final_amount
    } else {
        0.0
    };

    let calculated_final_amount =
        non_discountable_total + discountable_total * (1.0 - discount_percentage / 100.0);

    CalcSummary {
        total_pre_discount,
        discountable_total,
        non_discountable_total,
        discount_percentage,
        total_discount_amount,
        calculated_final_amount,
    }
}

/// Per-row discounted price. Must be fed the same percentage the summary was
/// computed with so rows and summary panel agree.
pub fn price_after_discount(line: &InvoiceLine, discount_percentage: f64) -> f64 {
    let line_total = line.line_total();
    if line.apply_discount && discount_percentage > 0.0 {
        line_total * (1.0 - discount_percentage / 100.0)
    } else {
        line_total
    }
}
