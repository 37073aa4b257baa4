use uuid::Uuid;

use crate::model::InvoiceLine;

/// Number of blank lines a new session starts with.
pub const SEED_LINES: usize = 3;

/// One editing session: the line collection plus the target amount.
///
/// Every operation returns a new snapshot instead of mutating in place, so
/// the shell can compare snapshots for change detection and the engine always
/// sees a fully-applied state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub lines: Vec<InvoiceLine>,
    pub final_amount: f64,
}

impl Session {
    pub fn new() -> Self {
        Session {
            lines: (0..SEED_LINES).map(|_| InvoiceLine::new()).collect(),
            final_amount: 0.0,
        }
    }

    /// Appends a fresh default line at the end, keeping existing order.
    pub fn add_line(&self) -> Session {
        let mut lines = self.lines.clone();
        lines.push(InvoiceLine::new());
        Session {
            lines,
            final_amount: self.final_amount,
        }
    }

    /// Replaces one field of the targeted line, all other lines untouched.
    /// An unknown id is a no-op.
    pub fn update_line(&self, id: Uuid, edit: LineEdit) -> Session {
        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|l| l.id == id) {
            match edit {
                LineEdit::Name(name) => line.name = name,
                LineEdit::Quantity(qty) => line.quantity = qty,
                LineEdit::UnitPrice(price) => line.unit_price = price,
                LineEdit::ApplyDiscount(flag) => line.apply_discount = flag,
            }
        }
        Session {
            lines,
            final_amount: self.final_amount,
        }
    }

    /// Deletes the line unless it is the last one remaining; the collection
    /// never becomes empty.
    pub fn remove_line(&self, id: Uuid) -> Session {
        if self.lines.len() <= 1 {
            return self.clone();
        }
        Session {
            lines: self.lines.iter().filter(|l| l.id != id).cloned().collect(),
            final_amount: self.final_amount,
        }
    }

    pub fn set_final_amount(&self, amount: f64) -> Session {
        Session {
            lines: self.lines.clone(),
            final_amount: amount,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    Name(String),
    Quantity(f64),
    UnitPrice(f64),
    ApplyDiscount(bool),
}

/// Boundary normalization: blank or non-numeric text means "no target", 0.
pub fn parse_amount(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_seeds_three_blank_lines() {
        let session = Session::new();

        assert_eq!(session.lines.len(), SEED_LINES);
        assert_eq!(session.final_amount, 0.0);
        for line in &session.lines {
            assert_eq!(line.name, "");
            assert_eq!(line.quantity, 1.0);
            assert_eq!(line.unit_price, 0.0);
            assert!(line.apply_discount);
        }
    }

    #[test]
    fn test_seeded_lines_have_distinct_ids() {
        let session = Session::new();
        assert_ne!(session.lines[0].id, session.lines[1].id);
        assert_ne!(session.lines[1].id, session.lines[2].id);
    }

    #[test]
    fn test_add_line_appends_and_preserves_order() {
        let session = Session::new();
        let before: Vec<_> = session.lines.iter().map(|l| l.id).collect();

        let grown = session.add_line();

        assert_eq!(grown.lines.len(), SEED_LINES + 1);
        let after: Vec<_> = grown.lines.iter().map(|l| l.id).collect();
        assert_eq!(&after[..SEED_LINES], &before[..]);
        // Original snapshot untouched.
        assert_eq!(session.lines.len(), SEED_LINES);
    }

    #[test]
    fn test_update_changes_one_field_of_one_line() {
        let session = Session::new();
        let target = session.lines[1].id;

        let updated = session.update_line(target, LineEdit::UnitPrice(49.5));

        assert_eq!(updated.lines[1].unit_price, 49.5);
        assert_eq!(updated.lines[1].quantity, 1.0);
        assert_eq!(updated.lines[0], session.lines[0]);
        assert_eq!(updated.lines[2], session.lines[2]);
    }

    #[test]
    fn test_update_leaves_source_snapshot_untouched() {
        let session = Session::new();
        let target = session.lines[0].id;
        let before = session.clone();

        let updated = session.update_line(target, LineEdit::Name("Consulting".into()));

        assert_eq!(session, before);
        assert_ne!(updated, session);
        assert_eq!(updated.lines[0].name, "Consulting");
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let session = Session::new();
        let updated = session.update_line(Uuid::new_v4(), LineEdit::Name("ghost".into()));
        assert_eq!(updated, session);
    }

    #[test]
    fn test_remove_line_by_id() {
        let session = Session::new();
        let victim = session.lines[1].id;

        let shrunk = session.remove_line(victim);

        assert_eq!(shrunk.lines.len(), SEED_LINES - 1);
        assert!(shrunk.lines.iter().all(|l| l.id != victim));
    }

    #[test]
    fn test_removing_the_last_line_is_refused() {
        let mut session = Session::new();
        while session.lines.len() > 1 {
            let id = session.lines[0].id;
            session = session.remove_line(id);
        }
        assert_eq!(session.lines.len(), 1);

        let only = session.lines[0].clone();
        let unchanged = session.remove_line(only.id);

        assert_eq!(unchanged.lines.len(), 1);
        assert_eq!(unchanged.lines[0], only);
    }

    #[test]
    fn test_set_final_amount_keeps_lines() {
        let session = Session::new();
        let updated = session.set_final_amount(120.0);

        assert_eq!(updated.final_amount, 120.0);
        assert_eq!(updated.lines, session.lines);
    }

    #[test]
    fn test_parse_amount_normalizes_bad_input_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("12,50"), 0.0);
        assert_eq!(parse_amount("99.5"), 99.5);
        assert_eq!(parse_amount(" 120 "), 120.0);
        assert_eq!(parse_amount("-3"), -3.0);
    }
}
