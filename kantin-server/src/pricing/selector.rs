//! Best-Discount Selector
//!
//! When a checkout line names no discount, the highest-percentage
//! applicable discount is applied automatically. The same selection
//! feeds the priced menu projection.

use std::cmp::Ordering;

use shared::models::{Discount, MenuItem};

use super::matcher::{AssignmentSet, is_applicable};

/// Pick the best discount for a menu item at `now`.
///
/// Returns the applicable discount with the strictly highest percentage;
/// `None` when nothing applies (full price). Ties on percentage are
/// broken by the lowest discount id, which makes the choice
/// deterministic regardless of input order.
pub fn select_best<'a>(
    menu: &MenuItem,
    now: i64,
    discounts: &'a [Discount],
    assignments: &AssignmentSet,
) -> Option<&'a Discount> {
    discounts
        .iter()
        .filter(|d| is_applicable(menu, d, assignments, now))
        .max_by(|a, b| {
            a.percentage
                .partial_cmp(&b.percentage)
                .unwrap_or(Ordering::Equal)
                // equal percentage: prefer the lower id
                .then_with(|| b.id.cmp(&a.id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{make_discount, make_menu};

    #[test]
    fn test_highest_percentage_wins() {
        let menu = make_menu(1, 10, 10_000);
        let discounts = vec![
            make_discount(11, 10.0, 0, i64::MAX),
            make_discount(12, 30.0, 0, i64::MAX),
            make_discount(13, 20.0, 0, i64::MAX),
        ];
        let assignments: AssignmentSet = [(1, 11), (1, 12), (1, 13)].into();

        let best = select_best(&menu, 1_000, &discounts, &assignments).expect("one should apply");
        assert_eq!(best.id, 12);
        assert_eq!(best.percentage, 30.0);
    }

    #[test]
    fn test_inactive_and_unassigned_are_skipped() {
        let menu = make_menu(1, 10, 10_000);
        let discounts = vec![
            // higher percentage but expired
            make_discount(11, 50.0, 0, 500),
            // higher percentage but not assigned
            make_discount(12, 40.0, 0, i64::MAX),
            make_discount(13, 20.0, 0, i64::MAX),
        ];
        let assignments: AssignmentSet = [(1, 11), (1, 13)].into();

        let best = select_best(&menu, 1_000, &discounts, &assignments).expect("one should apply");
        assert_eq!(best.id, 13);
    }

    #[test]
    fn test_none_when_nothing_applies() {
        let menu = make_menu(1, 10, 10_000);
        let discounts = vec![make_discount(11, 10.0, 2_000, 3_000)];
        let assignments: AssignmentSet = [(1, 11)].into();

        assert!(select_best(&menu, 1_000, &discounts, &assignments).is_none());
    }

    #[test]
    fn test_tie_breaks_to_lowest_id_regardless_of_order() {
        let menu = make_menu(1, 10, 10_000);
        let assignments: AssignmentSet = [(1, 21), (1, 22)].into();

        let forward = vec![
            make_discount(21, 25.0, 0, i64::MAX),
            make_discount(22, 25.0, 0, i64::MAX),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = select_best(&menu, 1_000, &forward, &assignments).unwrap();
        let b = select_best(&menu, 1_000, &reversed, &assignments).unwrap();
        assert_eq!(a.id, 21);
        assert_eq!(b.id, 21);
    }
}
