//! Discount Matcher
//!
//! Logic for deciding whether a discount applies to a menu item at a
//! given instant. Pure functions of their inputs; the caller supplies
//! `now`.

use std::collections::HashSet;

use shared::models::{Discount, MenuItem};

/// Assignment pairs `(menu_id, discount_id)` loaded from `menu_discount`
pub type AssignmentSet = HashSet<(i64, i64)>;

/// Whether an assignment links this discount to this menu item
pub fn is_assigned(assignments: &AssignmentSet, menu_id: i64, discount_id: i64) -> bool {
    assignments.contains(&(menu_id, discount_id))
}

/// Whether a discount is applicable to a menu item right now.
///
/// True iff an assignment exists for the pair AND `now` lies inside the
/// validity window. Both window ends are inclusive: a discount is active
/// exactly at its start and end instants.
pub fn is_applicable(
    menu: &MenuItem,
    discount: &Discount,
    assignments: &AssignmentSet,
    now: i64,
) -> bool {
    is_assigned(assignments, menu.id, discount.id) && discount.is_active_at(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{make_discount, make_menu};

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let menu = make_menu(1, 10, 10_000);
        let discount = make_discount(5, 20.0, 1_000, 2_000);
        let assignments: AssignmentSet = [(1, 5)].into();

        assert!(!is_applicable(&menu, &discount, &assignments, 999));
        assert!(is_applicable(&menu, &discount, &assignments, 1_000));
        assert!(is_applicable(&menu, &discount, &assignments, 1_500));
        assert!(is_applicable(&menu, &discount, &assignments, 2_000));
        assert!(!is_applicable(&menu, &discount, &assignments, 2_001));
    }

    #[test]
    fn test_unassigned_discount_never_applies() {
        let menu = make_menu(1, 10, 10_000);
        let discount = make_discount(5, 50.0, 0, i64::MAX);
        let assignments: AssignmentSet = AssignmentSet::new();

        assert!(!is_applicable(&menu, &discount, &assignments, 1_000));
    }

    #[test]
    fn test_assignment_to_other_menu_does_not_leak() {
        let menu = make_menu(1, 10, 10_000);
        let discount = make_discount(5, 50.0, 0, i64::MAX);
        let assignments: AssignmentSet = [(2, 5)].into();

        assert!(!is_applicable(&menu, &discount, &assignments, 1_000));
    }
}
