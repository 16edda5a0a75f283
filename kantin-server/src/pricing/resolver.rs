//! Price Resolver
//!
//! Turns a checkout line request into a frozen unit price, enforcing the
//! full validation sequence. Pure compute over a [`PricingCatalog`]
//! snapshot loaded by the caller — no storage access, no side effects,
//! so concurrent checkouts each evaluate against their own `now`.

use std::collections::HashMap;

use shared::models::{
    Discount, DiscountBrief, MenuDiscount, MenuItem, MenuPriced, OrderLineRequest,
};

use super::matcher::{AssignmentSet, is_assigned};
use super::money::discounted_unit_price;
use super::selector::select_best;
use crate::AppError;

/// Pricing failure kinds, in validation order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Menu item {0}")]
    MenuNotFound(i64),

    #[error("Menu item {menu_id} does not belong to vendor {vendor_id}")]
    MenuVendorMismatch { menu_id: i64, vendor_id: i64 },

    #[error("Quantity must be at least 1, got {0}")]
    QuantityInvalid(i64),

    #[error("Discount {0}")]
    DiscountNotFound(i64),

    #[error("Discount '{name}' is not active")]
    DiscountNotActive { id: i64, name: String },

    #[error("Discount '{name}' is not valid for menu item {menu_id}")]
    DiscountNotAssigned {
        id: i64,
        name: String,
        menu_id: i64,
    },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match &err {
            PricingError::MenuNotFound(_) | PricingError::DiscountNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            PricingError::QuantityInvalid(_) => AppError::Validation(err.to_string()),
            PricingError::MenuVendorMismatch { .. }
            | PricingError::DiscountNotActive { .. }
            | PricingError::DiscountNotAssigned { .. } => AppError::BusinessRule(err.to_string()),
        }
    }
}

/// Immutable snapshot of everything pricing needs for one request
#[derive(Debug, Default)]
pub struct PricingCatalog {
    menus: HashMap<i64, MenuItem>,
    discounts: Vec<Discount>,
    assignments: AssignmentSet,
}

impl PricingCatalog {
    pub fn new(
        menus: Vec<MenuItem>,
        discounts: Vec<Discount>,
        assignments: Vec<MenuDiscount>,
    ) -> Self {
        Self {
            menus: menus.into_iter().map(|m| (m.id, m)).collect(),
            discounts,
            assignments: assignments
                .into_iter()
                .map(|a| (a.menu_id, a.discount_id))
                .collect(),
        }
    }

    pub fn menu(&self, id: i64) -> Option<&MenuItem> {
        self.menus.get(&id)
    }

    // Catalogs are per-request sized; a linear scan beats keeping a
    // second index in sync.
    pub fn discount(&self, id: i64) -> Option<&Discount> {
        self.discounts.iter().find(|d| d.id == id)
    }
}

/// A line with its resolved, ready-to-freeze unit price
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub menu_id: i64,
    pub qty: i64,
    /// Unit price in currency minor units, rounded once, frozen forever
    pub unit_price: i64,
    /// The discount that produced the price, if any
    pub discount: Option<DiscountBrief>,
}

impl ResolvedLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * self.qty
    }
}

/// Resolve the unit price for one checkout line.
///
/// Validation is fail-fast and ordered: menu existence, vendor
/// ownership, quantity, then — when an explicit discount was chosen —
/// discount existence, temporal validity, assignment. Without an
/// explicit choice the best applicable discount is applied, falling back
/// to the base price.
pub fn resolve_line_price(
    catalog: &PricingCatalog,
    vendor_id: i64,
    req: &OrderLineRequest,
    now: i64,
) -> Result<ResolvedLine, PricingError> {
    let menu = catalog
        .menu(req.menu_id)
        .ok_or(PricingError::MenuNotFound(req.menu_id))?;

    if menu.vendor_id != vendor_id {
        return Err(PricingError::MenuVendorMismatch {
            menu_id: menu.id,
            vendor_id,
        });
    }

    if req.qty < 1 {
        return Err(PricingError::QuantityInvalid(req.qty));
    }

    let applied = match req.discount_id {
        Some(discount_id) => {
            let discount = catalog
                .discount(discount_id)
                .ok_or(PricingError::DiscountNotFound(discount_id))?;

            if !discount.is_active_at(now) {
                return Err(PricingError::DiscountNotActive {
                    id: discount.id,
                    name: discount.name.clone(),
                });
            }

            if !is_assigned(&catalog.assignments, menu.id, discount.id) {
                return Err(PricingError::DiscountNotAssigned {
                    id: discount.id,
                    name: discount.name.clone(),
                    menu_id: menu.id,
                });
            }

            Some(discount)
        }
        None => select_best(menu, now, &catalog.discounts, &catalog.assignments),
    };

    let (unit_price, discount) = match applied {
        Some(d) => (
            discounted_unit_price(menu.price, d.percentage),
            Some(DiscountBrief {
                id: d.id,
                name: d.name.clone(),
                percentage: d.percentage,
            }),
        ),
        None => (menu.price, None),
    };

    Ok(ResolvedLine {
        menu_id: menu.id,
        qty: req.qty,
        unit_price,
        discount,
    })
}

/// Priced menu projection for display.
///
/// Uses the same selector and rounding as checkout, so the price a
/// student sees is exactly the price a line would freeze at.
pub fn price_menu(
    menu: &MenuItem,
    now: i64,
    discounts: &[Discount],
    assignments: &AssignmentSet,
) -> MenuPriced {
    let best = select_best(menu, now, discounts, assignments);

    let (final_price, discount_applied) = match best {
        Some(d) => (
            discounted_unit_price(menu.price, d.percentage),
            Some(DiscountBrief {
                id: d.id,
                name: d.name.clone(),
                percentage: d.percentage,
            }),
        ),
        None => (menu.price, None),
    };

    MenuPriced {
        id: menu.id,
        vendor_id: menu.vendor_id,
        name: menu.name.clone(),
        category: menu.category,
        photo: menu.photo.clone(),
        description: menu.description.clone(),
        base_price: menu.price,
        final_price,
        savings: menu.price - final_price,
        has_discount: discount_applied.is_some(),
        discount_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::{make_discount, make_menu};
    use shared::models::MenuDiscount;

    const VENDOR: i64 = 10;
    const NOW: i64 = 1_000;

    fn catalog(
        menus: Vec<MenuItem>,
        discounts: Vec<Discount>,
        pairs: &[(i64, i64)],
    ) -> PricingCatalog {
        let assignments = pairs
            .iter()
            .map(|&(menu_id, discount_id)| MenuDiscount {
                menu_id,
                discount_id,
            })
            .collect();
        PricingCatalog::new(menus, discounts, assignments)
    }

    fn line(menu_id: i64, qty: i64, discount_id: Option<i64>) -> OrderLineRequest {
        OrderLineRequest {
            menu_id,
            qty,
            discount_id,
        }
    }

    #[test]
    fn test_missing_menu_fails_first() {
        let catalog = catalog(vec![], vec![], &[]);
        let err = resolve_line_price(&catalog, VENDOR, &line(1, 2, None), NOW).unwrap_err();
        assert_eq!(err, PricingError::MenuNotFound(1));
    }

    #[test]
    fn test_foreign_vendor_menu_is_rejected() {
        let catalog = catalog(vec![make_menu(1, 99, 10_000)], vec![], &[]);
        let err = resolve_line_price(&catalog, VENDOR, &line(1, 2, None), NOW).unwrap_err();
        assert_eq!(
            err,
            PricingError::MenuVendorMismatch {
                menu_id: 1,
                vendor_id: VENDOR
            }
        );
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let catalog = catalog(vec![make_menu(1, VENDOR, 10_000)], vec![], &[]);
        let err = resolve_line_price(&catalog, VENDOR, &line(1, 0, None), NOW).unwrap_err();
        assert_eq!(err, PricingError::QuantityInvalid(0));
    }

    #[test]
    fn test_auto_selection_applies_best_discount() {
        // 10%, 30%, 20% all active and assigned → 30% wins
        let catalog = catalog(
            vec![make_menu(1, VENDOR, 10_000)],
            vec![
                make_discount(11, 10.0, 0, i64::MAX),
                make_discount(12, 30.0, 0, i64::MAX),
                make_discount(13, 20.0, 0, i64::MAX),
            ],
            &[(1, 11), (1, 12), (1, 13)],
        );

        let resolved = resolve_line_price(&catalog, VENDOR, &line(1, 1, None), NOW).unwrap();
        assert_eq!(resolved.unit_price, 7_000);
        assert_eq!(resolved.discount.unwrap().id, 12);
    }

    #[test]
    fn test_no_discount_means_full_price() {
        let catalog = catalog(vec![make_menu(1, VENDOR, 10_000)], vec![], &[]);
        let resolved = resolve_line_price(&catalog, VENDOR, &line(1, 2, None), NOW).unwrap();
        assert_eq!(resolved.unit_price, 10_000);
        assert_eq!(resolved.subtotal(), 20_000);
        assert!(resolved.discount.is_none());
    }

    #[test]
    fn test_explicit_discount_applied_and_rounded() {
        // 10000 at 25% off, qty 2 → unit 7500, subtotal 15000
        let catalog = catalog(
            vec![make_menu(1, VENDOR, 10_000)],
            vec![make_discount(11, 25.0, 0, i64::MAX)],
            &[(1, 11)],
        );

        let resolved = resolve_line_price(&catalog, VENDOR, &line(1, 2, Some(11)), NOW).unwrap();
        assert_eq!(resolved.unit_price, 7_500);
        assert_eq!(resolved.subtotal(), 15_000);
    }

    #[test]
    fn test_unknown_explicit_discount() {
        let catalog = catalog(vec![make_menu(1, VENDOR, 10_000)], vec![], &[]);
        let err = resolve_line_price(&catalog, VENDOR, &line(1, 1, Some(77)), NOW).unwrap_err();
        assert_eq!(err, PricingError::DiscountNotFound(77));
    }

    #[test]
    fn test_explicit_discount_valid_next_month_is_not_active() {
        let next_month = NOW + 30 * 24 * 3600 * 1000;
        let catalog = catalog(
            vec![make_menu(1, VENDOR, 10_000)],
            vec![make_discount(11, 25.0, next_month, next_month + 1_000)],
            &[(1, 11)],
        );

        let err = resolve_line_price(&catalog, VENDOR, &line(1, 1, Some(11)), NOW).unwrap_err();
        assert!(matches!(err, PricingError::DiscountNotActive { id: 11, .. }));
    }

    #[test]
    fn test_active_but_unassigned_explicit_discount_is_rejected() {
        // Active 50% discount exists but is assigned to another menu —
        // explicitly requesting it must fail, not silently price at 50%
        let catalog = catalog(
            vec![make_menu(1, VENDOR, 10_000), make_menu(2, VENDOR, 8_000)],
            vec![make_discount(11, 50.0, 0, i64::MAX)],
            &[(2, 11)],
        );

        let err = resolve_line_price(&catalog, VENDOR, &line(1, 1, Some(11)), NOW).unwrap_err();
        assert!(matches!(
            err,
            PricingError::DiscountNotAssigned {
                id: 11,
                menu_id: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_projection_matches_checkout_price() {
        let menus = vec![make_menu(1, VENDOR, 3_333)];
        let discounts = vec![make_discount(11, 33.0, 0, i64::MAX)];
        let catalog = catalog(menus.clone(), discounts.clone(), &[(1, 11)]);

        let resolved = resolve_line_price(&catalog, VENDOR, &line(1, 1, None), NOW).unwrap();

        let assignments: AssignmentSet = [(1, 11)].into();
        let priced = price_menu(&menus[0], NOW, &discounts, &assignments);

        assert_eq!(priced.final_price, resolved.unit_price);
        assert_eq!(priced.base_price, 3_333);
        assert_eq!(priced.savings, 3_333 - resolved.unit_price);
        assert!(priced.has_discount);
    }
}
