//! Pricing Engine
//!
//! Discount resolution and order-line pricing:
//!
//! - [`matcher`] - is a discount applicable to a menu item right now
//! - [`selector`] - best-discount selection when none is chosen
//! - [`resolver`] - per-line price resolution with full validation
//! - [`money`] - the one rounding rule (half away from zero)
//!
//! Everything here is pure compute over a catalog snapshot; the caller
//! loads data and supplies `now`. Once a resolved price is persisted on
//! an order line it is never recomputed.

pub mod matcher;
pub mod money;
pub mod resolver;
pub mod selector;

pub use matcher::{AssignmentSet, is_applicable};
pub use money::discounted_unit_price;
pub use resolver::{PricingCatalog, PricingError, ResolvedLine, price_menu, resolve_line_price};
pub use selector::select_best;

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::{Discount, MenuCategory, MenuItem};

    pub fn make_menu(id: i64, vendor_id: i64, price: i64) -> MenuItem {
        MenuItem {
            id,
            vendor_id,
            name: format!("menu-{id}"),
            price,
            category: MenuCategory::Food,
            photo: None,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn make_discount(id: i64, percentage: f64, starts_at: i64, ends_at: i64) -> Discount {
        Discount {
            id,
            name: format!("discount-{id}"),
            percentage,
            starts_at,
            ends_at,
            created_at: 0,
            updated_at: 0,
        }
    }
}
