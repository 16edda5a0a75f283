//! End-to-end order flow tests against an in-memory database
//!
//! Exercises checkout pricing, price freezing, atomicity and profile
//! provisioning through the real repositories and the orders service.

use kantin_server::AppError;
use kantin_server::auth::CurrentUser;
use kantin_server::db::DbService;
use kantin_server::db::repository::{discount, menu, order, student, user, vendor};
use kantin_server::orders::{self, StatusPolicy};

use shared::models::{
    Discount, DiscountCreate, MenuCategory, MenuItem, MenuItemCreate, OrderCreate,
    OrderLineRequest, OrderStatus, Role, Vendor, VendorCreate,
};
use sqlx::SqlitePool;

struct TestWorld {
    pool: SqlitePool,
    admin: CurrentUser,
    student: CurrentUser,
    vendor: Vendor,
}

async fn setup() -> TestWorld {
    let db = DbService::in_memory().await.expect("in-memory db");
    let pool = db.pool;

    let admin_account = user::create(&pool, "ibu_sari", "hash", Role::VendorAdmin)
        .await
        .unwrap();
    let student_account = user::create(&pool, "budi", "hash", Role::Student)
        .await
        .unwrap();

    let vendor = vendor::create(
        &pool,
        admin_account.id,
        VendorCreate {
            name: "Warung Sari".to_string(),
            owner_name: "Ibu Sari".to_string(),
            phone: Some("0812".to_string()),
        },
    )
    .await
    .unwrap();

    TestWorld {
        pool,
        admin: CurrentUser {
            id: admin_account.id,
            username: admin_account.username,
            role: Role::VendorAdmin,
        },
        student: CurrentUser {
            id: student_account.id,
            username: student_account.username,
            role: Role::Student,
        },
        vendor,
    }
}

async fn seed_menu(world: &TestWorld, name: &str, price: i64) -> MenuItem {
    menu::create(
        &world.pool,
        world.vendor.id,
        MenuItemCreate {
            name: name.to_string(),
            price,
            category: MenuCategory::Food,
            photo: None,
            description: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_discount(
    world: &TestWorld,
    name: &str,
    percentage: f64,
    starts_at: i64,
    ends_at: i64,
    menu_ids: &[i64],
) -> Discount {
    let created = discount::create(
        &world.pool,
        DiscountCreate {
            name: name.to_string(),
            percentage,
            starts_at,
            ends_at,
        },
    )
    .await
    .unwrap();
    discount::assign(&world.pool, created.id, menu_ids)
        .await
        .unwrap();
    created
}

fn checkout(vendor_id: i64, lines: Vec<OrderLineRequest>) -> OrderCreate {
    OrderCreate { vendor_id, lines }
}

fn line(menu_id: i64, qty: i64, discount_id: Option<i64>) -> OrderLineRequest {
    OrderLineRequest {
        menu_id,
        qty,
        discount_id,
    }
}

#[tokio::test]
async fn test_checkout_applies_best_discount_and_computes_total() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;

    let now = shared::util::now_millis();
    seed_discount(&world, "Promo 25", 25.0, now - 1_000, now + 60_000, &[nasi.id]).await;

    let detail = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 2, None)]),
    )
    .await
    .expect("checkout should succeed");

    assert_eq!(detail.status, OrderStatus::Unconfirmed);
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].unit_price, 7_500);
    assert_eq!(detail.lines[0].subtotal, 15_000);
    assert_eq!(detail.total_price, 15_000);
}

#[tokio::test]
async fn test_price_is_frozen_after_discount_deletion() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;

    let now = shared::util::now_millis();
    let promo =
        seed_discount(&world, "Promo 20", 20.0, now - 1_000, now + 60_000, &[nasi.id]).await;

    let created = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 1, Some(promo.id))]),
    )
    .await
    .unwrap();
    assert_eq!(created.total_price, 8_000);

    // Delete the discount and raise the menu price; the order must not move
    discount::delete(&world.pool, promo.id).await.unwrap();
    menu::update(
        &world.pool,
        nasi.id,
        shared::models::MenuItemUpdate {
            name: None,
            price: Some(99_000),
            category: None,
            photo: None,
            description: None,
        },
    )
    .await
    .unwrap();

    let reloaded = order::find_by_id(&world.pool, created.id).await.unwrap().unwrap();
    let detail = orders::order_detail(&world.pool, &reloaded, None, None)
        .await
        .unwrap();

    assert_eq!(detail.lines[0].unit_price, 8_000);
    assert_eq!(detail.total_price, 8_000);
}

#[tokio::test]
async fn test_failed_line_persists_nothing() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;

    let err = orders::create_order(
        &world.pool,
        &world.student,
        checkout(
            world.vendor.id,
            vec![line(nasi.id, 1, None), line(424242, 1, None)],
        ),
    )
    .await
    .expect_err("second line references a missing menu");

    assert!(matches!(err, AppError::NotFound(_)));

    let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&world.pool)
        .await
        .unwrap();
    let line_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_line")
        .fetch_one(&world.pool)
        .await
        .unwrap();
    assert_eq!(order_count, 0);
    assert_eq!(line_count, 0);
}

#[tokio::test]
async fn test_explicit_discount_validation_errors() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;
    let es_teh = seed_menu(&world, "Es Teh", 5_000).await;

    let now = shared::util::now_millis();

    // Valid only next month → not active
    let future = seed_discount(
        &world,
        "Next Month",
        25.0,
        now + 30 * 24 * 3_600_000,
        now + 31 * 24 * 3_600_000,
        &[nasi.id],
    )
    .await;
    let err = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 1, Some(future.id))]),
    )
    .await
    .expect_err("future discount is not active");
    assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("not active")));

    // Active but assigned to a different menu → not assigned
    let other = seed_discount(&world, "Other", 50.0, now - 1_000, now + 60_000, &[es_teh.id]).await;
    let err = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 1, Some(other.id))]),
    )
    .await
    .expect_err("unassigned discount must be rejected");
    assert!(matches!(err, AppError::BusinessRule(ref m) if m.contains("not valid")));

    // Unknown discount id → not found
    let err = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 1, Some(999))]),
    )
    .await
    .expect_err("unknown discount id");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_profile_provisioning_is_idempotent_under_concurrency() {
    let world = setup().await;

    let (a, b) = tokio::join!(
        student::get_or_create_for_user(&world.pool, world.student.id, "budi"),
        student::get_or_create_for_user(&world.pool, world.student.id, "budi"),
    );
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.id, b.id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student WHERE user_id = ?")
        .bind(world.student.id)
        .fetch_one(&world.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Provisioned profile defaults name from the username, blank contact
    assert_eq!(a.name, "budi");
    assert_eq!(a.address, "");
    assert_eq!(a.phone, "");
}

#[tokio::test]
async fn test_vendor_admin_cannot_checkout() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;

    let err = orders::create_order(
        &world.pool,
        &world.admin,
        checkout(world.vendor.id, vec![line(nasi.id, 1, None)]),
    )
    .await
    .expect_err("admins do not place student orders");
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_status_update_ownership_and_policy() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;

    let created = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 1, None)]),
    )
    .await
    .unwrap();

    // A different vendor admin cannot touch this order
    let other_admin_account = user::create(&world.pool, "pak_joko", "hash", Role::VendorAdmin)
        .await
        .unwrap();
    vendor::create(
        &world.pool,
        other_admin_account.id,
        VendorCreate {
            name: "Warung Joko".to_string(),
            owner_name: "Pak Joko".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();
    let other_admin = CurrentUser {
        id: other_admin_account.id,
        username: other_admin_account.username,
        role: Role::VendorAdmin,
    };

    let err = orders::update_status(
        &world.pool,
        StatusPolicy::Permissive,
        &other_admin,
        created.id,
        OrderStatus::Cooking,
    )
    .await
    .expect_err("foreign vendor admin must not see the order");
    assert!(matches!(err, AppError::NotFound(_)));

    // The owning admin may jump states under the permissive policy
    let updated = orders::update_status(
        &world.pool,
        StatusPolicy::Permissive,
        &world.admin,
        created.id,
        OrderStatus::Arrived,
    )
    .await
    .unwrap();
    assert_eq!(updated.status, OrderStatus::Arrived);

    // Forward-only rejects the backwards move
    let err = orders::update_status(
        &world.pool,
        StatusPolicy::ForwardOnly,
        &world.admin,
        created.id,
        OrderStatus::Cooking,
    )
    .await
    .expect_err("forward-only policy rejects backwards transitions");
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn test_monthly_recap_counts_and_income() {
    let world = setup().await;
    let nasi = seed_menu(&world, "Nasi Goreng", 10_000).await;
    let es_teh = seed_menu(&world, "Es Teh", 5_000).await;

    let first = orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(nasi.id, 2, None)]),
    )
    .await
    .unwrap();
    orders::create_order(
        &world.pool,
        &world.student,
        checkout(world.vendor.id, vec![line(es_teh.id, 1, None)]),
    )
    .await
    .unwrap();

    orders::update_status(
        &world.pool,
        StatusPolicy::Permissive,
        &world.admin,
        first.id,
        OrderStatus::Cooking,
    )
    .await
    .unwrap();

    let today = chrono::Utc::now();
    use chrono::Datelike;
    let recap = orders::monthly_recap(&world.pool, &world.vendor, today.year(), today.month())
        .await
        .unwrap();

    assert_eq!(recap.total_orders, 2);
    assert_eq!(recap.total_income, 25_000);
    assert_eq!(recap.cooking, 1);
    assert_eq!(recap.unconfirmed, 1);
    assert_eq!(recap.arrived, 0);
}
