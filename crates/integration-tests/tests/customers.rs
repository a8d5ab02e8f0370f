//! Customer integration tests: unique email, carts and addresses.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `TEST_DATABASE_URL`.
//!
//! Run with: cargo test -p storefront-integration-tests -- --ignored

use storefront_core::{MembershipTier, Quantity};
use storefront_integration_tests::{
    create_collection, create_customer, create_product, test_pool, unique_suffix,
};
use storefront_store::db::{
    AddressRepository, CartRepository, CustomerRepository, OrderRepository, RepositoryError,
};
use storefront_store::models::{NewAddress, NewCustomer, NewOrderLine};

fn address(street: &str) -> NewAddress {
    NewAddress {
        street: street.to_owned(),
        city: "Springfield".to_owned(),
        zip: 12345,
    }
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_duplicate_email_is_a_conflict() {
    let pool = test_pool().await;
    let customers = CustomerRepository::new(&pool);
    let existing = create_customer(&pool, "Original").await;

    let result = customers
        .create(&NewCustomer {
            first_name: "Other".to_owned(),
            last_name: "Person".to_owned(),
            email: existing.email.clone(),
            phone: String::new(),
            birth_date: None,
            membership: MembershipTier::Gold,
        })
        .await;

    assert!(
        matches!(result, Err(RepositoryError::Conflict(ref msg)) if msg == "email already exists"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_membership_defaults_to_bronze() {
    let pool = test_pool().await;
    let customer = create_customer(&pool, "Default").await;
    assert_eq!(customer.membership, MembershipTier::Bronze);
    assert_eq!(customer.to_string(), "Test Default");

    let updated = CustomerRepository::new(&pool)
        .update_membership(customer.id, MembershipTier::Silver)
        .await
        .expect("update membership");
    assert_eq!(updated.membership, MembershipTier::Silver);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_search_by_name_orders_by_last_then_first() {
    let pool = test_pool().await;
    let last_name = format!("Zz{}", unique_suffix());
    let first = create_customer(&pool, &last_name).await;
    let second = create_customer(&pool, &format!("{last_name}b")).await;

    let found = CustomerRepository::new(&pool)
        .search_by_name(&last_name, 10)
        .await
        .expect("search");
    let ids: Vec<_> = found.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

// ============================================================================
// Carts and addresses
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_customer_has_at_most_one_cart() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let customer = create_customer(&pool, "Cart").await;

    let first = carts.get_or_create(customer.id).await.expect("create cart");
    let second = carts.get_or_create(customer.id).await.expect("reuse cart");
    assert_eq!(first.id, second.id);

    let duplicate = sqlx::query("INSERT INTO store.carts (customer_id) VALUES ($1)")
        .bind(customer.id)
        .execute(&pool)
        .await;
    let code = duplicate
        .expect_err("second cart must be rejected")
        .as_database_error()
        .and_then(|e| e.code().map(|c| c.into_owned()));
    assert_eq!(code.as_deref(), Some("23505"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_upserting_an_address_replaces_it() {
    let pool = test_pool().await;
    let addresses = AddressRepository::new(&pool);
    let customer = create_customer(&pool, "Address").await;

    addresses
        .upsert(customer.id, &address("1 First St"))
        .await
        .expect("insert address");
    let replaced = addresses
        .upsert(customer.id, &address("2 Second St"))
        .await
        .expect("replace address");

    assert_eq!(replaced.customer_id, customer.id);
    assert_eq!(replaced.street, "2 Second St");
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM store.addresses WHERE customer_id = $1")
            .bind(customer.id)
            .fetch_one(&pool)
            .await
            .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_cart_item_keeps_price_captured_when_added() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let customer = create_customer(&pool, "Snapshot").await;
    let collection = create_collection(&pool).await;
    let product = create_product(&pool, collection.id, "9.99").await;

    let cart = carts.get_or_create(customer.id).await.expect("cart");
    let item = carts
        .add_item(cart.id, product.id, Quantity::new(2).expect("quantity"))
        .await
        .expect("add item");
    assert_eq!(item.unit_price, product.unit_price);

    storefront_store::db::ProductRepository::new(&pool)
        .update_price(product.id, "11.49".parse().expect("price"))
        .await
        .expect("reprice");

    let items = carts.items(cart.id).await.expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|i| i.unit_price.to_string()).as_deref(), Some("9.99"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_cart_item_quantity_can_change_and_item_can_be_removed() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let customer = create_customer(&pool, "Basket").await;
    let collection = create_collection(&pool).await;
    let product = create_product(&pool, collection.id, "4.00").await;

    let cart = carts.get_or_create(customer.id).await.expect("cart");
    let item = carts
        .add_item(cart.id, product.id, Quantity::ONE)
        .await
        .expect("add item");

    let updated = carts
        .update_quantity(item.id, Quantity::new(5).expect("quantity"))
        .await
        .expect("update quantity");
    assert_eq!(updated.quantity.get(), 5);
    assert_eq!(updated.unit_price, item.unit_price);

    assert!(carts.remove_item(item.id).await.expect("remove"));
    assert!(!carts.remove_item(item.id).await.expect("remove again"));
    assert!(carts.items(cart.id).await.expect("items").is_empty());

    let missing = carts.update_quantity(item.id, Quantity::ONE).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_negative_quantities_are_rejected_by_the_database() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let customer = create_customer(&pool, "Negative").await;
    let collection = create_collection(&pool).await;
    let product = create_product(&pool, collection.id, "1.00").await;

    let cart = carts.get_or_create(customer.id).await.expect("cart");
    let cart_item = carts
        .add_item(cart.id, product.id, Quantity::ONE)
        .await
        .expect("add item");
    let (_, order_items) = OrderRepository::new(&pool)
        .place(
            customer.id,
            &[NewOrderLine {
                product_id: product.id,
                quantity: Quantity::ONE,
            }],
        )
        .await
        .expect("place order");
    let order_item = order_items.first().expect("one item");

    for (table, id) in [
        ("cart_items", cart_item.id.as_i32()),
        ("order_items", order_item.id.as_i32()),
    ] {
        let result = sqlx::query(&format!("UPDATE store.{table} SET quantity = -1 WHERE id = $1"))
            .bind(id)
            .execute(&pool)
            .await;
        let constraint = result
            .expect_err("negative quantity must be rejected")
            .as_database_error()
            .and_then(|e| e.constraint().map(str::to_owned));
        assert_eq!(constraint, Some(format!("{table}_quantity_check")));
    }
}

// ============================================================================
// Customer deletion
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_deleting_customer_removes_cart_and_address() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let addresses = AddressRepository::new(&pool);
    let customer = create_customer(&pool, "Cascade").await;
    let collection = create_collection(&pool).await;
    let product = create_product(&pool, collection.id, "2.00").await;

    let cart = carts.get_or_create(customer.id).await.expect("cart");
    carts
        .add_item(cart.id, product.id, Quantity::ONE)
        .await
        .expect("add item");
    addresses
        .upsert(customer.id, &address("3 Third St"))
        .await
        .expect("address");

    assert!(CustomerRepository::new(&pool).delete(customer.id).await.expect("delete"));

    assert!(carts.get_for_customer(customer.id).await.expect("cart").is_none());
    assert!(carts.items(cart.id).await.expect("items").is_empty());
    assert!(addresses.get(customer.id).await.expect("address").is_none());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_customer_with_orders_cannot_be_deleted() {
    let pool = test_pool().await;
    let customers = CustomerRepository::new(&pool);
    let customer = create_customer(&pool, "Protected").await;
    let collection = create_collection(&pool).await;
    let product = create_product(&pool, collection.id, "7.25").await;

    OrderRepository::new(&pool)
        .place(
            customer.id,
            &[NewOrderLine {
                product_id: product.id,
                quantity: Quantity::ONE,
            }],
        )
        .await
        .expect("place order");

    let result = customers.delete(customer.id).await;
    assert!(
        matches!(result, Err(RepositoryError::Protected(ref c)) if c == "orders_customer_id_fkey"),
        "unexpected result: {result:?}"
    );
    assert!(customers.get(customer.id).await.expect("get").is_some());
}
