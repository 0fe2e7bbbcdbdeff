use super::{discriminator, file_scope, seeded_scope};
use crate::prelude::*;

#[test]
fn test_should_get_all_customers() {
    let mut scope = seeded_scope();
    let customers = scope
        .list(Query::<Customer>::builder().order_by_asc("name").build())
        .expect("failed to list customers");

    assert_eq!(customers.len(), 10);
    assert_eq!(customers[0].name, "Artemis Books");
}

#[test]
fn test_should_get_customer_by_primary_key() {
    let mut scope = seeded_scope();
    let customer = scope
        .find::<Customer>(1i64)
        .expect("failed to find customer")
        .expect("should exist");

    assert_eq!(customer.name, "Molunguri, A");
    assert_eq!(customer.state_code, "AL");
}

#[test]
fn test_should_get_none_for_absent_customer() {
    let mut scope = seeded_scope();
    let customer = scope
        .find::<Customer>(9_999i64)
        .expect("failed to find customer");
    assert!(customer.is_none());
}

#[test]
fn test_should_get_customers_using_where() {
    let mut scope = seeded_scope();
    let customers = scope
        .list(
            Query::<Customer>::builder()
                .and_where(Filter::eq("state_code", "WA"))
                .order_by_asc("name")
                .build(),
        )
        .expect("failed to list customers");

    assert_eq!(customers.len(), 2);
    assert!(customers.iter().all(|c| c.state_code == "WA"));
}

#[test]
fn test_should_get_customers_with_state_join() {
    let scope = seeded_scope();
    let rows = scope
        .store()
        .join(
            Join::<Customer, State>::on("state_code", "state_code")
                .order_by_left_asc("name"),
            |customer, state| (customer.name, state.state_name),
        )
        .expect("failed to join");

    // every seeded customer references a seeded state
    assert_eq!(rows.len(), 10);
    let wallace = rows
        .iter()
        .find(|(name, _)| name == "Wallace Distributing")
        .expect("should exist");
    assert_eq!(wallace.1, "Washington");
}

#[test]
fn test_should_get_customers_with_invoices() {
    let scope = seeded_scope();
    let rows = scope
        .store()
        .join(
            Join::<Invoice, Customer>::on("customer_id", "customer_id"),
            |invoice, customer| (customer.name, invoice.invoice_total),
        )
        .expect("failed to join");

    assert_eq!(rows.len(), 6);
    assert!(rows.iter().any(|(name, _)| name == "Molunguri, A"));
}

#[test]
fn test_should_create_customer() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("mmabooks.db");
    let name = discriminator();

    let created_id = {
        let mut scope = file_scope(&path);
        reset_test_data(scope.store()).expect("failed to reset seed data");
        scope.add(Customer {
            customer_id: 0,
            name: name.clone(),
            address: "123 Testing Way".to_string(),
            city: "Fresno".to_string(),
            state_code: "CA".to_string(),
            zip_code: "93711".to_string(),
        });
        assert_eq!(scope.save_changes().expect("failed to save"), 1);

        let created = scope
            .fetch_first(
                Query::<Customer>::builder()
                    .and_where(Filter::eq("name", name.as_str()))
                    .build(),
            )
            .expect("failed to fetch customer")
            .expect("should exist");
        assert!(created.customer_id > 10);
        created.customer_id
    };

    // a new scope observes the committed row
    let mut scope = file_scope(&path);
    let customer = scope
        .find::<Customer>(created_id)
        .expect("failed to find customer")
        .expect("should exist");
    assert_eq!(customer.name, name);
}

#[test]
fn test_should_update_customer_and_revert() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("mmabooks.db");
    let fresh_name = discriminator();

    let mut scope = file_scope(&path);
    reset_test_data(scope.store()).expect("failed to reset seed data");
    let original_name = {
        let customer = scope
            .find::<Customer>(4i64)
            .expect("failed to find customer")
            .expect("should exist");
        let original_name = customer.name.clone();
        customer.name = fresh_name.clone();
        original_name
    };
    assert_eq!(scope.save_changes().expect("failed to save"), 1);

    let mut scope = file_scope(&path);
    {
        let customer = scope
            .find::<Customer>(4i64)
            .expect("failed to find customer")
            .expect("should exist");
        assert_eq!(customer.name, fresh_name);
        customer.name = original_name.clone();
    }
    assert_eq!(scope.save_changes().expect("failed to save"), 1);

    let mut scope = file_scope(&path);
    let customer = scope
        .find::<Customer>(4i64)
        .expect("failed to find customer")
        .expect("should exist");
    assert_eq!(customer.name, original_name);
}

#[test]
fn test_should_delete_customer() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("mmabooks.db");

    let mut scope = file_scope(&path);
    reset_test_data(scope.store()).expect("failed to reset seed data");
    // customer 5 has no invoices
    let customer = scope
        .find::<Customer>(5i64)
        .expect("failed to find customer")
        .expect("should exist")
        .clone();
    scope.remove(&customer).expect("should be tracked");
    assert_eq!(scope.save_changes().expect("failed to save"), 1);

    // gone within the scope and for later scopes
    assert!(
        scope
            .find::<Customer>(5i64)
            .expect("failed to find customer")
            .is_none()
    );
    let mut scope = file_scope(&path);
    assert!(
        scope
            .find::<Customer>(5i64)
            .expect("failed to find customer")
            .is_none()
    );
}
