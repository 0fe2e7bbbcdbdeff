use super::{discriminator, seeded_scope};
use crate::prelude::*;

#[test]
fn test_should_save_nothing_without_changes() {
    let mut scope = seeded_scope();
    assert!(!scope.has_pending_changes());
    assert_eq!(scope.save_changes().expect("failed to save"), 0);
}

#[test]
fn test_should_save_nothing_when_mutation_is_reverted() {
    let mut scope = seeded_scope();
    {
        let product = scope
            .find::<Product>("A4CS")
            .expect("failed to find product")
            .expect("should exist");
        product.on_hand_quantity += 1;
        product.on_hand_quantity -= 1;
    }
    assert!(!scope.has_pending_changes());
    assert_eq!(scope.save_changes().expect("failed to save"), 0);
}

#[test]
fn test_should_shadow_storage_within_scope() {
    let mut scope = seeded_scope();
    {
        let product = scope
            .find::<Product>("A4CS")
            .expect("failed to find product")
            .expect("should exist");
        product.on_hand_quantity = 12_345;
    }

    // a re-read within the scope sees the tracked instance, not the row
    let listed = scope
        .list(
            Query::<Product>::builder()
                .and_where(Filter::eq("product_code", "A4CS"))
                .build(),
        )
        .expect("failed to list products");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].on_hand_quantity, 12_345);

    let found = scope
        .find::<Product>("A4CS")
        .expect("failed to find product")
        .expect("should exist");
    assert_eq!(found.on_hand_quantity, 12_345);
}

#[test]
fn test_should_hide_removed_entities_from_reads() {
    let mut scope = seeded_scope();
    let product = scope
        .find::<Product>("A4CS")
        .expect("failed to find product")
        .expect("should exist")
        .clone();
    scope.remove(&product).expect("should be tracked");

    assert!(
        scope
            .find::<Product>("A4CS")
            .expect("failed to find product")
            .is_none()
    );
    let listed = scope
        .list(
            Query::<Product>::builder()
                .and_where(Filter::eq("product_code", "A4CS"))
                .build(),
        )
        .expect("failed to list products");
    assert!(listed.is_empty());
}

#[test]
fn test_should_collapse_add_then_remove() {
    let mut scope = seeded_scope();
    let code = discriminator();
    scope.add(Product {
        product_code: code.clone(),
        description: "Never persisted".to_string(),
        unit_price: Decimal::from(1),
        on_hand_quantity: 1,
    });
    let phantom = scope
        .find::<Product>(code.as_str())
        .expect("failed to find product")
        .expect("should be tracked")
        .clone();
    scope.remove(&phantom).expect("should be tracked");

    assert_eq!(scope.save_changes().expect("failed to save"), 0);
    assert_eq!(
        scope.store().count(Query::<Product>::default()).unwrap(),
        16
    );
}

#[test]
fn test_should_reject_removing_detached_entities() {
    let mut scope = seeded_scope();
    let detached = Product {
        product_code: "A4CS".to_string(),
        description: "Built by hand, never fetched".to_string(),
        unit_price: Decimal::from(1),
        on_hand_quantity: 1,
    };
    let result = scope.remove(&detached);
    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::Detached {
            table: "products",
            ..
        }))
    ));
}

#[test]
fn test_should_report_duplicate_keys() {
    let mut scope = seeded_scope();
    scope.add(Product {
        product_code: "A4CS".to_string(),
        description: "Clashes with a seeded code".to_string(),
        unit_price: Decimal::from(1),
        on_hand_quantity: 1,
    });
    let result = scope.save_changes();
    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::DuplicateKey {
            table: "products",
            ..
        }))
    ));
}

#[test]
fn test_should_report_unknown_foreign_keys() {
    let mut scope = seeded_scope();
    scope.add(Customer {
        customer_id: 0,
        name: "No such state".to_string(),
        address: "1 Nowhere Lane".to_string(),
        city: "Nowhere".to_string(),
        state_code: "ZZ".to_string(),
        zip_code: "00000".to_string(),
    });
    let result = scope.save_changes();
    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::ReferentialIntegrity {
            table: "customers",
            op: SaveOp::Insert,
            ..
        }))
    ));
}

#[test]
fn test_should_block_deleting_referenced_rows() {
    let mut scope = seeded_scope();
    // customer 1 has invoices
    let customer = scope
        .find::<Customer>(1i64)
        .expect("failed to find customer")
        .expect("should exist")
        .clone();
    scope.remove(&customer).expect("should be tracked");

    let result = scope.save_changes();
    assert!(matches!(
        result,
        Err(Error::Persistence(PersistenceError::ReferentialIntegrity {
            table: "customers",
            op: SaveOp::Delete,
            ..
        }))
    ));
}

#[test]
fn test_should_roll_back_everything_on_failure() {
    let mut scope = seeded_scope();
    let code = discriminator();
    scope.add(Product {
        product_code: code.clone(),
        description: "Valid but doomed".to_string(),
        unit_price: Decimal::from(9),
        on_hand_quantity: 3,
    });
    scope.add(Customer {
        customer_id: 0,
        name: "No such state".to_string(),
        address: "1 Nowhere Lane".to_string(),
        city: "Nowhere".to_string(),
        state_code: "ZZ".to_string(),
        zip_code: "00000".to_string(),
    });

    assert!(scope.save_changes().is_err());

    // the valid insert must not have survived the failed batch
    let persisted = scope
        .store()
        .count(
            Query::<Product>::builder()
                .and_where(Filter::eq("product_code", code.as_str()))
                .build(),
        )
        .expect("failed to count");
    assert_eq!(persisted, 0);
}

#[test]
fn test_should_delete_children_before_parents() {
    let mut scope = seeded_scope();
    // customer 9 is referenced only by invoice 6
    let invoice = scope
        .find::<Invoice>(6i64)
        .expect("failed to find invoice")
        .expect("should exist")
        .clone();
    let customer = scope
        .find::<Customer>(9i64)
        .expect("failed to find customer")
        .expect("should exist")
        .clone();
    scope.remove(&customer).expect("should be tracked");
    scope.remove(&invoice).expect("should be tracked");

    assert_eq!(scope.save_changes().expect("failed to save"), 2);
    assert_eq!(
        scope.store().count(Query::<Invoice>::default()).unwrap(),
        5
    );
    assert_eq!(
        scope.store().count(Query::<Customer>::default()).unwrap(),
        9
    );
}

#[test]
fn test_should_insert_parents_before_children() {
    let mut scope = seeded_scope();
    scope.add(State {
        state_code: "TX".to_string(),
        state_name: "Texas".to_string(),
    });
    scope.add(Customer {
        customer_id: 0,
        name: "Lone Star Books".to_string(),
        address: "500 Congress Avenue".to_string(),
        city: "Austin".to_string(),
        state_code: "TX".to_string(),
        zip_code: "78701".to_string(),
    });

    assert_eq!(scope.save_changes().expect("failed to save"), 2);
}

#[test]
fn test_should_write_back_generated_keys_on_save() {
    let mut scope = seeded_scope();
    let name = discriminator();
    scope.add(Customer {
        customer_id: 0,
        name: name.clone(),
        address: "77 Keyless Road".to_string(),
        city: "Reno".to_string(),
        state_code: "NV".to_string(),
        zip_code: "89502".to_string(),
    });
    scope.save_changes().expect("failed to save");

    // the tracked instance itself must carry the generated key after save;
    // the seeded baseline ends at customer 10, so the store assigns 11
    let tracked = scope
        .get_mut::<Customer>(11i64)
        .expect("should be tracked under the generated key");
    assert_eq!(tracked.customer_id, 11);
    assert_eq!(tracked.name, name);

    let created = scope
        .fetch_first(
            Query::<Customer>::builder()
                .and_where(Filter::eq("name", name.as_str()))
                .build(),
        )
        .expect("failed to fetch customer")
        .expect("should exist");
    assert_eq!(created.customer_id, 11);
}

#[test]
fn test_should_batch_mixed_operations_in_one_save() {
    let mut scope = seeded_scope();
    let code = discriminator();
    scope.add(Product {
        product_code: code.clone(),
        description: "Added alongside other work".to_string(),
        unit_price: "19.95".parse().unwrap(),
        on_hand_quantity: 7,
    });
    {
        let product = scope
            .find::<Product>("CS10")
            .expect("failed to find product")
            .expect("should exist");
        product.on_hand_quantity += 1;
    }
    let customer = scope
        .find::<Customer>(5i64)
        .expect("failed to find customer")
        .expect("should exist")
        .clone();
    scope.remove(&customer).expect("should be tracked");

    assert_eq!(scope.save_changes().expect("failed to save"), 3);
    assert!(!scope.has_pending_changes());
}
