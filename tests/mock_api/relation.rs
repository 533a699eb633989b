//! Relation chaining over class collections

use crate::common::*;

#[test]
fn test_all_preserves_insertion_order() {
    let registry = fixture_registry();
    seed_users(&registry, &[3, 1, 2]);

    let all = model(&registry, "User").all();
    assert_eq!(all.ids(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(all.model(), Some("User"));
}

#[test]
fn test_relation_is_a_snapshot() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    seed_users(&registry, &[1, 1]);

    let before = users.where_([("credits", 1)]);
    users.create([("credits", 1)]).unwrap();

    assert_eq!(before.len(), 2);
    assert_eq!(users.where_([("credits", 1)]).len(), 3);
}

#[test]
fn test_all_where_matches_where() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    seed_users(&registry, &[4, 2, 4]);

    assert_eq!(users.all_where([("credits", 4)]).ids(), users.where_([("credits", 4)]).ids());
}

#[test]
fn test_membership_condition() {
    let registry = fixture_registry();
    seed_users(&registry, &[1, 2, 3, 4]);

    let picked = model(&registry, "User")
        .where_([("credits", Value::Array(vec![Value::Int(2), Value::Int(4)]))]);
    assert_eq!(picked.pluck("credits"), vec![Value::Int(2), Value::Int(4)]);
}

#[test]
fn test_chain_order_limit_sum() {
    let registry = fixture_registry();
    seed_users(&registry, &[5, 9, 1, 7]);

    let top = model(&registry, "User")
        .all()
        .where_not([("credits", 1)])
        .order_by_desc("credits")
        .limit(2);

    assert_eq!(top.pluck("credits"), vec![Value::Int(9), Value::Int(7)]);
    assert_eq!(top.sum("credits"), Value::Int(16));
    assert_eq!(top.first().unwrap().id(), Value::Int(2));
}

#[test]
fn test_relation_find_within_subset() {
    let registry = fixture_registry();
    seed_users(&registry, &[1, 2]);
    let subset = model(&registry, "User").where_([("credits", 2)]);

    assert!(subset.find(2).is_ok());
    assert!(subset.find(1).unwrap_err().is_not_found());
}

#[test]
fn test_relation_delete_all() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    seed_users(&registry, &[1, 2, 1]);

    let ones = users.where_([("credits", 1)]);
    assert_eq!(ones.delete_all(&registry).unwrap(), 2);
    // Already-deleted records are skipped
    assert_eq!(ones.delete_all(&registry).unwrap(), 0);
    assert_eq!(users.count(), 1);
}

#[test]
fn test_relation_find_agrees_with_model_find() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let record = users.create(Attributes::new()).unwrap();

    // Stringified keys: "1" names the record with id 1 in both lookups
    assert!(users.find("1").unwrap().same_record(&record));
    assert!(users.all().find("1").unwrap().same_record(&record));
    assert!(users.all().find(1).unwrap().same_record(&record));
}

#[test]
fn test_relation_find_with_typed_keys() {
    let registry = fixture_registry_with(MockConfig {
        identity_keys: IdentityKeyMode::Typed,
        ..MockConfig::default()
    });
    let users = model(&registry, "User");
    let record = users.create(Attributes::new()).unwrap();

    assert!(users.find("1").unwrap_err().is_not_found());
    assert!(users.all().find("1").unwrap_err().is_not_found());
    assert!(users.all().find(1).unwrap().same_record(&record));
}
