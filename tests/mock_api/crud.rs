//! Class-level CRUD surface

use crate::common::*;

#[test]
fn test_create_then_find_returns_same_record() {
    let registry = fixture_registry();
    let users = model(&registry, "User");

    let created = users.create([("name", "Alice")]).unwrap();
    let found = users.find(created.id()).unwrap();

    assert!(found.same_record(&created));
    assert_eq!(found.read_attribute("name"), Value::from("Alice"));
}

#[test]
fn test_find_missing_id_raises_not_found() {
    let registry = fixture_registry();
    let err = model(&registry, "User").find(99).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Couldn't find User with 'id'=99");
}

#[test]
fn test_find_by_signals_absence_with_none() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    seed_users(&registry, &[1, 2, 2]);

    assert_eq!(users.find_by([("credits", 2)]).unwrap().id(), Value::Int(2));
    assert!(users.find_by([("credits", 7)]).is_none());
}

#[test]
fn test_class_delete_removes_from_collection_and_index() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let records = seed_users(&registry, &[1, 2, 3]);

    let deleted = users.delete(2).unwrap();
    assert!(deleted.same_record(&records[1]));
    assert!(users.find(2).unwrap_err().is_not_found());
    assert_eq!(users.all().ids(), vec![Value::Int(1), Value::Int(3)]);
    assert!(users.is_consistent());
}

#[test]
fn test_delete_twice_is_a_noop() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let records = seed_users(&registry, &[1, 2]);

    assert!(records[0].delete(&registry).unwrap());
    assert!(!records[0].delete(&registry).unwrap());

    // The unrelated record survives
    assert_eq!(users.count(), 1);
    assert!(users.find(2).unwrap().same_record(&records[1]));
}

#[test]
fn test_find_or_create_by_is_idempotent() {
    let registry = fixture_registry();
    let users = model(&registry, "User");

    let first = users.find_or_create_by([("name", "Bob")]).unwrap();
    let second = users.find_or_create_by([("name", "Bob")]).unwrap();

    assert!(first.same_record(&second));
    assert_eq!(users.count(), 1);
}

#[test]
fn test_find_or_initialize_by_returns_existing_record() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let existing = users.create([("name", "Carol")]).unwrap();

    let found = users.find_or_initialize_by([("name", "Carol")]).unwrap();
    assert!(found.same_record(&existing));
    assert!(found.is_persisted());
    assert_eq!(users.count(), 1);

    // A later create gets the next id, so none was allocated on the hit
    assert_eq!(users.create(Attributes::new()).unwrap().id(), Value::Int(2));
}

#[test]
fn test_find_or_initialize_by_miss_is_unsaved() {
    let registry = fixture_registry();
    let users = model(&registry, "User");

    let built = users.find_or_initialize_by([("name", "Dave")]).unwrap();
    assert!(built.is_new_record());
    assert!(built.id().is_null());
    assert_eq!(built.read_attribute("name"), Value::from("Dave"));
    assert_eq!(users.count(), 0);
}

#[test]
fn test_destroy_by_id() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let records = seed_users(&registry, &[1, 2]);

    assert!(users.destroy(1).unwrap().same_record(&records[0]));
    assert!(users.destroy(1).unwrap_err().is_not_found());
    assert_eq!(users.all().ids(), vec![Value::Int(2)]);
    assert!(users.is_consistent());
}

#[test]
fn test_destroy_all_by_conditions() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let records = seed_users(&registry, &[3, 4, 3]);

    assert_eq!(users.destroy_all_by([("credits", 3)]), 2);
    assert_eq!(users.destroy_all_by([("credits", 3)]), 0);
    assert_eq!(users.all().ids(), vec![records[1].id()]);
}

#[test]
fn test_create_past_max_id_fails_without_panic() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    users.create([("id", Value::Int(i64::MAX))]).unwrap();

    let err = users.create(Attributes::new()).unwrap_err();
    assert!(matches!(err, Error::IdsExhausted { ref model } if model == "User"));
    assert_eq!(users.count(), 1);
    assert!(users.is_consistent());
}

#[test]
fn test_delete_all_by_conditions() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    seed_users(&registry, &[5, 1, 5, 2, 5]);

    assert_eq!(users.delete_all_by([("credits", 5)]), 3);
    assert_eq!(users.all().pluck("credits"), vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(users.destroy_all(), 2);
    assert!(users.all().is_empty());
}

#[test]
fn test_stringified_ids_collide_and_overwrite() {
    let registry = fixture_registry();
    let users = model(&registry, "User");

    users.create([("id", 1)]).unwrap();
    let text = users.create([("id", "1")]).unwrap();

    // Both live in the collection; the index points at the later one
    assert_eq!(users.count(), 2);
    assert!(users.find(1).unwrap().same_record(&text));

    // Removing the winner re-exposes the displaced record
    text.delete(&registry).unwrap();
    assert_eq!(users.find(1).unwrap().id(), Value::Int(1));
    assert!(users.is_consistent());
}

#[test]
fn test_typed_ids_do_not_collide() {
    let registry = fixture_registry_with(MockConfig {
        identity_keys: IdentityKeyMode::Typed,
        ..MockConfig::default()
    });
    let users = model(&registry, "User");

    let int = users.create([("id", 1)]).unwrap();
    let text = users.create([("id", "1")]).unwrap();

    assert!(users.find(1).unwrap().same_record(&int));
    assert!(users.find("1").unwrap().same_record(&text));
}

#[test]
fn test_reject_policy_refuses_duplicate() {
    let registry = fixture_registry_with(MockConfig {
        duplicate_ids: DuplicateIdPolicy::Reject,
        ..MockConfig::default()
    });
    let users = model(&registry, "User");
    users.create([("id", 3)]).unwrap();

    let err = users.create([("id", 3)]).unwrap_err();
    assert!(matches!(err, Error::DuplicateId { ref model, .. } if model == "User"));
    assert_eq!(users.count(), 1);
}

#[test]
fn test_update_writes_and_marks_dirty() {
    let registry = fixture_registry();
    let users = model(&registry, "User");
    let record = users.create([("credits", 1)]).unwrap();
    let before = users.generation();

    record
        .update(&registry, &Attributes::from([("credits", 4)]))
        .unwrap();
    assert_eq!(record.read_attribute("credits"), Value::Int(4));
    assert_eq!(users.generation(), before + 1);
}

#[test]
fn test_persisted_id_cannot_change() {
    let registry = fixture_registry();
    let record = model(&registry, "User").create(Attributes::new()).unwrap();

    let err = record.write_attribute("id", Value::Int(50)).unwrap_err();
    assert!(matches!(err, Error::ImmutableId { .. }));
}

#[test]
fn test_unknown_attribute_rejected_when_strict() {
    let registry = fixture_registry();
    let err = model(&registry, "User").create([("age", 30)]).unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute { ref attribute, .. } if attribute == "age"));
}
