//! Stubbed instance methods and registry lifecycle

use crate::common::*;

#[test]
fn test_stub_inherited_by_child() {
    let registry = fixture_registry();
    model(&registry, "User").stub_method("display_name", |record, _| {
        Ok(Value::from(format!("user #{}", record.id())))
    });
    let child = model(&registry, "ChildModel").create(Attributes::new()).unwrap();

    let shown = child.call_mock_method(&registry, "display_name", &[]).unwrap();
    assert_eq!(shown, Value::from("user #1"));
}

#[test]
fn test_stub_receives_arguments() {
    let registry = fixture_registry();
    model(&registry, "User").stub_method("add_credits", |record, args| {
        let current = record.read_attribute("credits").as_int().unwrap_or(0);
        let extra = args.first().and_then(Value::as_int).unwrap_or(0);
        record.write_attribute("credits", Value::Int(current + extra))?;
        Ok(Value::Null)
    });
    let user = model(&registry, "User").create([("credits", 2)]).unwrap();

    user.call_mock_method(&registry, "add_credits", &[Value::Int(3)]).unwrap();
    assert_eq!(user.read_attribute("credits"), Value::Int(5));
}

#[test]
fn test_unstubbed_method_fails() {
    let registry = fixture_registry();
    let user = model(&registry, "User").create(Attributes::new()).unwrap();

    let err = user.call_mock_method(&registry, "charge", &[]).unwrap_err();
    assert_eq!(
        err,
        Error::NotStubbed {
            model: "User".to_string(),
            method: "charge".to_string(),
        }
    );
}

#[test]
fn test_reset_all_isolates_runs() {
    let registry = fixture_registry();
    define_by_credits(&registry);
    seed_users(&registry, &[1, 2]);
    model(&registry, "User").stub_method("noop", |_, _| Ok(Value::Null));

    registry.reset_all();

    let users = model(&registry, "User");
    assert_eq!(users.count(), 0);
    assert!(!users.has_stubbed_method("noop"));
    assert!(users.has_scope("by_credits"));
    assert_eq!(users.create(Attributes::new()).unwrap().id(), Value::Int(1));
    assert_eq!(registry.names(), vec!["Account", "ChildModel", "User"]);
}
