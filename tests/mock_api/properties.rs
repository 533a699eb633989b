//! Property tests over random operation sequences

use crate::common::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(i64),
    DeleteId(i64),
    DeleteWhere(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0i64..5).prop_map(Op::Create),
        2 => (1i64..20).prop_map(Op::DeleteId),
        1 => (0i64..5).prop_map(Op::DeleteWhere),
    ]
}

proptest! {
    #[test]
    fn prop_index_matches_collection(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let registry = fixture_registry();
        let users = model(&registry, "User");
        let mut created: Vec<Record> = Vec::new();

        for op in ops {
            match op {
                Op::Create(credits) => created.push(users.create([("credits", credits)]).unwrap()),
                Op::DeleteId(id) => {
                    let _ = users.delete(id);
                }
                Op::DeleteWhere(credits) => {
                    users.delete_all_by([("credits", credits)]);
                }
            }
        }

        let all = users.all();
        prop_assert!(users.is_consistent());
        for record in &created {
            // Found by id exactly when present in all()
            let indexed = users.find(record.id()).map(|r| r.same_record(record)).unwrap_or(false);
            prop_assert_eq!(indexed, all.contains(record));
            prop_assert_eq!(record.is_persisted(), all.contains(record));
        }
    }

    #[test]
    fn prop_all_and_where_preserve_order(credits in proptest::collection::vec(0i64..4, 0..30), pick in 0i64..4) {
        let registry = fixture_registry();
        let users = model(&registry, "User");
        seed_users(&registry, &credits);

        let ids: Vec<i64> = users.all().ids().iter().filter_map(Value::as_int).collect();
        let expected: Vec<i64> = (1..=credits.len() as i64).collect();
        prop_assert_eq!(ids, expected);

        let matched: Vec<i64> = users
            .where_([("credits", pick)])
            .ids()
            .iter()
            .filter_map(Value::as_int)
            .collect();
        let expected: Vec<i64> = credits
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == pick)
            .map(|(i, _)| i as i64 + 1)
            .collect();
        prop_assert_eq!(matched, expected);
    }

    #[test]
    fn prop_delete_all_by_removes_exactly_k(credits in proptest::collection::vec(0i64..3, 0..30), pick in 0i64..3) {
        let registry = fixture_registry();
        let users = model(&registry, "User");
        let records = seed_users(&registry, &credits);
        let k = credits.iter().filter(|c| **c == pick).count();

        prop_assert_eq!(users.delete_all_by([("credits", pick)]), k);

        let remaining = users.all();
        prop_assert_eq!(remaining.len(), credits.len() - k);
        for (record, c) in records.iter().zip(&credits) {
            prop_assert_eq!(remaining.contains(record), *c != pick);
        }
    }

    #[test]
    fn prop_repeat_delete_matches_single(count in 1usize..10, target in 1i64..10) {
        let registry = fixture_registry();
        let users = model(&registry, "User");
        seed_users(&registry, &vec![0; count]);

        let _ = users.delete(target);
        let once = users.all().ids();
        let _ = users.delete(target);
        prop_assert_eq!(users.all().ids(), once);
    }

    #[test]
    fn prop_find_or_create_by_is_stable(credits in 0i64..100, name in "[a-z]{1,8}") {
        let registry = fixture_registry();
        let users = model(&registry, "User");
        let attributes = Attributes::new().with("name", name).with("credits", credits);

        let first = users.find_or_create_by(attributes.clone()).unwrap();
        let second = users.find_or_create_by(attributes).unwrap();
        prop_assert!(first.same_record(&second));
        prop_assert_eq!(users.count(), 1);
    }
}
