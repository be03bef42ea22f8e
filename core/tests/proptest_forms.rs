use proptest::prelude::*;
use wgutil::language::list_with_tail;
use wgutil::{NumericType, Value, cons, list, parse, read_form, write_form};

// ============================================================================
// Strategies for Generating Value Trees
// ============================================================================

fn atom() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        Just(Value::t()),
        any::<i64>().prop_map(Value::int),
        any::<f64>().prop_map(Value::float),
        "[0-9]{19,30}".prop_map(|digits| Value::Atom(wgutil::AtomType::Number(
            NumericType::parse(&digits).unwrap()
        ))),
        ".*".prop_map(Value::string),
        "[a-z0-9 .#()\\[\\]\";'-]{0,8}".prop_map(|name| Value::symbol(&name)),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    atom().prop_recursive(5, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(list),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::vector),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| cons(a, b)),
            (prop::collection::vec(inner.clone(), 1..4), inner)
                .prop_map(|(items, tail)| list_with_tail(items, tail)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn print_then_parse_is_identity(v in value_tree()) {
        let printed = v.to_string();
        prop_assert_eq!(parse(&printed).unwrap(), v, "printed: {}", printed);
    }

    #[test]
    fn printing_is_canonical(v in value_tree()) {
        let printed = v.to_string();
        prop_assert_eq!(parse(&printed).unwrap().to_string(), printed);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn file_round_trip(v in value_tree()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.el");
        write_form(&v, &path).unwrap();
        prop_assert_eq!(read_form(&path).unwrap(), v);
    }
}
