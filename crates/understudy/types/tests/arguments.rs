//! Property tests: the argument store answers the same by name and by
//! position, and its outputs projection keeps exactly the output bindings.

use std::sync::Arc;

use proptest::prelude::*;
use understudy_types::{
    ArgumentError, Arguments, MethodDescriptor, ParameterDirection, ParameterInfo, Parameters,
    TypeInfo, Value,
};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_direction() -> impl Strategy<Value = ParameterDirection> {
    prop_oneof![
        Just(ParameterDirection::In),
        Just(ParameterDirection::Ref),
        Just(ParameterDirection::Out),
        Just(ParameterDirection::RefReturn),
    ]
}

/// A parameter list with distinct names and one `i64` value per binding.
fn arb_bindings() -> impl Strategy<Value = (Vec<ParameterInfo>, Vec<i64>)> {
    prop::collection::vec((arb_direction(), any::<i64>()), 0..10).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (direction, value))| {
                (
                    ParameterInfo::new(format!("p{i}"), TypeInfo::of::<i64>(), direction),
                    value,
                )
            })
            .unzip()
    })
}

fn store(params: Vec<ParameterInfo>, values: &[i64]) -> Arguments {
    let parameters = Arc::new(Parameters::new(params).unwrap());
    let values = values.iter().map(|v| Some(Value::new(*v))).collect();
    Arguments::new("f", parameters, values).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every binding reads the same through its name and its position.
    #[test]
    fn name_and_position_agree((params, values) in arb_bindings()) {
        let args = store(params, &values);
        for (position, expected) in values.iter().enumerate() {
            let name = args.name_of(position).unwrap().to_string();
            prop_assert_eq!(args.index_of(&name), Some(position));
            prop_assert_eq!(args.get_typed::<i64>(position).unwrap(), *expected);
            prop_assert_eq!(args.get_typed::<i64>(name.as_str()).unwrap(), *expected);
        }
    }

    /// The outputs store holds the ref, out and ref-return bindings in
    /// declaration order, renumbered from zero.
    #[test]
    fn outputs_hold_exactly_the_output_bindings((params, values) in arb_bindings()) {
        let expected: Vec<(String, i64)> = params
            .iter()
            .zip(&values)
            .filter(|(p, _)| p.direction.is_output())
            .map(|(p, v)| (p.name.clone(), *v))
            .collect();

        let outputs = store(params, &values).outputs();
        prop_assert_eq!(outputs.len(), expected.len());
        for (position, (name, value)) in expected.iter().enumerate() {
            prop_assert_eq!(outputs.name_of(position), Some(name.as_str()));
            prop_assert_eq!(outputs.get_typed::<i64>(position).unwrap(), *value);
            prop_assert_eq!(outputs.get_typed::<i64>(name.as_str()).unwrap(), *value);
        }
    }

    /// Anything but exactly one value per parameter is rejected.
    #[test]
    fn cardinality_is_enforced(declared in 0usize..6, supplied in 0usize..6) {
        let mut builder = MethodDescriptor::builder("f");
        for i in 0..declared {
            builder = builder.input(format!("a{i}"), TypeInfo::of::<i64>());
        }
        let method = builder.build().unwrap();
        let result = Arguments::new(
            method.qualified_name(),
            method.parameters().clone(),
            (0..supplied).map(|i| Some(Value::new(i as i64))).collect(),
        );
        if declared == supplied {
            prop_assert!(result.is_ok());
        } else {
            let is_cardinality = matches!(
                result,
                Err(ArgumentError::Cardinality { ref member, .. }) if member == "f"
            );
            prop_assert!(is_cardinality);
        }
    }
}

#[test]
fn typed_access_distinguishes_null_and_mismatch() {
    let params = vec![
        ParameterInfo::input("text", TypeInfo::of::<String>()),
        ParameterInfo::input("missing", TypeInfo::nullable::<i32>()),
    ];
    let parameters = Arc::new(Parameters::new(params).unwrap());
    let values = vec![Some(Value::new(String::from("12"))), None];
    let args = Arguments::new("parse", parameters, values).unwrap();

    assert!(matches!(
        args.get_typed::<i32>("text"),
        Err(ArgumentError::TypeMismatch { .. })
    ));
    assert!(matches!(
        args.get_typed::<i32>("missing"),
        Err(ArgumentError::NullValue { .. })
    ));
    assert_eq!(args.get_or_default::<i32>("missing").unwrap(), 0);
    assert_eq!(args.get_nullable::<i32>("missing").unwrap(), None);
}
