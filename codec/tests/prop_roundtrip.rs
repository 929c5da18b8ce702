use std::collections::VecDeque;

use codec::{deserialize, deserialize_exact, serialize, Decimal};
use proptest::prelude::*;

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u8..=28).prop_map(|(value, scale)| {
        let negative = value < 0;
        Decimal::new(u128::from(value.unsigned_abs()), scale, negative).unwrap_or(Decimal::ZERO)
    })
}

fn bmp_char() -> impl Strategy<Value = char> {
    any::<u16>().prop_filter_map("surrogate", |unit| char::from_u32(u32::from(unit)))
}

proptest! {
    #[test]
    fn integers_round_trip(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<i64>(),
                           e in any::<u16>(), f in any::<u32>(), g in any::<u64>()) {
        let value = (a, b, c, d, e, f, g);
        let bytes = serialize(&value).unwrap();
        prop_assert_eq!(bytes.len(), 1 + 2 + 4 + 8 + 2 + 4 + 8);
        prop_assert_eq!(deserialize_exact::<(i8, i16, i32, i64, u16, u32, u64)>(&bytes).unwrap(), value);
    }

    #[test]
    fn floats_round_trip_bitwise(x in any::<f32>(), y in any::<f64>()) {
        let bytes = serialize(&(x, y)).unwrap();
        let (dx, dy): (f32, f64) = deserialize(&bytes).unwrap();
        prop_assert_eq!(dx.to_bits(), x.to_bits());
        prop_assert_eq!(dy.to_bits(), y.to_bits());
    }

    #[test]
    fn strings_round_trip(text in ".{0,64}", maybe in proptest::option::of(".{0,16}")) {
        let bytes = serialize(&text).unwrap();
        prop_assert_eq!(bytes.len(), 5 + text.len());
        prop_assert_eq!(deserialize_exact::<String>(&bytes).unwrap(), text);
        let bytes = serialize(&maybe).unwrap();
        prop_assert_eq!(deserialize_exact::<Option<String>>(&bytes).unwrap(), maybe);
    }

    #[test]
    fn sequences_round_trip(items in proptest::collection::vec((any::<bool>(), bmp_char()), 0..32),
                            blob in proptest::collection::vec(any::<u8>(), 0..128)) {
        let bytes = serialize(&items).unwrap();
        prop_assert_eq!(deserialize_exact::<Vec<(bool, char)>>(&bytes).unwrap(), items.clone());

        let deque: VecDeque<(bool, char)> = items.into_iter().collect();
        let bytes = serialize(&deque).unwrap();
        prop_assert_eq!(deserialize_exact::<VecDeque<(bool, char)>>(&bytes).unwrap(), deque);

        let bytes = serialize(&blob).unwrap();
        prop_assert_eq!(bytes.len(), 5 + blob.len());
        prop_assert_eq!(deserialize_exact::<Vec<u8>>(&bytes).unwrap(), blob);
    }

    #[test]
    fn decimals_round_trip(values in proptest::collection::vec(decimal_strategy(), 0..8)) {
        let bytes = serialize(&values).unwrap();
        prop_assert_eq!(bytes.len(), 5 + 16 * values.len());
        prop_assert_eq!(deserialize_exact::<Vec<Decimal>>(&bytes).unwrap(), values);
    }

    #[test]
    fn nested_optionals_round_trip(value in proptest::option::of(proptest::option::of(any::<u16>()))) {
        let bytes = serialize(&value).unwrap();
        prop_assert_eq!(deserialize_exact::<Option<Option<u16>>>(&bytes).unwrap(), value);
    }

    #[test]
    fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = deserialize::<Vec<Option<(String, i8)>>>(&bytes);
        let _ = deserialize::<Option<Box<(char, bool, Decimal)>>>(&bytes);
    }
}
