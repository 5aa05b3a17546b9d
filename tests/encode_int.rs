use bvon::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode_i64(i in proptest::num::i64::ANY) {
        let value = Bvon::from(i);
        let enc = serialize(&value).unwrap();

        let dec = deserialize(&enc).ok();

        if dec != Some(value.clone()) {
            panic!("tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", value, enc, dec)
        }
    }

    #[test]
    fn narrow_integers_use_int32(i in -0x8000_0000i64..0x8000_0000i64) {
        let enc = serialize(&Bvon::from(i)).unwrap();
        prop_assert_eq!(enc[0], 0x2);
        prop_assert_eq!(enc.len(), 5);
    }

    #[test]
    fn wide_integers_use_int64(i in proptest::num::i64::ANY.prop_filter(
        "outside 32-bit range",
        |i| *i < -0x8000_0000i64 || *i >= 0x8000_0000i64,
    )) {
        let enc = serialize(&Bvon::from(i)).unwrap();
        prop_assert_eq!(enc[0], 0x3);
        prop_assert_eq!(enc.len(), 9);
    }

    #[test]
    fn add_matches_native_within_range(a in proptest::num::i64::ANY, b in proptest::num::i64::ANY) {
        if let Some(sum) = a.checked_add(b) {
            prop_assert_eq!(Int64::from(a).add(Int64::from(b)), Int64::from(sum));
        }
    }

    #[test]
    fn subtract_and_multiply_wrap_like_native(a in proptest::num::i64::ANY, b in proptest::num::i64::ANY) {
        prop_assert_eq!(Int64::from(a).subtract(Int64::from(b)).to_i64(), a.wrapping_sub(b));
        prop_assert_eq!(Int64::from(a).multiply(Int64::from(b)).to_i64(), a.wrapping_mul(b));
    }

    #[test]
    fn divide_matches_native(a in proptest::num::i64::ANY, b in proptest::num::i64::ANY) {
        prop_assume!(b != 0);
        let q = Int64::from(a).divide(Int64::from(b)).unwrap();
        let r = Int64::from(a).remainder(Int64::from(b)).unwrap();
        prop_assert_eq!(q.to_i64(), a.wrapping_div(b));
        prop_assert_eq!(r.to_i64(), a.wrapping_rem(b));
    }

    #[test]
    fn unsigned_divide_matches_native(a in proptest::num::u64::ANY, b in proptest::num::u64::ANY) {
        prop_assume!(b != 0);
        let q = Int64::from(a).to_unsigned().divide(Int64::from(b).to_unsigned()).unwrap();
        prop_assert_eq!(q.to_i64() as u64, a / b);
    }

    #[test]
    fn radix_strings_parse_back(i in proptest::num::i64::ANY, radix in 2u32..=36) {
        let rendered = Int64::from(i).to_string_radix(radix).unwrap();
        let parsed = Int64::from_str_radix(&rendered, radix, false).unwrap();
        prop_assert_eq!(parsed.to_i64(), i);
    }

    #[test]
    fn comparison_matches_native(a in proptest::num::i64::ANY, b in proptest::num::i64::ANY) {
        prop_assert_eq!(Int64::from(a).compare(Int64::from(b)), a.cmp(&b));
    }

    #[test]
    fn int64_wire_round_trip(i in proptest::num::i64::ANY) {
        let value = Bvon::Int64(Int64::from(i));
        let enc = serialize(&value).unwrap();
        let dec = deserialize(&enc).unwrap();
        prop_assert_eq!(dec.to_int64().unwrap().to_i64(), i);
    }
}

#[test]
fn min_value_divided_by_negative_one() {
    assert_eq!(
        Int64::MIN_VALUE.divide(Int64::NEG_ONE).unwrap(),
        Int64::MIN_VALUE
    );
}

#[test]
fn decimal_string_round_trip_at_the_edges() {
    for text in &[
        "0",
        "1",
        "-1",
        "9223372036854775807",
        "-9223372036854775808",
    ] {
        let parsed: Int64 = text.parse().unwrap();
        assert_eq!(&parsed.to_string(), text);
    }
}
