use proptest::prelude::*;

use pora_types::FieldElement;

proptest! {
    /// Decimal roundtrip: to_decimal -> from_decimal is the identity.
    #[test]
    fn decimal_roundtrip(v in any::<u64>()) {
        let fe = FieldElement::from_u64(v);
        prop_assert_eq!(FieldElement::from_decimal(&fe.to_decimal()).unwrap(), fe);
    }

    /// Big-endian byte roundtrip through the modular decoder.
    #[test]
    fn bytes_roundtrip(v in any::<u64>()) {
        let fe = FieldElement::from_u64(v);
        let bytes = fe.to_bytes_be();
        prop_assert_eq!(bytes.len(), 32);
        prop_assert_eq!(FieldElement::from_be_bytes_mod_order(&bytes), fe);
    }

    /// Serde roundtrip through the canonical decimal-string form.
    #[test]
    fn serde_roundtrip(v in any::<u64>()) {
        let fe = FieldElement::from_u64(v);
        let json = serde_json::to_string(&fe).unwrap();
        prop_assert_eq!(serde_json::from_str::<FieldElement>(&json).unwrap(), fe);
    }

    /// Field addition commutes.
    #[test]
    fn addition_commutes(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (FieldElement::from_u64(a), FieldElement::from_u64(b));
        prop_assert_eq!(a + b, b + a);
    }

    /// Field multiplication distributes over addition.
    #[test]
    fn multiplication_distributes(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
        let (a, b, c) = (
            FieldElement::from_u64(a),
            FieldElement::from_u64(b),
            FieldElement::from_u64(c),
        );
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }

    /// u64 products stay exact: no reduction below 2^128.
    #[test]
    fn small_products_match_integers(a in 0u64..u32::MAX as u64, b in 0u64..u32::MAX as u64) {
        let product = FieldElement::from_u64(a) * FieldElement::from_u64(b);
        prop_assert_eq!(product.to_decimal(), (a as u128 * b as u128).to_string());
    }
}
