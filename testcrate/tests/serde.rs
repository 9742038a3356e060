use svint::{Integer, Integer2};

#[test]
fn serde_round_trip() {
    let x = Integer2::from(-123i32);
    let s = ron::to_string(&x).unwrap();
    assert_eq!(s, "\"-123\"");
    let y: Integer2 = ron::from_str(&s).unwrap();
    assert_eq!(x, y);

    // a value past the static range round-trips too
    let big = Integer2::from(7u8) << 300;
    let s = ron::to_string(&big).unwrap();
    let back: Integer2 = ron::from_str(&s).unwrap();
    assert_eq!(back, big);
    assert!(back.is_dynamic());

    // the encoding is independent of the static size
    let narrow: Integer<1> = ron::from_str(&s).unwrap();
    assert_eq!(narrow.to_string(), big.to_string());

    assert!(ron::from_str::<Integer2>("\"12x\"").is_err());
}
