use svint::Integer2;
use zeroize::Zeroize;

#[test]
fn zeroize() {
    let mut x = Integer2::from(0xfedc_ba98_7654_3210u64);
    x.zeroize();
    assert!(x.is_zero());
    assert!(x.is_static());

    let mut x = Integer2::from(1u8) << 200;
    assert!(x.is_dynamic());
    x.zeroize();
    assert!(x.is_zero());
    // the allocation is kept, only the contents are wiped
    assert!(x.is_dynamic());
}
