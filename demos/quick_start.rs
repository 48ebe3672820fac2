use domveil::{self_test, Domain, Masked};

fn main() {
    // 1. Split two secrets into order-2 sharings
    let mut a = Masked::<u32>::mask(1000, 2, Domain::Arithmetic).unwrap();
    let mut b = Masked::<u32>::mask(1, 2, Domain::Arithmetic).unwrap();

    // 2. Add them without ever recombining the shares
    let sum = a.arith_add(&mut b).unwrap();
    assert_eq!(sum.unmask(), 1001);

    // 3. Compare them obliviously (full-width mask drives a selector)
    let cond = b.lt(&mut a, true).unwrap();
    assert_eq!(cond.unmask(), u32::MAX);

    assert!(self_test());
    println!("Masked pipeline verified! 🛡️");
}
