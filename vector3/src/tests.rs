use super::*;

#[test]
fn test_cross_product_right_handed() {
    let a = Vector3f64::new(1.0, 0.0, 0.0);
    let b = Vector3f64::new(0.0, 1.0, 0.0);

    assert_eq!(a.cross_product(&b), Vector3f64::new(0.0, 0.0, 1.0));
    assert_eq!(b.cross_product(&a), Vector3f64::new(0.0, 0.0, -1.0));
}

#[test]
fn test_norm_and_arithmetic() {
    let a = Vector3f64::new(3.0, 4.0, 0.0);
    let b = Vector3f64::new(1.0, 1.0, 1.0);

    assert_eq!(a.norm2(), 5.0);
    assert_eq!(a.norm_sqr(), 25.0);
    assert_eq!(a - b, Vector3f64::new(2.0, 3.0, -1.0));
    assert_eq!(2.0 * b, b * 2.0);
    assert_eq!(-b + b, Vector3f64::zeros());

    let mut c = a;
    c += b;
    assert_eq!(c.to_array(), [4.0, 5.0, 1.0]);
}
