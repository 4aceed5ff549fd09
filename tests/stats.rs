use panel_growth::math::stats::{mean, ols_line, ols_on_index};

#[test]
fn mean_basic() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
}

#[test]
fn ols_recovers_exact_line() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [3.0, 5.0, 7.0, 9.0, 11.0];
    let line = ols_line(&x, &y).unwrap();
    assert!((line.slope - 2.0).abs() < 1e-12);
    assert!((line.intercept - 1.0).abs() < 1e-12);
    assert!((line.at(6.0) - 13.0).abs() < 1e-12);
}

#[test]
fn ols_two_points() {
    let line = ols_on_index(&[4.0, 1.0]).unwrap();
    assert!((line.slope + 3.0).abs() < 1e-12);
    assert!((line.intercept - 4.0).abs() < 1e-12);
}

#[test]
fn ols_rejects_degenerate_input() {
    assert!(ols_line(&[1.0], &[2.0]).is_none());
    assert!(ols_line(&[1.0, 1.0], &[2.0, 3.0]).is_none());
    assert!(ols_line(&[1.0, 2.0], &[2.0]).is_none());
    assert!(ols_line(&[1.0, 2.0], &[f64::NAN, 3.0]).is_none());
}

#[test]
fn ols_flat_series_has_zero_slope() {
    let line = ols_on_index(&[7.0; 6]).unwrap();
    assert_eq!(line.slope, 0.0);
    assert_eq!(line.intercept, 7.0);
}
