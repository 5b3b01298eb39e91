use comparator_core::align::{align_to, cross_correlate, estimate_delay};
use comparator_core::transform::{Fft, InverseFft, SignalTransform};
use comparator_core::{
    MultiDomainComparator, OperationDomain, Signal, SingleDomainComparator, builtin,
};
use num_complex::Complex64;

fn sine(shift: i32, n: i32) -> Signal {
    Signal::Real((0..n).map(|x| f64::from(x + shift).sin()).collect())
}

#[test]
fn sine_delay_is_two() {
    assert_eq!(estimate_delay(&sine(0, 100), &sine(2, 100)), 2);
}

#[test]
fn delay_sign_follows_direction() {
    for shift in [1, 2, 3] {
        assert_eq!(estimate_delay(&sine(0, 100), &sine(shift, 100)), shift as isize);
    }
    // a sharp pulse late in `a` relative to `b`
    let mut a = vec![0.0; 16];
    let mut b = vec![0.0; 16];
    a[9] = 1.0;
    b[4] = 1.0;
    assert_eq!(estimate_delay(&Signal::Real(a), &Signal::Real(b)), 5);
}

#[test]
fn amplitude_does_not_change_the_delay() {
    let a = sine(0, 64);
    let Signal::Real(b) = sine(2, 64) else {
        unreachable!();
    };
    let loud = Signal::Real(b.iter().map(|x| x * 1000.0).collect());
    assert_eq!(estimate_delay(&a, &loud), 2);
}

#[test]
fn complex_signals_align_by_magnitude() {
    let tone = |shift: i32| {
        Signal::Complex(
            (0..64)
                .map(|n| {
                    let t = f64::from(n + shift) * 0.3;
                    Complex64::new(t.cos(), t.sin()) * (1.0 + f64::from((n + shift) % 7))
                })
                .collect(),
        )
    };
    let (aligned, delay) = align_to(&tone(0), &tone(3));
    assert_eq!(delay, 3);
    assert_eq!(aligned.len(), 64);
}

#[test]
fn correlation_length_and_zero_lag() {
    let a: Vec<Complex64> = [1.0, 2.0, 3.0].iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let corr = cross_correlate(&a, &a);
    assert_eq!(corr.len(), 5);
    // zero lag sits at len(b) - 1 and holds the energy
    assert!((corr[2].re - 14.0).abs() < 1e-9);
    assert!(corr.iter().all(|z| z.im.abs() < 1e-9));
}

#[test]
fn fft_round_trip() {
    let x = Signal::Real(vec![0.5, -1.0, 2.0, 4.0, 0.0]);
    let back = InverseFft.apply(&Fft.apply(&x));
    let Signal::Complex(back) = back else {
        panic!("inverse transform returns complex samples");
    };
    for (z, expected) in back.iter().zip([0.5, -1.0, 2.0, 4.0, 0.0]) {
        assert!((z.re - expected).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }
}

#[test]
fn aligned_time_domain_difference_vanishes() {
    let mut c = SingleDomainComparator::time_domain("time");
    c.operators_mut()
        .insert("abs_diff", builtin::operator("abs_diff").unwrap());
    c.products_mut()
        .insert("max", builtin::product("max").unwrap());
    // skip the samples that wrap around after the shift
    c.set_domain(OperationDomain::absolute(2, 100));
    let out = c.compare(&[sine(0, 100), sine(2, 100)], None).unwrap();
    let max = out.product("abs_diff").unwrap().values("max").unwrap();
    let cross = max.descend(&[0, 1, 0]).unwrap().0.as_leaf().unwrap();
    assert!(cross.as_scalar().unwrap() < 1e-12, "{cross:?}");
}

#[test]
fn time_and_frequency_domains_disagree_on_shape_only() {
    let mut multi = MultiDomainComparator::time_freq();
    multi
        .operators_mut()
        .insert("this", builtin::operator("this").unwrap());
    multi
        .products_mut()
        .insert("power", builtin::product("power").unwrap());
    let out = multi.compare(&[sine(0, 32), sine(1, 40)], None).unwrap();
    let (time, freq) = (&out[0].1, &out[1].1);
    assert_eq!(time.operator("this").unwrap().complex_dim(), 1);
    assert_eq!(freq.operator("this").unwrap().complex_dim(), 2);
    for comparison in [time, freq] {
        let this = comparison.operator("this").unwrap();
        assert_eq!(this.len(), 2);
        let first = this.by_path(&[0, 0]).unwrap().node().unwrap();
        assert_eq!(first.as_leaf().map(Vec::len), Some(32));
    }
}
