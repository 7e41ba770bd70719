//! End-to-end integration tests for FlexiFit.

use approx::assert_abs_diff_eq;
use flexifit::{forms, FitContext, FlexiFit, FlexiFitError, ModelFunction};
use ndarray::{array, Array1};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// f(x, c0, c1, c2) = c0 * exp(-c1 * x) + c2
fn decay_model() -> ModelFunction {
    ModelFunction::new(["c0", "c1", "c2"], |x, p| {
        let (c0, c1, c2) = (p[0], p[1], p[2]);
        Ok(x.mapv(|xv| c0 * (-c1 * xv).exp() + c2))
    })
}

fn decay_samples(n: usize) -> (Array1<f64>, Array1<f64>) {
    let xdata = Array1::linspace(0.0, 4.0, n);
    let ydata = xdata.mapv(|xv| 2.5 * (-1.3_f64 * xv).exp() + 0.5);
    (xdata, ydata)
}

#[test]
fn exact_recovery_with_fixed_offset() {
    let (xdata, ydata) = decay_samples(50);

    let fit = FlexiFit::new(
        decay_model(),
        FitContext::builder()
            .free(["c0", "c1"])
            .fix("c2", 0.5)
            .initial("c0", 2.0)
            .initial("c1", 1.0)
            .lower("c0", 0.0)
            .upper("c0", 5.0)
            .lower("c1", 0.0)
            .upper("c1", 3.0),
        xdata.clone(),
        ydata.clone(),
    )
    .unwrap();

    assert_abs_diff_eq!(fit.values()[0], 2.5, epsilon = 1e-4);
    assert_abs_diff_eq!(fit.values()[1], 1.3, epsilon = 1e-4);
    assert_eq!(fit.covariance().shape(), &[2, 2]);
    assert!(fit.report().cost < 1e-8);

    assert_eq!(fit.value("c0"), Some(fit.values()[0]));
    assert_eq!(fit.value("c2"), None);

    // The fitted model reproduces the noise-free data.
    let y = fit.predict(&xdata).unwrap();
    for (a, b) in y.iter().zip(ydata.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
    }
}

#[test]
fn noisy_fit_pins_decay_rate_at_its_upper_bound() {
    let (xdata, clean) = decay_samples(50);

    let mut rng = ChaCha8Rng::seed_from_u64(1729);
    let noise = Normal::new(0.0, 0.2).unwrap();
    let ydata = clean.mapv(|y| y + noise.sample(&mut rng));

    let fit = FlexiFit::new(
        decay_model(),
        FitContext::builder()
            .free(["c0", "c1"])
            .fix("c2", 0.35015434)
            .initial("c0", 2.0)
            .initial("c1", 1.0)
            .lower("c0", 0.0)
            .lower("c1", 0.0)
            .upper("c0", 3.0)
            .upper("c1", 1.0),
        xdata,
        ydata,
    )
    .unwrap();

    // The offset is pinned below its true value, so the decay rate is
    // driven into its upper bound; the reference result for this scenario
    // is values close to [2.437, 1.0].
    let c0 = fit.values()[0];
    let c1 = fit.values()[1];
    assert!((2.0..=3.0).contains(&c0), "c0 = {}", c0);
    assert!(c1 > 0.95 && c1 <= 1.0 + 1e-9, "c1 = {}", c1);

    let covariance = fit.covariance();
    assert_eq!(covariance.shape(), &[2, 2]);
    assert!(covariance.iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(covariance[[0, 1]], covariance[[1, 0]], epsilon = 1e-10);
    assert!(covariance[[0, 0]] > 0.0);
    assert!(covariance[[1, 1]] > 0.0);

    let report = fit.report();
    assert!(report.success);
    assert!(report.nfev > 0);
    assert!(report.reduced_chi_square.is_finite());
    assert!(report.reduced_chi_square > 0.0);
    assert!(report.standard_errors.contains_key("c0"));
    assert!(report.standard_errors.contains_key("c1"));
}

#[test]
fn free_order_governs_result_order() {
    let (xdata, ydata) = decay_samples(40);

    // Free list deliberately reversed relative to the declaration order.
    let fit = FlexiFit::new(
        decay_model(),
        FitContext::builder()
            .free(["c1", "c0"])
            .fix("c2", 0.5)
            .initial("c1", 1.0)
            .initial("c0", 2.0),
        xdata,
        ydata,
    )
    .unwrap();

    assert_abs_diff_eq!(fit.values()[0], 1.3, epsilon = 1e-4);
    assert_abs_diff_eq!(fit.values()[1], 2.5, epsilon = 1e-4);
    assert_eq!(fit.value("c1"), Some(fit.values()[0]));
    assert_eq!(fit.value("c0"), Some(fit.values()[1]));
}

#[test]
fn all_fixed_fit_skips_the_optimizer() {
    let (xdata, ydata) = decay_samples(30);

    let fit = FlexiFit::new(
        decay_model(),
        FitContext::builder()
            .fix("c0", 2.5)
            .fix("c1", 1.3)
            .fix("c2", 0.5),
        xdata.clone(),
        ydata,
    )
    .unwrap();

    assert!(fit.values().is_empty());
    assert_eq!(fit.covariance().shape(), &[0, 0]);

    let report = fit.report();
    assert!(report.success);
    assert!(report.cost < 1e-12);
    assert!(report.standard_errors.is_empty());

    // predict still works with every parameter fixed
    let y = fit.predict(&xdata).unwrap();
    assert_abs_diff_eq!(y[0], 3.0, epsilon = 1e-12);
}

#[test]
fn fitting_a_registered_form() {
    let model = forms::model("single power law", &["c0", "c1"]).unwrap();
    let xdata: Array1<f64> = Array1::linspace(0.5, 2.0, 30);
    let ydata = xdata.mapv(|xv| 1.7 * xv.powf(1.5));

    let fit = FlexiFit::new(
        model,
        FitContext::builder().free(["c0", "c1"]),
        xdata,
        ydata,
    )
    .unwrap();

    assert_abs_diff_eq!(fit.values()[0], 1.7, epsilon = 1e-4);
    assert_abs_diff_eq!(fit.values()[1], 1.5, epsilon = 1e-4);
}

#[test]
fn optimizer_failure_surfaces_as_convergence_error() {
    let model = ModelFunction::new(["c0"], |_x, _p| {
        Err(FlexiFitError::FunctionEvaluation(
            "synthetic failure".to_string(),
        ))
    });

    let err = FlexiFit::new(
        model,
        FitContext::builder().free(["c0"]),
        Array1::linspace(0.0, 1.0, 10),
        Array1::zeros(10),
    )
    .unwrap_err();

    assert!(matches!(err, FlexiFitError::Convergence(_)));
}

#[test]
fn initial_guess_outside_bounds_is_rejected() {
    let (xdata, ydata) = decay_samples(20);

    let err = FlexiFit::new(
        decay_model(),
        FitContext::builder()
            .free(["c0", "c1"])
            .fix("c2", 0.5)
            .initial("c0", 10.0)
            .lower("c0", 0.0)
            .upper("c0", 3.0)
            .initial("c1", 1.0),
        xdata,
        ydata,
    )
    .unwrap_err();

    assert!(matches!(err, FlexiFitError::Bounds(_)));
}

#[test]
fn underdetermined_fit_is_rejected() {
    let err = FlexiFit::new(
        decay_model(),
        FitContext::builder().free(["c0", "c1"]).fix("c2", 0.5),
        array![1.0],
        array![2.0],
    )
    .unwrap_err();

    assert!(matches!(err, FlexiFitError::DimensionMismatch(_)));
}

#[test]
fn mismatched_data_lengths_are_rejected() {
    let err = FlexiFit::new(
        decay_model(),
        FitContext::builder().free(["c0", "c1"]).fix("c2", 0.5),
        array![0.0, 1.0, 2.0],
        array![0.0, 1.0],
    )
    .unwrap_err();

    assert!(matches!(err, FlexiFitError::DimensionMismatch(_)));
}

#[test]
fn invalid_partition_aborts_before_fitting() {
    let (xdata, ydata) = decay_samples(20);

    let err = FlexiFit::new(
        decay_model(),
        FitContext::builder().free(["c0", "c1"]), // c2 unassigned
        xdata,
        ydata,
    )
    .unwrap_err();

    assert!(matches!(err, FlexiFitError::Partition(_)));
}
