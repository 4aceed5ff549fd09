use panel_growth::forecast::{ForecastOptions, forecast_panel};
use panel_growth::panel::Panel;

fn panel() -> Panel {
    Panel::from_rows(
        2018,
        [
            ("Flat", vec![5.0, 5.0, 5.0, 5.0, 5.0]),
            ("Rising", vec![100.0, 104.0, 103.0, 109.0, 115.0]),
        ],
    )
    .unwrap()
}

#[test]
fn extends_every_entity_past_history() {
    let opts = ForecastOptions {
        horizon: 4,
        ..Default::default()
    };
    let batch = forecast_panel(&panel(), &opts, 1).unwrap();
    let ext = &batch.extended;
    assert_eq!(ext.history_end(), 2022);
    assert_eq!(ext.first_year(), 2018);
    assert_eq!(ext.last_year(), 2026);
    assert_eq!(ext.forecast_years(), &[2023, 2024, 2025, 2026]);
    assert!(batch.excluded.is_empty());
    assert_eq!(batch.params.len(), 2);

    // history is carried over untouched
    assert_eq!(ext.value("Rising", 2020), Some(103.0));
    for year in 2023..=2026 {
        assert!(ext.value("Rising", year).is_some());
        let flat = ext.value("Flat", year).unwrap();
        assert!((flat - 5.0).abs() < 1e-9);
    }
}

#[test]
fn failed_entity_is_reported_with_empty_cells() {
    let opts = ForecastOptions {
        horizon: 3,
        max_iter: 1,
        ..Default::default()
    };
    let batch = forecast_panel(&panel(), &opts, 0).unwrap();
    assert_eq!(batch.excluded.len(), 1);
    let failed = &batch.excluded[0];
    assert_eq!(failed.entity, "Rising");
    assert_eq!(failed.reason.kind(), "non_convergence");
    assert!(batch.is_excluded("Rising"));
    assert!(!batch.is_excluded("Flat"));

    let ext = &batch.extended;
    assert_eq!(ext.value("Rising", 2022), Some(115.0));
    for year in ext.forecast_years() {
        assert_eq!(ext.value("Rising", *year), None);
        assert!(ext.value("Flat", *year).is_some());
    }
    assert!(!batch.params.contains_key("Rising"));
}

#[test]
fn result_does_not_depend_on_thread_count() {
    let opts = ForecastOptions::default();
    let one = forecast_panel(&panel(), &opts, 1).unwrap();
    let many = forecast_panel(&panel(), &opts, 4).unwrap();
    assert_eq!(one.extended, many.extended);
    assert_eq!(one.params, many.params);
}

#[test]
fn short_history_is_excluded_not_fatal() {
    let panel = Panel::from_rows(2024, [("A", vec![1.0]), ("B", vec![2.0])]).unwrap();
    let batch = forecast_panel(&panel, &ForecastOptions::default(), 1).unwrap();
    assert_eq!(batch.excluded.len(), 2);
    assert!(
        batch
            .excluded
            .iter()
            .all(|e| e.reason.kind() == "insufficient_history")
    );
    assert_eq!(batch.extended.forecast_years().len(), 12);
}

#[test]
fn horizon_past_last_representable_year_is_rejected() {
    let panel = Panel::from_rows(i32::MAX - 2, [("A", vec![1.0, 2.0, 3.0])]).unwrap();
    let opts = ForecastOptions {
        horizon: 1,
        ..Default::default()
    };
    let err = forecast_panel(&panel, &opts, 1).unwrap_err();
    assert!(matches!(
        err,
        panel_growth::GrowthError::InvalidConfig { name: "horizon", .. }
    ));
}
