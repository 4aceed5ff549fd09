use panel_growth::GrowthError;
use panel_growth::ctx::{Ctx, Indicator, RunConfig};
use panel_growth::growth::YearWindow;
use panel_growth::io::summary::format_summary;
use panel_growth::panel::Panel;
use panel_growth::pipeline::Pipeline;

fn config(horizon: usize, start: i32, end: i32) -> RunConfig {
    RunConfig {
        horizon,
        window: YearWindow { start, end },
        threads: 1,
        ..RunConfig::default()
    }
}

fn gdp() -> Panel {
    Panel::from_rows(
        2020,
        [
            ("A", vec![100.0, 110.0, 121.0, 133.0, 146.0]),
            ("B", vec![50.0, 52.0, 54.0, 56.0, 58.0]),
        ],
    )
    .unwrap()
}

fn population() -> Panel {
    Panel::from_rows(
        2020,
        [
            ("A", vec![10.0, 10.5, 11.0, 11.6, 12.2]),
            ("B", vec![20.0, 20.1, 20.2, 20.3, 20.4]),
        ],
    )
    .unwrap()
}

#[test]
fn full_pipeline_scores_every_entity() {
    let mut ctx = Ctx::from_panels(gdp(), population(), config(3, 2025, 2027));
    Pipeline::full().run(&mut ctx).unwrap();

    for state in ctx.indicators() {
        let ext = &state.forecast.as_ref().unwrap().extended;
        assert_eq!(ext.years(), &[2020, 2021, 2022, 2023, 2024, 2025, 2026, 2027]);
        assert_eq!(ext.history_end(), 2024);
        assert!(ext.rows().iter().all(|r| r.values.iter().all(Option::is_some)));
    }

    let summary = ctx.summary.as_ref().unwrap();
    assert_eq!(summary.len(), 2);
    for row in &summary.rows {
        assert_eq!(row.growth_total, (row.growth_gdp + row.growth_population) / 2.0);
    }
    let a = summary.get("A").unwrap();
    let b = summary.get("B").unwrap();
    assert!(a.growth_gdp > 0.0 && b.growth_gdp > 0.0);
    assert!(a.growth_total > b.growth_total);
    assert!(ctx.exclusions.is_empty());

    let report = ctx.report.as_ref().unwrap();
    assert_eq!(report.schema_version, "v1");
    assert_eq!(report.indicators.len(), 2);
    assert_eq!(report.indicators[0].name, "gdp_per_capita");
    assert_eq!(report.indicators[0].last_year, Some(2027));
    assert_eq!(report.summary.as_ref().unwrap().ranking[0].entity, "A");
    assert!(report.summary.as_ref().unwrap().dropped.is_empty());

    let text = format_summary(&ctx).unwrap();
    assert!(text.contains("Input: 2 entities, years 2020-2024"));
    assert!(text.contains("Scored: 2"));
    assert!(text.contains("Excluded: none"));
}

#[test]
fn pipeline_is_deterministic() {
    let mut first = Ctx::from_panels(gdp(), population(), config(12, 2025, 2035));
    let mut second = Ctx::from_panels(gdp(), population(), config(12, 2025, 2035));
    Pipeline::full().run(&mut first).unwrap();
    Pipeline::full().run(&mut second).unwrap();
    assert_eq!(first.summary, second.summary);
}

#[test]
fn entity_failing_one_indicator_is_dropped_from_summary() {
    let gdp = Panel::from_rows(
        2020,
        [
            ("Flat", vec![3.0, 3.0, 3.0, 3.0]),
            ("Noisy", vec![100.0, 104.0, 103.0, 109.0]),
        ],
    )
    .unwrap();
    let population = Panel::from_rows(
        2020,
        [("Flat", vec![7.0; 4]), ("Noisy", vec![9.0; 4])],
    )
    .unwrap();
    let config = RunConfig {
        max_iter: 1,
        ..config(3, 2024, 2026)
    };
    let mut ctx = Ctx::from_panels(gdp, population, config);
    Pipeline::full().run(&mut ctx).unwrap();

    let summary = ctx.summary.as_ref().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary.get("Flat").unwrap().growth_total, 0.0);

    let gdp_exclusions: Vec<_> = ctx.exclusions_for(Indicator::GdpPerCapita).collect();
    assert_eq!(gdp_exclusions.len(), 1);
    assert_eq!(gdp_exclusions[0].stage, "forecast");
    assert_eq!(gdp_exclusions[0].excluded.entity, "Noisy");

    // Noisy scored fine for population but has no gdp rate, so it is dropped there too.
    let population_exclusions: Vec<_> = ctx.exclusions_for(Indicator::Population).collect();
    assert_eq!(population_exclusions.len(), 1);
    assert_eq!(population_exclusions[0].stage, "summary");
    assert_eq!(population_exclusions[0].excluded.entity, "Noisy");
    assert_eq!(population_exclusions[0].excluded.reason.kind(), "non_convergence");

    let report = ctx.report.as_ref().unwrap();
    assert_eq!(report.indicators[0].excluded[0].kind, "non_convergence");
    assert_eq!(report.indicators[1].excluded.len(), 1);
    assert_eq!(report.indicators[1].excluded[0].stage, "summary");
    assert_eq!(report.summary.as_ref().unwrap().dropped, vec!["Noisy".to_string()]);
}

#[test]
fn mismatched_entities_abort_the_run() {
    let population = Panel::from_rows(
        2020,
        [
            ("A", vec![10.0, 10.5, 11.0, 11.6, 12.2]),
            ("C", vec![20.0, 20.1, 20.2, 20.3, 20.4]),
        ],
    )
    .unwrap();
    let mut ctx = Ctx::from_panels(gdp(), population, config(3, 2025, 2027));
    let err = Pipeline::full().run(&mut ctx).unwrap_err();
    assert_eq!(
        err.downcast_ref::<GrowthError>(),
        Some(&GrowthError::EntityMismatch {
            only_left: vec!["B".into()],
            only_right: vec!["C".into()],
        })
    );
    assert!(ctx.summary.is_none());
}

#[test]
fn window_past_forecast_aborts_the_run() {
    let mut ctx = Ctx::from_panels(gdp(), population(), config(3, 2025, 2035));
    let err = Pipeline::full().run(&mut ctx).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GrowthError>(),
        Some(GrowthError::WindowOutOfRange { .. })
    ));
}

#[test]
fn invalid_config_is_rejected_before_any_work() {
    let mut ctx = Ctx::from_panels(gdp(), population(), config(0, 2025, 2027));
    let err = Pipeline::full().run(&mut ctx).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GrowthError>(),
        Some(GrowthError::InvalidConfig { name: "horizon", .. })
    ));
    assert!(ctx.gdp.forecast.is_none());
}
