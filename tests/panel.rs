use panel_growth::GrowthError;
use panel_growth::panel::{
    ExtendedPanel, ExtendedRow, Panel, PanelRow, RawCell, RawPanel, RawRow, extract_series,
    parse_year_label,
};

fn raw(columns: &[&str], rows: Vec<(&str, Vec<RawCell>)>) -> RawPanel {
    RawPanel {
        entity_column: "Country".to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .into_iter()
            .map(|(entity, cells)| RawRow {
                entity: entity.to_string(),
                cells,
            })
            .collect(),
    }
}

fn is_malformed<T: std::fmt::Debug>(r: Result<T, GrowthError>) -> bool {
    matches!(r, Err(GrowthError::MalformedPanel { .. }))
}

#[test]
fn year_labels_parse_with_or_without_prefix() {
    assert_eq!(parse_year_label("1990").unwrap(), 1990);
    assert_eq!(parse_year_label("YR2001").unwrap(), 2001);
    assert!(is_malformed(parse_year_label("Country")));
    assert!(is_malformed(parse_year_label("")));
    assert!(is_malformed(parse_year_label("20-1")));
}

#[test]
fn from_raw_sorts_columns_and_coerces_numbers() {
    let r = raw(
        &["YR2002", "YR2000", "YR2001"],
        vec![(
            "Chile",
            vec![
                RawCell::Number(3.0),
                RawCell::Text("1.5".into()),
                RawCell::Number(2.0),
            ],
        )],
    );
    let panel = Panel::from_raw(&r).unwrap();
    assert_eq!(panel.years(), &[2000, 2001, 2002]);
    assert_eq!(panel.rows()[0].values, vec![1.5, 2.0, 3.0]);
}

#[test]
fn from_raw_rejects_bad_cells() {
    let text = raw(
        &["2000", "2001"],
        vec![("A", vec![RawCell::Number(1.0), RawCell::Text("n/a".into())])],
    );
    assert!(is_malformed(Panel::from_raw(&text)));

    let missing = raw(
        &["2000", "2001"],
        vec![("A", vec![RawCell::Missing, RawCell::Number(1.0)])],
    );
    assert!(is_malformed(Panel::from_raw(&missing)));

    let short = raw(&["2000", "2001"], vec![("A", vec![RawCell::Number(1.0)])]);
    assert!(is_malformed(Panel::from_raw(&short)));
}

#[test]
fn from_raw_rejects_duplicate_and_gapped_years() {
    let dup = raw(
        &["2000", "YR2000"],
        vec![("A", vec![RawCell::Number(1.0), RawCell::Number(2.0)])],
    );
    assert!(is_malformed(Panel::from_raw(&dup)));

    let gap = raw(
        &["2000", "2002"],
        vec![("A", vec![RawCell::Number(1.0), RawCell::Number(2.0)])],
    );
    assert!(is_malformed(Panel::from_raw(&gap)));
}

#[test]
fn panel_rejects_duplicate_entities_and_non_finite_values() {
    let dup = Panel::from_rows(2000, [("A", vec![1.0, 2.0]), ("A", vec![3.0, 4.0])]);
    assert!(is_malformed(dup));

    let nan = Panel::from_rows(2000, [("A", vec![1.0, f64::NAN])]);
    assert!(is_malformed(nan));

    let unsorted = Panel::new(
        vec![2001, 2000],
        vec![PanelRow {
            entity: "A".into(),
            values: vec![1.0, 2.0],
        }],
    );
    assert!(is_malformed(unsorted));
}

#[test]
fn extract_series_keeps_year_order_per_entity() {
    let panel = Panel::from_rows(
        2010,
        [("B", vec![5.0, 6.0, 7.0]), ("A", vec![1.0, 2.0, 3.0])],
    )
    .unwrap();
    let series = extract_series(&panel).unwrap();
    assert_eq!(series.len(), 2);
    let a = &series["A"];
    assert_eq!(a.first_year(), 2010);
    assert_eq!(a.last_year(), 2012);
    let points: Vec<(i32, f64)> = a.points().collect();
    assert_eq!(points, vec![(2010, 1.0), (2011, 2.0), (2012, 3.0)]);
    assert_eq!(series["B"].values(), &[5.0, 6.0, 7.0]);
}

#[test]
fn extended_panel_exposes_forecast_years_and_plain_labels() {
    let panel = ExtendedPanel::new(
        vec![2020, 2021, 2022, 2023],
        2021,
        vec![ExtendedRow {
            entity: "A".into(),
            values: vec![Some(1.0), Some(2.0), Some(3.0), None],
        }],
    )
    .unwrap();
    assert_eq!(panel.forecast_years(), &[2022, 2023]);
    assert_eq!(panel.year_labels(), vec!["2020", "2021", "2022", "2023"]);
    assert_eq!(panel.value("A", 2022), Some(3.0));
    assert_eq!(panel.value("A", 2023), None);
    assert_eq!(panel.column_index(2019), None);
    assert_eq!(panel.column_index(2023), Some(3));
}
