use std::collections::BTreeMap;

use panel_growth::GrowthError;
use panel_growth::summary::build_summary;

fn rates(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn total_is_mean_of_both_indicators() {
    let gdp = rates(&[("B", 20.0), ("A", 10.0), ("C", -4.0)]);
    let pop = rates(&[("A", 4.0), ("C", 2.0), ("B", 6.0)]);
    let summary = build_summary(&gdp, &pop).unwrap();
    assert_eq!(summary.len(), 3);
    let ids: Vec<&str> = summary.rows.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    for row in &summary.rows {
        assert_eq!(
            row.growth_total,
            (row.growth_gdp + row.growth_population) / 2.0
        );
    }
    assert_eq!(summary.get("B").unwrap().growth_total, 13.0);
    assert_eq!(summary.get("C").unwrap().growth_total, -1.0);
}

#[test]
fn ranking_is_descending_with_id_tiebreak() {
    let gdp = rates(&[("A", 2.0), ("B", 8.0), ("C", 8.0)]);
    let pop = rates(&[("A", 2.0), ("B", 0.0), ("C", 0.0)]);
    let summary = build_summary(&gdp, &pop).unwrap();
    let order: Vec<&str> = summary.ranked().iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
}

#[test]
fn mismatched_entities_are_reported_both_ways() {
    let gdp = rates(&[("A", 1.0), ("B", 2.0)]);
    let pop = rates(&[("B", 1.0), ("C", 2.0)]);
    assert_eq!(
        build_summary(&gdp, &pop).unwrap_err(),
        GrowthError::EntityMismatch {
            only_left: vec!["A".into()],
            only_right: vec!["C".into()],
        }
    );
}

#[test]
fn empty_inputs_give_empty_summary() {
    let summary = build_summary(&BTreeMap::new(), &BTreeMap::new()).unwrap();
    assert!(summary.is_empty());
}
