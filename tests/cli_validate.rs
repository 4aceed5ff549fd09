use assert_cmd::Command;

#[test]
fn validate_reports_both_panels() {
    let dir = tempfile::tempdir().unwrap();
    let gdp = dir.path().join("gdp.csv");
    let pop = dir.path().join("pop.csv");
    std::fs::write(&gdp, "Country,2000,2001\nA,1,2\nB,3,4\n").unwrap();
    std::fs::write(&pop, "Country,2000,2001,2002\nB,5,6,7\nA,8,9,10\n").unwrap();

    let output = Command::cargo_bin("panel-growth")
        .unwrap()
        .args(["validate", "--gdp", gdp.to_str().unwrap(), "--population", pop.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gdp_per_capita: 2 entities, years 2000-2001"));
    assert!(stdout.contains("population: 2 entities, years 2000-2002"));
    assert!(stdout.contains("year ranges differ"));
}

#[test]
fn validate_fails_on_entity_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let gdp = dir.path().join("gdp.csv");
    let pop = dir.path().join("pop.csv");
    std::fs::write(&gdp, "Country,2000,2001\nA,1,2\nB,3,4\n").unwrap();
    std::fs::write(&pop, "Country,2000,2001\nA,1,2\nC,3,4\n").unwrap();

    let output = Command::cargo_bin("panel-growth")
        .unwrap()
        .args(["validate", "--gdp", gdp.to_str().unwrap(), "--population", pop.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("entity sets differ"), "{}", stderr);
}
