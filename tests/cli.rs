use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn sample() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data/sample_plants.csv")
        .to_string_lossy()
        .into_owned()
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ppcap"));
}

#[test]
fn options_lists_categories_and_years() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["options", "--input", &sample()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rows: 19"))
        .stdout(predicate::str::contains(
            "statuses: Operating, Construction, Retired",
        ))
        .stdout(predicate::str::contains("years: 1913:2036"));
}

#[test]
fn default_view_prints_control_and_totals() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "capacity control: 0..22,725 MW, window [0, 22,725]",
        ))
        .stdout(predicate::str::contains(
            "Power Generation Capacity by Country/area",
        ))
        .stdout(predicate::str::contains("total China  22,500 MW"))
        .stdout(predicate::str::contains("China  •  Wind").not());
}

#[test]
fn region_view_groups_by_region() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "-g", "region", "-v", "percentage"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Percentage Share (%)"))
        .stdout(predicate::str::contains("total Asia  38,457 MW"));
}

#[test]
fn window_above_every_total_prints_no_data() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "-c", "100000:200000"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "No data available for the selected filters.",
        ))
        .stdout(predicate::str::contains("window [100,000, 200,000]"));
}

#[test]
fn empty_view_exports_header_only_tables() {
    let dir = tempdir().unwrap();
    let chart = dir.path().join("chart.csv");
    let map = dir.path().join("map.csv");
    let totals = dir.path().join("totals.csv");
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "-c", "100000:200000", "-g", "region"])
        .arg("--out")
        .arg(&chart)
        .arg("--map-out")
        .arg(&map)
        .arg("--totals-out")
        .arg(&totals);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "No data available for the selected filters.",
        ));

    assert_eq!(
        std::fs::read_to_string(&chart).unwrap(),
        "Region,type,value,label\n"
    );
    assert_eq!(
        std::fs::read_to_string(&map).unwrap(),
        "name,type,capacity_mw,latitude,longitude\n"
    );
    assert_eq!(
        std::fs::read_to_string(&totals).unwrap(),
        "geography,capacity_mw\n"
    );
}

#[test]
fn dashboard_window_opens_on_the_preset_range() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "--dashboard-window"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "capacity control: 0..22,725 MW, window [100,000, 2,500,000]",
        ))
        .stdout(predicate::str::contains(
            "No data available for the selected filters.",
        ));
}

#[test]
fn view_saves_tables_and_renders() {
    let dir = tempdir().unwrap();
    let chart_csv = dir.path().join("chart.csv");
    let totals_json = dir.path().join("totals.json");
    let chart_svg = dir.path().join("chart.svg");
    let map_svg = dir.path().join("map.svg");
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "-s", "operating;construction"])
        .arg("--out")
        .arg(&chart_csv)
        .arg("--totals-out")
        .arg(&totals_json)
        .arg("--chart")
        .arg(&chart_svg)
        .arg("--map")
        .arg(&map_svg);
    cmd.assert().success();

    let csv = std::fs::read_to_string(&chart_csv).unwrap();
    assert!(csv.starts_with("Country/area,type,value,label\n"));
    assert!(csv.contains("China,Wind,"));

    let totals: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&totals_json).unwrap()).unwrap();
    let china = totals
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["geography"] == "China")
        .unwrap();
    assert_eq!(china["capacity_mw"], 30465.0);

    assert!(chart_svg.exists());
    assert!(map_svg.exists());
}

#[test]
fn missing_column_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    std::fs::write(&input, "Status,Type\nOperating,Solar\n").unwrap();
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["options", "--input"]).arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Plant / Project name"));
}

#[test]
fn bad_year_window_is_rejected() {
    let mut cmd = Command::cargo_bin("ppcap").unwrap();
    cmd.args(["view", "-i", &sample(), "-y", "1990-2000"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid --years"));
}
