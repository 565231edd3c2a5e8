use ppcap::aggregate::{ChartRow, ChartTable};
use ppcap::view::MapPoint;
use ppcap::{ChartOutput, GeographyKey, ViewMode, storage};
use std::fs;
use tempfile::tempdir;

fn table() -> ChartTable {
    ChartTable {
        title: "Power Generation Capacity by Region".into(),
        axis_title: "Total Capacity (Million MW)".into(),
        geography: GeographyKey::Region,
        view: ViewMode::Absolute,
        rows: vec![
            ChartRow {
                geography: "Asia".into(),
                plant_type: "Coal".into(),
                value: 2_500_000.0,
                label: "2.50M".into(),
            },
            ChartRow {
                geography: "=cmd()".into(),
                plant_type: "-Wind".into(),
                value: 10.0,
                label: "0.00M".into(),
            },
        ],
    }
}

#[test]
fn chart_csv_has_geography_header_and_quoted_formulas() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.csv");
    storage::save_chart_csv(&table(), &path).unwrap();

    let txt = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines[0], "Region,type,value,label");
    assert_eq!(lines[1], "Asia,Coal,2500000.0,2.50M");
    assert_eq!(lines[2], "'=cmd(),'-Wind,10.0,0.00M");
}

#[test]
fn map_csv_leaves_missing_coordinates_blank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.csv");
    let points = vec![
        MapPoint {
            name: "Itaipu".into(),
            plant_type: "Hydropower".into(),
            capacity_mw: 14000.0,
            latitude: Some(-25.5),
            longitude: Some(-54.5),
        },
        MapPoint {
            name: "@home".into(),
            plant_type: "Solar".into(),
            capacity_mw: 1.5,
            latitude: None,
            longitude: None,
        },
    ];
    storage::save_map_csv(&points, &path).unwrap();

    let txt = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines[0], "name,type,capacity_mw,latitude,longitude");
    assert_eq!(lines[1], "Itaipu,Hydropower,14000.0,-25.5,-54.5");
    assert_eq!(lines[2], "'@home,Solar,1.5,,");
}

#[test]
fn chart_json_round_trips_through_serde() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.json");
    let out = ChartOutput::Table(table());
    storage::save_json(&out, &path).unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = v["table"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "Coal");
    assert_eq!(v["table"]["geography"], "Region");

    let back: ChartOutput = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, out);
}

#[test]
fn no_data_json_carries_the_title() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    let out = ChartOutput::NoData {
        title: ppcap::empty::NO_DATA_TITLE.into(),
    };
    storage::save_json(&out, &path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["no_data"]["title"], ppcap::empty::NO_DATA_TITLE);
}

#[test]
fn unwritable_path_reports_context() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("chart.csv");
    let err = storage::save_chart_csv(&table(), &path).unwrap_err();
    assert!(format!("{err:#}").contains("create"));
}
