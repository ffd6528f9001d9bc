// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart generation from stored data files.

use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use whoop_tracker::commands::visualize;
use whoop_tracker::config::PathConfig;
use whoop_tracker::db::DataStore;
use whoop_tracker::models::ResourceKind;
use whoop_tracker::services::CHARTS;

fn paths(dir: &Path) -> PathConfig {
    PathConfig {
        tokens_file: dir.join("tokens.json"),
        data_dir: dir.join("data"),
        chart_dir: dir.join("charts"),
    }
}

fn seed_data(paths: &PathConfig, skip: Option<ResourceKind>) {
    let data = DataStore::new(&paths.data_dir);
    let documents = [
        (
            ResourceKind::Cycles,
            json!({"records": [
                {"id": 2, "created_at": "2026-01-02T07:00:00.000Z", "score": {"strain": 14.2}},
                {"id": 1, "created_at": "2026-01-01T07:00:00.000Z", "score": {"strain": 9.8}},
            ], "next_token": null}),
        ),
        (
            ResourceKind::Recovery,
            json!({"records": [
                {"created_at": "2026-01-01T07:00:00.000Z", "score": {"recovery_score": 44}},
                {"created_at": "2026-01-02T07:00:00.000Z", "score": {"recovery_score": 81}},
            ], "next_token": null}),
        ),
        (
            ResourceKind::Sleep,
            json!({"records": [
                {"created_at": "2026-01-01T07:00:00.000Z", "score": {
                    "sleep_performance_percentage": 78,
                    "stage_summary": {"total_in_bed_time_milli": 27_000_000}
                }},
                {"created_at": "2026-01-02T07:00:00.000Z", "score": {
                    "sleep_performance_percentage": 91,
                    "stage_summary": {"total_in_bed_time_milli": 30_600_000}
                }},
            ], "next_token": null}),
        ),
    ];

    for (kind, document) in documents {
        if Some(kind) != skip {
            data.write(kind, &document).unwrap();
        }
    }
}

fn read_charts(dir: &Path) -> HashMap<String, Vec<u8>> {
    CHARTS
        .iter()
        .map(|spec| {
            let bytes = fs::read(dir.join(spec.file_name)).unwrap();
            (spec.file_name.to_string(), bytes)
        })
        .collect()
}

fn has_data_marks(svg: &[u8]) -> bool {
    let svg = String::from_utf8_lossy(svg);
    svg.contains("<circle") || svg.contains("Avg:")
}

#[test]
fn test_every_chart_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, None);

    let rendered = visualize::run(&paths).unwrap();

    assert_eq!(rendered.len(), CHARTS.len());
    for (name, svg) in read_charts(&paths.chart_dir) {
        assert!(has_data_marks(&svg), "{name} has no data");
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, None);

    visualize::run(&paths).unwrap();
    let first = read_charts(&paths.chart_dir);
    visualize::run(&paths).unwrap();
    let second = read_charts(&paths.chart_dir);

    assert_eq!(first, second);
}

#[test]
fn test_missing_category_only_empties_its_charts() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, Some(ResourceKind::Recovery));

    visualize::run(&paths).unwrap();

    for spec in CHARTS {
        let svg = fs::read(paths.chart_dir.join(spec.file_name)).unwrap();
        let expect_data = spec.source != ResourceKind::Recovery;
        assert_eq!(has_data_marks(&svg), expect_data, "{}", spec.file_name);
    }
}

#[test]
fn test_malformed_category_only_empties_its_charts() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, None);
    fs::write(paths.data_dir.join("sleep.json"), "{\"records\": [").unwrap();

    visualize::run(&paths).unwrap();

    for spec in CHARTS {
        let svg = fs::read(paths.chart_dir.join(spec.file_name)).unwrap();
        let expect_data = spec.source != ResourceKind::Sleep;
        assert_eq!(has_data_marks(&svg), expect_data, "{}", spec.file_name);
    }
}

#[test]
fn test_stale_chart_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, None);
    visualize::run(&paths).unwrap();

    fs::remove_file(paths.data_dir.join("cycles.json")).unwrap();
    visualize::run(&paths).unwrap();

    let svg = fs::read(paths.chart_dir.join("strain_score.svg")).unwrap();
    assert!(!has_data_marks(&svg));
}

#[test]
fn test_no_data_at_all() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());

    let rendered = visualize::run(&paths).unwrap();

    assert!(rendered.iter().all(|c| c.points == 0 && c.average.is_none()));
}

#[test]
fn test_sleep_duration_is_in_hours() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path());
    seed_data(&paths, None);

    let rendered = visualize::run(&paths).unwrap();
    let sleep = rendered
        .iter()
        .find(|c| c.path.ends_with("sleep_duration.svg"))
        .unwrap();

    // 7.5h and 8.5h
    assert_eq!(sleep.points, 2);
    assert!((sleep.average.unwrap() - 8.0).abs() < 1e-9);
}
