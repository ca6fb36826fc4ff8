//! End-to-end CLI tests: exercise the built binary against a real input
//! directory the way the teacher's `tests/e2e_cli.rs` drove the B3 tracker
//! binary (`assert_cmd::Command::cargo_bin`, `tempfile::tempdir`).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

fn bin() -> Command {
    Command::cargo_bin("precios").unwrap()
}

#[test]
fn reload_reports_zero_suppliers_for_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    bin()
        .args(["-d", dir.path().to_str().unwrap(), "-c", config.to_str().unwrap(), "reload"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 supplier"));
}

#[test]
fn reload_ingests_locale_mixed_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let mut file = fs::File::create(dir.path().join("ferreteria-sur.csv")).unwrap();
    writeln!(file, "Taladro 1/2,17.684,21").unwrap();
    writeln!(file, "Maza 500g,864,05").unwrap();
    drop(file);

    bin()
        .args(["-d", dir.path().to_str().unwrap(), "-c", config.to_str().unwrap(), "reload"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 supplier"))
        .stdout(predicate::str::contains("2 product"));
}

#[test]
fn search_applies_supplier_markup() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let mut file = fs::File::create(dir.path().join("ferreteria-sur.csv")).unwrap();
    writeln!(file, "Taladro 1/2,17.684,21").unwrap();
    writeln!(file, "Maza 500g,864,05").unwrap();
    drop(file);

    fs::write(
        &config_path,
        r#"{
            "margenes_por_proveedor": {"ferreteria-sur": 30},
            "margen_default": 20,
            "umbral_busqueda_fuzzy": 60,
            "moneda": "ARS",
            "drive_folder_id": ""
        }"#,
    )
    .unwrap();

    bin()
        .args([
            "-d", dir.path().to_str().unwrap(),
            "-c", config_path.to_str().unwrap(),
            "--json",
            "search", "maza",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sale_price\": \"1123.27\""));
}

#[test]
fn update_margin_persists_and_is_picked_up_by_later_search() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let mut file = fs::File::create(dir.path().join("acme.csv")).unwrap();
    writeln!(file, "Martillo de bola grande,1000,00").unwrap();
    drop(file);

    bin()
        .args([
            "-d", dir.path().to_str().unwrap(),
            "-c", config_path.to_str().unwrap(),
            "update-margin", "acme", "50", "0", "0",
        ])
        .assert()
        .success();

    assert!(config_path.exists());
    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("\"acme\""));

    bin()
        .args([
            "-d", dir.path().to_str().unwrap(),
            "-c", config_path.to_str().unwrap(),
            "--json",
            "search", "martillo",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sale_price\": \"1500.00\""));
}

#[test]
fn suppliers_and_total_reflect_ingested_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(dir.path().join("acme.csv"), "Martillo de bola grande,100,00\n").unwrap();
    fs::write(dir.path().join("bravo.csv"), "Pinza universal larga,50,00\n").unwrap();

    bin()
        .args(["-d", dir.path().to_str().unwrap(), "-c", config.to_str().unwrap(), "suppliers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"))
        .stdout(predicate::str::contains("bravo"));

    bin()
        .args(["-d", dir.path().to_str().unwrap(), "-c", config.to_str().unwrap(), "total"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 product"));
}

#[test]
fn search_with_no_matches_reports_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(dir.path().join("acme.csv"), "Martillo de bola grande,100,00\n").unwrap();

    bin()
        .args([
            "-d", dir.path().to_str().unwrap(),
            "-c", config.to_str().unwrap(),
            "search", "xyznotfound",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn update_margin_rejects_negative_percentage() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    bin()
        .args([
            "-d", dir.path().to_str().unwrap(),
            "-c", config.to_str().unwrap(),
            "update-margin", "acme", "-10",
        ])
        .assert()
        .failure();
}
