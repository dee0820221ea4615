mod common;

use std::fs;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::{prelude::*, str::contains};
use sales_etl::{
    config::{DatabaseConfig, EtlConfig},
    store::{fetch_clients, fetch_sales},
};

fn etl() -> Command {
    Command::cargo_bin("sales-etl").expect("binary exists")
}

#[test]
fn run_loads_workbook_into_database() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    let db_path = ws.join("cli.db");

    etl()
        .args([
            "run",
            "-i",
            workbook.to_str().unwrap(),
            "-d",
            db_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let db = DatabaseConfig {
        path: db_path,
        enforce_foreign_keys: false,
    };
    assert_eq!(fetch_clients(&db).unwrap().len(), 3);
    let sales = fetch_sales(&db).unwrap();
    assert_eq!(sales.len(), 4);
    assert_eq!(sales.iter().filter(|s| s.client_is_orphan).count(), 1);
}

#[test]
fn run_reads_json_config_and_flags_override_it() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    let config_path = ws.join("etl.json");
    let config = EtlConfig {
        workbook: ws.join("does-not-exist.xlsx"),
        ..ws.config_for(&workbook)
    };
    config.save(&config_path).expect("save config");

    etl()
        .args([
            "run",
            "-c",
            config_path.to_str().unwrap(),
            "-i",
            workbook.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(fetch_clients(&config.database).unwrap().len(), 3);
}

#[test]
fn run_reports_stage_failures_only_when_strict() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    let db_path = ws.join("missing").join("etl.db");
    let args = [
        "run",
        "-i",
        workbook.to_str().unwrap(),
        "-d",
        db_path.to_str().unwrap(),
    ];

    etl().args(args).assert().success();

    etl()
        .args(args)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("3 stage(s) failed: schema, load, load"));
}

#[test]
fn run_fails_when_workbook_is_missing() {
    let ws = TestWorkspace::new();
    let db_path = ws.join("etl.db");
    etl()
        .args([
            "run",
            "-i",
            ws.join("nope.xlsx").to_str().unwrap(),
            "-d",
            db_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Reading sheet 'clientes'"));
}

#[test]
fn init_db_creates_empty_tables() {
    let ws = TestWorkspace::new();
    let db_path = ws.join("fresh.db");
    etl()
        .args(["init-db", "-d", db_path.to_str().unwrap()])
        .assert()
        .success();

    let db = DatabaseConfig {
        path: db_path,
        enforce_foreign_keys: false,
    };
    assert!(fetch_clients(&db).unwrap().is_empty());
    assert!(fetch_sales(&db).unwrap().is_empty());
}

#[test]
fn preview_prints_cleaned_clients() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    etl()
        .args(["preview", "-i", workbook.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success()
        .stdout(contains("tipo_contato"))
        .stdout(contains("Ana Lima"))
        .stdout(contains("email_invalido"))
        .stdout(contains("Bruno Souza"))
        .stdout(contains("Carla").not());
}

#[test]
fn preview_prints_cleaned_sales() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    etl()
        .args(["preview", "-i", workbook.to_str().unwrap(), "--sheet", "sales"])
        .assert()
        .success()
        .stdout(contains("id_cliente_orfao"))
        .stdout(contains("150.50"))
        .stdout(contains("1970-01-01"));
}

#[test]
fn export_writes_both_tables_as_csv() {
    let ws = TestWorkspace::new();
    let workbook = ws.sample_workbook();
    let out_dir = ws.join("out");
    etl()
        .args([
            "export",
            "-i",
            workbook.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let clients = fs::read_to_string(out_dir.join("clientes.csv")).expect("clientes.csv");
    let mut lines = clients.lines();
    assert_eq!(
        lines.next(),
        Some("id_cliente,nome,email,documento,tipo_pessoa,tipo_contato")
    );
    assert_eq!(
        lines.next(),
        Some("1,Ana Lima,email_invalido,12345678901,Fisica,desconhecido")
    );

    let sales = fs::read_to_string(out_dir.join("vendas.csv")).expect("vendas.csv");
    let lines = sales.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "id_venda,id_cliente,id_cliente_orfao,valor,data_venda");
    assert_eq!(lines[1], ",1,false,150.50,2024-01-15");
    assert_eq!(lines[2], ",4,true,100.00,1970-01-01");
    assert_eq!(lines.len(), 5);
}
