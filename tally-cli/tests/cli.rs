use std::path::Path;
use std::process::{Command, Output};

fn tally(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tally"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run tally")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn test_sample_then_stats() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let csv = dir.path().join("sample.csv");
    let csv_arg = csv.to_str().unwrap();

    let out = tally(&cfg, &["sample", "--out", csv_arg]);
    assert!(out.status.success());
    assert!(csv.exists());

    let out = tally(&cfg, &["stats", csv_arg]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("Total Income: 0\n"));
    assert!(text.contains("Total Expenses: -141.50\n"));
    assert!(text.contains("Balance: -141.50\n"));
    assert!(text.contains("Top Expense Category: Ristoranti e bar\n"));
    assert!(text.contains("Top Income Category: N/A\n"));
    assert!(text.contains("Total Transactions: 3\n"));
}

#[test]
fn test_stats_json_and_monthly() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let csv = dir.path().join("sample.csv");
    let csv_arg = csv.to_str().unwrap();
    assert!(tally(&cfg, &["sample", "--out", csv_arg]).status.success());

    let out = tally(&cfg, &["stats", csv_arg, "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["total_transactions"], 3);
    assert_eq!(json["top_income_category"], "N/A");

    let out = tally(&cfg, &["monthly", csv_arg]);
    let text = stdout(&out);
    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("2025-03"));
    assert!(row.contains("-141.50"));
}

#[test]
fn test_categories_sorted_ascending() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let csv = dir.path().join("sample.csv");
    let csv_arg = csv.to_str().unwrap();
    assert!(tally(&cfg, &["sample", "--out", csv_arg]).status.success());

    let text = stdout(&tally(&cfg, &["categories", csv_arg]));
    let keys: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split("  ").next().unwrap().trim())
        .collect();
    assert_eq!(keys, vec!["Ristoranti e bar", "Arte e Cultura", "Utenze"]);
}

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");

    let out = tally(&cfg, &["config", "init"]);
    assert!(stdout(&out).starts_with("Wrote "));
    let out = tally(&cfg, &["config", "init"]);
    assert!(stdout(&out).starts_with("Config already exists"));

    let text = stdout(&tally(&cfg, &["config", "show"]));
    assert!(text.contains("posting_date = \"Data contabile\""));
    assert!(text.contains("output = \"my_financial_report.xlsx\""));
}

#[test]
fn test_unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let pdf = dir.path().join("statement.pdf");
    std::fs::write(&pdf, "not a statement").unwrap();

    let out = tally(&cfg, &["stats", pdf.to_str().unwrap()]);
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Unsupported file format"));
}

#[test]
fn test_unsupported_extension_checked_before_existence() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let missing = dir.path().join("missing.pdf");

    let out = tally(&cfg, &["stats", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Unsupported file format"), "{err}");
    assert!(!err.contains("File not found"));
}

#[test]
fn test_missing_csv_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let missing = dir.path().join("missing.csv");

    let out = tally(&cfg, &["stats", missing.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn test_non_numeric_amount_warns() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    let csv = dir.path().join("export.csv");
    std::fs::write(
        &csv,
        "Data contabile,Valuta,Dare,Avere,Descrizione,Categoria,Tag\n\
         12/03/2025,12/03/2025,n/d,,Bar,Ristoranti e bar,\n\
         13/03/2025,13/03/2025,-5,,Bar,Ristoranti e bar,\n",
    )
    .unwrap();

    let out = tally(&cfg, &["stats", csv.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("non-numeric amounts were read as 0"), "{err}");
    assert!(stdout(&out).contains("Total Transactions: 2\n"));
}

#[test]
fn test_semicolon_export_via_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    std::fs::write(&cfg, "[columns]\ndelimiter = \";\"\n").unwrap();
    let csv = dir.path().join("export.csv");
    std::fs::write(
        &csv,
        "Data contabile;Valuta;Dare;Avere;Descrizione;Categoria;Tag\n\
         12/03/2025;12/03/2025;-1.234,50;;Affitto;Casa;\n",
    )
    .unwrap();

    let out = tally(&cfg, &["stats", csv.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("Total Expenses: -1234.50\n"));
}
