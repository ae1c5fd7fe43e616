//! End-to-end runs of the `bomrec` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use bomrec::layout::bom;
use bomrec::{open_sheet, CellValue};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn bomrec(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bomrec"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to launch bomrec")
}

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("db.csv"),
        "Desc,Code,Config,Rev,P1,P2,P3,P4,P5\nStaffa,BA1,BA1,A,a,b,c,d,e\n",
    )
    .unwrap();
    fs::write(
        dir.join("distinta.csv"),
        "Pos,Qta,UM,Tipo,Code,Config,Rev\n10,1,PZ,M,BA1,BA1,A\n20,1,PZ,M,BA9,X,1\n",
    )
    .unwrap();
    let drawings = dir.join("disegni");
    fs::create_dir(&drawings).unwrap();
    fs::write(drawings.join("BA1A.pdf"), b"").unwrap();
    fs::write(drawings.join("BA9_X01 DISTINTA.dwg"), b"").unwrap();
}

#[test]
fn run_writes_outputs_and_remembers_paths() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let config = dir.path().join("config.toml");
    let out = dir.path().join("out");
    let p = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

    let output = bomrec(
        &config,
        &[
            "run",
            "--db",
            &p("db.csv"),
            "--bom",
            &p("distinta.csv"),
            "--files-dir",
            &p("disegni"),
            "--source",
            r"Z:\Disegni",
            "--out-dir",
            &out.to_string_lossy(),
            "--json",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stats"]["totalRows"], 2);
    assert_eq!(report["stats"]["matches"], 1);
    assert_eq!(report["stats"]["filesFoundDetails"]["dwg"], 1);

    let processed = open_sheet(out.join("PROCESSED_distinta.csv")).unwrap();
    assert_eq!(processed.get(1, bom::STATUS), &CellValue::from("OK"));
    assert_eq!(processed.get(2, bom::DWG), &CellValue::from("SI"));

    let missing = open_sheet(out.join("DA_AGGIUNGERE_distinta.csv")).unwrap();
    assert_eq!(missing.row_count(), 2);

    let script = fs::read_to_string(out.join("COPIA_FILE_distinta.bat")).unwrap();
    assert!(script.contains(r#"copy "Z:\Disegni\BA1A.pdf" "C:\Tavole\PDF\BA1A.pdf""#));

    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains(r"Z:\\Disegni") || saved.contains(r"'Z:\Disegni'"));
}

#[test]
fn file_list_without_source_fails_without_writing() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let config = dir.path().join("config.toml");
    fs::write(dir.path().join("files.txt"), "BA1A.pdf\n").unwrap();
    let p = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

    let output = bomrec(
        &config,
        &[
            "run",
            "--db",
            &p("db.csv"),
            "--bom",
            &p("distinta.csv"),
            "--file-list",
            &p("files.txt"),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("source path is required"), "{}", stderr);
    assert!(!dir.path().join("PROCESSED_distinta.csv").exists());
    assert!(!config.exists());
}

#[test]
fn config_set_then_show() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("cfg").join("config.toml");

    let output = bomrec(&config, &["config", "set", "--target", r"D:\Tavole", "--with-description", "true"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = bomrec(&config, &["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("with_description = true"), "{}", stdout);
    assert!(stdout.contains(r"D:\Tavole"), "{}", stdout);
}
