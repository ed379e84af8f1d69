// ABOUTME: Integration tests for the flathunter CLI binary.
// ABOUTME: Runs searches against a mock site and replays saved snapshots.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const RESULTS_PAGE: &str = r#"<html><body>
<div class="filter-item" data-id="501">
  <div class="filter-item-container">
    <a id="link-result-item-501" href="/fr/louer/appartement/geneve/501"></a>
    <div class="filter-item-content">
      <p class="object-type">3.5 pièces</p>
      <p class="title">CHF 1'800.-/mois</p>
      <p>Rue de Carouge 8, 1205 Genève</p>
    </div>
    <div class="filter-item-characteristic"><span class="space">70 m²</span></div>
  </div>
</div>
<div class="filter-item" data-id="502">
  <div class="filter-item-container">
    <a id="link-result-item-502" href="/fr/louer/appartement/geneve/502"></a>
    <div class="filter-item-content">
      <p class="object-type">5 pièces</p>
      <p class="title">CHF 3'900.-/mois</p>
      <p>Route de Florissant 40, 1206 Genève</p>
    </div>
    <div class="filter-item-characteristic"><span class="space">140 m²</span></div>
  </div>
</div>
<ul class="pages"><li>1</li></ul>
</body></html>"#;

const DETAIL_PAGE: &str = r#"<html><body><div id="main">
<div class="im__postContent__body"><p>Vue dégagée.</p></div>
<table class="im__assets__table"><tr><td>Charges</td><td>CHF 210.-</td></tr></table>
</div></body></html>"#;

const SNAPSHOT: &str = r#"{
  "capturedAt": "2026-10-17T08:30:00Z",
  "payload": [
    {"id": 1, "link": "https://www.immobilier.ch/fr/1", "rent": 1500, "rooms": 3.0, "size": 60,
     "charges": 100, "address": "Rue A", "images": {}, "description": "",
     "contact": {"companyName": "", "companyAddress": []}},
    {"id": 2, "link": "https://www.immobilier.ch/fr/2", "rent": 4200, "rooms": 6.0, "size": 180,
     "charges": 300, "address": "Rue B", "images": {}, "description": "",
     "contact": {"companyName": "", "companyAddress": []}}
  ]
}"#;

fn flathunter_cmd() -> Command {
    Command::cargo_bin("flathunter").unwrap()
}

fn mock_site(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/fr/carte/louer/appartement-maison/geneve/page-1");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(RESULTS_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/fr/louer/appartement/geneve/501");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(DETAIL_PAGE);
    });
}

#[test]
fn search_prints_filtered_listings() {
    let server = MockServer::start();
    mock_site(&server);

    flathunter_cmd()
        .args(["search", "--category", "flat", "--origin"])
        .arg(server.base_url())
        .args(["--max-rent", "2000", "--min-rooms", "2", "--max-rooms", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 501"))
        .stdout(predicate::str::contains("\"charges\": 210"))
        .stdout(predicate::str::contains("Rue de Carouge 8").and(
            predicate::str::contains("Route de Florissant").not(),
        ));
}

#[test]
fn search_saves_snapshot_into_directory() {
    let server = MockServer::start();
    mock_site(&server);
    let temp_dir = TempDir::new().unwrap();

    flathunter_cmd()
        .args(["search", "--category", "flat", "--compact", "--origin"])
        .arg(server.base_url())
        .args(["--min-rooms", "2", "--max-rooms", "4", "--save"])
        .arg(temp_dir.path())
        .assert()
        .success();

    let saved: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].starts_with("immoCH_"));
    assert!(saved[0].ends_with(".search.json"));
}

#[test]
fn flat_search_without_room_bounds_fails() {
    flathunter_cmd()
        .args(["search", "--category", "flat", "--max-rent", "2000"])
        .args(["--origin", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_rooms"));
}

#[test]
fn nan_room_bound_is_rejected() {
    flathunter_cmd()
        .args(["search", "--category", "flat", "--min-rooms", "NaN", "--max-rooms", "4"])
        .args(["--origin", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("room bounds must be finite"));
}

#[test]
fn unknown_category_is_rejected() {
    flathunter_cmd()
        .args(["search", "--category", "castle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn replay_filters_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.search.json");
    fs::write(&path, SNAPSHOT).unwrap();

    flathunter_cmd()
        .arg("replay")
        .arg(&path)
        .args(["--max-rent", "2000", "--min-rooms", "1", "--max-rooms", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rue A"))
        .stdout(predicate::str::contains("Rue B").not());
}

#[test]
fn replay_without_bounds_prints_everything() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.search.json");
    fs::write(&path, SNAPSHOT).unwrap();

    flathunter_cmd()
        .arg("replay")
        .arg(&path)
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rue A").and(predicate::str::contains("Rue B")));
}

#[test]
fn replay_missing_file_fails() {
    flathunter_cmd()
        .args(["replay", "/nonexistent/snapshot.search.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load snapshot"));
}
