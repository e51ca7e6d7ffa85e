mod common;

use common::{approx, fixture, TestEnv};
use predicates::str::contains;

#[test]
fn run_json_allocates_fob_shipment() {
    let env = TestEnv::new();
    let out = env.run_json(&["run", &fixture("fob_shipment.json")]);

    assert_eq!(out["ok"], true);
    let data = &out["data"];
    assert_eq!(data["mode"], "separate");
    assert!(data["detected_incoterm"].is_null());

    let declaration = &data["declaration"];
    assert_eq!(declaration["cost_configuration"]["base"], "fob");
    assert!(approx(&declaration["additions"][0]["costs"]["total"], 738.0));
    assert!(approx(&declaration["additions"][1]["costs"]["total"], 492.0));

    let boxed = &declaration["additions"][0]["items"][0]["costs"];
    assert!(approx(&boxed["item_total_cost"], 246.0));
    assert_eq!(boxed["per_package_cost"]["status"], "known");
    assert!(approx(&boxed["per_package_cost"]["value"], 2.05));

    let sample = &declaration["additions"][1]["items"][0]["costs"];
    assert!(approx(&sample["item_total_cost"], 0.0));
    assert!(approx(&sample["unit_cost"], 0.0));
    assert_eq!(sample["per_package_cost"]["status"], "unknown");

    let validation = &declaration["validation"];
    assert_eq!(validation["status"], "OK");
    assert!(approx(&validation["computed_total"], 1230.0));
    assert!(approx(&validation["expected_total"], 1230.0));
}

#[test]
fn run_detects_cfr_from_di_xml() {
    let env = TestEnv::new();
    let out = env.run_json(&["run", &fixture("di_cfr.xml"), "--detect-incoterm"]);
    let data = &out["data"];

    assert_eq!(data["detected_incoterm"], "CFR");
    assert_eq!(data["mode"], "freight_embedded");

    let declaration = &data["declaration"];
    assert_eq!(declaration["header"]["registration_date"], "2024-05-02");
    assert_eq!(declaration["cost_configuration"]["base"], "customs_value");
    for addition in declaration["additions"].as_array().unwrap() {
        assert!(approx(&addition["costs"]["freight"], 0.0));
    }
    assert!(approx(&declaration["additions"][0]["costs"]["total"], 744.0));
    assert!(approx(
        &declaration["additions"][0]["items"][0]["costs"]["per_package_cost"]["value"],
        3.72
    ));
    assert_eq!(declaration["validation"]["status"], "OK");
}

#[test]
fn explicit_flags_win_over_detection() {
    let env = TestEnv::new();
    let out = env.run_json(&[
        "run",
        &fixture("di_cfr.xml"),
        "--detect-incoterm",
        "--freight-embedded",
        "--insurance-embedded",
    ]);
    assert_eq!(out["data"]["mode"], "both_embedded");
    assert!(out["data"]["detected_incoterm"].is_null());
}

#[test]
fn divergence_is_reported_and_fails_only_when_strict() {
    let env = TestEnv::new();
    env.cmd()
        .args(["run", &fixture("di_cfr.xml")])
        .assert()
        .success()
        .stdout(contains("Validation  DIVERGENT"));

    env.cmd()
        .args(["run", &fixture("di_cfr.xml"), "--strict"])
        .assert()
        .failure()
        .stderr(contains("diverges"));
}

#[test]
fn text_output_lists_additions_and_items() {
    let env = TestEnv::new();
    env.cmd()
        .args(["run", &fixture("fob_shipment.json")])
        .assert()
        .success()
        .stdout(contains("Declaration 24/0000001-0"))
        .stdout(contains("Addition 002"))
        .stdout(contains("= 738.00 (60.00%)"))
        .stdout(contains("Validation  OK"));
}

#[test]
fn declaration_without_additions_is_rejected() {
    let env = TestEnv::new();
    let empty = env.write("empty.json", r#"{ "totals": { "fob": 10.0 }, "additions": [] }"#);
    env.cmd()
        .args(["run", empty.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no additions"));

    let no_adicao = env.write(
        "empty.xml",
        "<ListaDeclaracoes><declaracaoImportacao><numeroDI>1</numeroDI></declaracaoImportacao></ListaDeclaracoes>",
    );
    env.cmd()
        .args(["run", no_adicao.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no adicao"));
}

#[test]
fn negative_amount_in_di_xml_is_rejected() {
    let env = TestEnv::new();
    let source = std::fs::read_to_string(fixture("di_cfr.xml")).unwrap();
    let negative = env.write(
        "negative.xml",
        &source.replace(
            "<afrmm>000000000002000</afrmm>",
            "<afrmm>-000000000002000</afrmm>",
        ),
    );
    env.cmd()
        .args(["run", negative.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("totals.afrmm must be a finite, non-negative number"));
}

#[test]
fn unsupported_file_type_is_rejected() {
    let env = TestEnv::new();
    let sheet = env.write("declaration.csv", "a,b\n");
    env.cmd()
        .args(["run", sheet.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("unsupported declaration file"));
}

#[test]
fn incoterm_command_reports_suggestion() {
    let env = TestEnv::new();
    env.cmd()
        .args(["incoterm", &fixture("di_cfr.xml")])
        .assert()
        .success()
        .stdout(contains("CFR\tfreight-embedded"));

    let out = env.run_json(&["incoterm", &fixture("fob_shipment.json")]);
    assert_eq!(out["data"]["declared"], "FOB");
    assert_eq!(out["data"]["mode"], "separate");
}

#[test]
fn saved_settings_drive_later_runs() {
    let env = TestEnv::new();
    let out = env.run_json(&["config", "set", "--detect-incoterm", "true", "--strict", "true"]);
    assert_eq!(out["data"]["detect_incoterm"], true);
    assert!(env.config.exists());

    let shown = env.run_json(&["config", "show"]);
    assert_eq!(shown["data"]["strict"], true);
    assert_eq!(shown["data"]["default_mode"], "separate");

    // Detection picks CFR, so the strict setting does not trip.
    let out = env.run_json(&["run", &fixture("di_cfr.xml")]);
    assert_eq!(out["data"]["mode"], "freight_embedded");
    assert_eq!(out["data"]["declaration"]["validation"]["status"], "OK");
}
