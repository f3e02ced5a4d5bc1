use assert_cmd::Command;
use predicates::prelude::*;

fn taxpro() -> Command {
    let mut cmd = Command::cargo_bin("taxpro").unwrap();
    cmd.env_remove("TAX_ADVISOR_MODEL")
        .env_remove("TAX_ADVISOR_TEMPERATURE")
        .env_remove("TAX_ADVISOR_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_modes() {
    taxpro()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--prompt"))
        .stdout(predicate::str::contains("--bridge"))
        .stdout(predicate::str::contains("--temperature"));
}

#[test]
fn blank_prompt_does_nothing() {
    taxpro()
        .args(["--prompt", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("FTA Compliance Expert").not());
}

#[test]
fn invalid_temperature_is_rejected() {
    taxpro()
        .args(["--temperature", "7", "--prompt", "VAT?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid temperature"));
}

#[test]
fn bridge_announces_ready_and_exits_on_eof() {
    taxpro()
        .arg("--bridge")
        .write_stdin("{\"type\":\"suggestions\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\"type\":\"ready\""))
        .stdout(predicate::str::contains("\"type\":\"suggestions\""));
}
