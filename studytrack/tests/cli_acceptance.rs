use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const TODAY: &str = "14-10-2026";

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    snapshot: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let snapshot = base.join("snapshot.json");
        fs::copy(fixture_path(), &snapshot).expect("failed to copy snapshot fixture");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
            snapshot,
        }
    }

    fn snapshot_arg(&self) -> String {
        self.snapshot.display().to_string()
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("studytrack");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../studytrack-core/tests/fixtures/snapshot.json")
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("studytrack"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute studytrack: {e}"))
}

/// Run against the env snapshot with a fixed reference date.
fn run_on_snapshot(env: &CliTestEnv, args: &[&str]) -> Output {
    let snapshot = env.snapshot_arg();
    let mut full = args.to_vec();
    full.extend_from_slice(&["--input", &snapshot, "--today", TODAY]);
    run(env, &full)
}

fn assert_success(args: &[&str], output: &Output) {
    assert!(
        output.status.success(),
        "studytrack {:?} failed\nstatus: {:?}\nstdout:\n{}\nstderr:\n{}",
        args,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn json(args: &[&str], output: &Output) -> Value {
    assert_success(args, output);
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "studytrack {:?} did not print JSON: {e}\n{}",
            args,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn series_json_zero_fills_the_month() {
    let env = CliTestEnv::new();
    let args = [
        "series", "--zoom", "month", "--month", "3", "--year", "2024", "--format", "json",
    ];
    let value = json(&args, &run_on_snapshot(&env, &args));

    let buckets = value["buckets"].as_array().expect("buckets array");
    assert_eq!(buckets.len(), 31);
    assert_eq!(buckets[0]["periodLabel"], "01/03");
    assert_eq!(buckets[0]["totalHours"], 3.0);
    assert_eq!(buckets[0]["theoreticalHours"], 2.0);
    assert_eq!(buckets[14]["practicalHours"], 3.0);
    assert_eq!(buckets[1]["totalHours"], 0.0);
}

#[test]
fn series_uses_configured_zoom_and_snapshot() {
    let env = CliTestEnv::new();
    env.write_config(&format!(
        "[dashboard]\ndefault_zoom = \"week\"\nsnapshot_path = {:?}\n",
        env.snapshot_arg()
    ));

    let args = [
        "series", "--month", "3", "--year", "2024", "--shift", "-2", "--format", "json",
        "--today", TODAY,
    ];
    let value = json(&args, &run(&env, &args));

    let buckets = value["buckets"].as_array().expect("buckets array");
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[0]["periodLabel"], "26/02");
    let total: f64 = buckets
        .iter()
        .map(|b| b["totalHours"].as_f64().unwrap())
        .sum();
    assert_eq!(total, 3.5);
}

#[test]
fn compare_reports_unavailable_years() {
    let env = CliTestEnv::new();

    let args = ["compare", "2024", "2023", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["status"], "available");
    assert_eq!(value["first"]["year"], 2024);
    assert_eq!(value["first"]["totalHours"], 6.5);
    assert_eq!(value["second"]["totalHours"], 5.5);

    let args = ["compare", "2024", "2019", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["status"], "unavailable");
    assert_eq!(value["reason"]["kind"], "year_without_data");

    let args = ["compare", "2024", "2019"];
    let output = run_on_snapshot(&env, &args);
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Comparison unavailable"));
}

#[test]
fn add_then_list_and_delete() {
    let env = CliTestEnv::new();

    let args = [
        "add", "--date", "10-10-2026", "--subject", "math", "--hours", "1.5", "--type", "teórico",
        "--format", "json",
    ];
    let added = json(&args, &run_on_snapshot(&env, &args));
    let id = added["id"].as_str().expect("id").to_string();

    let args = ["sessions", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    let sessions = value["sessions"].as_array().expect("sessions array");
    assert_eq!(sessions[0]["id"], id.as_str());
    assert_eq!(sessions[0]["date"], "10-10-2026");
    assert_eq!(sessions[0]["subject"]["name"], "Math");
    assert_eq!(sessions[0]["studyType"], "theoretical");

    let args = ["delete", id.as_str()];
    assert_success(&args, &run_on_snapshot(&env, &args));

    let args = ["years", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["selected"], 2024);
    assert_eq!(value["years"][0]["year"], 2024);

    // The deleted session stays in the file
    let saved: Value = serde_json::from_str(&fs::read_to_string(&env.snapshot).unwrap()).unwrap();
    let record = saved["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == id.as_str())
        .expect("deleted session kept");
    assert_eq!(record["deleted"], true);
}

#[test]
fn years_step_through_available_years() {
    let env = CliTestEnv::new();

    let args = ["years", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["selected"], 2024);
    assert_eq!(value["canPrevious"], true);
    assert_eq!(value["canNext"], false);

    let args = ["years", "--step", "-1", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["selected"], 2023);
    assert_eq!(value["canPrevious"], false);
    assert_eq!(value["canNext"], true);

    // Stepping past the oldest year stays put
    let args = ["years", "--year", "2023", "--step", "-3", "--format", "json"];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["selected"], 2023);

    let args = ["years", "--step", "-1"];
    let output = run_on_snapshot(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2023*"));
    assert!(stdout.contains("--step 1 for newer"));
}

#[test]
fn series_year_zoom_is_bounded_by_data() {
    let env = CliTestEnv::new();

    let args = [
        "series", "--zoom", "year", "--year", "2024", "--shift", "-5", "--format", "json",
    ];
    let value = json(&args, &run_on_snapshot(&env, &args));
    assert_eq!(value["window"]["year"], 2023);
    assert_eq!(value["canPrevious"], false);
    assert_eq!(value["canNext"], true);
    assert_eq!(value["buckets"].as_array().expect("buckets array").len(), 12);
}

#[test]
fn add_rejects_future_dates() {
    let env = CliTestEnv::new();
    let args = [
        "add", "--date", "15-10-2026", "--hours", "1", "--type", "practical",
    ];
    let output = run_on_snapshot(&env, &args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("future"));
}

#[test]
fn text_and_markdown_views() {
    let env = CliTestEnv::new();

    let args = ["summary"];
    let output = run_on_snapshot(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Summary for 14-10-2026"));
    assert!(stdout.contains("Math"));

    let args = ["history", "--granularity", "year", "--format", "md"];
    let output = run_on_snapshot(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## History by year"));
    assert!(stdout.contains("| 2024 | 6.5h |"));
}

#[test]
fn missing_snapshot_fails_with_context() {
    let env = CliTestEnv::new();
    let missing = env.xdg_data.join("nope.json").display().to_string();
    let args = ["split", "--input", missing.as_str()];
    let output = run(&env, &args);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load snapshot"));
}
