use std::{env, fs, path::PathBuf, process::Command};

fn config_contents(view: &str) -> String {
    String::new()
        + "[model]\n"
        + "n_events = 4\n"
        + "n_signals = 4\n"
        + "max_init_count = 10\n"
        + "rule = \"randomized\"\n"
        + "\n"
        + "[grid]\n"
        + "dimension = 5\n"
        + "\n"
        + "[run]\n"
        + "rounds = 50\n"
        + "seed = 3\n"
        + "\n"
        + "[output]\n"
        + "n_prints = 5\n"
        + &format!("view = \"{view}\"\n")
}

fn run_bin(args: &[&str]) -> (bool, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_parlance"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    (output.status.success(), stdout_str)
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");

    for view in ["agents", "similarities", "event", "languages"] {
        let config_path = test_dir.join(format!("{view}.toml"));
        fs::write(&config_path, config_contents(view)).expect("failed to write config file");
        let config_str = config_path
            .to_str()
            .expect("failed to convert config path to string");

        let (success, _) = run_bin(&["--config", config_str, "check"]);
        assert!(success, "failed to check {view} config");

        let (success, stdout) = run_bin(&["--config", config_str, "run"]);
        assert!(success, "failed to run {view} config");

        let headers = stdout.lines().filter(|l| l.starts_with("Round ")).count();
        assert_eq!(headers, 6, "unexpected {view} output:\n{stdout}");

        if view == "languages" {
            let changes: Vec<_> = stdout.lines().filter(|l| l.starts_with("Changes: ")).collect();
            assert_eq!(changes.len(), 6, "unexpected {view} output:\n{stdout}");
            assert_eq!(changes[0], "Changes: 100.00%");
            assert!(changes.iter().all(|l| l.ends_with('%')));
        }

        let (_, rerun) = run_bin(&["--config", config_str, "--seed", "3", "run"]);
        assert_eq!(stdout, rerun, "seeded runs of {view} differ");
    }

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let contents = config_contents("agents").replace("dimension = 5", "dimension = 0");
    fs::write(&config_path, contents).expect("failed to write config file");
    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, _) = run_bin(&["--config", config_str, "check"]);
    assert!(!success);

    let (success, _) = run_bin(&["--config", "does-not-exist.toml", "run"]);
    assert!(!success);

    fs::remove_dir_all(&test_dir).ok();
}
