use std::process::Command;

fn run(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_flashpoint"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run the flashpoint binary");
    assert!(output.status.success(), "flashpoint exited with {:?}", output.status);
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn prints_the_final_snapshot() {
    let stdout = run(&["--turns", "6", "--seed", "4"]);
    let snapshot: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout is a JSON snapshot");
    assert_eq!(snapshot["step"], 6);
    assert_eq!(snapshot["agents"].as_array().map(Vec::len), Some(6));
}

#[test]
fn trace_prints_one_snapshot_per_turn() {
    let stdout = run(&["--turns", "3", "--agents", "2", "--policy", "random", "--trace"]);
    let steps: Vec<u64> = stdout
        .lines()
        .map(|line| {
            let snapshot: serde_json::Value =
                serde_json::from_str(line).expect("line is a JSON snapshot");
            snapshot["step"].as_u64().expect("step is a number")
        })
        .collect();
    assert_eq!(steps, vec![0, 1, 2, 3]);
}
