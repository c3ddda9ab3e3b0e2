//! The `available` command must emit a parseable descriptor list.

use assert_cmd::Command;

#[test]
fn available_emits_json_descriptors() {
    let output = Command::new(assert_cmd::cargo::cargo_bin!("oceanup"))
        .arg("available")
        .output()
        .expect("binary should run");
    assert!(output.status.success());

    let descriptors: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    let list = descriptors.as_array().expect("descriptor list should be an array");

    let names: Vec<&str> = list
        .iter()
        .filter_map(|d| d.get("name").and_then(serde_json::Value::as_str))
        .collect();
    assert!(names.contains(&"setup"));
    assert!(names.contains(&"deploy"));

    let setup = &list[0];
    assert_eq!(setup.get("command").and_then(serde_json::Value::as_str), Some("root"));
    let aliases = setup.get("aliases").and_then(serde_json::Value::as_array).expect("aliases");
    assert!(aliases.iter().any(|a| a.as_str() == Some("s")));
}
