// File: tests/integration_tests.rs

mod test_helpers;

use std::path::Path;
use std::process::Command;

use test_helpers::ServerGuard;

// Helper function to run shell scripts
fn run_shell_script(script_path: &str) -> Result<(), String> {
    let output = Command::new("sh")
        .arg(script_path)
        .output()
        .map_err(|e| format!("Failed to execute script: {}", e))?;

    if !output.status.success() {
        return Err(format!(
            "Script execution failed: {}\n{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        ));
    }

    println!("Script output: {}", String::from_utf8_lossy(&output.stdout));
    Ok(())
}

#[test]
#[ignore = "spawns a server; requires curl and jq"]
fn test_api() {
    // Start the gateway and ensure it gets stopped when the test ends
    let _guard = ServerGuard::new().expect("Failed to start server");

    let script_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("api_test.sh");
    run_shell_script(script_path.to_str().unwrap()).expect("API test failed");
}
