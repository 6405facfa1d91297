// File: tests/test_helpers.rs

use std::env;
use std::process::{Child, Command};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;

/// Port the test server listens on, distinct from the default to avoid
/// clobbering a local instance
pub const TEST_PORT: &str = "8081";

// Singleton holding the server process
static SERVER_PROCESS: OnceLock<Mutex<Option<Child>>> = OnceLock::new();

fn process_slot() -> &'static Mutex<Option<Child>> {
    SERVER_PROCESS.get_or_init(|| Mutex::new(None))
}

// Start the gateway for tests
pub fn start_server() -> Result<(), String> {
    let mut process_guard = process_slot().lock().unwrap();

    // If the server is already running, do nothing
    if process_guard.is_some() {
        return Ok(());
    }

    env::set_var("PORT", TEST_PORT);
    env::set_var("JWT_SECRET", "integration-test-secret");

    // Start the gateway; without DATABASE_URL it runs on the in-memory store
    let process = Command::new("cargo")
        .args(["run", "-p", "api-gateway"])
        .spawn()
        .map_err(|e| format!("Failed to start server: {}", e))?;

    *process_guard = Some(process);

    // Give the server some time to start up
    drop(process_guard);
    thread::sleep(Duration::from_secs(2));

    Ok(())
}

// Stop the gateway after tests
pub fn stop_server() -> Result<(), String> {
    let mut process_guard = process_slot().lock().unwrap();

    if let Some(mut child) = process_guard.take() {
        child
            .kill()
            .map_err(|e| format!("Failed to kill server process: {}", e))?;

        child
            .wait()
            .map_err(|e| format!("Failed to wait for server process: {}", e))?;
    }

    Ok(())
}

// Automatically start and stop the server for a test
pub struct ServerGuard;

impl ServerGuard {
    pub fn new() -> Result<Self, String> {
        start_server()?;
        Ok(Self)
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = stop_server();
    }
}
