// This is a metapackage for workspace-level tests
// The real functionality lives in the member crates

// Test helpers and utilities
pub mod test_helpers {
}
