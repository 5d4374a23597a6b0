//! Loads configuration from the real process environment. Kept in its own test
//! binary because it mutates the environment.

#![cfg(unix)]

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use coleta_core::{AppConfig, DEFAULT_BACKEND_URL};

#[test]
fn load_ignores_non_utf8_variables_of_other_programs() {
    // SAFETY: this binary runs a single test, so no other thread reads the environment.
    unsafe {
        std::env::set_var("UNRELATED_PATH", OsStr::from_bytes(b"/tmp/caf\xe9"));
    }

    let config = AppConfig::load(None).unwrap();
    assert_eq!(config.backend_api_url, DEFAULT_BACKEND_URL);
}
