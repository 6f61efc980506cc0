use std::env;

const DEBUG_VAR: &str = "POWERBAR_DEBUG";

pub fn debug(message: &str) {
    if env::var(DEBUG_VAR).is_ok() {
        eprintln!("[DEBUG] {}", message);
    }
}

pub fn debug_with_context(context: &str, message: &str) {
    if env::var(DEBUG_VAR).is_ok() {
        eprintln!("[DEBUG] {}: {}", context, message);
    }
}

/// Always printed: stderr is the operator channel while stdout carries the bar.
pub fn warn_with_context(context: &str, message: &str) {
    eprintln!("[WARN] {}: {}", context, message);
}
