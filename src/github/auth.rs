use std::process::Command;
use tracing::debug;

/// Look for a GitHub token, in order:
/// 1. `gh auth token` subprocess
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
///
/// Returns `None` when nothing is found; the API still answers anonymous
/// requests, just with a lower rate limit.
pub fn resolve_token() -> Option<String> {
    debug!("Attempting to resolve token via `gh auth token`");
    if let Ok(output) = Command::new("gh").args(["auth", "token"]).output()
        && output.status.success()
    {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!("Token resolved via gh CLI");
            return Some(token);
        }
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = token_from_env(var) {
            debug!(var, "Token resolved via env var");
            return Some(token);
        }
    }

    debug!("No token found, continuing anonymously");
    None
}

fn token_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
