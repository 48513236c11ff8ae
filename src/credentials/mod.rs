/// Environment variable name for providing a GitHub token without the config file
pub const ENV_TOKEN_VAR: &str = "MY_PRS_GH_TOKEN";

/// Check for a GitHub token in the MY_PRS_GH_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    token_from_value(std::env::var(ENV_TOKEN_VAR).ok())
}

fn token_from_value(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
