use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Read a configuration file with environment variable substitution.
///
/// `${VAR_NAME}` placeholders are replaced from the process environment.
/// Unset variables are left as-is so validation can report them by name.
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    Ok(substitute_env_vars(&content, |name| std::env::var(name).ok()))
}

/// Replace `${VAR}` occurrences using `lookup`
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static pattern is valid");
    pattern
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            match lookup(var_name) {
                Some(value) => value,
                None => {
                    warn!("Environment variable {} is not set", var_name);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// True when `value` still holds an unresolved `${VAR}` placeholder
pub fn is_unresolved_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("${") && trimmed.ends_with('}')
}

/// Load text file, stripping a UTF-8 BOM and falling back to lossy decoding
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut buffer = fs::read(file_path)?;

    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(e) => {
            debug!("{} is not valid UTF-8, decoding as windows-1254", file_path);
            // Turkish legacy code page, the usual culprit for hand-edited files here
            let (cow, _, _) = encoding_rs::WINDOWS_1254.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}
