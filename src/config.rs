use std::path::Path;

/// Default local config file, one `KEY=VALUE` per line.
pub const DEFAULT_CONFIG_PATH: &str = "deepseek_config.txt";
pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Resolve the API key: explicit parameter, then the config file, then the
/// environment.
pub fn resolve_api_key(explicit: Option<&str>, config_path: &Path) -> Option<String> {
    if let Some(key) = explicit {
        let key = key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }
    if let Some(key) = read_key_from_file(config_path) {
        return Some(key);
    }
    std::env::var(API_KEY_VAR)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

fn read_key_from_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    for line in content.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(API_KEY_VAR) {
            if let Some(value) = rest.trim_start().strip_prefix('=') {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepseek_config.txt");
        std::fs::write(&path, "DEEPSEEK_API_KEY=from-file\n").unwrap();
        assert_eq!(
            resolve_api_key(Some("from-arg"), &path).as_deref(),
            Some("from-arg")
        );
    }

    #[test]
    fn config_file_key_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepseek_config.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "DEEPSEEK_API_KEY = sk-test-123").unwrap();
        drop(f);

        assert_eq!(
            resolve_api_key(None, &path).as_deref(),
            Some("sk-test-123")
        );
    }

    #[test]
    fn blank_explicit_key_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deepseek_config.txt");
        std::fs::write(&path, "DEEPSEEK_API_KEY=from-file\n").unwrap();
        assert_eq!(
            resolve_api_key(Some("  "), &path).as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn missing_file_without_env_yields_none_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");
        // Whatever the environment holds, a set env var must be non-empty.
        if std::env::var(API_KEY_VAR).is_err() {
            assert!(resolve_api_key(None, &missing).is_none());
        }
    }
}
