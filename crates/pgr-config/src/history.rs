//! Search-history file: one pattern per line, newest last, appended on
//! demand and de-duplicated against only the immediately preceding entry
//! (so repeating a search doesn't spam the file, but alternating between
//! two patterns keeps both occurrences).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn discover() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("pgr").join("search_history"),
        None => PathBuf::from("pgr_search_history"),
    }
}

pub fn load(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn append(path: &Path, entry: &str) -> std::io::Result<()> {
    if entry.is_empty() {
        return Ok(());
    }
    let mut history = load(path);
    if history.last().map(String::as_str) == Some(entry) {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    history.push(entry.to_string());
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{entry}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pgr-history-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn consecutive_duplicate_entries_are_not_appended_twice() {
        let path = temp_path("dedupe");
        let _ = std::fs::remove_file(&path);
        append(&path, "select *").unwrap();
        append(&path, "select *").unwrap();
        assert_eq!(load(&path), vec!["select *".to_string()]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn alternating_entries_both_persist() {
        let path = temp_path("alternate");
        let _ = std::fs::remove_file(&path);
        append(&path, "a").unwrap();
        append(&path, "b").unwrap();
        append(&path, "a").unwrap();
        assert_eq!(load(&path), vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        let _ = std::fs::remove_file(&path);
    }
}
