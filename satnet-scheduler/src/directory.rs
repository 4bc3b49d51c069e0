//! Epoch file directory listing (§4.4): files are selected by a glob
//! pattern and ordered by the numeric suffix in the filename, not by the
//! `time` field inside them.

use std::path::{Path, PathBuf};

use regex::Regex;
use satnet_schema::SatNetError;

/// Lists the files in `dir` matching `file_pattern` (a shell glob such as
/// `epoch-*.json`), ordered by the first run of digits in the file stem.
pub fn list_epoch_files(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>, SatNetError> {
    let matcher = glob_to_regex(file_pattern)?;

    let mut entries: Vec<(u64, PathBuf)> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !matcher.is_match(&name) {
                return None;
            }
            let suffix = numeric_suffix(&name)?;
            Some((suffix, entry.path().to_path_buf()))
        })
        .collect();

    entries.sort_by_key(|(suffix, _)| *suffix);
    Ok(entries.into_iter().map(|(_, path)| path).collect())
}

fn numeric_suffix(name: &str) -> Option<u64> {
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    let digits: String = stem.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.chars().rev().collect::<String>().parse().ok()
}

fn glob_to_regex(pattern: &str) -> Result<Regex, SatNetError> {
    let mut escaped = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => escaped.push_str(".*"),
            '?' => escaped.push('.'),
            c if "\\.+()|[]{}^$".contains(c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped.push('$');
    Regex::new(&escaped).map_err(|e| SatNetError::ValidationError(format!("invalid file pattern {pattern:?}: {e}")))
}
