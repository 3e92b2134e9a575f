// File Retention
// Keeps the newest N files of a directory (config backups, session logs)

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Delete the oldest files in `dir` whose name passes `matches`, keeping `keep`.
///
/// Age is the modification time; file names break ties, which suits the
/// timestamped names used for backups and logs. Returns how many were removed.
pub fn prune_oldest<F>(dir: &Path, keep: usize, matches: F) -> io::Result<usize>
where
    F: Fn(&str) -> bool,
{
    let mut entries: Vec<(SystemTime, String)> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map_or(false, |t| t.is_file()))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            if !matches(&name) {
                return None;
            }
            let modified = e
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, name))
        })
        .collect();

    if entries.len() <= keep {
        return Ok(0);
    }

    entries.sort();
    let remove_count = entries.len() - keep;
    let mut removed = 0;
    for (_, name) in entries.into_iter().take(remove_count) {
        if fs::remove_file(dir.join(name)).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}
