/// Directory eligibility and date extraction for top-level project folders.
use std::collections::BTreeSet;
use std::path::Path;

/// Whether a top-level entry of a drive should be cataloged.
///
/// Eligible entries are directories whose name neither starts with `.` nor
/// appears on the directory blacklist. Plain files are never eligible.
pub fn is_eligible(path: &Path, blacklisted_directories: &BTreeSet<String>) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    path.is_dir() && !name.starts_with('.') && !blacklisted_directories.contains(name.as_ref())
}

/// The `YYYY-MM-DD` prefix of a directory name, if it has one.
///
/// The first ten characters must be four digits, a separator, two digits,
/// a separator, two digits. Separators are any non-word character, so
/// `2023.01.15` and `2023 01 15` match while `2023_01_15` does not.
/// The digits are not checked for being a real calendar date.
pub fn date_from_dir_name(name: &str) -> Option<String> {
    let prefix: Vec<char> = name.chars().take(10).collect();
    if prefix.len() != 10 {
        return None;
    }
    let matches = prefix.iter().enumerate().all(|(i, &c)| match i {
        4 | 7 => is_non_word(c),
        _ => c.is_ascii_digit(),
    });
    matches.then(|| prefix.into_iter().collect())
}

fn is_non_word(c: char) -> bool {
    !c.is_alphanumeric() && c != '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn date_prefix_is_extracted() {
        assert_eq!(date_from_dir_name("2023-01-15_trip").as_deref(), Some("2023-01-15"));
        assert_eq!(date_from_dir_name("2023-01-15-x").as_deref(), Some("2023-01-15"));
        assert_eq!(date_from_dir_name("2023-01-15").as_deref(), Some("2023-01-15"));
        assert_eq!(date_from_dir_name("2023.01.15 wedding").as_deref(), Some("2023.01.15"));
    }

    #[test]
    fn non_dates_are_absent() {
        assert_eq!(date_from_dir_name("not-a-date-dir"), None);
        assert_eq!(date_from_dir_name("2023011_trip"), None);
        assert_eq!(date_from_dir_name("20230115_trip"), None);
        assert_eq!(date_from_dir_name("2023_01_15"), None);
        assert_eq!(date_from_dir_name("2023-01-1"), None);
        assert_eq!(date_from_dir_name(""), None);
    }

    #[test]
    fn eligibility_rules() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join(".git")).unwrap();
        fs::create_dir(root.join("System Volume Information")).unwrap();
        fs::create_dir(root.join("2024-05-01_shoot")).unwrap();
        fs::write(root.join("notes.txt"), b"hello").unwrap();

        let blacklist: BTreeSet<String> = ["System Volume Information".to_string()].into();

        assert!(!is_eligible(&root.join(".git"), &blacklist));
        assert!(!is_eligible(&root.join("System Volume Information"), &blacklist));
        assert!(is_eligible(&root.join("2024-05-01_shoot"), &blacklist));
        assert!(!is_eligible(&root.join("notes.txt"), &blacklist));
        assert!(!is_eligible(&root.join("missing"), &blacklist));
    }
}
