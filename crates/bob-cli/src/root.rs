use std::path::{Path, PathBuf};

/// Resolve the bob project root.
///
/// Priority:
/// 1. `--root` flag / `BOB_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `bob_config.json`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(&cwd)
}

fn resolve_from(cwd: &Path) -> PathBuf {
    let marker = |dir: &Path| dir.join(bob_core::paths::CONFIG_FILE).is_file();
    if let Some(found) = find_upward(cwd, marker) {
        return found;
    }
    if let Some(found) = find_upward(cwd, |dir| dir.join(".git").is_dir()) {
        return found;
    }
    cwd.to_path_buf()
}

fn find_upward(start: &Path, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| matches(dir))
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_config_above_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bob_config.json"), "{}").unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(resolve_from(&subdir), dir.path());
    }

    #[test]
    fn config_beats_enclosing_git_repo() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let project = dir.path().join("planning");
        std::fs::create_dir_all(project.join("docs")).unwrap();
        std::fs::write(project.join("bob_config.json"), "{}").unwrap();

        assert_eq!(resolve_from(&project.join("docs")), project);
    }

    #[test]
    fn falls_back_to_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let subdir = dir.path().join("a/b");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(resolve_from(&subdir), dir.path());
    }
}
