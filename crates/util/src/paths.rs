use std::{
    borrow::Cow,
    env, fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use uuid::Uuid;

/// Name of the subdirectory we own within the platform's config directory
const APP_DIRECTORY: &str = "swagexpand";

/// Lock for the log file path. A random file name is generated once during
/// startup, then used for that session
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Get the path of the directory to contain the config file. **Directory may
/// not exist yet**, caller must create it.
pub fn config_directory() -> PathBuf {
    // Config dir is missing on some exotic platforms. Fall back to the working
    // directory rather than failing, since config is optional
    // https://docs.rs/dirs/latest/dirs/fn.config_dir.html
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIRECTORY)
}

/// Get the path to the log file. Each session gets a unique file within a
/// temporary directory. The parent directory **may not exist yet.** Caller must
/// ensure it is created.
pub fn log_file() -> PathBuf {
    LOG_FILE
        .get_or_init(|| {
            // Temp dir isn't guaranteed to be unique, so make sure the file
            // name is
            let file_name = format!("{APP_DIRECTORY}-{}.log", Uuid::new_v4());
            env::temp_dir().join(file_name)
        })
        .clone()
}

/// Ensure the parent directory of a file path exists
pub fn create_parent(path: &Path) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "Cannot create directory for path {path}; it has no parent",
                path = path.display()
            ),
        )
    })?;
    fs::create_dir_all(parent)
}

/// Expand a leading `~` in a path into the user's home directory. Only expand
/// if the `~` is the sole component, or trailed by a slash. In other words,
/// `~test.txt` will *not* be expanded. Given path will be cloned only if it
/// is expanded.
pub fn expand_home<'a>(path: impl Into<Cow<'a, Path>>) -> Cow<'a, Path> {
    let path: Cow<_> = path.into();
    match path.strip_prefix("~") {
        Ok(rest) => {
            let Some(home_dir) = dirs::home_dir() else {
                return path;
            };
            home_dir.join(rest).into()
        }
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", "")]
    #[case::plain("test.txt", "test.txt")]
    #[case::tilde_only("~", "{HOME}")]
    #[case::tilde_dir("~/test.txt", "{HOME}/test.txt")]
    #[case::tilde_double("~/~/test.txt", "{HOME}/~/test.txt")]
    #[case::tilde_in_filename("~test.txt", "~test.txt")]
    #[case::tilde_middle("text/~/test.txt", "text/~/test.txt")]
    #[case::tilde_end("text/~", "text/~")]
    fn test_expand_home(#[case] path: PathBuf, #[case] expected: &str) {
        let expected = replace_home(expected);
        assert_eq!(expand_home(&path).as_ref(), PathBuf::from(expected));
    }

    /// Log file is stable within a session and lives in the temp dir
    #[test]
    fn test_log_file() {
        let path = log_file();
        assert_eq!(path, log_file());
        assert_eq!(path.parent(), Some(env::temp_dir().as_path()));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(
            file_name.starts_with("swagexpand-")
                && file_name.ends_with(".log"),
            "Unexpected log file name {file_name:?}"
        );
    }

    #[test]
    fn test_create_parent() {
        let root = env::temp_dir().join(Uuid::new_v4().to_string());
        let file = root.join("nested/dir/config.yml");
        create_parent(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
        fs::remove_dir_all(root).unwrap();
    }

    /// Replace `{HOME}` with the home directory. Used to generate expected
    /// strings with the correct home directory in a portable way
    fn replace_home(path: &str) -> String {
        // We're assuming this dependency is correct. This provides portability,
        // so the tests pass on windows
        let home = dirs::home_dir().unwrap();
        let home = home.to_str().unwrap();
        // Sanity check that it gave us a real dir
        assert!(!home.is_empty(), "Home dir is empty");
        path.replace("{HOME}", home)
    }
}
