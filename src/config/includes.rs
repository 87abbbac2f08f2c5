//! Include directive logic
// (c) 2024 Ross Younger

use std::path::{Path, PathBuf};

use super::ConfigError;

/// Works out which file an `Include` argument refers to.
///
/// `~` and `~user` prefixes expand to home directories. Other relative paths
/// are taken relative to `basepath`, the directory of the including file.
pub(super) fn resolve_include_path(arg: &str, basepath: &Path) -> Result<PathBuf, ConfigError> {
    let path = if arg.starts_with('~') {
        expanduser::expanduser(arg).map_err(|e| ConfigError::Io {
            what: "Include file",
            path: arg.to_owned(),
            resolved: None,
            kind: e.kind(),
        })?
    } else {
        PathBuf::from(arg)
    };
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(basepath.join(path))
    }
}

#[cfg(test)]
mod test {
    use super::resolve_include_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn relative_to_base() {
        let base = Path::new("/home/wry/.ssh");
        assert_eq!(
            resolve_include_path("conf.d/extra", base).unwrap(),
            PathBuf::from("/home/wry/.ssh/conf.d/extra")
        );
        assert_eq!(
            resolve_include_path("/etc/ssh/other", base).unwrap(),
            PathBuf::from("/etc/ssh/other")
        );
    }

    #[test]
    fn tilde_expansion_current_user() {
        let p = resolve_include_path("~/.ssh/extra", Path::new("/elsewhere")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with(".ssh/extra"));
        assert!(!p.starts_with("/elsewhere"));
    }

    #[test]
    #[ignore] // depends on the accounts present on the machine
    fn tilde_expansion_arbitrary_user() {
        let p = resolve_include_path("~root/x", Path::new("/elsewhere")).unwrap();
        println!("{p:?}");
        assert!(p.is_absolute());
    }
}
