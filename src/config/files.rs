//! File parsing internals
// (c) 2024 Ross Younger

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use tracing::trace;

use super::{
    lines::{parse_line, Line},
    ConfigError, GlobalConfig,
};

/// Source of configuration file contents
pub trait FileReader {
    /// Reads the whole of a file
    fn read(&self, path: &Path) -> impl Future<Output = std::io::Result<Vec<u8>>>;
}

/// Reads configuration files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileReader for LocalFiles {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

///////////////////////////////////////////////////////////////////////////////////////

/// The state of one parse invocation.
///
/// A fresh one is created for each file, including each included file;
/// they all share the same [`GlobalConfig`].
pub(super) struct Execution<'a, R: FileReader> {
    pub(super) global: &'a mut GlobalConfig,
    /// Index into `global.configs` of the block being populated, if any
    pub(super) current: Option<usize>,
    /// Relative Include paths are resolved against this
    pub(super) basepath: PathBuf,
    /// Where the text came from, for diagnostics
    pub(super) source: String,
    pub(super) reader: &'a R,
    pub(super) depth: u8,
}

impl<'a, R: FileReader> Execution<'a, R> {
    pub(super) fn new(
        global: &'a mut GlobalConfig,
        basepath: &Path,
        source: &str,
        reader: &'a R,
    ) -> Self {
        Self {
            global,
            current: None,
            basepath: basepath.to_path_buf(),
            source: source.to_owned(),
            reader,
            depth: 0,
        }
    }

    /// Creates the context for parsing an included file
    pub(super) fn nested(&mut self, path: &Path) -> Execution<'_, R> {
        Execution {
            global: &mut *self.global,
            current: self.current,
            basepath: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            source: path.display().to_string(),
            reader: self.reader,
            depth: self.depth + 1,
        }
    }

    /// Interprets the text line by line.
    ///
    /// Any error is annotated with the (1-based) line it occurred on.
    pub(super) async fn parse(&mut self, content: &str) -> Result<()> {
        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let context = || format!("Error on line {line_number}");
            match parse_line(line).with_context(context)? {
                Line::Empty => (),
                Line::Unknown { keyword } => {
                    trace!(
                        "ignoring unsupported keyword {keyword} at {} line {line_number}",
                        self.source
                    );
                }
                Line::Directive { keyword, args } => {
                    self.dispatch(keyword, args, line_number)
                        .await
                        .with_context(context)?;
                }
            }
        }
        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////////////////////

/// Parses configuration text that did not come from a file.
///
/// Relative `Include` paths are resolved against `basepath`.
pub async fn parse_config_str<R: FileReader>(
    content: &str,
    basepath: &Path,
    reader: &R,
) -> Result<GlobalConfig> {
    parse_source(content, basepath, "<string>", reader).await
}

/// Parses a configuration file, and everything it includes, from the local filesystem.
pub async fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<GlobalConfig> {
    parse_config_file_with(path, &LocalFiles).await
}

/// Parses a configuration file, and everything it includes, via the given reader.
pub async fn parse_config_file_with<P: AsRef<Path>, R: FileReader>(
    path: P,
    reader: &R,
) -> Result<GlobalConfig> {
    let path = path.as_ref();
    let content = reader.read(path).await.map_err(|e| ConfigError::Io {
        what: "file",
        path: path.display().to_string(),
        resolved: None,
        kind: e.kind(),
    })?;
    let basepath = path.parent().unwrap_or(Path::new(""));
    parse_source(
        &String::from_utf8_lossy(&content),
        basepath,
        &path.display().to_string(),
        reader,
    )
    .await
}

async fn parse_source<R: FileReader>(
    content: &str,
    basepath: &Path,
    source: &str,
    reader: &R,
) -> Result<GlobalConfig> {
    let mut global = GlobalConfig {
        source: source.to_owned(),
        ..Default::default()
    };
    let mut exec = Execution::new(&mut global, basepath, source, reader);
    exec.parse(content).await?;
    Ok(global)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
pub(super) mod test_util {
    use std::{
        collections::BTreeMap,
        io::{Error, ErrorKind},
        path::{Path, PathBuf},
    };

    use super::FileReader;

    /// An in-memory filesystem
    #[derive(Debug, Default)]
    pub(crate) struct MemoryFiles(BTreeMap<PathBuf, String>);

    impl MemoryFiles {
        pub(crate) fn with<P: Into<PathBuf>>(mut self, path: P, content: &str) -> Self {
            let _ = self.0.insert(path.into(), content.to_owned());
            self
        }
    }

    impl FileReader for MemoryFiles {
        async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
            self.0
                .get(path)
                .map(|s| s.as_bytes().to_vec())
                .ok_or_else(|| Error::from(ErrorKind::NotFound))
        }
    }
}
