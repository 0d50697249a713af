use std::path::PathBuf;

use ahash::AHashMap;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no content root for path {0:?}")]
    UnknownRoot(String),

    #[error("malformed vfs path {0:?}")]
    BadPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps named content roots to directories on disk. Paths look like
/// `/root/rest/of/path` and resolve against the registered root.
pub struct Vfs {
    roots: AHashMap<String, PathBuf>,
}

impl Vfs {
    pub fn new() -> Self {
        Self {
            roots: AHashMap::new(),
        }
    }

    pub fn add_root(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.roots.insert(name.into(), path.into());
    }

    pub fn real_path(&self, path: &str) -> Result<PathBuf, Error> {
        let root_name =
            content_root_for_path(path).ok_or_else(|| Error::BadPath(path.to_owned()))?;

        let root = self
            .roots
            .get(root_name)
            .ok_or_else(|| Error::UnknownRoot(path.to_owned()))?;

        let relative_path = path
            .strip_prefix('/')
            .and_then(|path| path.strip_prefix(root_name))
            .and_then(|path| path.strip_prefix('/'))
            .ok_or_else(|| Error::BadPath(path.to_owned()))?;

        Ok(root.join(relative_path))
    }

    pub fn load_string(&self, path: &str) -> Result<String, Error> {
        Ok(std::fs::read_to_string(self.real_path(path)?)?)
    }
}

fn content_root_for_path(path: &str) -> Option<&str> {
    path.strip_prefix('/')?.split('/').next()
}
