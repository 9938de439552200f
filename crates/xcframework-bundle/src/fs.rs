//! Filesystem access.
//!
//! Everything that touches the disk goes through [`FileSystem`], so the
//! selection and copy logic can run against [`MemoryFileSystem`] in tests.

use crate::{BundleError, BundleResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::info;

/// Filesystem operations needed to read a bundle and populate a target.
pub trait FileSystem {
    /// Check whether an entry exists (dangling symlinks count).
    fn exists(&self, path: &Path) -> bool;

    /// Check whether a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file, symlink or directory tree.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Copy a file or directory tree. Fails if `to` already exists.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// List the entries directly under a directory, sorted by path.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Copy `from` to `to`, removing whatever is at `to` first.
///
/// Not atomic: a failure after the removal leaves `to` absent. Re-running
/// the copy is the recovery path.
pub fn copy_with_overwrite(fs: &dyn FileSystem, from: &Path, to: &Path) -> BundleResult<()> {
    if fs.exists(to) {
        info!("Removing {}", to.display());
        fs.remove(to).map_err(|source| BundleError::CopyFailure {
            operation: "remove",
            path: to.to_path_buf(),
            source,
        })?;
    }

    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
        && !fs.is_dir(parent)
    {
        fs.create_dir_all(parent)
            .map_err(|source| BundleError::CopyFailure {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
    }

    info!("Copying {} to {}", from.display(), to.display());
    fs.copy(from, to).map_err(|source| BundleError::CopyFailure {
        operation: "copy",
        path: from.to_path_buf(),
        source,
    })
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let metadata = fs::symlink_metadata(path)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.exists(to) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("destination already exists: {}", to.display()),
            ));
        }
        copy_entry(from, to)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(from)?;

    if metadata.file_type().is_symlink() {
        copy_symlink(from, to)
    } else if metadata.is_dir() {
        copy_dir(from, to)
    } else {
        fs::copy(from, to).map(|_| ())
    }
}

fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        copy_entry(&entry.path(), &to.join(entry.file_name()))?;
    }
    Ok(())
}

// Framework bundles rely on relative links such as `Versions/Current`.
#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    std::os::unix::fs::symlink(target, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    if fs::metadata(from)?.is_dir() {
        copy_dir(from, to)
    } else {
        fs::copy(from, to).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory [`FileSystem`].
///
/// Paths are compared component-wise and never touch the real disk.
/// Root paths (`/`, or the empty relative root) always exist as directories.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut nodes = self.nodes.lock();
        insert_parents(&mut nodes, path);
        nodes.insert(path.to_path_buf(), Node::File(contents.into()));
    }

    /// Add a directory, creating its parent directories.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut nodes = self.nodes.lock();
        insert_parents(&mut nodes, path);
        nodes.insert(path.to_path_buf(), Node::Dir);
    }

    /// All entries at or below `root`, in path order.
    #[must_use]
    pub fn entries_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.nodes
            .lock()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect()
    }
}

fn is_root(path: &Path) -> bool {
    path.parent().is_none()
}

fn insert_parents(nodes: &mut BTreeMap<PathBuf, Node>, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
        if is_root(ancestor) {
            break;
        }
        nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        is_root(path) || self.nodes.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        is_root(path) || matches!(self.nodes.lock().get(path), Some(Node::Dir))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.nodes.lock();
        for ancestor in path.ancestors() {
            if is_root(ancestor) {
                break;
            }
            if let Some(Node::File(_)) = nodes.get(ancestor) {
                return Err(io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!("not a directory: {}", ancestor.display()),
                ));
            }
        }
        insert_parents(&mut nodes, path);
        if !is_root(path) {
            nodes.insert(path.to_path_buf(), Node::Dir);
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.nodes.lock();
        if !nodes.contains_key(path) {
            return Err(not_found(path));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut nodes = self.nodes.lock();
        if !nodes.contains_key(from) {
            return Err(not_found(from));
        }
        if nodes.contains_key(to) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("destination already exists: {}", to.display()),
            ));
        }
        if let Some(parent) = to.parent()
            && !is_root(parent)
            && !matches!(nodes.get(parent), Some(Node::Dir))
        {
            return Err(not_found(parent));
        }

        let copied: Vec<(PathBuf, Node)> = nodes
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .filter_map(|(p, node)| {
                let relative = p.strip_prefix(from).ok()?;
                let dest = if relative.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(relative)
                };
                Some((dest, node.clone()))
            })
            .collect();
        nodes.extend(copied);
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let nodes = self.nodes.lock();
        if !is_root(path) && !matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(not_found(path));
        }
        Ok(nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.lock().get(path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found(path)),
        }
    }
}
