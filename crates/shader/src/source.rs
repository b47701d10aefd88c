use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Reads shader sources and reports when they last changed.
pub trait SourceLoader {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

impl<T: SourceLoader + ?Sized> SourceLoader for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }
}

/// [`SourceLoader`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSourceLoader;

impl SourceLoader for FsSourceLoader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}

/// The vertex/fragment file pair a program is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// Vertex stage source file.
    pub vertex: PathBuf,
    /// Fragment stage source file.
    pub fragment: PathBuf,
}

impl SourcePaths {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// In-memory [`SourceLoader`] with a manual clock.
///
/// Every write advances the clock by one second, so "file changed" can be
/// simulated without filesystem timestamp granularity getting in the way.
#[derive(Debug, Default)]
pub struct MemorySourceLoader {
    files: RefCell<HashMap<PathBuf, (String, SystemTime)>>,
    clock: Cell<u64>,
}

impl MemorySourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a file and bumps its modification time.
    pub fn write(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let stamp = self.tick();
        self.files
            .borrow_mut()
            .insert(path.into(), (contents.into(), stamp));
    }

    /// Bumps the modification time without changing the contents.
    /// Returns `false` if the file does not exist.
    pub fn touch(&self, path: impl AsRef<Path>) -> bool {
        let stamp = self.tick();
        match self.files.borrow_mut().get_mut(path.as_ref()) {
            Some(entry) => {
                entry.1 = stamp;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files.borrow_mut().remove(path.as_ref()).is_some()
    }

    fn tick(&self) -> SystemTime {
        let next = self.clock.get() + 1;
        self.clock.set(next);
        SystemTime::UNIX_EPOCH + Duration::from_secs(next)
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no in-memory source at {}", path.display()),
        )
    }
}

impl SourceLoader for MemorySourceLoader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .map(|(contents, _)| contents.clone())
            .ok_or_else(|| Self::not_found(path))
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .borrow()
            .get(path)
            .map(|(_, stamp)| *stamp)
            .ok_or_else(|| Self::not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_loader_reads_contents_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.vert");
        std::fs::write(&path, "void main() {}").unwrap();

        let loader = FsSourceLoader;
        assert_eq!(loader.read_to_string(&path).unwrap(), "void main() {}");
        assert!(loader.modified(&path).is_ok());
    }

    #[test]
    fn fs_loader_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.frag");
        let loader = FsSourceLoader;
        assert_eq!(
            loader.read_to_string(&path).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(loader.modified(&path).is_err());
    }

    #[test]
    fn memory_loader_touch_advances_mtime_only() {
        let loader = MemorySourceLoader::new();
        loader.write("s.vert", "body");
        let before = loader.modified(Path::new("s.vert")).unwrap();

        assert!(loader.touch("s.vert"));
        let after = loader.modified(Path::new("s.vert")).unwrap();
        assert!(after > before);
        assert_eq!(loader.read_to_string(Path::new("s.vert")).unwrap(), "body");
    }

    #[test]
    fn memory_loader_missing_paths() {
        let loader = MemorySourceLoader::new();
        assert!(!loader.touch("nope"));
        assert!(!loader.remove("nope"));
        assert!(loader.read_to_string(Path::new("nope")).is_err());
    }

    #[test]
    fn loader_by_reference() {
        fn read_via<L: SourceLoader>(loader: L) -> String {
            loader.read_to_string(Path::new("x")).unwrap()
        }
        let loader = MemorySourceLoader::new();
        loader.write("x", "shared");
        assert_eq!(read_via(&loader), "shared");
    }
}
