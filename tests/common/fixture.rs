use std::{env, fs, path::{Path, PathBuf}, ops::Deref, fmt::{self, Formatter, Display}};
use tempfile::TempDir;

pub const TEST_DATA_DIR: &str = "tests/test-data";

/// A test file or directory, living within its own temporary directory.
/// The temporary directory is removed once the fixture is dropped.
pub struct Fixture {
    path    : PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    /// Reserve a path within a fresh temporary directory, without creating anything.
    pub fn blank(filename: &str) -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let name = Path::new(filename).file_name().expect("Invalid fixture filename");
        Fixture{path: tempdir.path().join(name), _tempdir: tempdir}
    }

    /// Copy a file of `tests/test-data` within a fresh temporary directory.
    pub fn copy(relative_path: &str) -> Self {
        let root_dir = env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
        let source = Path::new(&root_dir).join(TEST_DATA_DIR).join(relative_path);
        let fixture = Fixture::blank(relative_path);
        fs::copy(&source, &fixture.path)
            .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {e}", source.display()));
        fixture
    }

    /// Write `contents` within a file of a fresh temporary directory.
    pub fn write(filename: &str, contents: &str) -> Self {
        let fixture = Fixture::blank(filename);
        fs::write(&fixture.path, contents).expect("Failed to write fixture contents");
        fixture
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path.deref()
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.to_str().expect("Invalid path (non UTF8 characters ?)"))
    }
}
