use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A `/`-separated path guaranteed to be relative and to stay inside the
/// project root.
///
/// Stored as a normalized string so generated trees and import strings are
/// identical on every host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the path is absolute or escapes the root. Use `try_new` for
    /// paths that do not come from the static catalog.
    pub fn new(path: impl AsRef<str>) -> Self {
        match Self::try_new(path.as_ref()) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible constructor. Backslashes are treated as separators.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let normalized = raw.replace('\\', "/");
        let invalid = || DomainError::InvalidPath { path: raw.into() };

        if normalized.is_empty() || normalized.starts_with('/') || Path::new(raw).is_absolute() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid()),
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(invalid());
        }
        Ok(Self(segments.join("/")))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::try_new(format!("{}/{}", self.0, segment.as_ref()))
    }

    /// Parent directory, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, n)| n)
    }

    /// Path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    pub fn extension(&self) -> Option<&str> {
        self.file_name().rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Whether this is a Python source file.
    pub fn is_python(&self) -> bool {
        self.extension() == Some("py")
    }

    pub fn starts_with(&self, dir: &str) -> bool {
        self.0 == dir || self.0.starts_with(&format!("{dir}/"))
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Permissions {
    readable: bool,
    writable: bool,
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: false,
        }
    }

    /// Shell scripts such as `scripts/prestart.sh`.
    pub const fn executable() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: true,
        }
    }

    pub const fn readable(&self) -> bool {
        self.readable
    }
    pub const fn writable(&self) -> bool {
        self.writable
    }
    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dots() {
        let p = RelativePath::try_new("./app\\core//security.py").unwrap();
        assert_eq!(p.as_str(), "app/core/security.py");
    }

    #[test]
    fn rejects_absolute_and_escaping_paths() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("app/../../x").is_err());
        assert!(RelativePath::try_new("").is_err());
    }

    #[test]
    fn parent_and_file_name() {
        let p = RelativePath::new("app/domains/users/models/user.py");
        assert_eq!(p.file_name(), "user.py");
        assert_eq!(p.parent().unwrap().as_str(), "app/domains/users/models");
        assert!(RelativePath::new("README.md").parent().is_none());
        assert!(p.is_python());
        assert!(!RelativePath::new("migrations/script.py.mako").is_python());
    }

    #[test]
    fn starts_with_respects_segments() {
        let p = RelativePath::new("app/main.py");
        assert!(p.starts_with("app"));
        assert!(!RelativePath::new("apps/main.py").starts_with("app"));
    }

    #[test]
    fn executable_permission() {
        assert!(Permissions::executable().executable_flag());
        assert!(!Permissions::default().executable_flag());
    }
}
