//! Verifier vocabulary: extracted references, findings and the report.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::common::RelativePath;

/// How a reference was written in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// `import x` / `from x import y`.
    Import,
    /// A dotted module spec in a string or config value, e.g.
    /// `"app.workers.tasks"` or `app.main:app`.
    ModuleSpec,
}

/// An extracted `(source file, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReference {
    pub file: RelativePath,
    /// 1-based line number.
    pub line: usize,
    /// The statement or token as written.
    pub raw: String,
    /// Dotted target, possibly with leading dots for relative imports.
    pub target: String,
    /// Explicit `:attr` suffix of a module spec.
    pub attribute: Option<String>,
    /// Names listed after `from X import`, as written before any `as`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    pub kind: ReferenceKind,
}

impl ImportReference {
    pub fn is_relative(&self) -> bool {
        self.target.starts_with('.')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum FindingReason {
    /// No file in the tree provides the module.
    Unresolved { module: String },
    /// The module exists but a package directory on its way lacks `__init__.py`.
    MissingPackageMarker { package: String },
    /// A relative import climbs above the Python root.
    BeyondRoot,
}

impl fmt::Display for FindingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { module } => write!(f, "unresolved module '{module}'"),
            Self::MissingPackageMarker { package } => {
                write!(f, "missing package marker in '{package}'")
            }
            Self::BeyondRoot => f.write_str("relative import escapes the package root"),
        }
    }
}

/// One unresolved reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: RelativePath,
    pub line: usize,
    pub raw: String,
    pub reason: FindingReason,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} ({})", self.file, self.line, self.raw, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub files_checked: usize,
    pub references_checked: usize,
    pub findings: Vec<Finding>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings_in<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.file.as_str() == file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_display_names_file_and_reason() {
        let finding = Finding {
            file: "app/main.py".into(),
            line: 3,
            raw: "from app.core.security import get_current_user".into(),
            reason: FindingReason::Unresolved {
                module: "app.core.security".into(),
            },
        };
        let text = finding.to_string();
        assert!(text.starts_with("app/main.py:3:"));
        assert!(text.contains("unresolved module 'app.core.security'"));
    }

    #[test]
    fn empty_report_is_clean() {
        let report = ConsistencyReport::default();
        assert!(report.is_clean());
        assert_eq!(report.findings_in("app/main.py").count(), 0);
    }
}
