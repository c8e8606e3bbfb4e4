//! Import consistency verifier.
//!
//! Extracts every in-project reference from a [`GeneratedTree`] and checks it
//! against the files actually present in that tree. The module catalog is
//! never consulted, so the verifier also works on projects read back from
//! disk.
//!
//! ## What counts as a reference
//!
//! | File kind | Form | Example |
//! |-----------|------|---------|
//! | `*.py` | `from X import ...` | `from app.core.security import verify_password` |
//! | `*.py` | `from P import m` | `from app.api.v1.routes import health` |
//! | `*.py` | `import X[, Y as Z]` | `import app.models.user` |
//! | `*.py` | relative import | `from .service import UserService` |
//! | `*.py` | string module spec | `"app.workers.tasks"` |
//! | other | module spec token | `uvicorn app.main:app` |
//!
//! Absolute references count only when their first segment is a Python root
//! (`app`, `tests`). Module specs may end with one attribute
//! (`app.database.TORTOISE_ORM`). When `from X import ...` resolves `X` to a
//! package, each imported name must be a submodule of it or be bound in its
//! `__init__.py`.

use regex::Regex;
use tracing::{debug, instrument};

use crate::{
    domain::{
        ConsistencyReport, Finding, FindingReason, GeneratedTree, ImportReference, PYTHON_ROOTS,
        ReferenceKind, RelativePath,
    },
    error::{ApismithResult, Context},
};

const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";

pub struct ImportVerifier {
    from_import: Regex,
    plain_import: Regex,
    python_spec: Regex,
    text_spec: Regex,
}

impl ImportVerifier {
    pub fn new() -> ApismithResult<Self> {
        let roots = PYTHON_ROOTS.join("|");
        let dotted = format!(r"(?:{roots})(?:\.{IDENT})+");

        Ok(Self {
            from_import: Regex::new(
                r"^\s*from\s+(\.+[A-Za-z0-9_.]*|[A-Za-z_][A-Za-z0-9_.]*)\s+import\s+(.*)$",
            )
            .context("compiling from-import pattern")?,
            plain_import: Regex::new(r"^\s*import\s+(.+?)\s*$")
                .context("compiling import pattern")?,
            python_spec: Regex::new(&format!(r#"["']({dotted})(?::({IDENT}))?["']"#))
                .context("compiling module spec pattern")?,
            text_spec: Regex::new(&format!(r#"(?:^|[\s"'`=\[(])({dotted})(?::({IDENT}))?"#))
                .context("compiling text module spec pattern")?,
        })
    }

    /// Check every reference in `tree`.
    #[instrument(skip_all, fields(files = tree.len()))]
    pub fn verify(&self, tree: &GeneratedTree) -> ConsistencyReport {
        let references = self.extract(tree);
        let findings: Vec<Finding> = references
            .iter()
            .flat_map(|reference| {
                check(tree, reference).into_iter().map(|reason| Finding {
                    file: reference.file.clone(),
                    line: reference.line,
                    raw: reference.raw.clone(),
                    reason,
                })
            })
            .collect();

        debug!(
            references = references.len(),
            findings = findings.len(),
            "tree verified"
        );
        ConsistencyReport {
            files_checked: tree.len(),
            references_checked: references.len(),
            findings,
        }
    }

    /// All in-project references, in file then line order.
    pub fn extract(&self, tree: &GeneratedTree) -> Vec<ImportReference> {
        let mut references = Vec::new();
        for (path, file) in tree.files() {
            if path.is_python() {
                self.extract_python(path, &file.content, &mut references);
            } else {
                self.extract_text(path, &file.content, &mut references);
            }
        }
        references
    }

    fn extract_python(&self, path: &RelativePath, content: &str, out: &mut Vec<ImportReference>) {
        // Reference still collecting names from a parenthesized import list.
        let mut open_list: Option<usize> = None;

        for (index, line) in content.lines().enumerate() {
            if let Some(at) = open_list {
                let code = strip_comment(line);
                out[at].names.extend(imported_names(code));
                if code.contains(')') {
                    open_list = None;
                }
                continue;
            }

            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                continue;
            }
            let reference = |target: &str, kind| ImportReference {
                file: path.clone(),
                line: index + 1,
                raw: trimmed.trim_end().to_string(),
                target: target.to_string(),
                attribute: None,
                names: Vec::new(),
                kind,
            };

            if let Some(caps) = self.from_import.captures(line) {
                let target = &caps[1];
                if is_project_target(target) {
                    let list = strip_comment(&caps[2]);
                    if list.contains('(') && !list.contains(')') {
                        open_list = Some(out.len());
                    }
                    out.push(ImportReference {
                        names: imported_names(list),
                        ..reference(target, ReferenceKind::Import)
                    });
                }
                continue;
            }

            if let Some(caps) = self.plain_import.captures(line) {
                for name in caps[1].split(',') {
                    let name = name.split_whitespace().next().unwrap_or_default();
                    if is_project_target(name) {
                        out.push(reference(name, ReferenceKind::Import));
                    }
                }
                continue;
            }

            for caps in self.python_spec.captures_iter(line) {
                out.push(ImportReference {
                    raw: caps[0].to_string(),
                    attribute: caps.get(2).map(|m| m.as_str().to_string()),
                    ..reference(&caps[1], ReferenceKind::ModuleSpec)
                });
            }
        }
    }

    fn extract_text(&self, path: &RelativePath, content: &str, out: &mut Vec<ImportReference>) {
        for (index, line) in content.lines().enumerate() {
            for caps in self.text_spec.captures_iter(line) {
                let raw = caps[0].trim_start_matches(|c: char| !c.is_ascii_alphabetic());
                out.push(ImportReference {
                    file: path.clone(),
                    line: index + 1,
                    raw: raw.to_string(),
                    target: caps[1].to_string(),
                    attribute: caps.get(2).map(|m| m.as_str().to_string()),
                    names: Vec::new(),
                    kind: ReferenceKind::ModuleSpec,
                });
            }
        }
    }
}

fn is_project_target(target: &str) -> bool {
    if target.starts_with('.') {
        return true;
    }
    let first = target.split('.').next().unwrap_or_default();
    PYTHON_ROOTS.contains(&first)
}

fn strip_comment(code: &str) -> &str {
    code.split('#').next().unwrap_or_default()
}

/// `(name, binding)` pairs of an import list such as `a, b as c`.
fn import_list(list: &str) -> impl Iterator<Item = (&str, &str)> {
    list.split(',').filter_map(|item| {
        let mut words = item
            .trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '\\')
            .split_whitespace();
        let name = words.next().filter(|w| *w != "*")?;
        let binding = match (words.next(), words.next()) {
            (Some("as"), Some(alias)) => alias,
            _ => name,
        };
        Some((name, binding))
    })
}

fn imported_names(list: &str) -> Vec<String> {
    import_list(list).map(|(name, _)| name.to_string()).collect()
}

/// Whether `source` defines, assigns or imports `name` at any indentation.
fn binds_name(source: &str, name: &str) -> bool {
    source.lines().any(|line| {
        let code = strip_comment(line).trim();
        if let Some((_, list)) = code.strip_prefix("from ").and_then(|r| r.split_once(" import ")) {
            return import_list(list).any(|(_, binding)| binding == name);
        }
        if let Some(list) = code.strip_prefix("import ") {
            return import_list(list)
                .any(|(module, binding)| binding == name || module.split('.').next() == Some(name));
        }

        let declaration = code.strip_prefix("async ").unwrap_or(code);
        for keyword in ["def ", "class "] {
            if let Some(rest) = declaration.strip_prefix(keyword) {
                let ident = rest
                    .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .next()
                    .unwrap_or_default();
                return ident == name;
            }
        }

        code.strip_prefix(name).is_some_and(|after| {
            let after = after.trim_start();
            after.starts_with(':') || (after.starts_with('=') && !after.starts_with("=="))
        })
    })
}

/// Resolve one reference; empty when it is satisfied.
fn check(tree: &GeneratedTree, reference: &ImportReference) -> Vec<FindingReason> {
    match check_module(tree, reference) {
        Ok(file) => check_names(tree, reference, &file),
        Err(reason) => vec![reason],
    }
}

/// Names imported from a package must be submodules or bound by its
/// `__init__.py`.
fn check_names(
    tree: &GeneratedTree,
    reference: &ImportReference,
    file: &RelativePath,
) -> Vec<FindingReason> {
    if reference.names.is_empty() || file.file_name() != "__init__.py" {
        return Vec::new();
    }
    let package: Vec<String> = file
        .parent()
        .map(|p| p.segments().map(str::to_string).collect())
        .unwrap_or_default();
    let init = tree.get(file.as_str()).map_or("", |f| f.content.as_str());

    reference
        .names
        .iter()
        .filter(|name| {
            let mut submodule = package.clone();
            submodule.push((*name).clone());
            resolve_module(tree, &submodule).is_none() && !binds_name(init, name)
        })
        .map(|name| FindingReason::Unresolved {
            module: format!("{}.{name}", package.join(".")),
        })
        .collect()
}

/// Resolve the module part of a reference to the file providing it.
fn check_module(
    tree: &GeneratedTree,
    reference: &ImportReference,
) -> Result<RelativePath, FindingReason> {
    let segments = absolute_segments(reference).ok_or(FindingReason::BeyondRoot)?;

    let mut file = resolve_module(tree, &segments);
    // `app.database.TORTOISE_ORM`: the last segment may name an attribute.
    let implicit_attribute = reference.kind == ReferenceKind::ModuleSpec
        && reference.attribute.is_none()
        && segments.len() > 2;
    if file.is_none() && implicit_attribute {
        file = resolve_module(tree, &segments[..segments.len() - 1]);
    }

    let file = file.ok_or_else(|| FindingReason::Unresolved {
        module: segments.join("."),
    })?;
    match missing_marker(tree, &file) {
        Some(package) => Err(FindingReason::MissingPackageMarker { package }),
        None => Ok(file),
    }
}

/// Turn a possibly relative target into absolute dotted segments.
fn absolute_segments(reference: &ImportReference) -> Option<Vec<String>> {
    let target = reference.target.as_str();
    let rest = target.trim_start_matches('.');
    let dots = target.len() - rest.len();
    let tail = rest.split('.').filter(|s| !s.is_empty()).map(str::to_string);

    if dots == 0 {
        return Some(tail.collect());
    }

    // One dot is the file's own package; each extra dot climbs one level.
    let mut package: Vec<String> = reference
        .file
        .parent()?
        .segments()
        .map(str::to_string)
        .collect();
    for _ in 1..dots {
        package.pop();
    }
    if package.is_empty() {
        return None;
    }
    package.extend(tail);
    Some(package)
}

/// `a.b.c` → `a/b/c.py` or `a/b/c/__init__.py`.
fn resolve_module(tree: &GeneratedTree, segments: &[String]) -> Option<RelativePath> {
    if segments.is_empty() {
        return None;
    }
    let base = segments.join("/");
    [format!("{base}.py"), format!("{base}/__init__.py")]
        .into_iter()
        .filter_map(|candidate| RelativePath::try_new(candidate).ok())
        .find(|candidate| tree.contains(candidate.as_str()))
}

/// First package directory between the root and `file` lacking `__init__.py`.
fn missing_marker(tree: &GeneratedTree, file: &RelativePath) -> Option<String> {
    let mut packages = Vec::new();
    let mut dir = file.parent();
    while let Some(current) = dir {
        dir = current.parent();
        packages.push(current);
    }
    packages
        .into_iter()
        .rev()
        .find(|package| !tree.contains(&format!("{package}/__init__.py")))
        .map(|package| package.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(files: &[(&str, &str)]) -> GeneratedTree {
        GeneratedTree::from_files(
            files
                .iter()
                .map(|(path, content)| (RelativePath::new(path), content.to_string())),
        )
        .unwrap()
    }

    fn verifier() -> ImportVerifier {
        ImportVerifier::new().unwrap()
    }

    #[test]
    fn resolved_imports_are_clean() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/core/__init__.py", ""),
            ("app/core/security.py", "SECRET = 1\n"),
            (
                "app/main.py",
                "from fastapi import FastAPI\nfrom app.core.security import SECRET\nimport app.core.security as sec\n",
            ),
        ]);
        let report = verifier().verify(&tree);
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.references_checked, 2);
        assert_eq!(report.files_checked, 4);
    }

    #[test]
    fn unresolved_import_is_reported_with_line() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/main.py", "import os\n\nfrom app.cache import cache\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.line, 3);
        assert_eq!(finding.raw, "from app.cache import cache");
        assert_eq!(
            finding.reason,
            FindingReason::Unresolved {
                module: "app.cache".into()
            }
        );
    }

    #[test]
    fn function_local_imports_are_checked() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/main.py", "def f():\n    from app.models.user import User\n    return User\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.findings.len(), 1);
    }

    #[test]
    fn relative_imports_resolve_against_package() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/domains/__init__.py", ""),
            ("app/domains/users/__init__.py", ""),
            ("app/domains/users/models/__init__.py", "from .user import User\n"),
            ("app/domains/users/models/user.py", "class User: ...\n"),
            ("app/domains/users/service.py", "from .models.user import User\nfrom .missing import X\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 3);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].raw, "from .missing import X");
    }

    #[test]
    fn names_imported_from_a_package_must_exist() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/api/__init__.py", ""),
            ("app/main.py", "from app.api import users\nfrom . import ghost\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 2);
        let missing: Vec<_> = report.findings.iter().map(|f| f.reason.clone()).collect();
        assert_eq!(
            missing,
            vec![
                FindingReason::Unresolved { module: "app.api.users".into() },
                FindingReason::Unresolved { module: "app.ghost".into() },
            ]
        );
    }

    #[test]
    fn package_names_resolve_to_submodules_or_init_bindings() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/api/__init__.py", ""),
            ("app/api/users.py", ""),
            ("app/api/items/__init__.py", ""),
            ("app/models/__init__.py", "from .user import User  # noqa\n\n__all__ = [\"User\"]\n"),
            ("app/models/user.py", "class User: ...\n"),
            ("app/routes/__init__.py", "from fastapi import APIRouter\n\napi_router = APIRouter()\n"),
            (
                "app/main.py",
                "from app.api import users, items as item_routes\n\
                 from app.models import User  # noqa: F401\n\
                 from app.routes import api_router\n\
                 from . import (\n    api,\n    models,\n)\n",
            ),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 5);
        assert!(report.findings.is_empty(), "{:?}", report.findings);
    }

    #[test]
    fn parenthesized_names_are_checked_across_lines() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/api/__init__.py", "def health(): ...\n"),
            ("app/main.py", "from app.api import (\n    health,\n    stale,\n)\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.findings[0].reason,
            FindingReason::Unresolved { module: "app.api.stale".into() }
        );
    }

    #[test]
    fn relative_import_above_root_is_reported() {
        let tree = tree(&[("app/main.py", "from ...x import y\n"), ("app/__init__.py", "")]);
        let report = verifier().verify(&tree);
        assert_eq!(report.findings[0].reason, FindingReason::BeyondRoot);
    }

    #[test]
    fn missing_package_marker_is_reported() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/core/security.py", ""),
            ("app/main.py", "from app.core.security import x\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(
            report.findings[0].reason,
            FindingReason::MissingPackageMarker {
                package: "app/core".into()
            }
        );
    }

    #[test]
    fn string_module_specs_in_python() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/workers/__init__.py", ""),
            ("app/workers/tasks.py", ""),
            (
                "app/workers/worker.py",
                "celery = Celery(include=[\"app.workers.tasks\"])\nTORTOISE = {\"models\": [\"app.models.user\"]}\n",
            ),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 2);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].raw, "\"app.models.user\"");
    }

    #[test]
    fn text_specs_allow_one_attribute() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/main.py", "app = None\n"),
            ("app/database.py", "TORTOISE_ORM = {}\n"),
            (
                "docker-compose.yml",
                "    command: uvicorn app.main:app --host 0.0.0.0\n",
            ),
            (
                "pyproject.toml",
                "[tool.aerich]\ntortoise_orm = \"app.database.TORTOISE_ORM\"\nlocation = \"./migrations\"\n",
            ),
            ("README.md", "Run `app.worker:run` or read app/main.py.\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 3);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].file.as_str(), "README.md");
        assert_eq!(report.findings[0].raw, "app.worker:run");
    }

    #[test]
    fn third_party_and_comments_are_ignored() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            (
                "app/main.py",
                "# from app.nothing import x\nfrom sqlalchemy.orm import Session\nimport json, logging\n",
            ),
            ("Dockerfile", "COPY ./app ./app\nENV APP_ENV=production\n"),
        ]);
        let report = verifier().verify(&tree);
        assert_eq!(report.references_checked, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn mutually_referential_files_pass() {
        let tree = tree(&[
            ("app/__init__.py", ""),
            ("app/a.py", "from app.b import B\n"),
            ("app/b.py", "def f():\n    from app.a import A\n"),
        ]);
        assert!(verifier().verify(&tree).is_clean());
    }
}
