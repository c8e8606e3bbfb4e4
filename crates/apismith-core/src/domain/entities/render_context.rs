//! Per-module rendering context.
//!
//! A `RenderContext` is everything one module template may look at: the
//! validated configuration, the module's own path, and the resolved location
//! of each dependency whose guard is true for this configuration.
//!
//! Templates never spell in-project import paths themselves. They ask the
//! context for [`RenderContext::import`] (the import expression for this
//! file) or [`RenderContext::module_path`] (the absolute dotted path, for
//! references from non-Python files or string module specs). Asking for a
//! module that is not an active dependency is an error, which keeps the
//! closure property checkable.
//!
//! ## Built-in Variables
//!
//! | Variable | Example |
//! |----------|---------|
//! | `PROJECT_NAME` | "shop-api" |
//! | `PROJECT_NAME_SNAKE` | "shop_api" |
//! | `PROJECT_NAME_KEBAB` | "shop-api" |
//! | `PROJECT_NAME_PASCAL` | "ShopApi" |
//! | `PROJECT_DESCRIPTION` | "ShopApi API" |
//! | `AUTHOR_NAME`, `AUTHOR_EMAIL` | from the configuration |
//! | `PYTHON_VERSION` | "3.12" |
//! | `PYTHON_TAG` | "py312" |

use std::collections::BTreeMap;

use crate::domain::{
    entities::{common::RelativePath, config::ProjectConfig, module::ModuleId},
    error::DomainError,
};

/// Where an active dependency ended up in this tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Import expression to use from the rendering module (`app.core.security`
    /// or `.service`).
    pub import: String,
    /// Absolute dotted module path.
    pub module_path: String,
}

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    config: &'a ProjectConfig,
    module: ModuleId,
    path: RelativePath,
    dependencies: BTreeMap<ModuleId, ResolvedDependency>,
    variables: BTreeMap<&'static str, String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a ProjectConfig, module: ModuleId, path: RelativePath) -> Self {
        let name = config.project_name();
        let mut variables = BTreeMap::new();

        variables.insert("PROJECT_NAME", name.to_string());
        variables.insert("PROJECT_NAME_SNAKE", to_snake_case(name));
        variables.insert("PROJECT_NAME_KEBAB", to_kebab_case(name));
        variables.insert("PROJECT_NAME_PASCAL", to_pascal_case(name));
        variables.insert("PROJECT_DESCRIPTION", config.description().to_string());
        variables.insert("AUTHOR_NAME", config.author_name().to_string());
        variables.insert("AUTHOR_EMAIL", config.author_email().to_string());
        variables.insert("PYTHON_VERSION", config.python_version().as_str().to_string());
        variables.insert("PYTHON_TAG", config.python_version().tag().to_string());

        Self {
            config,
            module,
            path,
            dependencies: BTreeMap::new(),
            variables,
        }
    }

    /// Record an active dependency. Called by the generation engine only.
    pub fn with_dependency(mut self, id: ModuleId, resolved: ResolvedDependency) -> Self {
        self.dependencies.insert(id, resolved);
        self
    }

    pub fn config(&self) -> &'a ProjectConfig {
        self.config
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    /// Whether `id` is an active dependency of the module being rendered.
    pub fn has(&self, id: ModuleId) -> bool {
        self.dependencies.contains_key(&id)
    }

    /// Import expression for `id` as seen from this module.
    pub fn import(&self, id: ModuleId) -> Result<&str, DomainError> {
        self.resolved(id).map(|d| d.import.as_str())
    }

    /// Absolute dotted module path of `id`.
    pub fn module_path(&self, id: ModuleId) -> Result<&str, DomainError> {
        self.resolved(id).map(|d| d.module_path.as_str())
    }

    fn resolved(&self, id: ModuleId) -> Result<&ResolvedDependency, DomainError> {
        self.dependencies
            .get(&id)
            .ok_or_else(|| DomainError::UndeclaredDependency {
                module: self.module.to_string(),
                dependency: id.to_string(),
            })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Replace `{{VARIABLE}}` placeholders for known variables.
    ///
    /// Unknown placeholders stay untouched, so GitHub Actions expressions such
    /// as `${{ matrix.python-version }}` survive rendering.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            if result.contains(&placeholder) {
                result = result.replace(&placeholder, value);
            }
        }
        result
    }
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// `"ShopApi"` / `"shop-api"` → `"shop_api"`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// `"ShopApi"` / `"shop_api"` → `"shop-api"`.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// `"shop-api"` → `"ShopApi"`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, lower→upper transitions and acronym ends
/// (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::config::ProjectConfig;

    const USERS: ModuleId = ModuleId::new("models.user");

    fn config() -> ProjectConfig {
        ProjectConfig::builder().name("shop-api").build().unwrap()
    }

    #[test]
    fn standard_variables() {
        let config = config();
        let ctx = RenderContext::new(&config, ModuleId::new("app.main"), "app/main.py".into());
        assert_eq!(ctx.get("PROJECT_NAME_SNAKE"), Some("shop_api"));
        assert_eq!(ctx.get("PROJECT_NAME_PASCAL"), Some("ShopApi"));
        assert_eq!(ctx.get("PYTHON_TAG"), Some("py312"));
    }

    #[test]
    fn render_keeps_unknown_placeholders() {
        let config = config();
        let ctx = RenderContext::new(&config, ModuleId::new("ci.workflow"), "ci.yml".into());
        let out = ctx.render("name: {{PROJECT_NAME}}\npython: ${{ matrix.python-version }}");
        assert_eq!(out, "name: shop-api\npython: ${{ matrix.python-version }}");
    }

    #[test]
    fn import_of_undeclared_dependency_is_an_error() {
        let config = config();
        let ctx = RenderContext::new(&config, ModuleId::new("app.main"), "app/main.py".into());
        assert!(!ctx.has(USERS));
        assert!(matches!(
            ctx.import(USERS),
            Err(DomainError::UndeclaredDependency { .. })
        ));
    }

    #[test]
    fn import_of_active_dependency() {
        let config = config();
        let ctx = RenderContext::new(&config, ModuleId::new("admin.views"), "app/admin/views.py".into())
            .with_dependency(
                USERS,
                ResolvedDependency {
                    import: "app.models.user".into(),
                    module_path: "app.models.user".into(),
                },
            );
        assert!(ctx.has(USERS));
        assert_eq!(ctx.import(USERS).unwrap(), "app.models.user");
        assert_eq!(ctx.module_path(USERS).unwrap(), "app.models.user");
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("MyAwesomeApp"), "my_awesome_app");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_kebab_case("shop_api"), "shop-api");
        assert_eq!(to_pascal_case("shop-api"), "ShopApi");
        assert_eq!(to_snake_case("api2Go"), "api2_go");
    }
}
