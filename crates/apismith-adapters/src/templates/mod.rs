//! Content templates for the built-in module catalog.
//!
//! One function per logical module. A template reads the configuration
//! through its [`RenderContext`](apismith_core::domain::RenderContext) and
//! asks the context for every in-project import it writes, so the text only
//! ever names modules that exist in the same tree. `{{VARIABLE}}`
//! placeholders are substituted afterwards by the renderer.
//!
//! Templates never mention a project module in prose, comments or
//! docstrings: the verifier treats every dotted `app.` name as a reference.

pub(crate) mod admin;
pub(crate) mod api;
pub(crate) mod app;
pub(crate) mod infra;
pub(crate) mod deploy;
pub(crate) mod migrations;
pub(crate) mod project;
pub(crate) mod tasks;
pub(crate) mod tests;
pub(crate) mod users;

use apismith_core::domain::{Broker, CacheBackend, DomainError, ProjectConfig, capabilities};

pub(crate) type Rendered = Result<String, DomainError>;

/// Local development connection string of the configured database.
pub(crate) fn database_url(config: &ProjectConfig) -> &'static str {
    capabilities::database_url(config.database(), config.orm()).unwrap_or_default()
}

pub(crate) fn cache_url(config: &ProjectConfig, host: &str) -> Option<String> {
    match config.cache_backend() {
        CacheBackend::Redis => Some(format!("redis://{host}:6379/0")),
        CacheBackend::Memcached => Some(format!("{host}:11211")),
        CacheBackend::InMemory => Some("memory://".into()),
        CacheBackend::None => None,
    }
}

pub(crate) fn broker_url(config: &ProjectConfig, host: &str) -> Option<String> {
    match config.broker() {
        Broker::Redis => Some(format!("redis://{host}:6379/1")),
        Broker::RabbitMq => Some(format!("amqp://guest:guest@{host}:5672//")),
        Broker::None => None,
    }
}

/// Celery result store: Redis next to a Redis broker, RPC over RabbitMQ.
pub(crate) fn result_backend(config: &ProjectConfig, host: &str) -> Option<String> {
    match config.broker() {
        Broker::Redis => Some(format!("redis://{host}:6379/2")),
        Broker::RabbitMq => Some("rpc://".into()),
        Broker::None => None,
    }
}

/// Line-oriented text builder used by every template.
#[derive(Debug, Default)]
pub(crate) struct Source(String);

impl Source {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.0.push_str(line.as_ref());
        self.0.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.0.push('\n');
        self
    }

    /// `from <module> import <names>`.
    pub(crate) fn from(&mut self, module: &str, names: &str) -> &mut Self {
        self.line(format!("from {module} import {names}"))
    }

    /// Append a raw block. One leading newline is dropped so blocks can open
    /// on the line after `r#"`.
    pub(crate) fn block(&mut self, block: &str) -> &mut Self {
        self.0.push_str(block.strip_prefix('\n').unwrap_or(block));
        self
    }

    pub(crate) fn finish(&mut self) -> String {
        std::mem::take(&mut self.0)
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;

    #[test]
    fn block_drops_one_leading_newline() {
        let mut src = Source::new();
        src.block("\nx = 1\n").from("app.config", "settings").blank();
        assert_eq!(src.finish(), "x = 1\nfrom app.config import settings\n\n");
    }
}
