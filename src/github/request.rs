use anyhow::{Context, Result, anyhow};
use reqwest::Method;
use serde::Serialize;

use crate::config::Repository;

/// Path templates for the Issues endpoints
pub mod paths {
    pub const ISSUES: &str = "/repos/{owner}/{repo}/issues";
    pub const ISSUE: &str = "/repos/{owner}/{repo}/issues/{id}";
}

/// Characters that would change the meaning of the resolved path
const FORBIDDEN_SEGMENT_CHARS: &[char] = &['/', '?', '#'];

/// A request against a path template, resolved only when it is sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    template: String,
    segments: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, template: &str) -> Self {
        ApiRequest {
            method,
            template: template.to_string(),
            segments: Vec::new(),
            body: None,
        }
    }

    /// `GET`/`POST` on the issue collection of `repository`
    pub fn issues(method: Method, repository: &Repository) -> Self {
        Self::new(method, paths::ISSUES)
            .add_url_segment("owner", &repository.owner)
            .add_url_segment("repo", &repository.name)
    }

    /// Request on a single issue of `repository`
    pub fn issue(method: Method, repository: &Repository, id: u64) -> Self {
        Self::issues(method, repository)
            .with_template(paths::ISSUE)
            .add_url_segment("id", id)
    }

    fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Sets the value substituted for `{name}`. A later value for the same
    /// name replaces the earlier one.
    pub fn add_url_segment(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.segments.iter_mut().find(|(key, _)| key == name) {
            Some(existing) => existing.1 = value,
            None => self.segments.push((name.to_string(), value)),
        }
        self
    }

    pub fn json_body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).context("Failed to serialize request body")?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Substitutes every `{name}` placeholder in the template.
    ///
    /// Fails when a placeholder has no value, when a value is given for a
    /// name the template does not contain, or when a value is empty or holds
    /// a path delimiter.
    pub fn resolve_path(&self) -> Result<String> {
        let mut resolved = String::with_capacity(self.template.len());
        let mut used = Vec::new();
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            resolved.push_str(&rest[..start]);
            let end = rest[start..]
                .find('}')
                .map(|offset| start + offset)
                .ok_or_else(|| anyhow!("Unterminated placeholder in `{}`", self.template))?;
            let name = &rest[start + 1..end];
            let value = self
                .segments
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| anyhow!("Unresolved path parameter `{{{name}}}`"))?;
            if value.is_empty() || value.contains(FORBIDDEN_SEGMENT_CHARS) {
                return Err(anyhow!(
                    "Invalid value {value:?} for path parameter `{{{name}}}`"
                ));
            }
            resolved.push_str(value);
            used.push(name);
            rest = &rest[end + 1..];
        }
        resolved.push_str(rest);

        if let Some((unused, _)) = self
            .segments
            .iter()
            .find(|(key, _)| !used.contains(&key.as_str()))
        {
            return Err(anyhow!(
                "Path parameter `{unused}` does not appear in `{}`",
                self.template
            ));
        }

        Ok(resolved)
    }
}
