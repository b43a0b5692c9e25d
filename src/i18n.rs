//! Localization collaborator: renders a template key within a domain with named substitutions.

use serde::Deserialize;
use std::collections::HashMap;

pub trait Localizer: Send + Sync {
    fn render(&self, domain: &str, key: &str, substitutions: &[(&str, &str)]) -> String;
}

/// Per-domain translation table. Keys are the English templates themselves; a missing
/// translation renders the key. Placeholders are written `%{name}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    domains: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, domain: &str, key: &str, translation: &str) -> Self {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(key.to_string(), translation.to_string());
        self
    }
}

/// Single pass over the template; substituted values are never rescanned. Unknown
/// placeholders stay as written.
fn interpolate(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match substitutions.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

impl Localizer for Catalog {
    fn render(&self, domain: &str, key: &str, substitutions: &[(&str, &str)]) -> String {
        let template = self
            .domains
            .get(domain)
            .and_then(|d| d.get(key))
            .map(String::as_str)
            .unwrap_or(key);
        interpolate(template, substitutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_key() {
        let c = Catalog::new();
        assert_eq!(c.render("talon", "%{resource} listing", &[("resource", "Post")]), "Post listing");
    }

    #[test]
    fn test_uses_domain_translation() {
        let c = Catalog::new().with_translation("admin", "%{resource} listing", "Liste des %{resource}");
        assert_eq!(c.render("admin", "%{resource} listing", &[("resource", "Posts")]), "Liste des Posts");
        assert_eq!(c.render("talon", "%{resource} listing", &[("resource", "Posts")]), "Posts listing");
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        let c = Catalog::new();
        let out = c.render("talon", "%{action} %{title}", &[("action", "%{title}"), ("title", "Hello")]);
        assert_eq!(out, "%{title} Hello");
        assert_eq!(c.render("talon", "%{missing} and %{", &[("title", "x")]), "%{missing} and %{");
    }

    #[test]
    fn test_deserialize_catalog() {
        let c: Catalog = serde_json::from_str(r#"{"talon": {"Unknown action": "Action inconnue"}}"#).unwrap();
        assert_eq!(c.render("talon", "Unknown action", &[]), "Action inconnue");
    }
}
