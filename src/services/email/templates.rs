use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
#[error("template not found: {name} ({source})")]
pub struct TemplateError {
    pub name: String,
    #[source]
    pub source: std::io::Error,
}

/// HTML templates read from `<dir>/<name>.html`, kept in memory after the first read.
pub struct TemplateCache {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl TemplateCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, name: &str) -> Result<Arc<str>, TemplateError> {
        if let Some(hit) = self.cache.read().await.get(name) {
            return Ok(hit.clone());
        }

        let path = self.dir.join(format!("{name}.html"));
        let content: Arc<str> = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateError {
                name: name.to_string(),
                source,
            })?
            .into();

        self.cache
            .write()
            .await
            .insert(name.to_string(), content.clone());
        Ok(content)
    }
}

/// Replaces every `{{key}}` with its HTML-escaped value in one left-to-right pass.
/// Substituted text is never rescanned. Placeholders without a value are left as-is.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut html = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        html.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => push_escaped(&mut html, value),
            None => html.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    html.push_str(rest);
    html
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
