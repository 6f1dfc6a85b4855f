//! Prompt templates and rendering
//!
//! Loads prompt templates from a user override directory or falls back to
//! the embedded defaults, then renders them with handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

mod embedded;

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Workspace directory shown to the planner
    pub workspace: String,

    /// Current context summary; empty hides the context block
    pub context_summary: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,

    /// User override directory (`.devtalk/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader rooted at the workspace
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        let user_dir = workspace.as_ref().join(".devtalk/prompts");

        Self {
            hbs: Handlebars::new(),
            user_dir: if user_dir.exists() { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the user override (`.devtalk/prompts/{name}.pmt`) first, then
    /// falls back to the embedded default.
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the full system prompt for one turn: agent identity plus the
    /// per-turn guidance with the current context summary folded in
    pub fn system_prompt(&self, workspace: &Path, context_summary: &str) -> Result<String> {
        let context = PromptContext {
            workspace: workspace.display().to_string(),
            context_summary: context_summary.to_string(),
        };

        let system = self.render("system", &context)?;
        let next_step = self.render("next-step", &context)?;
        Ok(format!("{}\n{}", system, next_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_contains_workspace() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.system_prompt(Path::new("/tmp/project"), "").unwrap();

        assert!(prompt.contains("/tmp/project"));
        assert!(prompt.contains("ask_human"));
        assert!(prompt.contains("terminate"));
    }

    #[test]
    fn test_system_prompt_omits_empty_context() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.system_prompt(Path::new("/tmp/project"), "").unwrap();

        assert!(!prompt.contains("Current context:"));
    }

    #[test]
    fn test_system_prompt_includes_context_summary() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader
            .system_prompt(Path::new("/tmp/project"), "Project context:\n- kind: cli")
            .unwrap();

        assert!(prompt.contains("Current context:"));
        assert!(prompt.contains("kind: cli"));
    }

    #[test]
    fn test_user_override_wins() {
        let temp = tempfile::tempdir().unwrap();
        let prompts_dir = temp.path().join(".devtalk/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(prompts_dir.join("system.pmt"), "custom system for {{workspace}}").unwrap();

        let loader = PromptLoader::new(temp.path());
        let prompt = loader.system_prompt(Path::new("/w"), "").unwrap();

        assert!(prompt.starts_with("custom system for /w"));
    }

    #[test]
    fn test_unknown_template_errors() {
        let loader = PromptLoader::embedded_only();
        let result = loader.load_template("nonexistent-template");
        assert!(result.is_err());
    }
}
