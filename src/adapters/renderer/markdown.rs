//! Markdown form renderer.
//!
//! Renders the current case data into a fixed document layout derived from
//! the service schema: a header naming the procedure, then one labelled
//! line per field in schema order, blanks for fields not yet collected.
//! Re-rendering with the same data produces an identical document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::case::KnownData;
use crate::domain::schema::ServiceContext;
use crate::ports::{DocumentRenderer, RenderError, RenderedDocument};

/// Visual guide printed for fields without a value.
const BLANK_VALUE: &str = "____________________";

/// Renders filled forms as markdown documents under an output directory.
#[derive(Debug, Clone)]
pub struct MarkdownFormRenderer {
    output_dir: PathBuf,
}

impl MarkdownFormRenderer {
    /// Creates a renderer writing into the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Builds the document body.
    fn document_body(&self, data: &KnownData, context: &ServiceContext) -> String {
        let mut body = String::new();

        body.push_str(&format!("# {}\n\n", context.name.to_uppercase()));
        body.push_str("OFFICIAL STATE DOCUMENT. AUTOMATED GENERATION.\n\n");
        body.push_str(&format!("> {}\n\n", context.description));
        body.push_str("---\n\n");

        for spec in context.schema.iter() {
            let value = data
                .get(&spec.id)
                .map(|v| v.as_str())
                .unwrap_or(BLANK_VALUE);
            body.push_str(&format!("**{}:** {}\n\n", spec.label, value));
        }

        body.push_str("---\n\n");
        body.push_str(&format!("Template: {}\n", context.template_file));
        body
    }

    /// Rejects output names that are empty or escape the output directory.
    fn validate_output_name(output_name: &str) -> Result<(), RenderError> {
        if output_name.trim().is_empty() {
            return Err(RenderError::InvalidOutputName(
                "output name is empty".to_string(),
            ));
        }
        let path = Path::new(output_name);
        let escapes = path.is_absolute()
            || path
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if escapes {
            return Err(RenderError::InvalidOutputName(format!(
                "output name '{}' must be a plain file name",
                output_name
            )));
        }
        Ok(())
    }
}

impl DocumentRenderer for MarkdownFormRenderer {
    fn render(
        &self,
        data: &KnownData,
        context: &ServiceContext,
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        Self::validate_output_name(output_name)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(output_name);
        fs::write(&path, self.document_body(data, context))?;

        tracing::info!(path = %path.display(), "document rendered");
        Ok(RenderedDocument { path })
    }
}
