//! Markdown document generator
//!
//! Lays out the combined document: title, timestamp, the diagram section
//! (optional image + PlantUML source) and the API section (OpenAPI source).

use std::fmt::Write;
use std::path::Path;

/// Prefix of every document title
pub const TITLE_PREFIX: &str = "Documentation";

/// Timestamp format used below the title
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Alt text of the rendered diagram image
const IMAGE_ALT: &str = "PlantUML diagram";

/// Everything that goes into one combined document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedDocument {
    /// Document title (see [`derive_title`])
    pub title: String,
    /// Pre-formatted generation timestamp
    pub generated_at: String,
    /// Raw PlantUML source
    pub diagram_source: String,
    /// Raw OpenAPI source
    pub api_spec_source: String,
    /// Fence tag for the OpenAPI block (see [`language_hint`])
    pub api_language: &'static str,
    /// Image path relative to the document, if the diagram was rendered
    pub image: Option<String>,
}

/// Markdown generator for a [`CombinedDocument`]
pub struct MarkdownGenerator<'a> {
    document: &'a CombinedDocument,
    output: String,
}

impl<'a> MarkdownGenerator<'a> {
    /// Create a new generator
    #[must_use]
    pub fn new(document: &'a CombinedDocument) -> Self {
        Self {
            document,
            output: String::new(),
        }
    }

    /// Generate the complete Markdown text
    #[must_use]
    pub fn generate(mut self) -> String {
        self.generate_header();
        self.generate_diagram_section();
        self.generate_api_section();
        self.generate_notes();
        self.output
    }

    fn generate_header(&mut self) {
        writeln!(self.output, "# {}\n", self.document.title).unwrap();
        writeln!(self.output, "*Generated on {}*\n", self.document.generated_at).unwrap();
    }

    fn generate_diagram_section(&mut self) {
        writeln!(self.output, "## UML / Structure (PlantUML)\n").unwrap();

        if let Some(image) = &self.document.image {
            writeln!(self.output, "![{IMAGE_ALT}]({image})\n").unwrap();
        }

        let document = self.document;
        writeln!(self.output, "### PlantUML source\n").unwrap();
        self.fenced("plantuml", &document.diagram_source);
    }

    fn generate_api_section(&mut self) {
        writeln!(self.output, "## REST API (OpenAPI / Swagger)\n").unwrap();
        let document = self.document;
        writeln!(self.output, "### OpenAPI specification\n").unwrap();
        self.fenced(document.api_language, &document.api_spec_source);
    }

    fn generate_notes(&mut self) {
        writeln!(self.output, "## Notes\n").unwrap();
        writeln!(
            self.output,
            "- This document bundles the generated artifacts (PlantUML + OpenAPI) into a single output."
        )
        .unwrap();
        writeln!(
            self.output,
            "- The PlantUML diagram can optionally be rendered as PNG (requires a local PlantUML)."
        )
        .unwrap();
    }

    fn fenced(&mut self, language: &str, body: &str) {
        writeln!(self.output, "```{language}").unwrap();
        writeln!(self.output, "{}", body.trim_end()).unwrap();
        writeln!(self.output, "```").unwrap();
    }
}

/// Fence tag for an API spec file, from its extension
#[must_use]
pub fn language_hint(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("yml" | "yaml") => "yaml",
        Some("json") => "json",
        _ => "",
    }
}

/// Build the document title from the two source file names.
///
/// Runs of control characters become a single space; the result is trimmed.
#[must_use]
pub fn derive_title(diagram: &Path, api_spec: &Path) -> String {
    let raw = format!("{TITLE_PREFIX}: {} + {}", stem(diagram), stem(api_spec));

    let mut title = String::with_capacity(raw.len());
    let mut in_control = false;
    for ch in raw.chars() {
        if ch <= '\u{1f}' {
            if !in_control {
                title.push(' ');
            }
            in_control = true;
        } else {
            title.push(ch);
            in_control = false;
        }
    }

    title.trim().to_string()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(image: Option<&str>, api_language: &'static str) -> CombinedDocument {
        CombinedDocument {
            title: "Documentation: order + order".to_string(),
            generated_at: "2024-05-01 12:30".to_string(),
            diagram_source: "@startuml\nA->B\n@enduml".to_string(),
            api_spec_source: "openapi: 3.0.0\n\n  ".to_string(),
            api_language,
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_generate_layout() {
        let doc = document(None, "yaml");
        let output = MarkdownGenerator::new(&doc).generate();

        let expected = "\
# Documentation: order + order

*Generated on 2024-05-01 12:30*

## UML / Structure (PlantUML)

### PlantUML source

```plantuml
@startuml
A->B
@enduml
```
## REST API (OpenAPI / Swagger)

### OpenAPI specification

```yaml
openapi: 3.0.0
```
## Notes

";
        assert!(output.starts_with(expected), "unexpected output:\n{output}");
        assert!(!output.contains("!["));
    }

    #[test]
    fn test_generate_with_image() {
        let doc = document(Some("assets/order.png"), "yaml");
        let output = MarkdownGenerator::new(&doc).generate();

        assert!(output.contains(
            "## UML / Structure (PlantUML)\n\n![PlantUML diagram](assets/order.png)\n\n### PlantUML source"
        ));
    }

    #[test]
    fn test_generate_untagged_api_block() {
        let doc = document(None, "");
        let output = MarkdownGenerator::new(&doc).generate();

        assert!(output.contains("### OpenAPI specification\n\n```\nopenapi: 3.0.0\n```\n"));
    }

    #[test]
    fn test_language_hint() {
        assert_eq!(language_hint(Path::new("api.yaml")), "yaml");
        assert_eq!(language_hint(Path::new("api.yml")), "yaml");
        assert_eq!(language_hint(Path::new("api.YML")), "yaml");
        assert_eq!(language_hint(Path::new("api.json")), "json");
        assert_eq!(language_hint(Path::new("api.txt")), "");
        assert_eq!(language_hint(Path::new("api")), "");
    }

    #[test]
    fn test_derive_title() {
        let title = derive_title(Path::new("dir/order.puml"), Path::new("other/order.yaml"));
        assert_eq!(title, "Documentation: order + order");

        // Deterministic
        assert_eq!(
            title,
            derive_title(Path::new("order.puml"), Path::new("order.yaml"))
        );
    }

    #[test]
    fn test_derive_title_strips_control_characters() {
        let title = derive_title(Path::new("a\tb\u{1}\u{2}c.puml"), Path::new("api\n.json"));
        assert_eq!(title, "Documentation: a b c + api");
        assert!(!title.chars().any(char::is_control));
    }
}
