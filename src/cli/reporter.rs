use colored::Colorize;

use crate::{DeclarationSite, Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_site(&diagnostic.site);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push_str("\n    ");
            output.push_str(&self.format_site(&related.site));
            output.push_str(": ");
            output.push_str(&related.message_text);
        }
        output
    }

    /// One-line count summary, or `None` when there is nothing to report.
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> Option<String> {
        if diagnostics.is_empty() {
            return None;
        }
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let others = diagnostics.len() - errors;
        let text = match (errors, others) {
            (0, n) => format!("Found {n} informational diagnostic{}.", plural(n)),
            (e, 0) => format!("Found {e} error{}.", plural(e)),
            (e, n) => format!(
                "Found {e} error{} and {n} informational diagnostic{}.",
                plural(e),
                plural(n)
            ),
        };
        Some(text)
    }

    fn format_site(&self, site: &DeclarationSite) -> String {
        let text = site.to_string();
        if self.color { text.cyan().to_string() } else { text }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.name();

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("AMB{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
