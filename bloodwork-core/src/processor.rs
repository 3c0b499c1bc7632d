use crate::config::FormatterConfig;
use crate::error::{BloodworkError, Result};
use crate::parser::ReportParser;
use crate::render::{render, RenderMode};
use crate::rules::RuleEngine;
use crate::types::*;
use std::path::Path;
use std::time::Instant;

/// Intermediate outputs of the parse and rule stages
/// Used by `--dump-stages` and by the boundary tests
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub parsed: ParseResult,
    pub filtered: FilteredData,
}

/// Text → parse tree → filtered view → rendered text, with one configuration.
pub struct ReportProcessor {
    config: FormatterConfig,
    parser: ReportParser,
}

impl Default for ReportProcessor {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

impl ReportProcessor {
    pub fn new(config: FormatterConfig) -> Self {
        let parser = ReportParser::new(config.parser.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> ParseResult {
        self.parser.parse(text)
    }

    pub fn filter(&self, parsed: &ParseResult) -> FilteredData {
        RuleEngine::new(&self.config.catalog).apply(parsed)
    }

    /// Run the whole pipeline on report text.
    pub fn process_text(&self, text: &str, mode: RenderMode) -> Result<String> {
        let start_time = Instant::now();

        let parsed = self.parse(text);
        let filtered = self.filter(&parsed);
        let output = render(&filtered, mode)?;

        tracing::debug!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(output)
    }

    /// Read a report from disk and run the whole pipeline on it.
    pub fn process_file(&self, path: &Path, mode: RenderMode) -> Result<String> {
        tracing::info!("📄 Processing report: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| BloodworkError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.process_text(&text, mode)
    }

    /// Run parse and rule stages, keeping both outputs.
    pub fn capture_stages(&self, text: &str) -> PipelineStages {
        let parsed = self.parse(text);
        tracing::debug!(
            "📋 Stage 1: {} sections, {} dates captured",
            parsed.sections.len(),
            parsed.dates.len()
        );

        let filtered = self.filter(&parsed);
        tracing::debug!(
            "📋 Stage 2: {} date groups, {} groups captured",
            filtered.date_groups.len(),
            filtered.groups().count()
        );

        PipelineStages { parsed, filtered }
    }
}
