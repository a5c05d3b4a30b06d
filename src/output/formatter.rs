//! Output formatters: console, JSON, Markdown and HTML

use crate::config::{OutputFormat, ProviderKind};
use crate::error::{AlignerError, Result};
use crate::llm::{RecommendationSet, RecommendationSource};
use crate::output::report::{DashboardReport, Verdict};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &DashboardReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    show_trace: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

fn provider_label(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Static => "static table",
        ProviderKind::Computed => "embeddings",
    }
}

fn source_label(source: RecommendationSource) -> &'static str {
    match source {
        RecommendationSource::Local => "local templates",
        RecommendationSource::Simulated => "simulated service",
        RecommendationSource::Remote => "hosted model",
        RecommendationSource::Fallback => "local fallback",
    }
}

fn course_line(report: &DashboardReport) -> String {
    let summary = &report.summary;
    if summary.fell_back {
        format!(
            "{} (no data, showing {})",
            summary.course_name, summary.resolved_course
        )
    } else {
        summary.course_name.clone()
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, show_trace: bool) -> Self {
        Self {
            use_colors,
            detailed,
            show_trace,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_verdict_badge(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::Strong => Color::Green,
            Verdict::Moderate => Color::Yellow,
            Verdict::Weak => Color::BrightRed,
            Verdict::Poor => Color::Red,
        };
        if self.use_colors {
            format!("[{}]", verdict.label().color(color).bold())
        } else {
            format!("[{}]", verdict.label())
        }
    }

    fn format_gap_bar(&self, overall_gap: f32) -> String {
        let filled = (overall_gap.clamp(0.0, 1.0) * 20.0).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled));
        let color = if overall_gap >= 0.5 {
            Color::Red
        } else if overall_gap >= 0.3 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        self.colorize(&bar, color)
    }

    fn format_recommendations(&self, set: &RecommendationSet, output: &mut String) {
        output.push_str(&self.format_header("💡 Recommendations", 2));
        output.push_str(&format!("Source: {}\n", source_label(set.source)));
        for (i, item) in set.items.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, item));
        }

        if !self.show_trace {
            return;
        }
        let trace = &set.trace;
        output.push_str(&self.format_header("Request Trace", 3));
        output.push_str(&format!("Backend: {:?} | Elapsed: {} ms\n", trace.backend, trace.elapsed_ms));
        if let Some(endpoint) = &trace.endpoint {
            output.push_str(&format!("Endpoint: {}\n", endpoint));
        }
        if let Some(model) = &trace.model {
            output.push_str(&format!("Model: {}\n", model));
        }
        output.push_str(&format!(
            "Parsed items: {} | Padded items: {}\n",
            trace.parsed_count, trace.padded_count
        ));
        if let Some(reason) = &trace.fallback_reason {
            output.push_str(&format!("Fallback: {}\n", self.colorize(reason, Color::Yellow)));
        }
        if let Some(prompt) = &trace.prompt {
            output.push_str(&format!("Prompt:\n{}\n", self.colorize(prompt, Color::BrightBlack)));
        }
        if let Some(raw) = &trace.raw_response {
            output.push_str(&format!("Raw response:\n{}\n", self.colorize(raw, Color::BrightBlack)));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &DashboardReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;
        let metrics = &summary.metrics;

        output.push_str(&self.format_header("🧠 CURRICULUM ALIGNMENT DASHBOARD", 1));
        output.push_str(&format!(
            "Course: {} | Scores: {}\n",
            self.colorize(&course_line(report), Color::Cyan),
            provider_label(summary.provider)
        ));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        if report.uses_sample_data() {
            output.push_str(&self.colorize(
                "Some datasets were unavailable; sample data was used.\n",
                Color::Yellow,
            ));
        }

        output.push_str(&self.format_header("📊 Key Indicators", 2));
        output.push_str(&format!("Market coverage:    {:>6.1}%\n", metrics.market_coverage_pct));
        output.push_str(&format!("Standards coverage: {:>6.1}%\n", metrics.standards_coverage_pct));
        output.push_str(&format!(
            "Health score:       {:>6.1}% {}\n",
            metrics.health_score,
            self.format_verdict_badge(summary.verdict)
        ));
        output.push_str(&format!("Skill gaps:         {:>6}\n", metrics.gap_count));
        if let Some(alignment) = &summary.corpus_alignment {
            output.push_str(&format!(
                "Market alignment:   {:>6.1}%\nStandards alignment:{:>6.1}%\n",
                alignment.market_alignment_pct, alignment.standards_alignment_pct
            ));
        }
        output.push_str(&format!("Verdict: {}\n", summary.verdict.description()));

        output.push_str(&self.format_header("🔍 Ranked Skill Gaps", 2));
        if summary.well_aligned {
            output.push_str(&self.colorize(
                "✅ No skill gaps at the current thresholds: the course is well-aligned.\n",
                Color::Green,
            ));
        } else {
            output.push_str(&format!(
                "{:<3} {:<18} {:<24} {:>6} {:>6} {:>6} {:>6}\n",
                "#", "Skill", "Category", "Course", "Job", "Std", "Gap"
            ));
            for (i, gap) in report.gaps.iter().enumerate() {
                output.push_str(&format!(
                    "{:<3} {:<18} {:<24} {:>6.2} {:>6.2} {:>6.2} {:>6.2} {}\n",
                    i + 1,
                    gap.skill,
                    gap.category,
                    gap.course_score,
                    gap.job_score,
                    gap.standard_score,
                    gap.overall_gap,
                    self.format_gap_bar(gap.overall_gap)
                ));
            }
        }

        if !report.category_coverage.is_empty() {
            output.push_str(&self.format_header("Category Coverage", 3));
            for row in &report.category_coverage {
                output.push_str(&format!(
                    "  {:<24} {:>5.1}% ({} of {} in-demand skills covered)\n",
                    row.category, row.coverage_pct, row.covered, row.job_relevant
                ));
            }
        }

        if let Some(set) = &report.recommendations {
            self.format_recommendations(set, &mut output);
        }

        if self.detailed {
            output.push_str(&self.format_header("📈 Detailed Analysis", 2));
            let t = &report.thresholds;
            output.push_str(&format!(
                "Thresholds: job relevance {:.2} | course coverage {:.2} | gap severity {:.2}\n",
                t.job_relevance_threshold, t.course_coverage_threshold, t.gap_severity_threshold
            ));
            output.push_str(&format!(
                "Gap weights: job {:.2} | standards {:.2}\n",
                report.weights.job_weight, report.weights.standard_weight
            ));
            output.push_str(&format!(
                "Analyzed skills: {} ({} in demand by jobs, {} by standards)\n",
                metrics.analyzed_skills, metrics.job_relevant_count, metrics.standard_relevant_count
            ));
            if !report.taught_skills.is_empty() {
                output.push_str(&format!("Taught skills: {}\n", report.taught_skills.join(", ")));
            }
            if !report.excluded_skills.is_empty() {
                output.push_str(&format!(
                    "Skills without score data: {}\n",
                    report.excluded_skills.join(", ")
                ));
            }

            if !report.frequencies.is_empty() {
                output.push_str(&self.format_header("Skill Mentions (course vs jobs)", 3));
                for freq in &report.frequencies {
                    output.push_str(&format!(
                        "  {:<18} {:>4} {:>6}\n",
                        freq.skill, freq.course_count, freq.job_count
                    ));
                }
            }
        }

        output.push_str(&format!(
            "\n{} Generated by curriculum-aligner v{}{}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.tool_version,
            report
                .metadata
                .embedding_model
                .as_deref()
                .map(|m| format!(" | Embeddings: {}", m))
                .unwrap_or_default()
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &DashboardReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &DashboardReport) -> Result<String> {
        let mut md = String::new();
        let summary = &report.summary;
        let metrics = &summary.metrics;

        md.push_str("# Curriculum Alignment Report\n\n");
        md.push_str(&format!("**Course:** {}  \n", course_line(report)));
        md.push_str(&format!("**Scores:** {}\n\n", provider_label(summary.provider)));

        md.push_str("## Key Indicators\n\n");
        md.push_str("| Metric | Value |\n|---|---|\n");
        md.push_str(&format!("| Market coverage | {:.1}% |\n", metrics.market_coverage_pct));
        md.push_str(&format!("| Standards coverage | {:.1}% |\n", metrics.standards_coverage_pct));
        md.push_str(&format!(
            "| Health score | {:.1}% ({}) |\n",
            metrics.health_score,
            summary.verdict.label()
        ));
        md.push_str(&format!("| Skill gaps | {} |\n", metrics.gap_count));
        if let Some(alignment) = &summary.corpus_alignment {
            md.push_str(&format!("| Market alignment | {:.1}% |\n", alignment.market_alignment_pct));
            md.push_str(&format!(
                "| Standards alignment | {:.1}% |\n",
                alignment.standards_alignment_pct
            ));
        }
        md.push_str(&format!("\n> {}\n\n", summary.verdict.description()));

        md.push_str("## Ranked Skill Gaps\n\n");
        if summary.well_aligned {
            md.push_str("No skill gaps at the current thresholds: the course is well-aligned.\n\n");
        } else {
            md.push_str("| # | Skill | Category | Course | Job | Standard | Gap |\n");
            md.push_str("|---|---|---|---|---|---|---|\n");
            for (i, gap) in report.gaps.iter().enumerate() {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
                    i + 1,
                    gap.skill,
                    gap.category,
                    gap.course_score,
                    gap.job_score,
                    gap.standard_score,
                    gap.overall_gap
                ));
            }
            md.push('\n');
        }

        if !report.category_coverage.is_empty() {
            md.push_str("## Category Coverage\n\n| Category | Covered | In demand | Coverage |\n|---|---|---|---|\n");
            for row in &report.category_coverage {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1}% |\n",
                    row.category, row.covered, row.job_relevant, row.coverage_pct
                ));
            }
            md.push('\n');
        }

        if !report.frequencies.is_empty() {
            md.push_str("## Skill Mentions\n\n| Skill | Course | Jobs |\n|---|---|---|\n");
            for freq in &report.frequencies {
                md.push_str(&format!("| {} | {} | {} |\n", freq.skill, freq.course_count, freq.job_count));
            }
            md.push('\n');
        }

        if let Some(set) = &report.recommendations {
            md.push_str("## Recommendations\n\n");
            md.push_str(&format!("_Source: {}_\n\n", source_label(set.source)));
            for (i, item) in set.items.iter().enumerate() {
                md.push_str(&format!("{}. {}\n", i + 1, item));
            }
            if let Some(reason) = &set.trace.fallback_reason {
                md.push_str(&format!("\n_Fallback reason: {}_\n", reason));
            }
            md.push('\n');
        }

        if self.include_metadata {
            let t = &report.thresholds;
            md.push_str("---\n\n");
            md.push_str(&format!(
                "Thresholds: job {:.2}, course {:.2}, gap {:.2}. Weights: job {:.2}, standards {:.2}.  \n",
                t.job_relevance_threshold,
                t.course_coverage_threshold,
                t.gap_severity_threshold,
                report.weights.job_weight,
                report.weights.standard_weight
            ));
            md.push_str(&format!(
                "Generated {} by curriculum-aligner v{} in {} ms.\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version,
                report.metadata.processing_time_ms
            ));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

struct HtmlGapRow {
    rank: usize,
    skill: String,
    category: String,
    course_score: String,
    job_score: String,
    standard_score: String,
    overall_gap: String,
    severity_class: &'static str,
}

struct HtmlCategoryRow {
    category: String,
    covered: usize,
    job_relevant: usize,
    coverage_pct: String,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Curriculum Alignment Report: {{ course }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #1a2a44; max-width: 960px; margin: 0 auto; padding: 20px; background: #f4f6fa; }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .kpis { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 15px; }
        .kpi { background: #f8f9fa; padding: 15px; border-radius: 6px; border-left: 4px solid #1a2a44; }
        .kpi strong { font-size: 1.6em; display: block; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { padding: 8px; border-bottom: 1px solid #e9ecef; text-align: left; }
        .gap-high { color: #dc3545; font-weight: bold; }
        .gap-medium { color: #b8860b; font-weight: bold; }
        .gap-low { color: #17a2b8; }
        .notice { background: #e8f5e9; padding: 12px; border-radius: 6px; }
        .warning { background: #fff8e1; padding: 12px; border-radius: 6px; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>🧠 Curriculum Alignment Report</h1>
        <p><strong>Course:</strong> {{ course }} | <strong>Scores:</strong> {{ provider }}</p>
        {% if sample_data %}<p class="warning">Some datasets were unavailable; sample data was used.</p>{% endif %}

        <h2>📊 Key Indicators</h2>
        <div class="kpis">
            <div class="kpi">Market coverage<strong>{{ market_coverage }}%</strong></div>
            <div class="kpi">Standards coverage<strong>{{ standards_coverage }}%</strong></div>
            <div class="kpi">Health score<strong>{{ health_score }}%</strong>{{ verdict_label }}</div>
            <div class="kpi">Skill gaps<strong>{{ gap_count }}</strong></div>
            {% if has_corpus_alignment %}
            <div class="kpi">Market alignment<strong>{{ market_alignment }}%</strong></div>
            <div class="kpi">Standards alignment<strong>{{ standards_alignment }}%</strong></div>
            {% endif %}
        </div>
        <p>{{ verdict_description }}</p>

        <h2>🔍 Ranked Skill Gaps</h2>
        {% if gaps.is_empty() %}
        <p class="notice">No skill gaps at the current thresholds: the course is well-aligned.</p>
        {% else %}
        <table>
            <tr><th>#</th><th>Skill</th><th>Category</th><th>Course</th><th>Job</th><th>Standard</th><th>Gap</th></tr>
            {% for gap in gaps %}
            <tr><td>{{ gap.rank }}</td><td>{{ gap.skill }}</td><td>{{ gap.category }}</td><td>{{ gap.course_score }}</td><td>{{ gap.job_score }}</td><td>{{ gap.standard_score }}</td><td class="{{ gap.severity_class }}">{{ gap.overall_gap }}</td></tr>
            {% endfor %}
        </table>
        {% endif %}

        {% if !categories.is_empty() %}
        <h2>Category Coverage</h2>
        <table>
            <tr><th>Category</th><th>Covered</th><th>In demand</th><th>Coverage</th></tr>
            {% for row in categories %}
            <tr><td>{{ row.category }}</td><td>{{ row.covered }}</td><td>{{ row.job_relevant }}</td><td>{{ row.coverage_pct }}%</td></tr>
            {% endfor %}
        </table>
        {% endif %}

        {% if has_recommendations %}
        <h2>💡 Recommendations</h2>
        <p><em>Source: {{ recommendation_source }}</em></p>
        <ol>
            {% for item in recommendations %}
            <li>{{ item }}</li>
            {% endfor %}
        </ol>
        {% endif %}

        <div class="metadata">
            <p><strong>ℹ️ Generated by curriculum-aligner v{{ version }}</strong> on {{ generated_at }} ({{ processing_time }} ms)</p>
            <p>Thresholds: job {{ job_threshold }}, course {{ course_threshold }}, gap {{ gap_threshold }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    course: String,
    provider: &'static str,
    sample_data: bool,
    market_coverage: String,
    standards_coverage: String,
    health_score: String,
    verdict_label: &'static str,
    verdict_description: &'static str,
    gap_count: usize,
    has_corpus_alignment: bool,
    market_alignment: String,
    standards_alignment: String,
    gaps: Vec<HtmlGapRow>,
    categories: Vec<HtmlCategoryRow>,
    has_recommendations: bool,
    recommendation_source: &'static str,
    recommendations: Vec<String>,
    version: String,
    generated_at: String,
    processing_time: u64,
    job_threshold: String,
    course_threshold: String,
    gap_threshold: String,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &DashboardReport) -> HtmlTemplate {
        let summary = &report.summary;
        let metrics = &summary.metrics;
        let alignment = summary.corpus_alignment;

        let gaps = report
            .gaps
            .iter()
            .enumerate()
            .map(|(i, gap)| HtmlGapRow {
                rank: i + 1,
                skill: gap.skill.clone(),
                category: gap.category.clone(),
                course_score: format!("{:.2}", gap.course_score),
                job_score: format!("{:.2}", gap.job_score),
                standard_score: format!("{:.2}", gap.standard_score),
                overall_gap: format!("{:.2}", gap.overall_gap),
                severity_class: if gap.overall_gap >= 0.5 {
                    "gap-high"
                } else if gap.overall_gap >= 0.3 {
                    "gap-medium"
                } else {
                    "gap-low"
                },
            })
            .collect();

        let categories = report
            .category_coverage
            .iter()
            .map(|row| HtmlCategoryRow {
                category: row.category.clone(),
                covered: row.covered,
                job_relevant: row.job_relevant,
                coverage_pct: format!("{:.1}", row.coverage_pct),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            course: course_line(report),
            provider: provider_label(summary.provider),
            sample_data: report.uses_sample_data(),
            market_coverage: format!("{:.1}", metrics.market_coverage_pct),
            standards_coverage: format!("{:.1}", metrics.standards_coverage_pct),
            health_score: format!("{:.1}", metrics.health_score),
            verdict_label: summary.verdict.label(),
            verdict_description: summary.verdict.description(),
            gap_count: metrics.gap_count,
            has_corpus_alignment: alignment.is_some(),
            market_alignment: alignment
                .map(|a| format!("{:.1}", a.market_alignment_pct))
                .unwrap_or_default(),
            standards_alignment: alignment
                .map(|a| format!("{:.1}", a.standards_alignment_pct))
                .unwrap_or_default(),
            gaps,
            categories,
            has_recommendations: report.recommendations.is_some(),
            recommendation_source: report
                .recommendations
                .as_ref()
                .map(|set| source_label(set.source))
                .unwrap_or_default(),
            recommendations: report
                .recommendations
                .as_ref()
                .map(|set| set.items.clone())
                .unwrap_or_default(),
            version: report.metadata.tool_version.clone(),
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            processing_time: report.metadata.processing_time_ms,
            job_threshold: format!("{:.2}", report.thresholds.job_relevance_threshold),
            course_threshold: format!("{:.2}", report.thresholds.course_coverage_threshold),
            gap_threshold: format!("{:.2}", report.thresholds.gap_severity_threshold),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &DashboardReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AlignerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool, show_trace: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, show_trace),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &DashboardReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, course_name: &str, timestamp: bool) -> String {
    let mut base_name = String::new();
    for c in course_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            base_name.push(c.to_ascii_lowercase());
        } else if !base_name.ends_with('_') {
            base_name.push('_');
        }
    }
    let base_name = match base_name.trim_matches('_') {
        "" => "course",
        name => name,
    };

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_alignment{}.{}", base_name, timestamp_suffix, extension)
}
