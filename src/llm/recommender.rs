//! Curriculum enhancement suggestions keyed off the ranked gap list.
//!
//! Recommending never fails: every backend error degrades to the local
//! suggestions, and the returned trace records why.

use crate::config::{RecommenderConfig, RecommenderKind};
use crate::error::Result;
use crate::llm::client::InferenceClient;
use crate::llm::prompts::{PromptParams, PromptTemplates, OUTPUT_DELIMITER};
use crate::processing::analyzer::AlignmentReport;
use crate::processing::gap_analyzer::GapRecord;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

pub const MAX_RECOMMENDATIONS: usize = 3;
pub const WELL_ALIGNED_MESSAGE: &str =
    "Course is well-aligned with market needs and standards: no major gaps found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationSource {
    Local,
    Simulated,
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationTrace {
    pub backend: RecommenderKind,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub raw_response: Option<String>,
    pub parsed_count: usize,
    pub padded_count: usize,
    pub fallback_reason: Option<String>,
    pub elapsed_ms: u64,
}

impl RecommendationTrace {
    pub fn new(backend: RecommenderKind) -> Self {
        Self {
            backend,
            endpoint: None,
            model: None,
            prompt: None,
            raw_response: None,
            parsed_count: 0,
            padded_count: 0,
            fallback_reason: None,
            elapsed_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub items: Vec<String>,
    pub source: RecommendationSource,
    pub trace: RecommendationTrace,
}

/// What a recommender needs from an analysis
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRequest<'a> {
    pub course_name: &'a str,
    /// Ranked, most severe first
    pub gaps: &'a [GapRecord],
    pub taught_skills: &'a [String],
}

impl<'a> RecommendationRequest<'a> {
    pub fn from_report(report: &'a AlignmentReport) -> Self {
        Self {
            course_name: report.course_name(),
            gaps: &report.analysis.gaps,
            taught_skills: &report.course.taught_skills,
        }
    }
}

pub trait Recommender {
    fn recommend(
        &self,
        request: &RecommendationRequest<'_>,
    ) -> impl Future<Output = RecommendationSet> + Send;
}

/// Templated suggestions, no I/O
#[derive(Debug, Clone, Default)]
pub struct LocalRecommender;

impl Recommender for LocalRecommender {
    async fn recommend(&self, request: &RecommendationRequest<'_>) -> RecommendationSet {
        let start_time = Instant::now();
        let mut trace = RecommendationTrace::new(RecommenderKind::Local);
        let items = local_suggestions(request.gaps);
        trace.elapsed_ms = start_time.elapsed().as_millis() as u64;
        RecommendationSet {
            items,
            source: RecommendationSource::Local,
            trace,
        }
    }
}

/// Local suggestions delivered after an artificial delay
#[derive(Debug, Clone)]
pub struct SimulatedRecommender {
    delay: Duration,
}

impl SimulatedRecommender {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Recommender for SimulatedRecommender {
    async fn recommend(&self, request: &RecommendationRequest<'_>) -> RecommendationSet {
        let start_time = Instant::now();
        tokio::time::sleep(self.delay).await;

        let mut trace = RecommendationTrace::new(RecommenderKind::Simulated);
        let items = local_suggestions(request.gaps);
        trace.elapsed_ms = start_time.elapsed().as_millis() as u64;
        RecommendationSet {
            items,
            source: RecommendationSource::Simulated,
            trace,
        }
    }
}

pub struct RemoteRecommender {
    client: InferenceClient,
    model: String,
    templates: PromptTemplates,
}

impl RemoteRecommender {
    pub fn new(config: &RecommenderConfig) -> Result<Self> {
        Ok(Self {
            client: InferenceClient::new(config)?,
            model: config.model.clone(),
            templates: PromptTemplates::default(),
        })
    }
}

impl Recommender for RemoteRecommender {
    async fn recommend(&self, request: &RecommendationRequest<'_>) -> RecommendationSet {
        let start_time = Instant::now();
        let mut trace = RecommendationTrace::new(RecommenderKind::Remote);
        trace.endpoint = Some(self.client.url().to_string());
        trace.model = Some(self.model.clone());

        if request.gaps.is_empty() {
            trace.elapsed_ms = start_time.elapsed().as_millis() as u64;
            return RecommendationSet {
                items: vec![WELL_ALIGNED_MESSAGE.to_string()],
                source: RecommendationSource::Remote,
                trace,
            };
        }

        let gap_skills: Vec<String> = request.gaps.iter().map(|g| g.skill.clone()).collect();
        let prompt = self.templates.render_enhancement(&PromptParams {
            course_name: request.course_name,
            taught_skills: request.taught_skills,
            gap_skills: &gap_skills,
        });
        trace.prompt = Some(prompt.clone());

        if !self.client.has_token() {
            debug!("No inference token configured; sending anonymous request");
        }

        let outcome = match self.client.generate(&prompt).await {
            Ok(raw) => {
                trace.raw_response = Some(raw.clone());
                match parse_recommendations(&raw) {
                    Some(items) => Ok(items),
                    None => Err(format!("response has no '{}' delimiter", OUTPUT_DELIMITER)),
                }
            }
            Err(e) => Err(e.to_string()),
        };

        let (items, source) = match outcome {
            Ok(parsed) => {
                trace.parsed_count = parsed.len().min(MAX_RECOMMENDATIONS);
                let items = pad_recommendations(parsed, request.course_name, request.gaps);
                trace.padded_count = items.len() - trace.parsed_count;
                info!(
                    "Received {} suggestions ({} padded)",
                    trace.parsed_count, trace.padded_count
                );
                (items, RecommendationSource::Remote)
            }
            Err(reason) => {
                warn!("Recommendation request failed, using local suggestions: {}", reason);
                trace.fallback_reason = Some(reason);
                (local_suggestions(request.gaps), RecommendationSource::Fallback)
            }
        };

        trace.elapsed_ms = start_time.elapsed().as_millis() as u64;
        RecommendationSet {
            items,
            source,
            trace,
        }
    }
}

/// Recommender chosen by configuration
pub enum RecommendationRequester {
    Local(LocalRecommender),
    Simulated(SimulatedRecommender),
    Remote(RemoteRecommender),
}

impl RecommendationRequester {
    pub fn from_config(config: &RecommenderConfig) -> Result<Self> {
        Ok(match config.kind {
            RecommenderKind::Local => Self::Local(LocalRecommender),
            RecommenderKind::Simulated => Self::Simulated(SimulatedRecommender::new(
                Duration::from_millis(config.simulated_delay_ms),
            )),
            RecommenderKind::Remote => Self::Remote(RemoteRecommender::new(config)?),
        })
    }

    pub fn kind(&self) -> RecommenderKind {
        match self {
            Self::Local(_) => RecommenderKind::Local,
            Self::Simulated(_) => RecommenderKind::Simulated,
            Self::Remote(_) => RecommenderKind::Remote,
        }
    }
}

impl Recommender for RecommendationRequester {
    async fn recommend(&self, request: &RecommendationRequest<'_>) -> RecommendationSet {
        match self {
            Self::Local(r) => r.recommend(request).await,
            Self::Simulated(r) => r.recommend(request).await,
            Self::Remote(r) => r.recommend(request).await,
        }
    }
}

/// One templated suggestion per top gap, or the well-aligned message
pub fn local_suggestions(gaps: &[GapRecord]) -> Vec<String> {
    if gaps.is_empty() {
        return vec![WELL_ALIGNED_MESSAGE.to_string()];
    }
    gaps.iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|gap| suggestion_for(&gap.skill, &gap.category))
        .collect()
}

fn suggestion_for(skill: &str, category: &str) -> String {
    if let Some((_, text)) = SKILL_SUGGESTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(skill))
    {
        return text.to_string();
    }
    let template = CATEGORY_SUGGESTIONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, template)| *template)
        .unwrap_or(GENERIC_SUGGESTION);
    template.replace("{skill}", skill)
}

const SKILL_SUGGESTIONS: &[(&str, &str)] = &[
    ("Python", "Add weekly Python labs that automate data processing with scripts and tests."),
    ("Java", "Introduce a Java module building a small object-oriented service with unit tests."),
    ("SQL", "Integrate SQL exercises on a shared relational database, from joins to query tuning."),
    ("AWS", "Include a cloud lab deploying a course project to AWS using free-tier services."),
    ("Docker", "Containerize the course project with Docker and run it in a reproducible environment."),
    ("Kubernetes", "Add a Kubernetes workshop deploying and scaling a containerized service."),
    ("Git", "Require Git-based submissions with branches, pull requests and code review."),
    ("Linux", "Run assignments on Linux and teach shell scripting for everyday tasks."),
    ("cloud", "Add a unit on cloud service models with a hands-on deployment exercise."),
    ("machine learning", "Add a capstone applying machine learning to a real dataset with evaluation metrics."),
    ("TensorFlow", "Introduce TensorFlow through a guided image or text classification project."),
    ("JavaScript", "Add a JavaScript project building an interactive front end for course data."),
    ("React", "Build a React single-page application that consumes a course-provided API."),
    ("encryption", "Add a lab implementing symmetric and public-key encryption with a standard library."),
    ("Agile", "Run team projects in Agile sprints with backlogs, stand-ups and retrospectives."),
];

const CATEGORY_SUGGESTIONS: &[(&str, &str)] = &[
    ("Programming Languages", "Add a programming assignment series in {skill} tied to the existing course topics."),
    ("Web Development", "Add a web project using {skill} that extends the course's existing material."),
    ("Data & Databases", "Add a data lab using {skill} on a realistic dataset."),
    ("Cloud & DevOps", "Add a DevOps exercise introducing {skill} into the course project workflow."),
    ("AI & Machine Learning", "Add an applied AI module using {skill} with a small end-to-end project."),
    ("Security & Networking", "Add a security lab where students practice {skill} on a controlled network."),
    ("Emerging Technologies", "Offer an elective mini-project exploring {skill}."),
    ("Professional Practice", "Adopt {skill} practices in the course's team projects."),
];

const GENERIC_SUGGESTION: &str = "Add a module on {skill} with a hands-on project.";

fn item_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\d{1,2}[.)]").expect("enumeration marker pattern is valid"))
}

/// Suggestions after the last delimiter, or `None` when the delimiter is absent.
/// Items are separated by enumeration markers ("1." or "2)") standing alone
/// between whitespace.
pub fn parse_recommendations(raw: &str) -> Option<Vec<String>> {
    let (_, tail) = raw.rsplit_once(OUTPUT_DELIMITER)?;

    let mut segments = Vec::new();
    let mut item_start = 0;
    for marker in item_marker().find_iter(tail) {
        let before = tail[..marker.start()].chars().next_back();
        let after = tail[marker.end()..].chars().next();
        if before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace) {
            segments.push(&tail[item_start..marker.start()]);
            item_start = marker.end();
        }
    }
    segments.push(&tail[item_start..]);

    let items = segments
        .into_iter()
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty() && !item.chars().all(|c| c.is_ascii_digit()))
        .collect();
    Some(items)
}

/// Keep at most three parsed items and fill up with gap-based filler
pub fn pad_recommendations(mut items: Vec<String>, course_name: &str, gaps: &[GapRecord]) -> Vec<String> {
    items.truncate(MAX_RECOMMENDATIONS);
    if gaps.is_empty() {
        return items;
    }
    let mut picker = SeededPicker::new(course_name);
    while items.len() < MAX_RECOMMENDATIONS {
        let skill = &gaps[picker.next_index(gaps.len())].skill;
        items.push(format!("Add {} with a hands-on project.", skill));
    }
    items
}

/// Deterministic pseudo-random indices seeded from a string
struct SeededPicker {
    state: u64,
}

impl SeededPicker {
    fn new(seed: &str) -> Self {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in seed.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Self { state: hash | 1 }
    }

    fn next_index(&mut self, len: usize) -> usize {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state % len as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gap(skill: &str, category: &str, overall_gap: f32) -> GapRecord {
        GapRecord {
            skill: skill.to_string(),
            category: category.to_string(),
            course_score: 0.1,
            job_score: 0.9,
            standard_score: 0.8,
            overall_gap,
        }
    }

    fn gaps() -> Vec<GapRecord> {
        vec![
            gap("AWS", "Cloud & DevOps", 0.8),
            gap("Spark", "Data & Databases", 0.6),
            gap("Rust", "Systems", 0.5),
            gap("Git", "Cloud & DevOps", 0.4),
        ]
    }

    fn request<'a>(gaps: &'a [GapRecord], taught: &'a [String]) -> RecommendationRequest<'a> {
        RecommendationRequest {
            course_name: "Cloud Computing",
            gaps,
            taught_skills: taught,
        }
    }

    #[test]
    fn test_local_suggestions_follow_gap_order() {
        let items = local_suggestions(&gaps());
        assert_eq!(items.len(), 3);
        assert!(items[0].contains("AWS"));
        assert_eq!(items[1], "Add a data lab using Spark on a realistic dataset.");
        assert_eq!(items[2], "Add a module on Rust with a hands-on project.");
    }

    #[test]
    fn test_empty_gaps_give_single_message() {
        assert_eq!(local_suggestions(&[]), vec![WELL_ALIGNED_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_every_local_backend_handles_empty_gaps() {
        let taught: Vec<String> = Vec::new();
        let req = request(&[], &taught);

        let local = LocalRecommender.recommend(&req).await;
        assert_eq!(local.items.len(), 1);
        assert!(!local.items[0].is_empty());

        let simulated = SimulatedRecommender::new(Duration::from_millis(1))
            .recommend(&req)
            .await;
        assert_eq!(simulated.items, local.items);
        assert_eq!(simulated.source, RecommendationSource::Simulated);
        assert_eq!(simulated.trace.backend, RecommenderKind::Simulated);
    }

    #[test]
    fn test_parse_after_last_delimiter() {
        let raw = "Output: 1. Enhancement 1 2. Enhancement 2\nOutput: 1. Add a Docker lab. 2) Teach AWS basics 3. Use Git";
        let items = parse_recommendations(raw).unwrap();
        assert_eq!(items, vec!["Add a Docker lab.", "Teach AWS basics", "Use Git"]);
    }

    #[test]
    fn test_parse_without_delimiter_is_malformed() {
        assert!(parse_recommendations("1. Add Docker 2. Add AWS").is_none());
    }

    #[test]
    fn test_parse_drops_numeric_and_empty_items() {
        let items = parse_recommendations("Output: 1. 2. 42 3. Add Node.js services").unwrap();
        assert_eq!(items, vec!["Add Node.js services"]);
    }

    #[test]
    fn test_padding_is_deterministic() {
        let gaps = gaps();
        let first = pad_recommendations(vec!["Keep this".to_string()], "Cloud Computing", &gaps);
        let second = pad_recommendations(vec!["Keep this".to_string()], "Cloud Computing", &gaps);

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0], "Keep this");
        for filler in &first[1..] {
            assert!(filler.starts_with("Add "));
            assert!(filler.ends_with(" with a hands-on project."));
            assert!(gaps.iter().any(|g| filler.contains(&g.skill)));
        }
    }

    #[test]
    fn test_padding_truncates_extra_items() {
        let items: Vec<String> = (1..=5).map(|i| format!("Item {}", i)).collect();
        let padded = pad_recommendations(items, "Intro", &gaps());
        assert_eq!(padded, vec!["Item 1", "Item 2", "Item 3"]);
    }

    fn remote_config(endpoint: &str) -> RecommenderConfig {
        RecommenderConfig {
            kind: RecommenderKind::Remote,
            endpoint: endpoint.to_string(),
            model: "test/model".to_string(),
            token_env: "CURRICULUM_ALIGNER_TEST_NO_TOKEN".to_string(),
            timeout_secs: 2,
            simulated_delay_ms: 0,
        }
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    /// Answers a single inference request with a canned JSON body
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_remote_pads_partial_reply() {
        let endpoint =
            serve_once(r#"[{"generated_text":"Output: 1. Add a Kubernetes deployment lab."}]"#).await;
        let recommender = RemoteRecommender::new(&remote_config(&endpoint)).unwrap();

        let gaps = gaps();
        let taught = vec!["Linux".to_string()];
        let set = recommender.recommend(&request(&gaps, &taught)).await;

        assert_eq!(set.source, RecommendationSource::Remote);
        assert_eq!(set.items.len(), MAX_RECOMMENDATIONS);
        assert_eq!(set.items[0], "Add a Kubernetes deployment lab.");
        assert_eq!(set.trace.parsed_count, 1);
        assert_eq!(set.trace.padded_count, 2);
        assert!(set.trace.fallback_reason.is_none());
        assert!(set.trace.raw_response.is_some());
    }

    #[tokio::test]
    async fn test_remote_reply_without_usable_items_is_padded() {
        let endpoint = serve_once(r#"[{"generated_text":"Output: 1. 2. 3."}]"#).await;
        let recommender = RemoteRecommender::new(&remote_config(&endpoint)).unwrap();

        let gaps = gaps();
        let taught: Vec<String> = Vec::new();
        let set = recommender.recommend(&request(&gaps, &taught)).await;

        assert_eq!(set.source, RecommendationSource::Remote);
        assert_eq!(set.items, pad_recommendations(Vec::new(), "Cloud Computing", &gaps));
        assert_eq!(set.items.len(), MAX_RECOMMENDATIONS);
        assert_eq!(set.trace.parsed_count, 0);
        assert_eq!(set.trace.padded_count, MAX_RECOMMENDATIONS);
        assert!(set.trace.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_remote_with_no_gaps_sends_nothing() {
        // Nothing listens on the discard port
        let recommender = RemoteRecommender::new(&remote_config("http://127.0.0.1:9")).unwrap();

        let taught: Vec<String> = Vec::new();
        let set = recommender.recommend(&request(&[], &taught)).await;

        assert_eq!(set.source, RecommendationSource::Remote);
        assert_eq!(set.items, vec![WELL_ALIGNED_MESSAGE.to_string()]);
        assert!(set.trace.prompt.is_none());
        assert!(set.trace.raw_response.is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        // Nothing listens on the discard port
        let config = remote_config("http://127.0.0.1:9");
        let requester = RecommendationRequester::from_config(&config).unwrap();
        assert_eq!(requester.kind(), RecommenderKind::Remote);

        let gaps = gaps();
        let taught = vec!["Linux".to_string()];
        let set = requester.recommend(&request(&gaps, &taught)).await;

        assert_eq!(set.source, RecommendationSource::Fallback);
        assert_eq!(set.items, local_suggestions(&gaps));
        assert!(set.trace.fallback_reason.is_some());
        assert!(set.trace.prompt.as_deref().unwrap_or_default().contains("Cloud Computing"));
        assert_eq!(set.trace.endpoint.as_deref(), Some("http://127.0.0.1:9/test/model"));
    }
}
