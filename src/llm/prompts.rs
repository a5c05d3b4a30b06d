//! Prompt for curriculum enhancement suggestions

/// Marker after which the model writes its numbered suggestions
pub const OUTPUT_DELIMITER: &str = "Output:";

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub enhancement: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            enhancement: ENHANCEMENT_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptParams<'a> {
    pub course_name: &'a str,
    pub taught_skills: &'a [String],
    pub gap_skills: &'a [String],
}

impl PromptTemplates {
    pub fn render_enhancement(&self, params: &PromptParams<'_>) -> String {
        self.enhancement
            .replace("{course}", params.course_name)
            .replace("{taught}", &summarize(params.taught_skills))
            .replace("{gaps}", &summarize(params.gap_skills))
    }
}

fn summarize(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.join(", ")
    }
}

const ENHANCEMENT_TEMPLATE: &str = "I have a computer science course named '{course}' that teaches these skills: {taught}.
It is missing or has low similarity with these skills required by jobs and standards: {gaps}.
Suggest 3 specific, practical enhancements (new topics, tools, or projects) to improve alignment with industry needs and international standards.
Keep responses concise, actionable, and relevant to the course's existing skills.
Output: 1. Enhancement 1 2. Enhancement 2 3. Enhancement 3";
