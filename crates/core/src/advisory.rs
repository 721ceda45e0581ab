//! Scripted marketing assistant.
//!
//! Stands in for a real inference service. Replies are picked from fixed
//! tables by keyword matching, and funnel templates come from a fixed
//! per-industry lookup with a documented fallback. Both operations wait for
//! a configurable delay to mimic network latency; tests use zero.
//!
//! Tip selection draws from an injected [`StdRng`] so tests can seed it.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::element::{ElementType, FunnelElement};
use crate::element_list::ElementList;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Default simulated latency.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Longest chat message the assistant accepts.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help with your funnel?";

pub const FUNNEL_TIPS: [&str; 6] = [
    "Consider adding a video to increase engagement by 80%.",
    "Your headline could be more compelling. Try addressing a pain point.",
    "Adding social proof like testimonials can boost conversions by 15%.",
    "Your form has too many fields. Consider reducing it to improve completion rates.",
    "The button color could be more attention-grabbing. Try using a contrasting color.",
    "Make sure your value proposition is clear above the fold.",
];

pub const DEFAULT_TIP: &str =
    "I'm analyzing your funnel. Here's a tip: make sure your CTA is clear and compelling.";

const GREETING_KEYWORDS: [&str; 2] = ["hello", "hi"];
const FUNNEL_KEYWORDS: [&str; 3] = ["funnel", "convert", "improve"];

pub const INDUSTRIES: [&str; 10] = [
    "E-commerce",
    "SaaS",
    "Digital Marketing",
    "Health & Fitness",
    "Real Estate",
    "Finance",
    "Education",
    "Travel",
    "Food & Beverage",
    "Professional Services",
];

pub const FUNNEL_TYPES: [&str; 10] = [
    "Lead Generation",
    "Sales",
    "Webinar",
    "Product Launch",
    "Email Opt-in",
    "Subscription",
    "Upsell",
    "Survey",
    "Application",
    "Tripwire",
];

/// Instructions for a real language-model backend. Kept with the engine so a
/// future integration sends the same guidance the scripted replies follow.
pub const SYSTEM_PROMPT: &str = "\
You are a specialized marketing funnel assistant for Kickflip Funnels, a drag-and-drop funnel builder application.
Your role is to help users optimize their marketing funnels for better conversion rates.

Guidelines:
- Provide specific, actionable advice about funnel structure, copy, design, and optimization
- Focus on conversion rate optimization best practices
- Keep responses concise and practical (ideally under 3 sentences)
- When users ask about funnel elements, provide concrete suggestions
- Do not discuss topics unrelated to marketing funnels and conversion optimization
- Reference industry benchmarks and conversion statistics when relevant
- If users describe their funnel, analyze it and suggest improvements
- Suggest A/B testing opportunities when appropriate

When suggesting funnel improvements, focus on these principles:
1. Clarity beats persuasion
2. Reduce friction and complexity
3. Address customer pain points
4. Build trust before asking for commitment
5. Make the next step obvious
";

// ---------------------------------------------------------------------------
// Insights and templates
// ---------------------------------------------------------------------------

/// Benchmark data for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsights {
    pub best_practices: Vec<String>,
    /// Percent.
    pub average_conversion: f64,
    pub top_funnel_structure: Vec<String>,
    pub recent_trends: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Insights for `industry`, or the generic fallback for industries without
/// benchmark data.
pub fn industry_insights(industry: &str) -> IndustryInsights {
    match industry {
        "E-commerce" => IndustryInsights {
            best_practices: strings(&[
                "High-quality product images above the fold",
                "Clear pricing information",
                "User reviews and social proof",
                "Limited form fields at checkout",
                "Abandoned cart recovery emails",
            ]),
            average_conversion: 2.8,
            top_funnel_structure: strings(&[
                "product-showcase",
                "benefits",
                "reviews",
                "pricing",
                "limited-offer",
                "checkout",
            ]),
            recent_trends: strings(&[
                "Video demonstrations",
                "AI product recommendations",
                "Buy now, pay later options",
            ]),
        },
        "SaaS" => IndustryInsights {
            best_practices: strings(&[
                "Free trial or freemium model",
                "Feature comparison table",
                "Case studies from similar companies",
                "Simple onboarding process",
                "Live chat support",
            ]),
            average_conversion: 3.5,
            top_funnel_structure: strings(&[
                "problem",
                "solution",
                "features",
                "pricing",
                "testimonials",
                "signup",
            ]),
            recent_trends: strings(&[
                "Product-led growth",
                "Interactive demos",
                "Usage-based pricing",
            ]),
        },
        _ => fallback_insights(),
    }
}

pub fn fallback_insights() -> IndustryInsights {
    IndustryInsights {
        best_practices: strings(&["No specific data available for this industry"]),
        average_conversion: 2.5,
        top_funnel_structure: strings(&["header", "benefits", "offer", "signup"]),
        recent_trends: strings(&["No recent trends data available"]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub content: String,
    pub conversion_tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStep {
    pub name: String,
    pub elements: Vec<TemplateElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelTemplate {
    pub name: String,
    pub steps: Vec<TemplateStep>,
}

impl FunnelTemplate {
    /// Flatten all steps into one element list, each with a fresh id.
    pub fn to_elements(&self) -> ElementList {
        let elements = self
            .steps
            .iter()
            .flat_map(|step| step.elements.iter())
            .map(|e| FunnelElement::with_content(e.element_type, e.content.clone()))
            .collect::<Vec<_>>();
        ElementList::from(elements)
    }
}

fn template_element(element_type: ElementType, content: String, tip: &str) -> TemplateElement {
    TemplateElement {
        element_type,
        content,
        conversion_tip: tip.to_string(),
    }
}

fn step(name: &str, elements: Vec<TemplateElement>) -> TemplateStep {
    TemplateStep {
        name: name.to_string(),
        elements,
    }
}

/// The five-step funnel template, personalised with the industry name.
pub fn build_template(industry: &str, funnel_type: &str) -> FunnelTemplate {
    use ElementType::{Button, Form, Header, Image, Text};

    FunnelTemplate {
        name: format!("{industry} {funnel_type} Funnel"),
        steps: vec![
            step(
                "Header",
                vec![
                    template_element(
                        Header,
                        format!("Solve Your {industry} Challenges Today"),
                        "Use industry-specific language to build instant credibility",
                    ),
                    template_element(
                        Text,
                        "This compelling subheadline addresses your specific pain point".into(),
                        "Focus on the customer problem, not your solution yet",
                    ),
                ],
            ),
            step(
                "Benefits",
                vec![
                    template_element(
                        Text,
                        "Key Benefit 1: Specific value proposition relevant to your industry"
                            .into(),
                        "Use specific metrics and results when possible",
                    ),
                    template_element(
                        Text,
                        "Key Benefit 2: Another compelling reason to continue".into(),
                        "Benefits should focus on outcomes, not features",
                    ),
                    template_element(
                        Image,
                        "Compelling visual demonstration".into(),
                        "Show results or success states, not just your product",
                    ),
                ],
            ),
            step(
                "Social Proof",
                vec![
                    template_element(
                        Text,
                        "Testimonial from a satisfied customer in your industry".into(),
                        "Use testimonials from people similar to your target audience",
                    ),
                    template_element(
                        Text,
                        "Case study showing specific results".into(),
                        "Include specific numbers and results whenever possible",
                    ),
                ],
            ),
            step(
                "Offer",
                vec![
                    template_element(
                        Header,
                        "Special Limited-Time Offer".into(),
                        "Create urgency with limited-time or limited-quantity offers",
                    ),
                    template_element(
                        Text,
                        "Clear description of your offer with no hidden conditions".into(),
                        "Transparency builds trust and increases conversions",
                    ),
                    template_element(
                        Button,
                        "Get Started Now".into(),
                        "Use action words in CTAs instead of generic \"Submit\" or \"Click Here\"",
                    ),
                ],
            ),
            step(
                "Form",
                vec![
                    template_element(
                        Form,
                        "Simple signup form".into(),
                        "Only ask for essential information - each additional field reduces conversions",
                    ),
                    template_element(
                        Text,
                        "Your data is secure and will never be shared".into(),
                        "Address privacy concerns directly to reduce form abandonment",
                    ),
                ],
            ),
        ],
    }
}

/// Prompt a real model would receive for template generation.
pub fn analysis_prompt(industry: &str, funnel_type: &str, insights: &IndustryInsights) -> String {
    format!(
        "Based on current data for the {industry} industry and {funnel_type} funnel type, \
create a high-converting funnel structure.

Industry insights:
- Best practices: {practices}
- Average conversion rate: {conversion}%
- Top funnel elements: {structure}
- Recent trends: {trends}

Please generate a detailed funnel template with:
1. Recommended funnel structure (step by step)
2. Key elements to include on each step
3. Copy suggestions for headlines and CTAs
4. Conversion optimization tips specific to this industry and funnel type",
        practices = insights.best_practices.join(", "),
        conversion = insights.average_conversion,
        structure = insights.top_funnel_structure.join(" → "),
        trends = insights.recent_trends.join(", "),
    )
}

/// Result of [`AdvisoryEngine::generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFunnel {
    pub industry: String,
    pub funnel_type: String,
    pub insights: IndustryInsights,
    pub template: FunnelTemplate,
    pub generated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Which canned reply a message maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Greeting,
    FunnelTip,
    Default,
}

/// Classify a message by lowercase substring match. Greeting keywords are
/// checked first, so "hi" inside a longer word also counts as a greeting.
pub fn classify(message: &str) -> ReplyKind {
    let lower = message.to_lowercase();
    if GREETING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ReplyKind::Greeting
    } else if FUNNEL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ReplyKind::FunnelTip
    } else {
        ReplyKind::Default
    }
}

pub struct AdvisoryEngine {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl AdvisoryEngine {
    pub fn new(delay: Duration, rng: StdRng) -> Self {
        Self {
            delay,
            rng: Mutex::new(rng),
        }
    }

    /// Engine with OS-seeded randomness.
    pub fn with_delay(delay: Duration) -> Self {
        Self::new(delay, StdRng::from_os_rng())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Reply to a chat message after the simulated delay.
    pub async fn respond(&self, message: &str) -> Result<String, CoreError> {
        let length = message.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(CoreError::Validation(format!(
                "Message is too long ({length} characters, max {MAX_MESSAGE_CHARS})"
            )));
        }

        self.simulate_latency().await;

        let reply = match classify(message) {
            ReplyKind::Greeting => GREETING,
            ReplyKind::FunnelTip => {
                let index = self.rng.lock().await.random_range(0..FUNNEL_TIPS.len());
                FUNNEL_TIPS[index]
            }
            ReplyKind::Default => DEFAULT_TIP,
        };
        tracing::debug!(reply_kind = ?classify(message), "Advisory reply selected");
        Ok(reply.to_string())
    }

    /// Insights plus a funnel template for an industry / funnel type pair.
    pub async fn generate(
        &self,
        industry: &str,
        funnel_type: &str,
    ) -> Result<GeneratedFunnel, CoreError> {
        let industry = industry.trim();
        let funnel_type = funnel_type.trim();
        if industry.is_empty() || funnel_type.is_empty() {
            return Err(CoreError::Validation(
                "Please select both an industry and funnel type".to_string(),
            ));
        }

        self.simulate_latency().await;

        let insights = industry_insights(industry);
        tracing::debug!(
            industry,
            funnel_type,
            prompt_len = analysis_prompt(industry, funnel_type, &insights).len(),
            "Generated funnel template"
        );

        Ok(GeneratedFunnel {
            industry: industry.to_string(),
            funnel_type: funnel_type.to_string(),
            template: build_template(industry, funnel_type),
            insights,
            generated_at: Utc::now(),
        })
    }
}
