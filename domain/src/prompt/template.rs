//! Prompt templates for routing, delegation and synthesis

/// Response returned when no answer could be produced at all.
pub const APOLOGY: &str =
    "Sorry, I could not process your request right now. Please try again later.";

/// Response returned when a request is cancelled before completion.
pub const CANCELLED_NOTICE: &str = "The request was cancelled before an answer was ready.";

/// Title used when summarization fails or yields nothing.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum number of words kept in a conversation title.
pub const MAX_TITLE_WORDS: usize = 5;

/// Templates for generating prompts at each dispatch stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Language requirement appended to router and agent system prompts.
    pub fn language_instruction(language: &str) -> String {
        format!(
            r#"IMPORTANT LANGUAGE INSTRUCTION:
- The final response to the user MUST be written in {language}
- Even if the user writes in another language, respond in {language}"#
        )
    }

    /// System prompt for the router deciding which agent handles a request.
    pub fn router_system(agents: &[(String, String)], language: &str) -> String {
        let listing = agents
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a coordinator responsible for delegating requests to specialist agents.

Your responsibilities:
1. Analyze the user's request carefully
2. Decide which specialist agent is best suited to handle it
3. Call that agent with the complete request as `input_query`
4. Answer directly only when no specialist fits (for example greetings)

Available specialist agents:
{listing}

Guidelines:
- Match the request against each agent's description
- If a request fits several agents, choose the most specific one
- Pass the user's full question, including relevant history, to the selected agent
- When the agent answers, relay its answer to the user

{}"#,
            Self::language_instruction(language)
        )
    }

    /// System prompt for a specialist agent and its tools.
    pub fn agent_system(name: &str, description: &str, language: &str) -> String {
        format!(
            r#"You are a helpful assistant named {name}.

Your purpose is: {description}

You have access to specific tools. Use them to provide accurate answers, and
extract the parameters they need from the user's request.

Guidelines:
- Prefer your tools over guessing
- If a parameter is missing, ask the user for it
- If a task is outside your capabilities, explain what you can help with instead
- If a tool reports an error, explain the problem plainly

{}"#,
            Self::language_instruction(language)
        )
    }

    /// Fixed elaboration appended to the query for every comparison target.
    pub fn elaboration(query: &str) -> String {
        format!(
            r#"{query}

Describe the business model or solution you support in relation to this question:
1. Its main characteristics
2. Its key benefits
3. Its target audience (business size and type)
4. Its key capabilities and features"#
        )
    }

    /// System prompt for the synthesis step of comparison mode.
    pub fn synthesis_system(language: &str) -> String {
        format!(
            r#"You are a consultant who compares business solutions objectively.
You receive answers from several specialists and merge them into one comparison.

{}"#,
            Self::language_instruction(language)
        )
    }

    /// Synthesis prompt interleaving every target answer under its header.
    pub fn synthesis_prompt(query: &str, answers: &[(String, String)]) -> String {
        format!(
            r#"Original question: {query}

Specialist answers:
{}

Write a single answer containing:
1. A short summary of each option
2. A comparison table of trade-offs between the options
3. A recommendation section explaining which option suits which business size or type"#,
            Self::sectioned_answers(answers)
        )
    }

    /// Answers under `=== {agent} ===` headers.
    pub fn sectioned_answers(answers: &[(String, String)]) -> String {
        answers
            .iter()
            .map(|(agent, answer)| format!("=== {} ===\n{}", agent, answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Deterministic response used when synthesis fails.
    pub fn fallback_concatenation(answers: &[(String, String)]) -> String {
        format!(
            "{}\n\nFor a tailored recommendation, please contact our support team.",
            Self::sectioned_answers(answers)
        )
    }

    /// Inline replacement for a target that failed or timed out.
    pub fn target_failure(agent: &str, reason: &str) -> String {
        format!("[{} failed: {}]", agent, reason)
    }

    /// Observation returned when the decision service names an unknown tool.
    pub fn unknown_tool(name: &str, available: &[&str]) -> String {
        format!(
            "Unknown tool '{}'. Available tools: {}",
            name,
            available.join(", ")
        )
    }

    /// System prompt for conversation title generation.
    pub fn title_system() -> &'static str {
        "Based on the following conversation, create a short, descriptive title of 5 words or less. Do not use quotes."
    }

    /// Normalize a generated title: quotes stripped, at most five words.
    pub fn clean_title(raw: &str) -> String {
        let unquoted: String = raw
            .chars()
            .filter(|c| !matches!(c, '"' | '\u{201C}' | '\u{201D}'))
            .collect();
        let title = unquoted
            .split_whitespace()
            .take(MAX_TITLE_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> Vec<(String, String)> {
        vec![
            ("FNB_Agent".to_string(), "POS cho nhà hàng".to_string()),
            ("Booking_Agent".to_string(), "Đặt lịch spa".to_string()),
        ]
    }

    #[test]
    fn test_router_prompt_lists_agents_and_language() {
        let agents = vec![("HR_Agent".to_string(), "HR policies".to_string())];
        let prompt = PromptTemplate::router_system(&agents, "Vietnamese");
        assert!(prompt.contains("- HR_Agent: HR policies"));
        assert!(prompt.contains("MUST be written in Vietnamese"));
    }

    #[test]
    fn test_elaboration_keeps_query_first() {
        let prompt = PromptTemplate::elaboration("So sánh FNB và Booking");
        assert!(prompt.starts_with("So sánh FNB và Booking"));
        assert!(prompt.contains("target audience"));
    }

    #[test]
    fn test_synthesis_prompt_sections() {
        let prompt = PromptTemplate::synthesis_prompt("q", &answers());
        assert!(prompt.contains("=== FNB_Agent ===\nPOS cho nhà hàng"));
        assert!(prompt.contains("=== Booking_Agent ===\nĐặt lịch spa"));
        assert!(prompt.contains("recommendation"));
    }

    #[test]
    fn test_fallback_is_never_empty() {
        let text = PromptTemplate::fallback_concatenation(&answers());
        assert!(text.starts_with("=== FNB_Agent ==="));
        assert!(text.contains("contact our support team"));
        assert!(!PromptTemplate::fallback_concatenation(&[]).is_empty());
    }

    #[test]
    fn test_target_failure_format() {
        assert_eq!(
            PromptTemplate::target_failure("FNB_Agent", "timed out after 60s"),
            "[FNB_Agent failed: timed out after 60s]"
        );
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(
            PromptTemplate::clean_title("\"Chính sách nghỉ phép năm 2024 mới\""),
            "Chính sách nghỉ phép năm"
        );
        assert_eq!(PromptTemplate::clean_title("  \"\" "), DEFAULT_TITLE);
        assert_eq!(PromptTemplate::clean_title("Leave policy"), "Leave policy");
    }
}
