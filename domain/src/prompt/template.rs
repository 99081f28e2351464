//! Prompt templates for the deliberation flow

use crate::analysis::report::AnalysisReport;
use crate::debate::round::DebateRound;
use crate::orchestration::value_objects::{GenerationContext, ResponderOutput};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt shared by every stage
    pub fn initial_system() -> &'static str {
        r#"You are a knowledgeable expert participating in a structured deliberation with other experts.
Answer independently and precisely. Support your points with reasoning and examples where appropriate.
When asked for labeled sections, use exactly the labels requested."#
    }

    /// Collection prompt: each responder answers blind to its peers
    pub fn initial_query(question: &str) -> String {
        format!(
            r#"Please answer the following question:

{}

Provide a clear, well-structured response."#,
            question
        )
    }

    /// Debate prompt for one round.
    ///
    /// `peers` are the other active responders' latest positions.
    pub fn debate_prompt(
        question: &str,
        round: usize,
        own_response: &str,
        peers: &[(String, String)],
        analysis: Option<&AnalysisReport>,
    ) -> String {
        let mut prompt = format!(
            r#"Original question: {}

This is debate round {}.

Your original response:
{}

Other experts' current positions:
"#,
            question, round, own_response
        );

        for (id, content) in peers {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", id, content));
        }

        if let Some(report) = analysis.filter(|r| !r.summary.is_empty()) {
            prompt.push_str(&format!("\nAnalysis of all responses:\n{}\n", report.summary));
        }

        prompt.push_str(
            r#"
Respond with exactly these labeled sections:

Strengths and weaknesses: your critique of the other positions
Defense: a defense of your own position against likely objections
Revised position: your updated answer (leave empty if unchanged)"#,
        );

        prompt
    }

    /// Final proposal prompt issued after the debate
    pub fn final_proposal_prompt(question: &str, history: &[DebateRound]) -> String {
        let mut prompt = format!("Original question: {}\n", question);

        if !history.is_empty() {
            prompt.push_str("\nDebate so far:\n");
            prompt.push_str(&Self::render_history(history));
        }

        prompt.push_str(
            r#"
Taking the whole debate into account, give your final answer.
Respond with exactly these labeled sections:

Final solution: your complete final answer
Incorporated insights: a bullet list of ideas from other experts that you adopted"#,
        );

        prompt
    }

    /// Yes/no acceptance prompt for a synthesized hybrid solution
    pub fn acceptance_prompt(question: &str, solution: &str) -> String {
        format!(
            r#"Original question: {}

The experts did not converge on a single answer. This combined solution was synthesized from their proposals:

{}

Do you accept this solution as a good answer to the question?
Begin your reply with YES or NO, followed by one sentence explaining why."#,
            question, solution
        )
    }

    /// Plain-text rendering of a generation context for adapters that
    /// only accept a single prompt string.
    pub fn render_context(context: &GenerationContext) -> String {
        let mut out = String::new();

        if !context.peer_responses.is_empty() {
            out.push_str("Peer responses:\n");
            for ResponderOutput {
                responder_id, text, ..
            } in &context.peer_responses
            {
                out.push_str(&format!("\n--- {} ---\n{}\n", responder_id, text));
            }
        }
        if let Some(report) = &context.analysis {
            out.push_str(&format!("\nAnalysis summary:\n{}\n", report.summary));
        }
        if !context.debate_history.is_empty() {
            out.push_str("\nDebate history:\n");
            out.push_str(&Self::render_history(&context.debate_history));
        }

        out
    }

    fn render_history(history: &[DebateRound]) -> String {
        let mut out = String::new();
        for round in history {
            out.push_str(&format!(
                "\n## Round {} (disagreement {:.2})\n",
                round.round, round.disagreement_level
            ));
            for exchange in &round.exchanges {
                out.push_str(&format!(
                    "\n--- {} ---\n{}\n",
                    exchange.responder_id,
                    exchange.latest_position()
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::round::Exchange;

    #[test]
    fn test_initial_query_format() {
        let prompt = PromptTemplate::initial_query("What is Rust?");
        assert!(prompt.contains("What is Rust?"));
    }

    #[test]
    fn test_debate_prompt_lists_peers_and_labels() {
        let peers = vec![
            ("alpha".to_string(), "Rust is a systems language.".to_string()),
            ("beta".to_string(), "Rust focuses on safety.".to_string()),
        ];
        let prompt = PromptTemplate::debate_prompt("What is Rust?", 2, "mine", &peers, None);
        assert!(prompt.contains("round 2"));
        assert!(prompt.contains("--- alpha ---"));
        assert!(prompt.contains("systems language"));
        assert!(prompt.contains("Defense:"));
        assert!(prompt.contains("Revised position:"));
        assert!(!prompt.contains("Analysis of all responses"));
    }

    #[test]
    fn test_final_proposal_prompt_includes_history() {
        let round = DebateRound::new(
            1,
            vec![Exchange::new("alpha", "weak", "strong", Some("use tokio".into()))],
            0.4,
        );
        let prompt = PromptTemplate::final_proposal_prompt("Q?", &[round]);
        assert!(prompt.contains("Round 1"));
        assert!(prompt.contains("use tokio"));
        assert!(prompt.contains("Final solution:"));
        assert!(prompt.contains("Incorporated insights:"));
    }

    #[test]
    fn test_acceptance_prompt_asks_yes_no() {
        let prompt = PromptTemplate::acceptance_prompt("Q?", "Do both.");
        assert!(prompt.contains("Do both."));
        assert!(prompt.contains("YES or NO"));
    }

    #[test]
    fn test_render_empty_context() {
        assert!(PromptTemplate::render_context(&GenerationContext::default()).is_empty());
    }

    #[test]
    fn test_render_history_context() {
        let round = DebateRound::new(
            1,
            vec![Exchange::new("alpha", "weak", "strong", Some("use tokio".into()))],
            0.4,
        );
        let rendered =
            PromptTemplate::render_context(&GenerationContext::default().with_history(vec![round]));
        assert!(rendered.starts_with("\nDebate history:"));
        assert!(rendered.contains("--- alpha ---\nuse tokio"));
    }
}
