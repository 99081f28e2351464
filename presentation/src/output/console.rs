//! Console output formatter for deliberation sessions

use colored::Colorize;
use deliberation_domain::core::string::take_chars;
use deliberation_domain::{
    AnalysisReport, ConsensusResult, DebateResult, OutputFormat, ResponderOutput, Session,
};

/// Characters of each debate exchange shown in the full report
const EXCERPT_CHARS: usize = 240;

/// Formats finished sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a session in the requested format
    pub fn render(session: &Session, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(session),
            OutputFormat::Result => Self::format_result_only(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Format the complete session, phase by phase
    pub fn format(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Deliberation Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            session.query.body()
        ));
        output.push_str(&format!(
            "{} {} ({}, {})\n\n",
            "Session:".cyan().bold(),
            session.id,
            session.mode,
            session.status
        ));

        output.push_str(&Self::section_header("Phase 1: Responses"));
        for response in &session.responses {
            output.push_str(&Self::format_response(response));
        }
        for failure in &session.failures {
            output.push_str(&format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", failure.responder_id).red().bold(),
                failure.error
            ));
        }

        if let Some(analysis) = &session.analysis {
            output.push_str(&Self::section_header("Phase 2: Analysis"));
            output.push_str(&Self::format_analysis(analysis));
        }

        if let Some(debate) = &session.debate {
            output.push_str(&Self::section_header("Phase 3: Debate"));
            output.push_str(&Self::format_debate(debate));
        }

        if let Some(consensus) = &session.consensus {
            output.push_str(&Self::section_header("Phase 4: Consensus"));
            output.push_str(&Self::format_consensus(consensus));
        } else if let Some(text) = &session.result_text {
            output.push_str(&Self::section_header("Answer"));
            output.push_str(&format!("\n{}\n", text));
        }

        if let Some(error) = &session.error {
            output.push_str(&format!("\n{} {}\n", "Error:".red().bold(), error));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(session: &Session) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_result_only(session: &Session) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Deliberation Result ===".cyan().bold()));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), session.query.body()));

        let responders: Vec<&str> = session
            .responses
            .iter()
            .map(|r| r.responder_id.as_str())
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Responders:".dimmed(),
            responders.join(", ")
        ));
        if let Some(consensus) = &session.consensus {
            output.push_str(&format!(
                "{} {} ({:.0}% agreement)\n",
                "Consensus:".dimmed(),
                consensus.method,
                consensus.agreement_level * 100.0
            ));
        }
        output.push('\n');

        output.push_str(session.result_text.as_deref().unwrap_or("(no result)"));
        output.push('\n');

        output
    }

    fn format_response(response: &ResponderOutput) -> String {
        format!(
            "\n{} {}\n{}\n",
            format!("── {} ──", response.responder_id).yellow().bold(),
            format!("({} tokens, {}ms)", response.token_count, response.latency_ms).dimmed(),
            response.text
        )
    }

    fn format_analysis(analysis: &AnalysisReport) -> String {
        let mut output = String::new();
        if analysis.timed_out {
            output.push_str(&format!("\n{}\n", "Analysis timed out.".yellow()));
        }
        output.push_str(&format!("\n{}\n", analysis.summary));

        if !analysis.common_themes.is_empty() {
            output.push_str(&format!("\n{}\n", "Common Themes:".green().bold()));
            for theme in &analysis.common_themes {
                output.push_str(&format!(
                    "  * {} ({}; confidence {:.2})\n",
                    theme.phrase,
                    theme.responder_ids.join(", "),
                    theme.confidence
                ));
            }
        }

        if !analysis.approaches.is_empty() {
            output.push_str(&format!("\n{}\n", "Approaches:".cyan().bold()));
            for approach in &analysis.approaches {
                output.push_str(&format!(
                    "  * {} [{}]: {}\n",
                    approach.responder_id, approach.methodology, approach.description
                ));
            }
        }

        if !analysis.differences.is_empty() {
            output.push_str(&format!("\n{}\n", "Differences:".yellow().bold()));
            for difference in &analysis.differences {
                output.push_str(&format!(
                    "  * {} ({}): {}\n",
                    difference.kind,
                    difference.responder_ids.join(" vs "),
                    difference.description
                ));
            }
        }

        output
    }

    fn format_debate(debate: &DebateResult) -> String {
        let mut output = String::new();
        for round in &debate.rounds {
            output.push_str(&format!(
                "\n{}\n",
                format!(
                    "Round {} (disagreement {:.2})",
                    round.round, round.disagreement_level
                )
                .yellow()
                .bold()
            ));
            for exchange in &round.exchanges {
                output.push_str(&format!(
                    "  {}\n{}\n",
                    format!("{}:", exchange.responder_id).bold(),
                    Self::indent(&Self::excerpt(exchange.latest_position()), "    ")
                ));
            }
        }
        output.push_str(&format!(
            "\n{} {:.2} after {} rounds ({}ms)\n",
            "Convergence:".cyan().bold(),
            debate.convergence_score,
            debate.rounds.len(),
            debate.duration_ms
        ));
        output
    }

    fn format_consensus(consensus: &ConsensusResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!(
                "{} consensus, {:.0}% agreement",
                consensus.method,
                consensus.agreement_level * 100.0
            )
            .yellow()
            .bold(),
            consensus.solution.text
        ));

        if !consensus.solution.supporting_responders.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Supported by:".green().bold(),
                consensus.solution.supporting_responders.join(", ")
            ));
        }

        if !consensus.solution.insights.is_empty() {
            output.push_str(&format!("\n{}\n", "Incorporated Insights:".cyan().bold()));
            for insight in &consensus.solution.insights {
                output.push_str(&format!("  * {} ({})\n", insight.text, insight.responder_id));
            }
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Rationale:".dimmed(),
            consensus.rationale
        ));
        output
    }

    fn excerpt(text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.chars().count() <= EXCERPT_CHARS {
            return trimmed.to_string();
        }
        format!("{}...", take_chars(trimmed, EXCERPT_CHARS).trim_end())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
