//! Labeled-section parsing of free-form responder replies.
//!
//! Responders are asked to structure their replies with section labels
//! such as `Defense:` or `## Revised position`. These functions recover
//! the sections with a small line-oriented state machine. Every parser
//! has a fallback for replies that carry no recognized label.
//!
//! | Function | Labels | Fallback |
//! |----------|--------|----------|
//! | [`parse_debate_response`] | strengths / weaknesses / critique, defense, revised position | whole text is the critique |
//! | [`parse_proposal_response`] | final solution, incorporated insights | whole text is the solution |
//! | [`parse_acceptance_response`] | YES / NO | rejection |

use regex::Regex;
use std::sync::LazyLock;

static LABEL_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        (?P<heading>\#{1,6}\s*|\d+[.)]\s*|[-*]\s+)?
        (?:\*\*|__)?\s*
        (?P<label>
            strengths?(?:\s*(?:and|&|/)\s*weaknesses?)?
          | weaknesses?
          | critique
          | defen[cs]e
          | revised\s+position
          | final\s+solution
          | (?:incorporated\s+|key\s+)?insights
        )\b
        \s*(?:\*\*|__)?\s*
        (?P<colon>:)?
        \s*(?:\*\*|__)?\s*
        (?P<rest>.*)$",
    )
    .ok()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Critique,
    Defense,
    Revised,
    Solution,
    Insights,
}

impl Section {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.starts_with("strength") || label.starts_with("weakness") || label == "critique" {
            Section::Critique
        } else if label.starts_with("defen") {
            Section::Defense
        } else if label.starts_with("revised") {
            Section::Revised
        } else if label.starts_with("final") {
            Section::Solution
        } else {
            Section::Insights
        }
    }
}

/// A line that opens a section: the section plus any inline content.
fn section_start<'a>(line: &'a str, accepted: &[Section]) -> Option<(Section, &'a str)> {
    let caps = LABEL_LINE.as_ref()?.captures(line)?;
    let rest = caps.name("rest").map_or("", |m| m.as_str().trim());
    let heading = caps
        .name("heading")
        .is_some_and(|m| m.as_str().starts_with('#'));
    let marked = caps.name("colon").is_some() || heading;
    // "Defense is weak" is prose, not a label
    if !marked && !rest.is_empty() {
        return None;
    }
    let section = Section::from_label(caps.name("label")?.as_str());
    accepted.contains(&section).then_some((section, rest))
}

/// Split `text` into labeled sections. Returns `None` when no label is found.
///
/// Text before the first label is dropped. A label seen twice appends to
/// the earlier section.
fn split_sections(text: &str, accepted: &[Section]) -> Option<Vec<(Section, String)>> {
    let mut sections: Vec<(Section, String)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if let Some((section, inline)) = section_start(line, accepted) {
            let idx = match sections.iter().position(|(s, _)| *s == section) {
                Some(idx) => idx,
                None => {
                    sections.push((section, String::new()));
                    sections.len() - 1
                }
            };
            if !inline.is_empty() {
                push_line(&mut sections[idx].1, inline);
            }
            current = Some(idx);
        } else if let Some(idx) = current {
            push_line(&mut sections[idx].1, line);
        }
    }

    if sections.is_empty() {
        return None;
    }
    for (_, body) in sections.iter_mut() {
        *body = body.trim().to_string();
    }
    Some(sections)
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

fn take(sections: &[(Section, String)], wanted: Section) -> Option<String> {
    sections
        .iter()
        .find(|(s, body)| *s == wanted && !body.is_empty())
        .map(|(_, body)| body.clone())
}

/// Sections of one debate reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateReply {
    pub critique: String,
    pub defense: String,
    pub revised_position: Option<String>,
}

/// Parse a debate reply into critique, defense and revised position.
///
/// Strengths and weaknesses both feed the critique.
///
/// ```
/// use deliberation_domain::parsing::parse_debate_response;
///
/// let reply = parse_debate_response("Defense: my plan holds\nRevised position: ship it");
/// assert_eq!(reply.defense, "my plan holds");
/// assert_eq!(reply.revised_position.as_deref(), Some("ship it"));
///
/// let unlabeled = parse_debate_response("I mostly agree.");
/// assert_eq!(unlabeled.critique, "I mostly agree.");
/// ```
pub fn parse_debate_response(text: &str) -> DebateReply {
    const ACCEPTED: &[Section] = &[Section::Critique, Section::Defense, Section::Revised];

    match split_sections(text, ACCEPTED) {
        Some(sections) => DebateReply {
            critique: take(&sections, Section::Critique).unwrap_or_default(),
            defense: take(&sections, Section::Defense).unwrap_or_default(),
            revised_position: take(&sections, Section::Revised),
        },
        None => DebateReply {
            critique: text.trim().to_string(),
            defense: String::new(),
            revised_position: None,
        },
    }
}

/// Final solution text and the insights a responder says it folded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalReply {
    pub solution: String,
    pub insights: Vec<String>,
}

/// Parse a final-proposal reply.
pub fn parse_proposal_response(text: &str) -> ProposalReply {
    const ACCEPTED: &[Section] = &[Section::Solution, Section::Insights];

    let Some(sections) = split_sections(text, ACCEPTED) else {
        return ProposalReply {
            solution: text.trim().to_string(),
            insights: Vec::new(),
        };
    };

    let insights = take(&sections, Section::Insights)
        .map(|body| body.lines().filter_map(strip_bullet).collect())
        .unwrap_or_default();
    let solution = take(&sections, Section::Solution).unwrap_or_else(|| {
        // only insights were labeled; the solution is whatever preceded them
        let cut = text
            .lines()
            .position(|l| section_start(l, ACCEPTED).is_some())
            .unwrap_or(0);
        text.lines().take(cut).collect::<Vec<_>>().join("\n").trim().to_string()
    });

    ProposalReply { solution, insights }
}

fn strip_bullet(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let without = trimmed
        .strip_prefix(['-', '*', '•'])
        .unwrap_or_else(|| {
            let digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
            if digits.len() < trimmed.len() {
                digits.strip_prefix(['.', ')']).unwrap_or(trimmed)
            } else {
                trimmed
            }
        })
        .trim();
    (!without.is_empty() && !without.eq_ignore_ascii_case("none")).then(|| without.to_string())
}

/// Parse a yes/no acceptance reply.
///
/// The first decisive word wins. `not accept` style negations count as a
/// rejection. Conservative: no decisive word means rejection.
///
/// # Returns
///
/// `(accepted, full_response_as_reasoning)`
pub fn parse_acceptance_response(response: &str) -> (bool, String) {
    let words: Vec<String> = response
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_uppercase)
        .collect();

    let mut decision = None;
    for (i, word) in words.iter().enumerate() {
        let negated = i > 0
            && matches!(
                words[i - 1].as_str(),
                "NOT" | "CANNOT" | "DON'T" | "WON'T" | "CAN'T"
            );
        match word.as_str() {
            "YES" | "ACCEPT" | "ACCEPTED" | "APPROVE" | "APPROVED" | "AGREE" => {
                decision = Some(!negated);
                break;
            }
            "NO" | "REJECT" | "REJECTED" | "DECLINE" => {
                decision = Some(false);
                break;
            }
            _ => {}
        }
    }

    (decision.unwrap_or(false), response.to_string())
}
