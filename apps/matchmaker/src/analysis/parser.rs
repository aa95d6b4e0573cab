//! Parsing of model replies: the markdown resume summary and the final score.
//!
//! The heading vocabulary lives in `SECTIONS`; adding a language alias is a
//! table edit, not a code change.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Name,
    Experience,
    Skills,
    Education,
    Languages,
}

impl SectionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Name => "name",
            SectionKey::Experience => "experience",
            SectionKey::Skills => "skills",
            SectionKey::Education => "education",
            SectionKey::Languages => "languages",
        }
    }
}

#[derive(Debug)]
pub struct SectionSpec {
    pub key: SectionKey,
    /// Accepted heading titles, compared case-insensitively.
    pub headings: &'static [&'static str],
    pub required: bool,
}

/// Template order. The first heading of each entry is the one prompts ask for.
pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        key: SectionKey::Name,
        headings: &["Nome Completo", "Full Name"],
        required: true,
    },
    SectionSpec {
        key: SectionKey::Experience,
        headings: &["Experiência", "Experience"],
        required: false,
    },
    SectionSpec {
        key: SectionKey::Skills,
        headings: &["Habilidades", "Skills"],
        required: true,
    },
    SectionSpec {
        key: SectionKey::Education,
        headings: &["Educação", "Education"],
        required: true,
    },
    SectionSpec {
        key: SectionKey::Languages,
        headings: &["Idiomas", "Languages"],
        required: false,
    },
];

/// Order in which required sections are checked.
const REQUIRED_ORDER: [SectionKey; 3] = [SectionKey::Name, SectionKey::Education, SectionKey::Skills];

pub fn section_spec(key: SectionKey) -> &'static SectionSpec {
    SECTIONS
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&SECTIONS[0])
}

/// Primary heading title for a section.
pub fn heading(key: SectionKey) -> &'static str {
    section_spec(key).headings[0]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required section '{section}' is missing or empty")]
pub struct MissingRequiredSectionError {
    pub section: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreParseFailure {
    #[error("no final score label in reply")]
    LabelNotFound,

    #[error("final score label not followed by a number")]
    InvalidNumber,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeSections {
    pub name: String,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub languages: Vec<String>,
}

pub const MAX_SCORE: f64 = 10.0;

static SCORE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:pontua[çc][ãa]o\s+final|final\s+score)").expect("valid score label regex")
});

/// Label immediately followed by a number; the first such pair wins.
static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:pontua[çc][ãa]o\s+final|final\s+score)[\s:*]*(\d+(?:[.,]\d+)?)")
        .expect("valid score regex")
});

/// Returns the contents of the first ```` ```markdown ```` block, or the whole
/// text when there is none.
pub fn unwrap_markdown_fence(text: &str) -> &str {
    const OPEN: &str = "```markdown";
    let lower = text.to_ascii_lowercase();
    let Some(start) = lower.find(OPEN) else {
        return text.trim();
    };
    let body = &text[start + OPEN.len()..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Strips bullet markers and `**` emphasis from a list line.
fn clean_item(line: &str) -> String {
    let mut item = line.trim();
    for marker in ['-', '*', '+', '•'] {
        if let Some(rest) = item.strip_prefix(marker) {
            // "**bold**" and "--" are not bullets
            if !rest.starts_with(marker) {
                item = rest.trim_start();
            }
            break;
        }
    }
    if item == "-" || item == "*" || item == "•" {
        return String::new();
    }
    item.replace("**", "").trim().to_string()
}

fn heading_title(line: &str) -> Option<String> {
    let line = line.trim_start();
    if !line.starts_with('#') {
        return None;
    }
    let title = line.trim_start_matches('#').replace("**", "");
    Some(title.trim().trim_end_matches(':').trim().to_lowercase())
}

fn match_heading(title: &str) -> Option<SectionKey> {
    SECTIONS
        .iter()
        .find(|spec| spec.headings.iter().any(|h| h.to_lowercase() == title))
        .map(|spec| spec.key)
}

/// `| Nome Completo | Maria |` table rows.
fn table_name(text: &str) -> Option<String> {
    let names = &section_spec(SectionKey::Name).headings;
    text.lines().find_map(|line| {
        let line = line.trim();
        if !line.starts_with('|') {
            return None;
        }
        let cells: Vec<&str> = line.trim_matches('|').split('|').map(str::trim).collect();
        let [field, value, ..] = cells.as_slice() else {
            return None;
        };
        let field = field.replace("**", "").to_lowercase();
        let value = value.replace("**", "").trim().to_string();
        (names.iter().any(|h| h.to_lowercase() == field) && !value.is_empty()).then_some(value)
    })
}

/// Splits a markdown summary into its known sections.
pub fn extract_sections(markdown: &str) -> Result<ResumeSections, MissingRequiredSectionError> {
    let text = unwrap_markdown_fence(markdown);
    let mut sections = ResumeSections::default();
    let mut seen: Vec<SectionKey> = Vec::new();
    let mut current: Option<SectionKey> = None;

    for line in text.lines() {
        if let Some(title) = heading_title(line) {
            current = match_heading(&title).filter(|key| !seen.contains(key));
            if let Some(key) = current {
                seen.push(key);
            }
            continue;
        }

        let Some(key) = current else { continue };
        let item = clean_item(line);
        if item.is_empty() {
            continue;
        }
        match key {
            SectionKey::Name => {
                if sections.name.is_empty() {
                    sections.name = item;
                }
            }
            SectionKey::Experience => sections.experience.push(item),
            SectionKey::Skills => sections.skills.push(item),
            SectionKey::Education => sections.education.push(item),
            SectionKey::Languages => sections.languages.push(item),
        }
    }

    if sections.name.is_empty() {
        if let Some(name) = table_name(text) {
            sections.name = name;
        }
    }

    for key in REQUIRED_ORDER {
        let empty = match key {
            SectionKey::Name => sections.name.is_empty(),
            SectionKey::Education => sections.education.is_empty(),
            SectionKey::Skills => sections.skills.is_empty(),
            SectionKey::Experience => sections.experience.is_empty(),
            SectionKey::Languages => sections.languages.is_empty(),
        };
        if empty && section_spec(key).required {
            return Err(MissingRequiredSectionError {
                section: key.as_str(),
            });
        }
    }

    Ok(sections)
}

/// Reads the first "Pontuação Final" / "Final Score" value, clamped to 10.
pub fn parse_score(text: &str) -> Result<f64, ScoreParseFailure> {
    let Some(number) = SCORE_RE.captures(text).and_then(|c| c.get(1)) else {
        return Err(if SCORE_LABEL_RE.is_match(text) {
            ScoreParseFailure::InvalidNumber
        } else {
            ScoreParseFailure::LabelNotFound
        });
    };

    let score: f64 = number
        .as_str()
        .replace(',', ".")
        .parse()
        .map_err(|_| ScoreParseFailure::InvalidNumber)?;
    Ok(score.min(MAX_SCORE))
}

pub fn extract_score(text: &str) -> Option<f64> {
    parse_score(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "Aqui está o resumo:\n\n```markdown\n## Nome Completo\nMaria Souza\n\n## Experiência\n- Analista de Dados na ACME (2019-2023)\n\n## Habilidades\n- **Python**\n- SQL\n* Power BI\n-Docker\n*Git\n\n## Educação\n- Bacharelado em Estatística - USP\n\n## Idiomas\n- Inglês avançado\n```\nFim.";

    #[test]
    fn test_extract_sections_from_fenced_template() {
        let sections = extract_sections(SUMMARY).unwrap();
        assert_eq!(sections.name, "Maria Souza");
        assert_eq!(
            sections.skills,
            vec!["Python", "SQL", "Power BI", "Docker", "Git"]
        );
        assert_eq!(sections.education, vec!["Bacharelado em Estatística - USP"]);
        assert_eq!(sections.languages, vec!["Inglês avançado"]);
        assert_eq!(sections.experience.len(), 1);
    }

    #[test]
    fn test_template_round_trips() {
        let rendered = format!(
            "## {}\nJoão\n## {}\n- Dev\n## {}\n- Rust\n- Go\n## {}\n- UFMG\n## {}\n- Espanhol",
            heading(SectionKey::Name),
            heading(SectionKey::Experience),
            heading(SectionKey::Skills),
            heading(SectionKey::Education),
            heading(SectionKey::Languages),
        );
        let sections = extract_sections(&rendered).unwrap();
        assert_eq!(
            sections,
            ResumeSections {
                name: "João".to_string(),
                experience: vec!["Dev".to_string()],
                skills: vec!["Rust".to_string(), "Go".to_string()],
                education: vec!["UFMG".to_string()],
                languages: vec!["Espanhol".to_string()],
            }
        );
    }

    #[test]
    fn test_english_headings_are_accepted() {
        let text = "# FULL NAME\nJane Doe\n# Skills:\n- Java\n# Education\n- MIT";
        let sections = extract_sections(text).unwrap();
        assert_eq!(sections.name, "Jane Doe");
        assert_eq!(sections.skills, vec!["Java"]);
        assert!(sections.languages.is_empty());
    }

    #[test]
    fn test_missing_skills_is_reported() {
        let text = "## Nome Completo\nAna\n## Educação\n- UnB\n## Idiomas\n- Inglês";
        let err = extract_sections(text).unwrap_err();
        assert_eq!(err.section, "skills");
    }

    #[test]
    fn test_required_sections_checked_in_order() {
        let err = extract_sections("## Idiomas\n- Inglês").unwrap_err();
        assert_eq!(err.section, "name");
        let err = extract_sections("## Nome Completo\nAna\n## Habilidades\n- C").unwrap_err();
        assert_eq!(err.section, "education");
    }

    #[test]
    fn test_name_from_table_row() {
        let text = "| Campo | Valor |\n|---|---|\n| **Nome Completo** | Carlos Lima |\n## Habilidades\n- Excel\n## Educação\n- FGV";
        assert_eq!(extract_sections(text).unwrap().name, "Carlos Lima");
    }

    #[test]
    fn test_unwrap_markdown_fence() {
        assert_eq!(unwrap_markdown_fence("```markdown\n# A\n```"), "# A");
        assert_eq!(unwrap_markdown_fence("```Markdown\n# A"), "# A");
        assert_eq!(unwrap_markdown_fence("  # A  "), "# A");
    }

    #[test]
    fn test_parse_score_separators() {
        assert_eq!(parse_score("Final Score: 7.5"), Ok(7.5));
        assert_eq!(parse_score("**Pontuação Final:** 7,5"), Ok(7.5));
        assert_eq!(parse_score("pontuacao final 9"), Ok(9.0));
    }

    #[test]
    fn test_parse_score_skips_label_mentioned_in_prose() {
        let reply = "Com base nos critérios, a pontuação final do candidato é:\n\nPontuação Final: 7.5";
        assert_eq!(parse_score(reply), Ok(7.5));
    }

    #[test]
    fn test_list_items_keep_inner_hyphens() {
        let text = "## Nome Completo\nAna\n## Habilidades\n-Front-end\n--verbose\n## Educação\n- Pós-graduação";
        let sections = extract_sections(text).unwrap();
        assert_eq!(sections.skills, vec!["Front-end", "--verbose"]);
        assert_eq!(sections.education, vec!["Pós-graduação"]);
    }

    #[test]
    fn test_parse_score_first_match_wins_and_clamps() {
        assert_eq!(parse_score("Final Score: 6\nFinal Score: 9"), Ok(6.0));
        assert_eq!(parse_score("Pontuação Final: 85"), Ok(10.0));
    }

    #[test]
    fn test_parse_score_failures() {
        assert_eq!(parse_score("Nota: 8"), Err(ScoreParseFailure::LabelNotFound));
        assert_eq!(
            parse_score("Pontuação Final: alta"),
            Err(ScoreParseFailure::InvalidNumber)
        );
        assert_eq!(extract_score("sem nota"), None);
    }
}
