//! Heuristic code review analyzer
//!
//! Lightweight static checks over source text. Not a replacement for a
//! real linter; the point is to produce conversation-ready findings and
//! questions the assistant can discuss with the user.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Which quality dimension to review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFocus {
    Performance,
    Security,
    Readability,
    Architecture,
    All,
}

impl ReviewFocus {
    /// Parse from the tool's enum-validated string argument
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "performance" => Some(Self::Performance),
            "security" => Some(Self::Security),
            "readability" => Some(Self::Readability),
            "architecture" => Some(Self::Architecture),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    fn covers(&self, other: ReviewFocus) -> bool {
        *self == ReviewFocus::All || *self == other
    }
}

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    fn marker(&self) -> &'static str {
        match self {
            Severity::Low => "[low]",
            Severity::Medium => "[med]",
            Severity::High => "[high]",
        }
    }
}

/// A single problem found in the code
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    /// 1-based line numbers, capped at the first few occurrences
    pub lines: Vec<usize>,
}

/// A non-blocking improvement suggestion
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub message: String,
    pub action: String,
}

/// Structured review result for one file
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub path: String,
    pub line_count: usize,
    pub byte_count: usize,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<Suggestion>,
    pub questions: Vec<String>,
}

/// Analyze source text under the given focus
pub fn analyze_code(content: &str, path: &str, focus: ReviewFocus) -> ReviewReport {
    debug!(%path, ?focus, "analyze_code: called");
    let lines: Vec<&str> = content.lines().collect();

    let mut report = ReviewReport {
        path: path.to_string(),
        line_count: lines.len(),
        byte_count: content.len(),
        issues: Vec::new(),
        suggestions: Vec::new(),
        questions: Vec::new(),
    };

    if focus.covers(ReviewFocus::Readability) {
        check_readability(&lines, &mut report);
    }
    if focus.covers(ReviewFocus::Performance) {
        check_performance(&lines, &mut report);
    }
    if focus.covers(ReviewFocus::Security) {
        check_security(content, &mut report);
    }
    if focus.covers(ReviewFocus::Architecture) {
        check_architecture(&lines, &mut report);
    }

    report
}

fn check_readability(lines: &[&str], report: &mut ReviewReport) {
    let long_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.chars().count() > 100)
        .map(|(i, _)| i + 1)
        .collect();

    if !long_lines.is_empty() {
        report.issues.push(Issue {
            kind: "readability".to_string(),
            severity: Severity::Medium,
            message: format!("{} line(s) longer than 100 characters", long_lines.len()),
            lines: long_lines.into_iter().take(3).collect(),
        });
        report
            .questions
            .push("Could these long lines be restructured for readability?".to_string());
    }

    let comment_count = lines
        .iter()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with('#') || t.starts_with("//")
        })
        .count();
    let comment_ratio = if lines.is_empty() {
        0.0
    } else {
        comment_count as f64 / lines.len() as f64
    };

    if comment_ratio < 0.1 && !lines.is_empty() {
        report.suggestions.push(Suggestion {
            message: "Comment ratio is low".to_string(),
            action: "Add comments around the non-obvious logic".to_string(),
        });
        report
            .questions
            .push("Which parts of the logic are hardest to follow without comments?".to_string());
    }
}

fn check_performance(lines: &[&str], report: &mut ReviewReport) {
    // Indentation-based nesting heuristic: a loop keyword while already
    // inside a loop counts as nesting; a column-0 line resets the depth.
    let mut nested_loops = 0;
    let mut loop_depth = 0;

    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.starts_with("for ") || trimmed.starts_with("while ") {
            loop_depth += 1;
            if loop_depth > 1 {
                nested_loops += 1;
            }
        }
        if !line.starts_with(' ') && !line.starts_with('\t') {
            loop_depth = 0;
        }
    }

    if nested_loops > 0 {
        report.issues.push(Issue {
            kind: "performance".to_string(),
            severity: Severity::Medium,
            message: format!("{} nested loop(s) found", nested_loops),
            lines: vec![],
        });
        report
            .questions
            .push("Can the nested loops be replaced with a lower-complexity approach?".to_string());
    }
}

fn check_security(content: &str, report: &mut ReviewReport) {
    let mut risks = Vec::new();

    // String-built queries passed to an executor
    let query_sink = Regex::new(r"(execute|query)\s*\(").expect("static regex");
    let string_building = content.contains("%s") || content.contains(".format(") || content.contains("+ \"");
    if query_sink.is_match(content) && string_building {
        risks.push("query built from string concatenation/formatting (injection risk)");
    }

    // Hard-coded credentials
    let secret_assignment =
        Regex::new(r#"(?i)(password|secret|api_key|token)\s*=\s*["'][^"']+["']"#).expect("static regex");
    if secret_assignment.is_match(content) {
        risks.push("possible hard-coded credential");
    }

    if !risks.is_empty() {
        for risk in &risks {
            report.issues.push(Issue {
                kind: "security".to_string(),
                severity: Severity::High,
                message: risk.to_string(),
                lines: vec![],
            });
        }
        report
            .questions
            .push("How are secrets meant to be stored and supplied in this project?".to_string());
    }
}

fn check_architecture(lines: &[&str], report: &mut ReviewReport) {
    let definition = Regex::new(r"^\s*(pub\s+)?(def |class |fn |function )").expect("static regex");

    let mut function_lengths = Vec::new();
    let mut current = 0usize;
    let mut in_function = false;

    for line in lines {
        if definition.is_match(line) {
            if in_function && current > 0 {
                function_lengths.push(current);
            }
            in_function = true;
            current = 0;
        } else if in_function {
            current += 1;
        }
    }
    if in_function && current > 0 {
        function_lengths.push(current);
    }

    let long_functions = function_lengths.iter().filter(|len| **len > 50).count();
    if long_functions > 0 {
        report.suggestions.push(Suggestion {
            message: format!("{} function(s) longer than 50 lines", long_functions),
            action: "Split the long functions into smaller units".to_string(),
        });
        report
            .questions
            .push("Do the long functions carry more than one responsibility?".to_string());
    }
}

impl ReviewReport {
    /// Render the report as conversational text
    pub fn render(&self, ask_questions: bool) -> String {
        let mut parts = vec![
            format!("File: {}", self.path),
            format!("Lines: {}, bytes: {}", self.line_count, self.byte_count),
        ];

        if !self.issues.is_empty() {
            parts.push(format!("\nIssues ({})", self.issues.len()));
            for issue in &self.issues {
                let mut line = format!("{} {}", issue.severity.marker(), issue.message);
                if !issue.lines.is_empty() {
                    let nums: Vec<String> = issue.lines.iter().map(|n| n.to_string()).collect();
                    line.push_str(&format!(" (lines {})", nums.join(", ")));
                }
                parts.push(line);
            }
        }

        if !self.suggestions.is_empty() {
            parts.push(format!("\nSuggestions ({})", self.suggestions.len()));
            for s in &self.suggestions {
                parts.push(format!("- {}: {}", s.message, s.action));
            }
        }

        if ask_questions && !self.questions.is_empty() {
            parts.push("\nQuestions to consider".to_string());
            for (i, q) in self.questions.iter().enumerate() {
                parts.push(format!("{}. {}", i + 1, q));
            }
        }

        if self.issues.is_empty() && self.suggestions.is_empty() {
            parts.push("\nNo notable problems found.".to_string());
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_lines_flagged() {
        let content = format!("{}\nshort line\n", "x".repeat(150));
        let report = analyze_code(&content, "test.py", ReviewFocus::Readability);

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Medium);
        assert_eq!(report.issues[0].lines, vec![1]);
    }

    #[test]
    fn test_nested_loops_flagged() {
        let content = "for i in items:\n    for j in others:\n        pass\n";
        let report = analyze_code(content, "test.py", ReviewFocus::Performance);

        assert!(report.issues.iter().any(|i| i.kind == "performance"));
    }

    #[test]
    fn test_hardcoded_secret_flagged() {
        let content = "password = \"hunter2\"\n";
        let report = analyze_code(content, "config.py", ReviewFocus::Security);

        assert!(report.issues.iter().any(|i| i.severity == Severity::High));
    }

    #[test]
    fn test_clean_code_renders_no_problems() {
        // Enough comments to clear the ratio check
        let content = "# add\n# numbers\ndef add(a, b):\n    return a + b\n";
        let report = analyze_code(content, "ok.py", ReviewFocus::All);

        assert!(report.issues.is_empty());
        let rendered = report.render(true);
        assert!(rendered.contains("No notable problems"));
    }

    #[test]
    fn test_focus_limits_checks() {
        // A security problem that a readability-only review must not see
        let content = "password = \"hunter2\"\n";
        let report = analyze_code(content, "config.py", ReviewFocus::Readability);

        assert!(!report.issues.iter().any(|i| i.kind == "security"));
    }

    #[test]
    fn test_focus_parse() {
        assert_eq!(ReviewFocus::parse("all"), Some(ReviewFocus::All));
        assert_eq!(ReviewFocus::parse("security"), Some(ReviewFocus::Security));
        assert_eq!(ReviewFocus::parse("bogus"), None);
    }

    #[test]
    fn test_render_includes_questions_when_asked() {
        let content = format!("{}\n", "x".repeat(150));
        let report = analyze_code(&content, "test.py", ReviewFocus::Readability);

        assert!(report.render(true).contains("Questions to consider"));
        assert!(!report.render(false).contains("Questions to consider"));
    }
}
