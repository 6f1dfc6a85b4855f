//! Requirement clarification analyzer
//!
//! Scans a raw requirement statement for technology hints, functional
//! areas, and vague wording, then proposes the clarification questions
//! worth asking before any code gets written.

use serde::Serialize;
use tracing::debug;

/// How much analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisDepth {
    Basic,
    Detailed,
    Comprehensive,
}

impl AnalysisDepth {
    /// Parse from the tool's enum-validated string argument
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "detailed" => Some(Self::Detailed),
            "comprehensive" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    /// Cap on how many questions to surface at once
    fn question_limit(&self) -> usize {
        match self {
            AnalysisDepth::Basic => 3,
            AnalysisDepth::Detailed => 6,
            AnalysisDepth::Comprehensive => 9,
        }
    }
}

/// A clarification question with its rationale
#[derive(Debug, Clone, Serialize)]
pub struct ClarificationQuestion {
    pub category: String,
    pub question: String,
    pub why: String,
}

/// Structured result of requirement analysis
#[derive(Debug, Clone, Serialize)]
pub struct RequirementAnalysis {
    pub original: String,
    pub technology_hints: Vec<String>,
    pub functional_areas: Vec<String>,
    pub ambiguous_parts: Vec<String>,
    pub complexity: String,
    pub questions: Vec<ClarificationQuestion>,
}

/// The requirement analyzer - a pure function behind a unit struct
pub struct RequirementAnalyzer;

impl RequirementAnalyzer {
    /// Analyze a requirement statement
    pub fn analyze(requirement: &str, depth: AnalysisDepth) -> RequirementAnalysis {
        debug!(?depth, "RequirementAnalyzer::analyze: called");
        let lowered = requirement.to_lowercase();

        let tech_table: &[(&str, &[&str])] = &[
            ("web", &["website", "web", "frontend", "backend", "网站", "网页"]),
            ("mobile", &["mobile", "app", "android", "ios", "手机", "移动"]),
            ("data", &["data", "database", "analysis", "report", "数据", "报表"]),
            ("ai", &["ai", "machine learning", "llm", "人工智能", "智能"]),
            ("api", &["api", "rest", "endpoint", "service", "接口"]),
            ("game", &["game", "unity", "engine", "游戏"]),
        ];

        let functional_table: &[(&str, &[&str])] = &[
            ("user_management", &["user", "login", "register", "account", "用户", "登录"]),
            ("data_processing", &["process", "compute", "algorithm", "处理", "计算"]),
            ("ui_ux", &["interface", "interaction", "design", "界面", "交互"]),
            ("integration", &["integrate", "connect", "sync", "集成", "对接"]),
            ("automation", &["automatic", "scheduled", "batch", "自动", "定时"]),
        ];

        let ambiguous_indicators = ["similar to", "roughly", "simple", "complex", "nice", "fast", "类似", "简单"];

        let technology_hints: Vec<String> = tech_table
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(category, _)| category.to_string())
            .collect();

        let functional_areas: Vec<String> = functional_table
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(area, _)| area.to_string())
            .collect();

        let ambiguous_parts: Vec<String> = ambiguous_indicators
            .iter()
            .filter(|indicator| lowered.contains(*indicator))
            .map(|indicator| format!("'{}' needs a concrete definition", indicator))
            .collect();

        let complexity = if ["simple", "basic", "small", "demo", "简单"]
            .iter()
            .any(|w| lowered.contains(w))
        {
            "simple"
        } else if ["complex", "advanced", "enterprise", "distributed", "复杂", "企业级"]
            .iter()
            .any(|w| lowered.contains(w))
        {
            "complex"
        } else {
            "medium"
        };

        let mut analysis = RequirementAnalysis {
            original: requirement.to_string(),
            technology_hints,
            functional_areas,
            ambiguous_parts,
            complexity: complexity.to_string(),
            questions: Vec::new(),
        };

        analysis.questions = generate_questions(&analysis, depth.question_limit());
        analysis
    }
}

fn generate_questions(analysis: &RequirementAnalysis, limit: usize) -> Vec<ClarificationQuestion> {
    let mut questions = Vec::new();

    if analysis.technology_hints.iter().any(|h| h == "web") {
        questions.push(ClarificationQuestion {
            category: "technology".to_string(),
            question: "What kind of web application: static site, server-rendered app, or SPA?".to_string(),
            why: "The answer decides the stack and architecture".to_string(),
        });
    }

    if analysis.technology_hints.iter().any(|h| h == "mobile") {
        questions.push(ClarificationQuestion {
            category: "platform".to_string(),
            question: "Which mobile platforms: iOS, Android, or cross-platform?".to_string(),
            why: "Platform choice drives tooling".to_string(),
        });
    }

    if analysis.functional_areas.iter().any(|a| a == "user_management") {
        questions.push(ClarificationQuestion {
            category: "user management".to_string(),
            question: "Which account features are needed: registration flows, roles, profiles?".to_string(),
            why: "Scope here shapes the data model and security design".to_string(),
        });
    }

    if analysis.functional_areas.iter().any(|a| a == "data_processing") {
        questions.push(ClarificationQuestion {
            category: "data".to_string(),
            question: "What kind of data, and roughly how much of it?".to_string(),
            why: "Volume and shape decide storage and processing architecture".to_string(),
        });
    }

    if !analysis.ambiguous_parts.is_empty() {
        questions.push(ClarificationQuestion {
            category: "clarification".to_string(),
            question: format!("Can you pin down: {}?", analysis.ambiguous_parts.join("; ")),
            why: "Vague wording makes effort estimates unreliable".to_string(),
        });
    }

    // Always-relevant closers
    questions.push(ClarificationQuestion {
        category: "context".to_string(),
        question: "Who are the primary users, and in what situations will they use this?".to_string(),
        why: "Audience drives design decisions".to_string(),
    });
    questions.push(ClarificationQuestion {
        category: "constraints".to_string(),
        question: "Any constraints on language, framework, or deployment environment?".to_string(),
        why: "Constraints narrow the solution space early".to_string(),
    });
    questions.push(ClarificationQuestion {
        category: "scope".to_string(),
        question: "Which features are must-have for the first version, and which can wait?".to_string(),
        why: "Priorities decide the build order".to_string(),
    });

    questions.truncate(limit);
    questions
}

impl RequirementAnalysis {
    /// Render the analysis as conversational text
    pub fn render(&self) -> String {
        let mut parts = vec!["Requirement analysis".to_string(), format!("Original: {}", self.original)];

        if !self.technology_hints.is_empty() {
            parts.push(format!("Technology hints: {}", self.technology_hints.join(", ")));
        }
        if !self.functional_areas.is_empty() {
            parts.push(format!("Functional areas: {}", self.functional_areas.join(", ")));
        }
        parts.push(format!("Estimated complexity: {}", self.complexity));

        parts.push(format!("\nQuestions worth answering ({})", self.questions.len()));
        for (i, q) in self.questions.iter().enumerate() {
            parts.push(format!("{}. [{}] {}", i + 1, q.category, q.question));
            parts.push(format!("   why: {}", q.why));
        }

        parts.push("\nAnswer what you can and we will take it from there.".to_string());
        parts.join("\n")
    }
}
