//! Heuristic rule engine
//!
//! Maps one statement to exactly one descriptor. Rules are evaluated in
//! order against the lowercased statement text and the first match wins;
//! a statement matching nothing becomes a manual descriptor.
//!
//! Rule order is part of the contract: a statement that mentions an
//! activation date is an activation-date check even if it also talks
//! about login.

use crate::extractor::Statement;

use super::descriptor::{Runner, TestDescriptor};

/// Maximum length, in characters, of a feature label taken from a statement.
pub const FEATURE_LABEL_MAX_CHARS: usize = 60;

/// Expectation attached to statements no rule recognises.
pub const MANUAL_EXPECTATION: &str = "Produce correct behavior per release note";

/// Keyword predicate over lowercased statement text.
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    /// Any keyword present
    Any(&'static [&'static str]),
    /// Every keyword present
    All(&'static [&'static str]),
}

impl Keywords {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Keywords::Any(words) => words.iter().any(|w| lowered.contains(w)),
            Keywords::All(words) => words.iter().all(|w| lowered.contains(w)),
        }
    }
}

/// One (predicate, builder) pair.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Category name, for diagnostics
    pub category: &'static str,
    /// Keyword predicate
    pub keywords: Keywords,
    /// Feature label of the built descriptor
    pub feature: &'static str,
    /// SQL query of the built descriptor
    pub query: &'static str,
    /// Expectation of the built descriptor
    pub expectation: &'static str,
}

impl Rule {
    /// Build the descriptor this rule produces
    pub fn build(&self) -> TestDescriptor {
        TestDescriptor::new(self.feature, self.query, self.expectation, Runner::Sql)
    }
}

/// Built-in rules, highest priority first.
pub const RULES: &[Rule] = &[
    Rule {
        category: "activation-date",
        keywords: Keywords::Any(&["activationdate", "activation date"]),
        feature: "activationDate filter",
        query: "SELECT id, activationDate FROM clients WHERE activationDate >= '2025-01-01';",
        expectation: "Only include clients with activationDate >= 2025-01-01",
    },
    Rule {
        category: "disenrollment",
        keywords: Keywords::Any(&["disenrollment"]),
        feature: "pending disenrollment visibility",
        query: "SELECT id FROM members WHERE status != 'PENDING_DISENROLLMENT';",
        expectation: "Only active members should appear in search results",
    },
    Rule {
        category: "authentication",
        keywords: Keywords::Any(&["authentication", "login", "password"]),
        feature: "user authentication",
        query: "SELECT id, username FROM users WHERE status = 'ACTIVE' \
                AND last_login >= date('now', '-30 days');",
        expectation: "Only recently active users should be able to authenticate",
    },
    Rule {
        category: "search-performance",
        keywords: Keywords::All(&["performance", "search"]),
        feature: "search performance optimization",
        query: "SELECT COUNT(*) AS total_records FROM search_index WHERE indexed_at >= date('now');",
        expectation: "Search index should be updated daily",
    },
];

/// Ordered rule engine.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    rules: &'static [Rule],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self { rules: RULES }
    }
}

impl RuleEngine {
    /// Engine over the built-in rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over a custom rule list, evaluated in the given order
    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// First rule matching the statement, if any
    pub fn rule_for(&self, statement: &Statement) -> Option<&'static Rule> {
        let lowered = statement.text().to_lowercase();
        self.rules.iter().find(|rule| rule.keywords.matches(&lowered))
    }

    /// Convert one statement into exactly one descriptor. Never fails.
    pub fn generate(&self, statement: &Statement) -> TestDescriptor {
        match self.rule_for(statement) {
            Some(rule) => rule.build(),
            None => TestDescriptor::manual(feature_label(statement.text()), MANUAL_EXPECTATION),
        }
    }

    /// Convert every statement, preserving order (1:1)
    pub fn generate_all(&self, statements: &[Statement]) -> Vec<TestDescriptor> {
        statements.iter().map(|s| self.generate(s)).collect()
    }
}

/// Feature label derived from raw statement text.
pub fn feature_label(text: &str) -> String {
    text.chars().take(FEATURE_LABEL_MAX_CHARS).collect()
}
