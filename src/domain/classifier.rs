//! Rule-based classification and keyword extraction.
//!
//! The rule table is ordered data: the first category whose domain or keyword
//! substrings match wins, so iteration order is part of the contract.

use std::collections::HashSet;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::entities::{Category, RawLink, Record, RecordId, SkippedLink};
use crate::domain::error::{DomainError, DomainResult};

const MAX_KEYWORDS: usize = 3;
const MIN_KEYWORD_CHARS: usize = 4;

type BuiltinRule = (Category, &'static [&'static str], &'static [&'static str]);

/// Built-in rule table: (category, domain substrings, title keyword substrings).
const BUILTIN_RULES: &[BuiltinRule] = &[
    (
        Category::VideosMultimedia,
        &["youtube.com", "vimeo.com", "dailymotion.com", "twitch.tv", "netflix.com", "amazon.com/prime"],
        &["video", "film", "movie", "streaming", "watch", "multimedia", "cinema"],
    ),
    (
        Category::DevelopmentCode,
        &["github.com", "gitlab.com", "bitbucket.org", "codepen.io", "jsfiddle.net", "replit.com"],
        &["code", "programming", "development", "git", "api", "framework", "library", "dev"],
    ),
    (
        Category::DocumentationHelp,
        &["stackoverflow.com", "docs.", "documentation", "help.", "support.", "wiki"],
        &["documentation", "docs", "help", "tutorial", "guide", "reference", "manual", "how-to"],
    ),
    (
        Category::EcommerceShopping,
        &["amazon.", "ebay.", "shopify.", "etsy.com", "alibaba.", "aliexpress."],
        &["shop", "store", "buy", "sell", "price", "product", "cart", "commerce", "shopping"],
    ),
    (
        Category::NewsBlog,
        &["news", "blog", "medium.com", "wordpress.", "blogger.", "substack."],
        &["news", "blog", "article", "post", "actualité", "information", "journal", "magazine"],
    ),
    (
        Category::SocialNetworks,
        &["facebook.com", "twitter.com", "linkedin.com", "instagram.com", "tiktok.com", "reddit.com"],
        &["social", "network", "share", "post", "follow", "friend", "community", "réseau"],
    ),
    (
        Category::CloudStorage,
        &["drive.google.com", "dropbox.com", "onedrive.", "icloud.com", "box.com"],
        &["cloud", "storage", "drive", "sync", "backup", "file", "share", "stockage"],
    ),
    (
        Category::ToolsUtilities,
        &["tools.", "util", "app.", "chrome.google.com/webstore"],
        &["tool", "utility", "app", "service", "generator", "converter", "calculator", "outil"],
    ),
    (
        Category::FormationLearning,
        &["udemy.com", "coursera.org", "edx.org", "khan", "pluralsight.com", "lynda.com"],
        &["course", "learn", "education", "training", "tutorial", "formation", "cours", "école"],
    ),
];

/// Common French and English function words ignored by keyword extraction.
const STOP_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "du", "de", "et", "ou", "mais", "donc", "car", "ni",
    "or", "the", "a", "an", "and", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "must", "shall", "this",
    "that", "these", "those", "it", "its", "they", "them", "their", "you", "your", "we", "our",
    "us",
];

/// Matching rule for one non-fallback category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn matches(&self, title: &str, domain: &str) -> bool {
        self.domains.iter().any(|d| domain.contains(d.as_str()))
            || self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct RawRuleTable {
    #[serde(default)]
    rules: Vec<CategoryRule>,
    stop_words: Option<Vec<String>>,
}

/// Ordered rule list plus stop words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
    stop_words: HashSet<String>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTable {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(category, domains, keywords)| CategoryRule {
                category: *category,
                domains: domains.iter().map(|s| s.to_string()).collect(),
                keywords: keywords.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self {
            rules,
            stop_words: builtin_stop_words(),
        }
    }

    /// Build a table from ordered rules; patterns are lowercased.
    ///
    /// Rejects the fallback category and duplicate categories.
    pub fn new(rules: Vec<CategoryRule>, stop_words: HashSet<String>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.category == Category::FALLBACK {
                return Err(DomainError::InvalidRuleTable(format!(
                    "fallback category '{}' cannot have rules",
                    rule.category
                )));
            }
            if !seen.insert(rule.category) {
                return Err(DomainError::InvalidRuleTable(format!(
                    "category '{}' listed more than once",
                    rule.category
                )));
            }
        }
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                category: rule.category,
                domains: rule.domains.iter().map(|d| d.to_lowercase()).collect(),
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        let stop_words = stop_words.iter().map(|w| w.to_lowercase()).collect();
        Ok(Self { rules, stop_words })
    }

    /// Parse a TOML table (`[[rules]]` entries in priority order, optional `stop_words`).
    pub fn from_toml(content: &str) -> DomainResult<Self> {
        let raw: RawRuleTable =
            toml::from_str(content).map_err(|e| DomainError::InvalidRuleTable(e.to_string()))?;
        let stop_words = raw
            .stop_words
            .map(|words| words.into_iter().collect())
            .unwrap_or_else(builtin_stop_words);
        Self::new(raw.rules, stop_words)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

fn builtin_stop_words() -> HashSet<String> {
    STOP_WORDS.iter().map(|s| s.to_string()).collect()
}

/// Records built from raw links, plus the links that were rejected.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedLink>,
}

/// Assigns categories and keywords using a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RuleTable,
    non_word: Regex,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

impl Classifier {
    pub fn new(table: RuleTable) -> Self {
        Self {
            table,
            // ASCII word characters only: accented letters split words
            non_word: Regex::new(r"[^0-9A-Za-z_\s]+").expect("static non-word pattern"),
        }
    }

    /// First matching category in table order, else the fallback.
    pub fn classify(&self, title: &str, domain: &str) -> Category {
        let title = title.to_lowercase();
        let domain = domain.to_lowercase();
        self.table
            .rules
            .iter()
            .find(|rule| rule.matches(&title, &domain))
            .map(|rule| rule.category)
            .unwrap_or(Category::FALLBACK)
    }

    /// First three significant words of the title, in title order.
    pub fn extract_keywords(&self, title: &str) -> Vec<String> {
        let lowered = title.to_lowercase();
        self.non_word
            .replace_all(&lowered, " ")
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS && !self.table.is_stop_word(w))
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect()
    }

    /// Classify one link. Fails only when the URL is unusable.
    pub fn record(&self, id: RecordId, link: &RawLink) -> DomainResult<Record> {
        let domain = domain_of(&link.url)?;
        Ok(Record {
            id,
            title: link.title.clone(),
            url: link.url.clone(),
            category: self.classify(&link.title, &domain),
            keywords: self.extract_keywords(&link.title),
            domain,
        })
    }

    /// Classify every link; invalid URLs are skipped with a warning.
    ///
    /// Ids are assigned densely in input order over the accepted links.
    #[instrument(level = "debug", skip_all, fields(links = links.len()))]
    pub fn build_records(&self, links: &[RawLink]) -> RecordBatch {
        let mut batch = RecordBatch::default();
        for link in links {
            let id = RecordId(batch.records.len());
            match self.record(id, link) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    warn!("skipping bookmark '{}': {}", link.title, e);
                    batch.skipped.push(SkippedLink {
                        url: link.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        debug!(
            "build_records: {} records, {} skipped",
            batch.records.len(),
            batch.skipped.len()
        );
        batch
    }
}

/// Lowercased hostname of an absolute http(s) URL.
pub fn domain_of(url: &str) -> DomainResult<String> {
    let invalid = |reason: String| DomainError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
        .ok_or_else(|| invalid("missing host".to_string()))
}
