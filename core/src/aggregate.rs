//! Once-per-class reporting of advisory findings.
//!
//! Some findings, such as deprecated keys, tend to repeat across many
//! mappings and files. [`warn_keys_once`] records each occurrence in an
//! [`ErrorAggregator`] keyed by severity and tag; [`flush_aggregator`] later
//! emits one message per tag listing every place it was seen.
//!
//! # Example
//!
//! ```
//! use config_conformance_core::{
//!     ErrorAggregator, KeyWarning, ValidationSummary, flush_aggregator, warn_keys_once,
//! };
//! use serde_json::json;
//!
//! let rule = KeyWarning::new("dry-run", ["dry_run"], "Ignored config key(s) {keys} {ctx}.");
//! let mut summary = ValidationSummary::new(false);
//! let mut agg = ErrorAggregator::new();
//!
//! for ctx in ["in build #1", "on build #2"] {
//!     let cfg = json!({"dry_run": true});
//!     let (ok, _) = warn_keys_once(
//!         &rule,
//!         cfg.as_object().unwrap(),
//!         ctx,
//!         false,
//!         &mut summary,
//!         Some(&mut agg),
//!     );
//!     assert!(ok);
//! }
//! flush_aggregator(&mut summary, &mut agg);
//!
//! assert_eq!(
//!     summary.warnings,
//!     vec!["Ignored config key(s) dry-run in build #1, build #2."]
//! );
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::summary::{ValidationSummary, route_message};

/// Aggregator bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateSeverity {
    /// Flushed as strict warnings; invalidates the summary.
    StrictWarn,
    /// Flushed as plain warnings.
    Warn,
}

impl AggregateSeverity {
    /// Bucket for a run with the given strictness.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::StrictWarn } else { Self::Warn }
    }

    /// Bucket name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrictWarn => "strict_warn",
            Self::Warn => "warn",
        }
    }
}

/// Occurrences of one tag within one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatorEntry {
    /// Message template, with `{keys}` and `{ctx}` placeholders.
    pub template: String,
    /// Every context the tag was seen in, in call order.
    pub contexts: Vec<String>,
}

/// Pending aggregated findings, grouped by severity then tag.
///
/// Entries keep first-seen order. Nothing is reported until
/// [`flush_aggregator`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorAggregator {
    strict_warn: IndexMap<String, AggregatorEntry>,
    warn: IndexMap<String, AggregatorEntry>,
}

impl ErrorAggregator {
    /// Empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `tag`. The first template seen for a tag is kept.
    pub fn record(
        &mut self,
        severity: AggregateSeverity,
        tag: &str,
        template: &str,
        context: &str,
    ) {
        let entry = self
            .bucket_mut(severity)
            .entry(tag.to_string())
            .or_insert_with(|| AggregatorEntry {
                template: template.to_string(),
                contexts: Vec::new(),
            });
        entry.contexts.push(context.to_string());
        debug!(
            severity = severity.as_str(),
            tag,
            context,
            occurrences = entry.contexts.len(),
            "aggregated finding"
        );
    }

    /// Entries of one bucket.
    pub fn bucket(&self, severity: AggregateSeverity) -> &IndexMap<String, AggregatorEntry> {
        match severity {
            AggregateSeverity::StrictWarn => &self.strict_warn,
            AggregateSeverity::Warn => &self.warn,
        }
    }

    fn bucket_mut(&mut self, severity: AggregateSeverity) -> &mut IndexMap<String, AggregatorEntry> {
        match severity {
            AggregateSeverity::StrictWarn => &mut self.strict_warn,
            AggregateSeverity::Warn => &mut self.warn,
        }
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.strict_warn.is_empty() && self.warn.is_empty()
    }
}

/// A class of keys that should be reported once per tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWarning {
    /// Aggregation tag; also substituted for `{keys}` when flushed.
    pub tag: String,
    /// Keys to look for, matched case-insensitively.
    pub keys: Vec<String>,
    /// Template with `{keys}` and `{ctx}` placeholders.
    pub message: String,
}

impl KeyWarning {
    /// Builds a rule.
    pub fn new<I, S>(tag: impl Into<String>, keys: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

/// Looks for `rule.keys` in `map` and reports them once per tag.
///
/// Keys match case-insensitively; the returned set holds the spelling used in
/// `map`. With an aggregator, the occurrence is recorded for a later
/// [`flush_aggregator`] and `summary` is left alone. Without one, a message is
/// routed straight away with `{keys}` set to the sorted found keys and
/// `{ctx}` to `context`.
///
/// Returns `(true, {})` if nothing was found, otherwise
/// `(!strict_config, found)`.
pub fn warn_keys_once(
    rule: &KeyWarning,
    map: &Map<String, Value>,
    context: &str,
    strict_config: bool,
    summary: &mut ValidationSummary,
    aggregator: Option<&mut ErrorAggregator>,
) -> (bool, BTreeSet<String>) {
    let wanted: HashSet<String> = rule.keys.iter().map(|key| key.to_lowercase()).collect();
    // Later keys win when two spellings fold together.
    let present: HashMap<String, &str> = map
        .keys()
        .map(|key| (key.to_lowercase(), key.as_str()))
        .collect();

    let found: BTreeSet<String> = wanted
        .iter()
        .filter_map(|lower| present.get(lower))
        .map(|original| original.to_string())
        .collect();

    if found.is_empty() {
        return (true, found);
    }

    match aggregator {
        Some(aggregator) => aggregator.record(
            AggregateSeverity::from_strict(strict_config),
            &rule.tag,
            &rule.message,
            context,
        ),
        None => {
            let keys = found.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            let message = render_template(&rule.message, &keys, context);
            route_message(message, false, strict_config, summary);
        }
    }

    (!strict_config, found)
}

/// Emits one message per aggregated tag and empties the aggregator.
///
/// A non-empty strict bucket marks `summary` invalid. Contexts are trimmed
/// and lose one leading `in ` or `on ` before being joined.
pub fn flush_aggregator(summary: &mut ValidationSummary, aggregator: &mut ErrorAggregator) {
    if !aggregator.strict_warn.is_empty() {
        summary.valid = false;
        flush_bucket(&mut aggregator.strict_warn, true, summary);
    }
    if !aggregator.warn.is_empty() {
        flush_bucket(&mut aggregator.warn, false, summary);
    }
}

fn flush_bucket(
    bucket: &mut IndexMap<String, AggregatorEntry>,
    strict: bool,
    summary: &mut ValidationSummary,
) {
    debug!(strict, tags = bucket.len(), "flushing aggregated findings");
    for (tag, entry) in bucket.drain(..) {
        let joined = entry
            .contexts
            .iter()
            .map(|context| clean_context(context))
            .collect::<Vec<_>>()
            .join(", ");
        let message = render_template(&entry.template, &tag, &format!("in {joined}"));
        route_message(message, false, strict, summary);
    }
}

fn clean_context(context: &str) -> &str {
    let context = context.trim();
    for prefix in ["in ", "on "] {
        let matches = context
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            return context[prefix.len()..].trim();
        }
    }
    context
}

/// Fills `{keys}` and `{ctx}` in a message template.
///
/// `{{` and `}}` produce literal braces; any other braced text is kept as is.
///
/// # Examples
///
/// ```
/// use config_conformance_core::render_template;
///
/// assert_eq!(
///     render_template("{keys} ignored {ctx} {{sic}} {other}", "dry_run", "in build"),
///     "dry_run ignored in build {sic} {other}"
/// );
/// ```
pub fn render_template(template: &str, keys: &str, ctx: &str) -> String {
    let mut out = String::with_capacity(template.len() + keys.len() + ctx.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if rest.starts_with("{{") {
            out.push('{');
            rest = &rest[2..];
        } else if rest.starts_with("}}") {
            out.push('}');
            rest = &rest[2..];
        } else if let Some(after) = rest.strip_prefix("{keys}") {
            out.push_str(keys);
            rest = after;
        } else if let Some(after) = rest.strip_prefix("{ctx}") {
            out.push_str(ctx);
            rest = after;
        } else {
            out.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
