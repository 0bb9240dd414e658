use super::Rule;
use crate::item::ItemCatalog;
use itertools::Itertools;

/// Formats rules into human-readable strings.
pub struct RuleFormatter;

impl RuleFormatter {
    /// Renders a rule as `If [A, B], then [C]`, resolving ids through `catalog`.
    pub fn format(rule: &Rule, catalog: &ItemCatalog) -> String {
        format!(
            "If [{}], then [{}]",
            catalog.resolve(rule.antecedent().items()).iter().join(", "),
            catalog.resolve(rule.consequent()).iter().join(", ")
        )
    }

    /// Like [`format`](Self::format), followed by the rule's confidence and support.
    pub fn format_scored(rule: &Rule, catalog: &ItemCatalog) -> String {
        format!(
            "{} (confidence {:.2}, support {})",
            Self::format(rule, catalog),
            rule.confidence(),
            rule.support()
        )
    }
}
