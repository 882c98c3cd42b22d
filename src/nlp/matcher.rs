//! Fuzzy keyword matching against a taxonomy table

use super::taxonomy::KeywordTable;
use super::tokens::TokenSet;

/// Returns the labels of `table` matched by any token, in table order
///
/// A trigger matches a token when either string contains the other, so a
/// short token like `go` hits `golang` and a token like `k8s集群` hits `k8s`.
pub fn identify(tokens: &TokenSet, table: KeywordTable) -> Vec<String> {
    table
        .iter()
        .filter(|(_, triggers)| {
            triggers
                .iter()
                .any(|trigger| tokens.iter().any(|token| matches(trigger, token)))
        })
        .map(|(label, _)| label.to_string())
        .collect()
}

fn matches(trigger: &str, token: &str) -> bool {
    trigger.contains(token) || token.contains(trigger)
}
