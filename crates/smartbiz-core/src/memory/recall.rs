//! Relevant-memory recall.
//!
//! Snippets are ranked by how many distinct query terms they contain, ties
//! broken by recency. Recall never fails: storage errors degrade to an empty
//! result so a missing memory corpus cannot block a reply.

use std::collections::BTreeSet;

use tracing::warn;

use smartbiz_types::agent::AgentId;
use smartbiz_types::memory::MemorySnippet;

use crate::repository::memory::MemoryRepository;

/// Terms shorter than this carry too little signal to rank on.
const MIN_TERM_LEN: usize = 3;

/// Fetch the `limit` snippets most relevant to `query`.
pub async fn recall<M: MemoryRepository>(
    repo: &M,
    agent_id: &AgentId,
    query: &str,
    limit: usize,
) -> Vec<MemorySnippet> {
    if limit == 0 {
        return Vec::new();
    }
    match repo.list_snippets(agent_id).await {
        Ok(snippets) => rank_snippets(snippets, query, limit),
        Err(e) => {
            warn!(agent_id = %agent_id, error = %e, "Memory recall failed, continuing without context");
            Vec::new()
        }
    }
}

/// Order `snippets` by relevance to `query` and keep the top `limit`.
pub fn rank_snippets(snippets: Vec<MemorySnippet>, query: &str, limit: usize) -> Vec<MemorySnippet> {
    let terms = query_terms(query);

    let mut scored: Vec<(usize, MemorySnippet)> = snippets
        .into_iter()
        .map(|snippet| {
            let haystack = snippet.content.to_lowercase();
            let score = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            (score, snippet)
        })
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    scored.into_iter().take(limit).map(|(_, s)| s).collect()
}

fn query_terms(query: &str) -> BTreeSet<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use smartbiz_types::memory::SnippetKind;

    use crate::testing::InMemoryRepositories;
    use crate::repository::Repositories;

    fn snippet(agent: AgentId, content: &str, age_secs: i64) -> MemorySnippet {
        let mut s = MemorySnippet::new(agent, SnippetKind::Note, content);
        s.created_at = Utc::now() - Duration::seconds(age_secs);
        s
    }

    #[test]
    fn test_rank_prefers_term_overlap() {
        let agent = AgentId::new();
        let ranked = rank_snippets(
            vec![
                snippet(agent, "We sell handmade candles", 10),
                snippet(agent, "Summer sale on soy candles next week", 100),
                snippet(agent, "Office closed on Mondays", 1),
            ],
            "Write a post about our summer candles sale",
            2,
        );

        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].content.starts_with("Summer sale"));
        assert!(ranked[1].content.contains("handmade"));
    }

    #[test]
    fn test_rank_ties_break_by_recency() {
        let agent = AgentId::new();
        let ranked = rank_snippets(
            vec![
                snippet(agent, "old note", 500),
                snippet(agent, "newest note", 5),
                snippet(agent, "middle note", 50),
            ],
            "zzz",
            3,
        );

        let order: Vec<&str> = ranked.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(order, vec!["newest note", "middle note", "old note"]);
    }

    #[test]
    fn test_short_terms_are_ignored() {
        let terms = query_terms("a is of Candles, SALE!");
        assert_eq!(terms.into_iter().collect::<Vec<_>>(), vec!["candles", "sale"]);
    }

    #[tokio::test]
    async fn test_recall_degrades_to_empty_on_failure() {
        let repos = InMemoryRepositories::new();
        let agent = AgentId::new();
        repos.fail_memory_reads(true);

        let found = recall(repos.memories(), &agent, "anything", 3).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_recall_limits_results() {
        let repos = InMemoryRepositories::new();
        let agent = AgentId::new();
        for i in 0..5 {
            repos
                .memories()
                .save_snippet(&snippet(agent, &format!("note {i}"), i))
                .await
                .unwrap();
        }

        let found = recall(repos.memories(), &agent, "note", 3).await;
        assert_eq!(found.len(), 3);
    }
}
