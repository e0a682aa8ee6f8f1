//! Result re-ranking
//!
//! The model only proposes an order. Whatever it answers, the output is a
//! permutation of the input: no result is dropped or duplicated.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::excerpt;
use super::json::parse_array;
use crate::ai::CompletionModel;
use crate::search::CanonicalResult;

/// Characters of content shown to the model per result
const EXCERPT_CHARS: usize = 300;

fn build_prompt(query: &str, results: &[CanonicalResult]) -> String {
    let mut prompt = format!(
        "You are a search result reranker. Given a query and numbered search results, \
         order the results by relevance to the query, most relevant first.\n\n\
         Query: \"{}\"\n\nResults:\n",
        query
    );
    for (i, result) in results.iter().enumerate() {
        let title = result.title.as_deref().unwrap_or("(untitled)");
        prompt.push_str(&format!(
            "\n[{}] rank {} | score {:.3} | {}\n{}\n",
            i,
            i + 1,
            result.relevance_score,
            title,
            excerpt(&result.content, EXCERPT_CHARS)
        ));
    }
    prompt.push_str(&format!(
        "\nReturn ONLY a JSON array of the result indices (0 to {}), most relevant first. \
         Example: [2, 0, 1]",
        results.len().saturating_sub(1)
    ));
    prompt
}

/// Turn a model's proposed order into a full permutation of `0..len`:
/// out-of-range entries are dropped, repeats keep their first position, and
/// indices the model never mentioned follow in their original order.
pub fn complete_permutation(proposed: &[usize], len: usize) -> Vec<usize> {
    let mut seen = vec![false; len];
    let mut order = Vec::with_capacity(len);

    for &index in proposed {
        if index < len && !seen[index] {
            seen[index] = true;
            order.push(index);
        }
    }
    for (index, was_seen) in seen.iter().enumerate() {
        if !was_seen {
            order.push(index);
        }
    }

    order
}

/// Extract the proposed order from a reply. Array elements that are not
/// non-negative integers are ignored.
pub fn parse_ranking(reply: &str, len: usize) -> Result<Vec<usize>> {
    let values: Vec<Value> = parse_array(reply)?;
    let proposed: Vec<usize> = values
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|i| usize::try_from(i).ok())
        .collect();
    Ok(complete_permutation(&proposed, len))
}

/// Ask the model to reorder `results`. On error the caller keeps the input.
pub async fn rerank_results(
    model: &dyn CompletionModel,
    results: Vec<CanonicalResult>,
    query: &str,
) -> Result<Vec<CanonicalResult>> {
    let reply = model.complete(&build_prompt(query, &results)).await?;
    let order = parse_ranking(&reply, results.len())?;

    debug!("Reranked {} results: {:?}", results.len(), order);

    let mut slots: Vec<Option<CanonicalResult>> = results.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect())
}
