//! TREC run encoding
//!
//! `{qid} Q0 {docid} {rank} {score} {tag}` per returned UID. The score is a
//! synthetic descending value so evaluation tools keep the page order.

use super::ESearchResult;

pub fn to_trec(result: &ESearchResult) -> String {
    let total = result.idlist.len();
    result
        .idlist
        .iter()
        .enumerate()
        .map(|(rank, id)| {
            format!(
                "{} Q0 {} {} {} {}",
                result.trec.query_id,
                id,
                rank,
                total - rank,
                result.trec.tag
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
