//! Response decoding into the three result shapes: one entity, a list of
//! entities, or a list of ids.

use std::cmp::Reverse;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::TwitterResult;
use crate::types::Tweet;

/// Decode a single entity.
pub fn entity<T: DeserializeOwned>(body: &[u8]) -> TwitterResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode a list of entities. An empty body is an empty list.
pub fn list<T: DeserializeOwned>(body: &[u8]) -> TwitterResult<Vec<T>> {
    if body.trim_ascii().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Decode a list of statuses, newest first.
pub fn timeline(body: &[u8]) -> TwitterResult<Vec<Tweet>> {
    let mut tweets: Vec<Tweet> = list(body)?;
    sort_newest_first(&mut tweets);
    Ok(tweets)
}

/// Decode a list of ids, bare or wrapped in a cursored object.
pub fn ids(body: &[u8]) -> TwitterResult<Vec<u64>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdList {
        Bare(Vec<u64>),
        Cursored { ids: Vec<u64> },
    }

    if body.trim_ascii().is_empty() {
        return Ok(Vec::new());
    }
    Ok(match serde_json::from_slice(body)? {
        IdList::Bare(ids) | IdList::Cursored { ids } => ids,
    })
}

/// Stable sort by creation time, then id, both descending.
pub fn sort_newest_first(tweets: &mut [Tweet]) {
    tweets.sort_by_key(|tweet| Reverse((tweet.created_at, tweet.id)));
}
