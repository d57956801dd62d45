//! Response decoder fuzz target.
//!
//! Feeds arbitrary bodies to every decoder shape. Goal: errors, never panics,
//! and any decoded timeline is newest first.

#![no_main]

use libfuzzer_sys::fuzz_target;
use twitter_timeline::{Tweet, TwitterProfile, decode};

fuzz_target!(|data: &[u8]| {
    if let Ok(tweets) = decode::timeline(data) {
        assert!(
            tweets
                .windows(2)
                .all(|w| (w[0].created_at, w[0].id) >= (w[1].created_at, w[1].id))
        );
    }

    let _ = decode::entity::<Tweet>(data);
    let _ = decode::list::<TwitterProfile>(data);
    let _ = decode::ids(data);
});
