use std::collections::HashMap;

use futures::future::join_all;

use crate::directory::DirectoryApi;

/// Whether the actor follows each user id seen during the session.
pub type RelationshipFlags = HashMap<String, bool>;

/// Look up the follow status of every id concurrently.
///
/// All lookups are in flight at once and the batch completes when each has
/// either answered or failed. A failed lookup counts as "not following" and
/// never fails the batch.
pub async fn resolve_follow_status(
    api: &dyn DirectoryApi,
    user_ids: &[String],
) -> RelationshipFlags {
    let lookups = user_ids.iter().map(|user_id| async move {
        let following = match api.is_following(user_id).await {
            Ok(following) => following,
            Err(e) => {
                tracing::warn!(%user_id, "follow status lookup failed: {e}");
                false
            }
        };
        (user_id.clone(), following)
    });

    let flags: RelationshipFlags = join_all(lookups).await.into_iter().collect();
    tracing::debug!(
        requested = user_ids.len(),
        resolved = flags.len(),
        "follow status batch done"
    );
    flags
}

/// Merge a resolved batch into the session-wide flags. Ids outside the batch
/// keep their current value.
pub fn merge_flags(flags: &mut RelationshipFlags, batch: RelationshipFlags) {
    flags.extend(batch);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directory::testing::{Call, FakeDirectory};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn resolves_one_flag_per_user() {
        let api = FakeDirectory::new().following("a").following("c");

        let flags = resolve_follow_status(&api, &ids(&["a", "b", "c"])).await;

        assert_eq!(
            flags,
            RelationshipFlags::from([
                ("a".to_string(), true),
                ("b".to_string(), false),
                ("c".to_string(), true),
            ])
        );
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_lookup_defaults_to_not_following() {
        let api = FakeDirectory::new()
            .following("a")
            .following("x")
            .failing_lookup("x");

        let flags = resolve_follow_status(&api, &ids(&["a", "x", "b"])).await;

        assert_eq!(flags.get("x"), Some(&false));
        assert_eq!(flags.get("a"), Some(&true));
        assert_eq!(flags.get("b"), Some(&false));
    }

    #[tokio::test]
    async fn lookups_run_concurrently() {
        // Every lookup waits on a barrier sized to the batch, so the batch can
        // only finish if all lookups are in flight at the same time.
        let api = FakeDirectory::new()
            .following("b")
            .with_lookup_barrier(Arc::new(tokio::sync::Barrier::new(3)));

        let flags = tokio::time::timeout(
            Duration::from_secs(5),
            resolve_follow_status(&api, &ids(&["a", "b", "c"])),
        )
        .await
        .expect("lookups were serialized");

        assert_eq!(flags.len(), 3);
        assert_eq!(flags.get("b"), Some(&true));
    }

    #[tokio::test]
    async fn empty_batch_issues_no_requests() {
        let api = FakeDirectory::new();
        let flags = resolve_follow_status(&api, &[]).await;
        assert!(flags.is_empty());
        assert_eq!(api.calls(), Vec::<Call>::new());
    }

    #[test]
    fn merge_overwrites_only_batch_keys() {
        let mut flags = RelationshipFlags::from([
            ("a".to_string(), true),
            ("b".to_string(), true),
        ]);

        merge_flags(
            &mut flags,
            RelationshipFlags::from([("b".to_string(), false), ("c".to_string(), true)]),
        );

        assert_eq!(flags.get("a"), Some(&true));
        assert_eq!(flags.get("b"), Some(&false));
        assert_eq!(flags.get("c"), Some(&true));
    }
}
