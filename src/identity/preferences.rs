//! Optimistic preference synchronization.
//!
//! The `PreferenceSynchronizer` keeps two mutable fields of one identity
//! record (the interest topics and the mail frequency) consistent between
//! local UI state and the remote record store. Every edit is applied to local
//! state first, then pushed remotely; pushes are independent, fire-and-forget
//! calls with no retry, debounce, or coalescing, so two rapid edits may
//! complete out of order remotely and the last acknowledgment wins. Push
//! failures are logged and swallowed, never surfaced to the user, which means
//! local and remote state can diverge silently.

use crate::identity::types::{Frequency, PreferenceEdit};
use crate::store::RecordStore;

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies local optimistic edits and pushes each one to the record store.
///
/// Bound to one record id for the lifetime of the profile screen. The record
/// id and initial preference state come from the caller's context at
/// construction; nothing is read from ambient globals.
pub struct PreferenceSynchronizer {
    store: Arc<dyn RecordStore>,
    collection: String,
    record_id: String,
    interests: Vec<String>,
    frequency: Frequency,
}

impl PreferenceSynchronizer {
    /// Create a synchronizer seeded with the record's current preferences.
    pub fn new(
        store: Arc<dyn RecordStore>,
        collection: String,
        record_id: String,
        interests: Vec<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            store,
            collection,
            record_id,
            interests,
            frequency,
        }
    }

    /// Local interest set, in insertion order.
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Local mail frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Consume one edit produced by UI interaction.
    pub async fn apply(&mut self, edit: PreferenceEdit) {
        match edit {
            PreferenceEdit::Interest { topic, active } => {
                self.toggle_interest(&topic, active).await
            }
            PreferenceEdit::Frequency(value) => self.set_frequency(value).await,
        }
    }

    /// Select a mail frequency.
    ///
    /// Local state is updated unconditionally before the push; a remote
    /// failure leaves the local selection in place.
    pub async fn set_frequency(&mut self, value: Frequency) {
        self.frequency = value;

        let result = self
            .store
            .call(
                &self.collection,
                &self.record_id,
                "updateFrequency",
                vec![json!(value.as_str())],
            )
            .await;
        if let Err(e) = result {
            warn!(
                "Failed to push frequency for record {}: {}",
                self.record_id, e
            );
        }
    }

    /// Toggle an interest topic on or off.
    ///
    /// Activating appends the topic without deduplication and pushes the
    /// union including it. Deactivating keeps every element not equal to
    /// `topic`; the same exclusion predicate feeds both the in-memory update
    /// and the remote push, so repeated toggles cannot desync the two sides.
    pub async fn toggle_interest(&mut self, topic: &str, active: bool) {
        if active {
            self.interests.push(topic.to_string());
        } else {
            self.interests.retain(|t| t != topic);
        }
        debug!(
            "Interest set for record {} is now {:?}",
            self.record_id, self.interests
        );

        let result = self
            .store
            .call(
                &self.collection,
                &self.record_id,
                "updateInterests",
                vec![json!(self.interests)],
            )
            .await;
        if let Err(e) = result {
            warn!(
                "Failed to push interests for record {}: {}",
                self.record_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CreatedRecord, StoreError};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Push {
        method: String,
        args: Vec<Value>,
    }

    struct MockStore {
        pushes: Arc<Mutex<Vec<Push>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl RecordStore for MockStore {
        async fn create(
            &self,
            _collection: &str,
            _fields: Vec<Value>,
        ) -> Result<CreatedRecord, StoreError> {
            unreachable!("the synchronizer never creates records")
        }

        async fn call(
            &self,
            _collection: &str,
            _record_id: &str,
            method: &str,
            args: Vec<Value>,
        ) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Rejected("push refused".to_string()));
            }
            self.pushes.lock().unwrap().push(Push {
                method: method.to_string(),
                args,
            });
            Ok(())
        }
    }

    fn synchronizer(fail: bool) -> (Arc<Mutex<Vec<Push>>>, PreferenceSynchronizer) {
        let pushes = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(MockStore {
            pushes: pushes.clone(),
            fail,
        });
        let sync = PreferenceSynchronizer::new(
            store,
            "UserSBT".to_string(),
            "1700000000000".to_string(),
            Vec::new(),
            Frequency::Daily,
        );
        (pushes, sync)
    }

    #[tokio::test]
    async fn frequency_update_is_optimistic_and_pushed() {
        let (pushes, mut sync) = synchronizer(false);

        sync.set_frequency(Frequency::Weekends).await;

        assert_eq!(sync.frequency(), Frequency::Weekends);
        assert_eq!(
            *pushes.lock().unwrap(),
            vec![Push {
                method: "updateFrequency".to_string(),
                args: vec![json!("Weekends")],
            }]
        );
    }

    #[tokio::test]
    async fn frequency_push_failure_keeps_local_edit() {
        let (pushes, mut sync) = synchronizer(true);

        sync.set_frequency(Frequency::Monthly).await;

        assert_eq!(sync.frequency(), Frequency::Monthly);
        assert!(pushes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivating_pushes_the_set_with_the_topic_excluded() {
        let (pushes, mut sync) = synchronizer(false);

        sync.toggle_interest("AI", true).await;
        sync.toggle_interest("AI", false).await;

        let pushes = pushes.lock().unwrap();
        assert_eq!(pushes[0].args, vec![json!(["AI"])]);
        // The second push must exclude "AI".
        assert_eq!(pushes[1].args, vec![json!([])]);
        drop(pushes);
        assert!(sync.interests().is_empty());
    }

    #[tokio::test]
    async fn removal_uses_exclusion_both_paths() {
        let (pushes, mut sync) = synchronizer(false);

        sync.toggle_interest("Blockchain", true).await;
        sync.toggle_interest("VR", true).await;
        sync.toggle_interest("Blockchain", false).await;

        assert_eq!(sync.interests(), ["VR"]);
        let pushes = pushes.lock().unwrap();
        assert_eq!(pushes[2].args, vec![json!(["VR"])]);
    }

    #[tokio::test]
    async fn toggling_on_off_on_leaves_the_topic_exactly_once() {
        let (_, mut sync) = synchronizer(false);

        sync.toggle_interest("AI", true).await;
        sync.toggle_interest("AI", false).await;
        sync.toggle_interest("AI", true).await;

        assert_eq!(sync.interests(), ["AI"]);
    }

    #[tokio::test]
    async fn activation_appends_without_dedup() {
        let (pushes, mut sync) = synchronizer(false);

        sync.toggle_interest("IoT", true).await;
        sync.toggle_interest("IoT", true).await;

        assert_eq!(sync.interests(), ["IoT", "IoT"]);
        let pushes = pushes.lock().unwrap();
        assert_eq!(pushes[1].args, vec![json!(["IoT", "IoT"])]);
    }

    #[tokio::test]
    async fn edits_are_consumed_immediately() {
        let (pushes, mut sync) = synchronizer(false);

        sync.apply(PreferenceEdit::Interest {
            topic: "AR".to_string(),
            active: true,
        })
        .await;
        sync.apply(PreferenceEdit::Frequency(Frequency::MonWedFri))
            .await;

        assert_eq!(sync.interests(), ["AR"]);
        assert_eq!(sync.frequency(), Frequency::MonWedFri);
        let pushes = pushes.lock().unwrap();
        assert_eq!(pushes[1].args, vec![json!("Monday | Wednesday | Friday")]);
    }

    #[tokio::test]
    async fn interest_push_failure_is_swallowed() {
        let (_, mut sync) = synchronizer(true);

        sync.toggle_interest("Fintech", true).await;

        // Local state holds the optimistic edit despite the failed push.
        assert_eq!(sync.interests(), ["Fintech"]);
    }
}
