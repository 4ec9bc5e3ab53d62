//! Integration tests for the editing session
//!
//! Drives `Studio` with a scripted generation client and an in-memory store
//! that counts writes, on a paused tokio clock.

use async_trait::async_trait;
use roomstyler::ai::{GenerationClient, GenerationError, GenerationResult};
use roomstyler::session::{SessionPhase, WELCOME_MESSAGE};
use roomstyler::storage::{
    AUTO_SAVE_KEY, AUTO_SAVE_PREF_KEY, AutoSaveRepository, KeyValueStore, MemoryStore,
    SAVED_DESIGNS_KEY, SharedStore, StorageResult,
};
use roomstyler::studio::{
    CHAT_APOLOGY, SHOPPING_APOLOGY, SHOPPING_REPLY_MESSAGE, SHOPPING_REQUEST_MESSAGE, Studio,
    Timings, chat_confirmation,
};
use roomstyler::types::{
    AutoSaveStatus, AutoSavedDesign, ChatMessage, EncodedImage, Sender, ShoppingItem,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================
// Test doubles
// ============================================

#[derive(Clone, Debug, PartialEq)]
struct EditCall {
    image: EncodedImage,
    instruction: String,
}

#[derive(Default)]
struct ScriptedClient {
    edits: Mutex<Vec<EditCall>>,
    refined: Mutex<Vec<String>>,
    shopping_lookups: Mutex<Vec<EncodedImage>>,
    fail_edits: bool,
    fail_shopping: bool,
    edit_budget: Option<usize>,
}

impl ScriptedClient {
    fn failing_edits() -> Self {
        Self {
            fail_edits: true,
            ..Self::default()
        }
    }

    /// Edits succeed `successes` times, then fail.
    fn failing_after(successes: usize) -> Self {
        Self {
            edit_budget: Some(successes),
            ..Self::default()
        }
    }

    fn failing_shopping() -> Self {
        Self {
            fail_shopping: true,
            ..Self::default()
        }
    }

    fn edits(&self) -> Vec<EditCall> {
        self.edits.lock().unwrap().clone()
    }
}

fn refined(text: &str) -> String {
    format!("Change the room so that: {text}")
}

fn generated(n: usize) -> EncodedImage {
    EncodedImage::new(format!("Z2VuZXJhdGVk{n}"), "image/png")
}

fn lamp() -> ShoppingItem {
    ShoppingItem {
        item_name: "Brass floor lamp".into(),
        url: "https://shop.example/lamp".into(),
        price: "$129".into(),
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn refine_instruction(&self, message: &str) -> String {
        self.refined.lock().unwrap().push(message.to_string());
        refined(message)
    }

    async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> GenerationResult<EncodedImage> {
        let mut edits = self.edits.lock().unwrap();
        edits.push(EditCall {
            image: image.clone(),
            instruction: instruction.to_string(),
        });
        let over_budget = self.edit_budget.is_some_and(|budget| edits.len() > budget);
        if self.fail_edits || over_budget {
            return Err(GenerationError::NoImage {
                reason: "SAFETY".into(),
            });
        }
        Ok(generated(edits.len()))
    }

    async fn find_shoppable_items(
        &self,
        image: &EncodedImage,
    ) -> GenerationResult<Vec<ShoppingItem>> {
        self.shopping_lookups.lock().unwrap().push(image.clone());
        if self.fail_shopping {
            return Err(GenerationError::InvalidResponse("not a list".into()));
        }
        Ok(vec![lamp()])
    }
}

#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: Mutex<HashMap<String, usize>>,
}

impl CountingStore {
    fn writes(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        *self.writes.lock().unwrap().entry(key.to_string()).or_default() += 1;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear()
    }
}

fn room() -> EncodedImage {
    EncodedImage::new("cm9vbQ==", "image/jpeg")
}

fn open_studio() -> (Arc<CountingStore>, Studio) {
    let counting = Arc::new(CountingStore::default());
    let store: SharedStore = counting.clone();
    let studio = Studio::open(store, Timings::default());
    (counting, studio)
}

fn stored_snapshot(store: &CountingStore) -> Option<AutoSavedDesign> {
    store
        .get(AUTO_SAVE_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

async fn settle_autosave() {
    tokio::time::sleep(Duration::from_secs(3)).await;
}

// ============================================
// Session lifecycle
// ============================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_empty_studio() {
        let (_store, studio) = open_studio();
        assert_eq!(studio.phase(), SessionPhase::Empty);
        assert!(studio.session().is_none());
        assert!(studio.saved_designs().is_empty());
        assert!(studio.autosave_enabled());
        assert!(!studio.can_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_resets_session() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();

        studio.upload_image(room());
        assert!(studio.select_style(&client, "Bohemian").await);
        assert!(studio.send_chat_message(&client, "add a plant").await);
        settle_autosave().await;
        assert!(store.get(AUTO_SAVE_KEY).is_some());

        let next = EncodedImage::new("bmV4dA==", "image/png");
        studio.upload_image(next.clone());

        let session = studio.session().expect("session");
        assert_eq!(session.original, next);
        assert!(session.generated.is_none());
        assert!(session.style.is_none());
        assert_eq!(session.chat_history, vec![ChatMessage::ai(WELCOME_MESSAGE)]);
        assert_eq!(studio.phase(), SessionPhase::Uploaded);
        assert!(store.get(AUTO_SAVE_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_autosave_slot() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;
        settle_autosave().await;
        assert!(store.get(AUTO_SAVE_KEY).is_some());

        studio.reset_session();
        assert_eq!(studio.phase(), SessionPhase::Empty);
        assert!(store.get(AUTO_SAVE_KEY).is_none());

        settle_autosave().await;
        assert!(store.get(AUTO_SAVE_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restores_autosaved_session() {
        let snapshot = AutoSavedDesign {
            original_image_base64: "cm9vbQ==".into(),
            generated_image_base64: "ZWRpdA==".into(),
            current_style: Some("Japandi".into()),
            chat_history: vec![
                ChatMessage::ai(WELCOME_MESSAGE),
                ChatMessage::user("warmer light"),
            ],
            mime_type: "image/jpeg".into(),
            generated_mime_type: None,
        };
        let store: SharedStore = Arc::new(MemoryStore::new());
        AutoSaveRepository::new(store.clone())
            .store(&snapshot)
            .expect("seed snapshot");

        let studio = Studio::open(store, Timings::default());
        let session = studio.session().expect("restored session");
        assert_eq!(studio.phase(), SessionPhase::Uploaded);
        assert_eq!(session.style.as_deref(), Some("Japandi"));
        assert_eq!(session.chat_history, snapshot.chat_history);
        assert_eq!(
            session.generated,
            Some(EncodedImage::new("ZWRpdA==", "image/jpeg"))
        );
        assert!(studio.can_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_saved_designs_are_dropped_at_open() {
        let store: SharedStore = Arc::new(MemoryStore::with_entries([(
            SAVED_DESIGNS_KEY,
            "[{\"id\": oops",
        )]));

        let studio = Studio::open(store.clone(), Timings::default());
        assert!(studio.saved_designs().is_empty());
        assert!(store.get(SAVED_DESIGNS_KEY).is_none());
    }
}

// ============================================
// Generation flows
// ============================================

mod generation_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_style_edits_always_start_from_original() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        assert!(studio.select_style(&client, "Industrial").await);
        assert!(studio.select_style(&client, "Minimalist").await);

        let edits = client.edits();
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|call| call.image == room()));
        assert!(edits[1].instruction.contains("Minimalist"));

        let session = studio.session().expect("session");
        assert_eq!(session.style.as_deref(), Some("Minimalist"));
        assert_eq!(session.generated, Some(generated(2)));
        assert_eq!(studio.phase(), SessionPhase::Uploaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_style_requires_upload() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        assert!(!studio.select_style(&client, "Boho").await);
        assert!(client.edits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_style_sets_error_and_keeps_style() {
        let client = ScriptedClient::failing_edits();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        studio.select_style(&client, "Coastal").await;
        assert!(studio.error().is_some());
        assert!(!studio.is_loading());
        let session = studio.session().expect("session");
        assert!(session.generated.is_none());
        assert_eq!(session.style.as_deref(), Some("Coastal"));

        studio.dismiss_error();
        assert!(studio.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_edits_latest_result() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        let photo = EncodedImage::from_upload("room.jpg", b"\xFF\xD8\xFFroom").expect("jpeg");
        assert_eq!(photo.mime_type, "image/jpeg");
        studio.upload_image(photo.clone());
        studio.select_style(&client, "Minimalist").await;
        assert_eq!(client.edits()[0].image, photo);
        let latest = generated(1);

        assert!(studio.send_chat_message(&client, "  halıyı mavi yap ").await);

        let edits = client.edits();
        assert_eq!(edits[1].image, latest);
        assert_eq!(edits[1].instruction, refined("halıyı mavi yap"));

        let session = studio.session().expect("session");
        assert_eq!(session.generated, Some(generated(2)));
        assert_eq!(
            session.chat_history,
            vec![
                ChatMessage::ai(WELCOME_MESSAGE),
                ChatMessage::user("halıyı mavi yap"),
                ChatMessage::ai(chat_confirmation(&refined("halıyı mavi yap"))),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_before_any_style_edits_original() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        studio.send_chat_message(&client, "paint the walls green").await;
        assert_eq!(client.edits()[0].image, room());
        assert!(studio.session().expect("session").style.is_none());
        assert!(!studio.can_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_chat_is_ignored() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        assert!(!studio.send_chat_message(&client, "   ").await);
        assert!(client.refined.lock().unwrap().is_empty());
        assert_eq!(studio.session().expect("session").chat_history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_chat_apologizes() {
        let client = ScriptedClient::failing_edits();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        studio.send_chat_message(&client, "add a rug").await;
        let history = &studio.session().expect("session").chat_history;
        assert_eq!(history.last(), Some(&ChatMessage::ai(CHAT_APOLOGY)));
        assert_eq!(history[1], ChatMessage::user("add a rug"));
        assert!(studio.error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_previous_result() {
        let client = ScriptedClient::failing_after(1);
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;
        assert_eq!(
            studio.session().expect("session").generated,
            Some(generated(1))
        );
        assert!(studio.error().is_none());

        studio.select_style(&client, "Industrial").await;
        assert!(studio.error().is_some());
        assert!(!studio.is_loading());
        assert_eq!(
            studio.session().expect("session").generated,
            Some(generated(1))
        );

        studio.dismiss_error();
        studio.send_chat_message(&client, "add a reading chair").await;
        assert!(studio.error().is_some());
        let session = studio.session().expect("session");
        assert_eq!(session.generated, Some(generated(1)));
        assert_eq!(session.chat_history.last(), Some(&ChatMessage::ai(CHAT_APOLOGY)));
        assert_eq!(client.edits()[2].image, generated(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_shopping_keeps_result() {
        let client = ScriptedClient::failing_shopping();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Japandi").await;

        studio.request_shopping_links(&client).await;
        assert!(studio.error().is_some());
        assert_eq!(
            studio.session().expect("session").generated,
            Some(generated(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shopping_reply_carries_items() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Bohemian").await;

        assert!(studio.request_shopping_links(&client).await);

        assert_eq!(
            client.shopping_lookups.lock().unwrap().as_slice(),
            &[generated(1)]
        );
        let history = &studio.session().expect("session").chat_history;
        assert_eq!(history[1], ChatMessage::user(SHOPPING_REQUEST_MESSAGE));
        assert_eq!(
            history[2],
            ChatMessage::ai_with_items(SHOPPING_REPLY_MESSAGE, vec![lamp()])
        );
        assert_eq!(history[2].sender, Sender::Ai);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_shopping_apologizes() {
        let client = ScriptedClient::failing_shopping();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        studio.request_shopping_links(&client).await;
        let history = &studio.session().expect("session").chat_history;
        assert_eq!(history.last(), Some(&ChatMessage::ai(SHOPPING_APOLOGY)));
        assert!(studio.error().is_some());
    }
}

// ============================================
// Pending requests
// ============================================

mod pending_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_request_is_refused_while_pending() {
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        let request = studio.begin_style("Coastal").expect("style request");
        assert!(studio.is_loading());
        assert_eq!(studio.phase(), SessionPhase::Styling);
        assert!(studio.loading_message().is_some());
        assert!(studio.begin_chat("more light").is_none());
        assert!(studio.begin_shopping().is_none());
        assert!(studio.begin_style("Boho").is_none());

        studio.finish_style(request.ticket, Ok(generated(1)));
        assert!(!studio.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_result_is_ignored() {
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        let request = studio.begin_style("Coastal").expect("style request");
        assert!(studio.cancel_pending());
        assert!(!studio.is_loading());
        assert!(!studio.cancel_pending());

        studio.finish_style(request.ticket, Ok(generated(1)));
        assert!(studio.session().expect("session").generated.is_none());
        assert_eq!(studio.phase(), SessionPhase::Uploaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_invalidates_inflight_chat() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());

        let turn = studio.begin_chat("add shelves").expect("chat turn");
        let outcome = turn.run(&client).await;
        studio.upload_image(EncodedImage::new("bmV4dA==", "image/png"));
        studio.finish_chat(turn.ticket, outcome);

        let session = studio.session().expect("session");
        assert!(session.generated.is_none());
        assert_eq!(session.chat_history, vec![ChatMessage::ai(WELCOME_MESSAGE)]);
    }
}

// ============================================
// Saved designs
// ============================================

mod saved_design_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_save_without_result_is_noop() {
        let (store, mut studio) = open_studio();
        assert_eq!(studio.save_current_design(), None);

        studio.upload_image(room());
        assert_eq!(studio.save_current_design(), None);
        assert_eq!(store.writes(SAVED_DESIGNS_KEY), 0);
        assert!(studio.saved_designs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_persists_and_clears_autosave() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Japandi").await;
        settle_autosave().await;
        assert!(store.get(AUTO_SAVE_KEY).is_some());

        let id = studio.save_current_design().expect("saved");
        assert!(studio.just_saved());
        assert!(!studio.can_save());
        assert!(store.get(AUTO_SAVE_KEY).is_none());

        let design = &studio.saved_designs()[0];
        assert_eq!(design.id, id);
        assert_eq!(design.style, "Japandi");
        assert_eq!(design.original(), room());
        assert_eq!(design.generated(), generated(1));

        let reopened = Studio::open(store.clone(), Timings::default());
        assert_eq!(reopened.saved_designs(), studio.saved_designs());
        assert!(reopened.session().is_none());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!studio.just_saved());
        assert!(studio.can_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique_and_increasing() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;

        let first = studio.save_current_design().expect("first");
        tokio::time::sleep(Duration::from_secs(3)).await;
        let second = studio.save_current_design().expect("second");
        assert!(second > first);
        assert_eq!(studio.saved_designs().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_semantics() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;
        let id = studio.save_current_design().expect("saved");
        let writes = store.writes(SAVED_DESIGNS_KEY);

        assert!(!studio.delete_saved_design(id + 1));
        assert_eq!(store.writes(SAVED_DESIGNS_KEY), writes);
        assert_eq!(studio.saved_designs().len(), 1);

        assert!(studio.delete_saved_design(id));
        assert!(studio.saved_designs().is_empty());
        assert_eq!(store.get(SAVED_DESIGNS_KEY).as_deref(), Some("[]"));
    }
}

// ============================================
// Autosave
// ============================================

mod autosave_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_changes_writes_once() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.upload_image(room());

        studio.select_style(&client, "Industrial").await;
        for text in ["one", "two", "three", "four"] {
            tokio::time::sleep(Duration::from_millis(400)).await;
            studio.send_chat_message(&client, text).await;
        }
        assert_eq!(store.writes(AUTO_SAVE_KEY), 0);
        assert_eq!(studio.autosave_status(), AutoSaveStatus::Saving);

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(store.writes(AUTO_SAVE_KEY), 1);
        assert_eq!(studio.autosave_status(), AutoSaveStatus::Saved);

        let snapshot = stored_snapshot(&store).expect("snapshot");
        let session = studio.session().expect("session");
        assert_eq!(snapshot.chat_history, session.chat_history);
        assert_eq!(snapshot.current_style.as_deref(), Some("Industrial"));
        assert_eq!(snapshot.generated_image_base64, generated(5).data);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(studio.autosave_status(), AutoSaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_saved_before_first_result() {
        let (store, mut studio) = open_studio();
        studio.upload_image(room());
        let _turn = studio.begin_chat("brighter").expect("chat turn");

        settle_autosave().await;
        assert_eq!(store.writes(AUTO_SAVE_KEY), 0);
        assert_eq!(studio.autosave_status(), AutoSaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_keeps_existing_snapshot() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.upload_image(room());
        studio.select_style(&client, "Minimalist").await;
        settle_autosave().await;
        let before = stored_snapshot(&store).expect("snapshot");

        studio.set_autosave_enabled(false);
        assert!(!studio.autosave_enabled());
        assert_eq!(store.get(AUTO_SAVE_PREF_KEY).as_deref(), Some("false"));

        studio.send_chat_message(&client, "add curtains").await;
        settle_autosave().await;
        assert_eq!(stored_snapshot(&store), Some(before));
        assert_eq!(store.writes(AUTO_SAVE_KEY), 1);

        let reopened = Studio::open(store.clone(), Timings::default());
        assert!(!reopened.autosave_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenabling_saves_current_state() {
        let client = ScriptedClient::default();
        let (store, mut studio) = open_studio();
        studio.set_autosave_enabled(false);
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;
        settle_autosave().await;
        assert!(store.get(AUTO_SAVE_KEY).is_none());

        studio.set_autosave_enabled(true);
        settle_autosave().await;
        let snapshot = stored_snapshot(&store).expect("snapshot");
        assert_eq!(snapshot.current_style.as_deref(), Some("Coastal"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_is_published() {
        let client = ScriptedClient::default();
        let (_store, mut studio) = open_studio();
        let mut status = studio.watch_autosave_status();
        studio.upload_image(room());
        studio.select_style(&client, "Coastal").await;

        assert_eq!(*status.borrow_and_update(), AutoSaveStatus::Saving);
        settle_autosave().await;
        assert!(status.has_changed().unwrap_or(false));
        assert_eq!(*status.borrow_and_update(), AutoSaveStatus::Saved);
    }
}
