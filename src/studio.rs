//! The editing session state machine.
//!
//! `Studio` owns the active session, the saved designs and the derived UI
//! flags. Work that needs the generation service is split in two: a
//! synchronous `begin_*` that updates state and hands back a request, and a
//! `finish_*` that applies the outcome. The front end runs the request on a
//! spawned task in between; tests use the async helpers that do all three.
//!
//! Each request carries a ticket. Cancelling, resetting or uploading a new
//! photo invalidates it, and a late `finish_*` with that ticket is ignored.

use crate::ai::prompts::style_instruction;
use crate::ai::{GenerationClient, GenerationResult};
use crate::autosave::{AUTOSAVE_QUIET_PERIOD, AUTOSAVE_STATUS_HOLD, Autosaver};
use crate::session::{Activity, Session, SessionPhase};
use crate::storage::{
    AutoSaveRepository, PreferenceRepository, SavedDesignRepository, SharedStore,
};
use crate::timer::Flash;
use crate::types::{AutoSaveStatus, ChatMessage, EncodedImage, SavedDesign, ShoppingItem};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::watch;

pub const SHOPPING_REQUEST_MESSAGE: &str = "Can you find shoppable items for me?";
pub const SHOPPING_REPLY_MESSAGE: &str = "Here are some items inspired by the design:";
pub const SHOPPING_APOLOGY: &str = "Sorry, I had trouble finding products for this design. You can try again after making more edits.";
pub const CHAT_APOLOGY: &str = "Sorry, I couldn't apply that change. Please try phrasing your request differently.";

const STYLE_ERROR: &str = "Could not generate the image. Please try another style.";
const CHAT_ERROR: &str = "Could not apply the changes. Please try again.";
const SHOPPING_ERROR: &str = "Could not find shopping links. Please try again.";
const SAVE_ERROR: &str = "Could not store the design. Please try again.";
const DELETE_ERROR: &str = "Could not remove the design. Please try again.";

pub const SAVED_ACK_HOLD: Duration = Duration::from_secs(2);

pub fn chat_confirmation(instruction: &str) -> String {
    format!(
        "Of course! Here is your request applied: \"{instruction}\". Just tell me if you'd like another change."
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub autosave_quiet: Duration,
    pub autosave_status_hold: Duration,
    pub saved_ack_hold: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            autosave_quiet: AUTOSAVE_QUIET_PERIOD,
            autosave_status_hold: AUTOSAVE_STATUS_HOLD,
            saved_ack_hold: SAVED_ACK_HOLD,
        }
    }
}

#[derive(Clone, Debug)]
struct Pending {
    ticket: u64,
    activity: Activity,
    message: String,
}

/// An image edit against a fixed base image.
#[derive(Clone, Debug)]
pub struct EditRequest {
    pub ticket: u64,
    pub image: EncodedImage,
    pub instruction: String,
}

impl EditRequest {
    pub async fn run(&self, client: &dyn GenerationClient) -> GenerationResult<EncodedImage> {
        client.edit_image(&self.image, &self.instruction).await
    }
}

/// A free-text chat request: refined first, then applied as an edit.
#[derive(Clone, Debug)]
pub struct ChatTurn {
    pub ticket: u64,
    pub image: EncodedImage,
    pub message: String,
}

pub struct ChatOutcome {
    pub instruction: String,
    pub result: GenerationResult<EncodedImage>,
}

impl ChatTurn {
    pub async fn run(&self, client: &dyn GenerationClient) -> ChatOutcome {
        let instruction = client.refine_instruction(&self.message).await;
        let result = client.edit_image(&self.image, &instruction).await;
        ChatOutcome {
            instruction,
            result,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShoppingRequest {
    pub ticket: u64,
    pub image: EncodedImage,
}

impl ShoppingRequest {
    pub async fn run(&self, client: &dyn GenerationClient) -> GenerationResult<Vec<ShoppingItem>> {
        client.find_shoppable_items(&self.image).await
    }
}

pub struct Studio {
    session: Option<Session>,
    saved_designs: Vec<SavedDesign>,
    pending: Option<Pending>,
    error: Option<String>,
    autosave_enabled: bool,
    next_ticket: u64,
    last_design_id: u64,
    designs: SavedDesignRepository,
    preferences: PreferenceRepository,
    autosaver: Autosaver,
    just_saved: Flash,
}

impl Studio {
    /// Loads saved designs, the autosave preference and any autosaved
    /// session from `store`.
    pub fn open(store: SharedStore, timings: Timings) -> Self {
        let designs = SavedDesignRepository::new(store.clone());
        let preferences = PreferenceRepository::new(store.clone());
        let autosaver = Autosaver::new(
            AutoSaveRepository::new(store),
            timings.autosave_quiet,
            timings.autosave_status_hold,
        );

        let saved_designs = designs.load();
        let autosave_enabled = preferences.autosave_enabled();
        let session = autosaver.restore().map(Session::from_snapshot);
        if let Some(restored) = &session {
            tracing::info!(
                messages = restored.chat_history.len(),
                "restored autosaved session"
            );
        }
        let last_design_id = saved_designs.iter().map(|d| d.id).max().unwrap_or(0);

        Self {
            session,
            saved_designs,
            pending: None,
            error: None,
            autosave_enabled,
            next_ticket: 0,
            last_design_id,
            designs,
            preferences,
            autosaver,
            just_saved: Flash::new(timings.saved_ack_hold),
        }
    }

    // ---------------
    // Read side
    // ---------------

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.session, &self.pending) {
            (None, _) => SessionPhase::Empty,
            (Some(_), Some(pending)) => pending.activity.into(),
            (Some(_), None) => SessionPhase::Uploaded,
        }
    }

    pub fn saved_designs(&self) -> &[SavedDesign] {
        &self.saved_designs
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn loading_message(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.message.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave_enabled
    }

    pub fn autosave_status(&self) -> AutoSaveStatus {
        self.autosaver.status()
    }

    pub fn watch_autosave_status(&self) -> watch::Receiver<AutoSaveStatus> {
        self.autosaver.subscribe()
    }

    pub fn just_saved(&self) -> bool {
        self.just_saved.is_raised()
    }

    pub fn watch_just_saved(&self) -> watch::Receiver<bool> {
        self.just_saved.subscribe()
    }

    pub fn can_save(&self) -> bool {
        !self.is_loading()
            && !self.just_saved()
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.generated.is_some() && s.style.is_some())
    }

    // ---------------
    // Session lifecycle
    // ---------------

    /// Starts a new session on `image`. Any previous result, style and
    /// transcript are dropped, as is the autosave slot.
    pub fn upload_image(&mut self, image: EncodedImage) {
        self.pending = None;
        self.error = None;
        if let Err(err) = self.autosaver.discard() {
            tracing::warn!(error = %err, "failed to clear autosave slot");
        }
        self.just_saved.lower();
        tracing::info!(mime = %image.mime_type, bytes = image.data.len(), "new photo uploaded");
        self.session = Some(Session::new(image));
    }

    pub fn reset_session(&mut self) {
        self.session = None;
        self.pending = None;
        self.error = None;
        self.just_saved.lower();
        if let Err(err) = self.autosaver.discard() {
            tracing::warn!(error = %err, "failed to clear autosave slot");
        }
    }

    /// User-cancel path for a request that is taking too long.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take();
        if let Some(pending) = &cancelled {
            tracing::info!(ticket = pending.ticket, activity = ?pending.activity, "request cancelled");
        }
        cancelled.is_some()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn set_autosave_enabled(&mut self, enabled: bool) {
        self.autosave_enabled = enabled;
        if let Err(err) = self.preferences.set_autosave_enabled(enabled) {
            tracing::warn!(error = %err, "failed to store autosave preference");
        }
        self.sync_autosave();
    }

    // ---------------
    // Style selection
    // ---------------

    pub fn begin_style(&mut self, style: &str) -> Option<EditRequest> {
        if self.pending.is_some() {
            return None;
        }
        let session = self.session.as_mut()?;
        session.style = Some(style.to_string());
        let image = session.original.clone();

        let ticket = self.issue_ticket(
            Activity::Styling,
            format!("Redesigning in the {style} style..."),
        );
        self.sync_autosave();
        Some(EditRequest {
            ticket,
            image,
            instruction: style_instruction(style),
        })
    }

    pub fn finish_style(&mut self, ticket: u64, result: GenerationResult<EncodedImage>) {
        if !self.settle(ticket) {
            return;
        }
        match result {
            Ok(image) => {
                if let Some(session) = self.session.as_mut() {
                    session.generated = Some(image);
                }
                self.sync_autosave();
            }
            Err(err) => {
                tracing::warn!(error = %err, "style redesign failed");
                self.error = Some(STYLE_ERROR.to_string());
            }
        }
    }

    pub async fn select_style(&mut self, client: &dyn GenerationClient, style: &str) -> bool {
        let Some(request) = self.begin_style(style) else {
            return false;
        };
        let result = request.run(client).await;
        self.finish_style(request.ticket, result);
        true
    }

    // ---------------
    // Chat edits
    // ---------------

    /// Appends the user's message right away; the edit builds on the latest
    /// result.
    pub fn begin_chat(&mut self, text: &str) -> Option<ChatTurn> {
        let text = text.trim();
        if text.is_empty() || self.pending.is_some() {
            return None;
        }
        let session = self.session.as_mut()?;
        session.chat_history.push(ChatMessage::user(text));
        let image = session.working_image().clone();

        let ticket = self.issue_ticket(Activity::Chatting, "Applying your changes...".to_string());
        self.sync_autosave();
        Some(ChatTurn {
            ticket,
            image,
            message: text.to_string(),
        })
    }

    pub fn finish_chat(&mut self, ticket: u64, outcome: ChatOutcome) {
        if !self.settle(ticket) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match outcome.result {
            Ok(image) => {
                session.generated = Some(image);
                session
                    .chat_history
                    .push(ChatMessage::ai(chat_confirmation(&outcome.instruction)));
            }
            Err(err) => {
                tracing::warn!(error = %err, instruction = %outcome.instruction, "chat edit failed");
                session.chat_history.push(ChatMessage::ai(CHAT_APOLOGY));
                self.error = Some(CHAT_ERROR.to_string());
            }
        }
        self.sync_autosave();
    }

    pub async fn send_chat_message(&mut self, client: &dyn GenerationClient, text: &str) -> bool {
        let Some(turn) = self.begin_chat(text) else {
            return false;
        };
        let outcome = turn.run(client).await;
        self.finish_chat(turn.ticket, outcome);
        true
    }

    // ---------------
    // Shopping assistant
    // ---------------

    pub fn begin_shopping(&mut self) -> Option<ShoppingRequest> {
        if self.pending.is_some() {
            return None;
        }
        let session = self.session.as_mut()?;
        session
            .chat_history
            .push(ChatMessage::user(SHOPPING_REQUEST_MESSAGE));
        let image = session.working_image().clone();

        let ticket = self.issue_ticket(
            Activity::ShoppingLookup,
            "Finding similar products...".to_string(),
        );
        self.sync_autosave();
        Some(ShoppingRequest { ticket, image })
    }

    pub fn finish_shopping(&mut self, ticket: u64, result: GenerationResult<Vec<ShoppingItem>>) {
        if !self.settle(ticket) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "shopping items found");
                session
                    .chat_history
                    .push(ChatMessage::ai_with_items(SHOPPING_REPLY_MESSAGE, items));
            }
            Err(err) => {
                tracing::warn!(error = %err, "shopping lookup failed");
                session.chat_history.push(ChatMessage::ai(SHOPPING_APOLOGY));
                self.error = Some(SHOPPING_ERROR.to_string());
            }
        }
        self.sync_autosave();
    }

    pub async fn request_shopping_links(&mut self, client: &dyn GenerationClient) -> bool {
        let Some(request) = self.begin_shopping() else {
            return false;
        };
        let result = request.run(client).await;
        self.finish_shopping(request.ticket, result);
        true
    }

    // ---------------
    // Saved designs
    // ---------------

    /// Commits the current result to the saved designs. Returns the new id,
    /// or `None` when there is nothing to save or it could not be stored.
    pub fn save_current_design(&mut self) -> Option<u64> {
        let draft = self.session.as_ref()?.to_saved_design(0)?;
        let id = self.next_design_id();
        let design = SavedDesign { id, ..draft };

        let mut updated = self.saved_designs.clone();
        updated.push(design);
        if let Err(err) = self.designs.replace_all(&updated) {
            tracing::error!(error = %err, "failed to persist saved designs");
            self.error = Some(SAVE_ERROR.to_string());
            return None;
        }
        self.saved_designs = updated;
        tracing::info!(id, total = self.saved_designs.len(), "design saved");

        if let Err(err) = self.autosaver.discard() {
            tracing::warn!(error = %err, "failed to clear autosave slot");
        }
        self.just_saved.raise();
        Some(id)
    }

    /// Removes the design with `id`. Unknown ids leave storage untouched.
    pub fn delete_saved_design(&mut self, id: u64) -> bool {
        if !self.saved_designs.iter().any(|design| design.id == id) {
            return false;
        }
        let updated: Vec<SavedDesign> = self
            .saved_designs
            .iter()
            .filter(|design| design.id != id)
            .cloned()
            .collect();
        if let Err(err) = self.designs.replace_all(&updated) {
            tracing::error!(error = %err, id, "failed to persist saved designs");
            self.error = Some(DELETE_ERROR.to_string());
            return false;
        }
        self.saved_designs = updated;
        true
    }

    // ---------------
    // Internals
    // ---------------

    fn issue_ticket(&mut self, activity: Activity, message: String) -> u64 {
        self.next_ticket += 1;
        self.error = None;
        self.pending = Some(Pending {
            ticket: self.next_ticket,
            activity,
            message,
        });
        self.next_ticket
    }

    /// Clears loading for `ticket`. False when the ticket is stale.
    fn settle(&mut self, ticket: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => {
                tracing::debug!(ticket, "ignoring result of a cancelled request");
                false
            }
        }
    }

    /// Ids are creation times in milliseconds, bumped when two saves land in
    /// the same millisecond.
    fn next_design_id(&mut self) -> u64 {
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).max(0) as u64;
        let id = now_ms.max(self.last_design_id + 1);
        self.last_design_id = id;
        id
    }

    fn sync_autosave(&mut self) {
        let snapshot = if self.autosave_enabled {
            self.session.as_ref().and_then(Session::snapshot)
        } else {
            None
        };
        self.autosaver.track(snapshot);
    }
}
