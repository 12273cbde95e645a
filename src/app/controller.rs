use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use humansize::{BINARY, format_size};
use tokio::sync::mpsc;

use super::types::{
    Completion, DeleteConfirm, Feedback, MessageType, OpKind, SavedExport, Sequencer, ViewPhase,
};
use crate::config::Config;
use crate::data::{
    DeleteOutcome, GatewayResult, RequestGateway, ResultStore, SearchCriteria, SearchOutcome,
};
use crate::error::{BidStackError, Result};
use crate::template::TemplateEngine;

const SERVER_ERROR: &str = "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
const SEARCH_FAILED: &str = "검색에 실패했습니다.";
const DELETE_FAILED: &str = "삭제에 실패했습니다.";
const DELETE_SERVER_ERROR: &str = "서버 오류가 발생했습니다.";
const EXPORT_FAILED: &str = "엑셀 파일 생성에 실패했습니다.";
const NOTHING_TO_DELETE: &str = "삭제할 항목을 선택해주세요.";
const NOTHING_TO_EXPORT: &str = "내보낼 데이터가 없습니다.";
const ALREADY_RUNNING: &str = "요청을 처리하는 중입니다. 잠시만 기다려주세요.";

/// Knobs the controller needs from the config file
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub feedback_duration: Duration,
    pub export_dir: PathBuf,
    pub filename_template: String,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            feedback_duration: config.ui.feedback_duration(),
            export_dir: config.export.resolved_directory(),
            filename_template: config.export.filename.clone(),
        }
    }
}

/// Owns the result set and drives the search/delete/export workflows.
///
/// Requests run on spawned tasks and report back through a channel;
/// `poll_completions` (or `next_completion` in tests) applies them. The
/// store is only mutated when a completion for the latest request of its
/// kind arrives.
pub struct ViewController {
    store: ResultStore,
    gateway: Arc<dyn RequestGateway>,
    templates: TemplateEngine,
    settings: ControllerSettings,
    sequencer: Sequencer,
    searched: bool,
    /// The last search failed. The store keeps its rows but they are hidden
    /// until a search succeeds.
    search_failed: bool,
    count_label: Option<usize>,
    feedback: Option<Feedback>,
    pending_delete: Option<DeleteConfirm>,
    agencies: Vec<String>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl ViewController {
    pub fn new(
        store: ResultStore,
        gateway: Arc<dyn RequestGateway>,
        settings: ControllerSettings,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            store,
            gateway,
            templates: TemplateEngine::new()?,
            settings,
            sequencer: Sequencer::default(),
            searched: false,
            search_failed: false,
            count_label: None,
            feedback: None,
            pending_delete: None,
            agencies: Vec::new(),
            tx,
            rx,
        })
    }

    // ----- derived state -----

    pub fn phase(&self) -> ViewPhase {
        if self.sequencer.in_flight(OpKind::Search) {
            ViewPhase::Searching
        } else if self.sequencer.in_flight(OpKind::Delete) {
            ViewPhase::Deleting
        } else if self.sequencer.in_flight(OpKind::Export) {
            ViewPhase::Exporting
        } else if !self.searched {
            ViewPhase::Idle
        } else if self.search_failed || self.store.is_empty() {
            ViewPhase::Empty
        } else {
            ViewPhase::Ready
        }
    }

    /// Spinner text while a request is outstanding
    pub fn busy_message(&self) -> Option<&'static str> {
        match self.phase() {
            ViewPhase::Searching => Some("검색 중..."),
            ViewPhase::Deleting => Some("삭제 중..."),
            ViewPhase::Exporting => Some("엑셀 파일을 생성하는 중..."),
            _ => None,
        }
    }

    pub fn is_running(&self, kind: OpKind) -> bool {
        self.sequencer.in_flight(kind)
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// False after a failed search, until the next one succeeds
    pub fn results_visible(&self) -> bool {
        !self.search_failed
    }

    /// Rows the user can currently see and act on
    pub fn visible_len(&self) -> usize {
        if self.search_failed {
            0
        } else {
            self.store.len()
        }
    }

    pub fn count_label(&self) -> Option<usize> {
        self.count_label
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&DeleteConfirm> {
        self.pending_delete.as_ref()
    }

    pub fn agencies(&self) -> &[String] {
        &self.agencies
    }

    fn visible_selected_count(&self) -> usize {
        if self.search_failed {
            0
        } else {
            self.store.selected_count()
        }
    }

    // ----- feedback -----

    fn notify(&mut self, message_type: MessageType, message: impl Into<String>) {
        let feedback = Feedback::new(message_type, message);
        match message_type {
            MessageType::Error => tracing::warn!(message = %feedback.message, "feedback"),
            _ => tracing::debug!(message = %feedback.message, "feedback"),
        }
        self.feedback = Some(feedback);
    }

    /// Show a warning for input rejected before any request was made
    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(MessageType::Warning, message);
    }

    pub fn dismiss_feedback(&mut self) -> bool {
        self.feedback.take().is_some()
    }

    /// Drop the toast once it has been visible for the configured duration
    pub fn expire_feedback(&mut self, now: Instant) -> bool {
        let expired = self
            .feedback
            .as_ref()
            .is_some_and(|f| f.is_expired(now, self.settings.feedback_duration));
        if expired {
            self.feedback = None;
        }
        expired
    }

    // ----- intents -----

    /// Fetch the agency filter list. Failures are logged only.
    pub fn load_agencies(&self) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.agencies().await;
            let _ = tx.send(Completion::Agencies(result));
        });
    }

    pub fn submit_search(&mut self, criteria: SearchCriteria) {
        if self.sequencer.in_flight(OpKind::Search) {
            self.notify(MessageType::Info, ALREADY_RUNNING);
            return;
        }

        let seq = self.sequencer.issue(OpKind::Search);
        tracing::info!(seq, ?criteria, "search issued");

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.search(&criteria).await;
            let _ = tx.send(Completion::Search { seq, result });
        });
    }

    pub fn toggle_row(&mut self, id: &str, selected: bool) {
        if self.search_failed {
            return;
        }
        self.store.toggle(id, selected);
    }

    /// Header checkbox: checked selects every row, unchecked clears
    pub fn toggle_all(&mut self, checked: bool) {
        if self.search_failed {
            return;
        }
        if checked {
            self.store.select_all();
        } else {
            self.store.clear_selection();
        }
    }

    pub fn select_all(&mut self) {
        if self.search_failed {
            return;
        }
        self.store.select_all();
    }

    /// Ask for confirmation before deleting the selection
    pub fn request_delete(&mut self) {
        if self.sequencer.in_flight(OpKind::Delete) {
            self.notify(MessageType::Info, ALREADY_RUNNING);
            return;
        }

        let count = self.visible_selected_count();
        if count == 0 {
            self.notify(MessageType::Warning, NOTHING_TO_DELETE);
            return;
        }

        self.pending_delete = Some(DeleteConfirm {
            count,
            message: format!("선택한 {}개 항목을 삭제하시겠습니까?", count),
        });
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) {
        if self.pending_delete.take().is_none() {
            return;
        }

        let ids = if self.search_failed {
            Vec::new()
        } else {
            self.store.selected_ids()
        };
        if ids.is_empty() {
            self.notify(MessageType::Warning, NOTHING_TO_DELETE);
            return;
        }

        let seq = self.sequencer.issue(OpKind::Delete);
        let generation = self.store.generation();
        tracing::info!(seq, count = ids.len(), "delete issued");

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.delete(&ids).await;
            let _ = tx.send(Completion::Delete {
                seq,
                generation,
                ids,
                result,
            });
        });
    }

    /// Export the selection, or every row when nothing is selected
    pub fn export(&mut self) {
        if self.sequencer.in_flight(OpKind::Export) {
            self.notify(MessageType::Info, ALREADY_RUNNING);
            return;
        }

        let ids = if self.search_failed {
            Vec::new()
        } else {
            self.store.export_targets()
        };
        if ids.is_empty() {
            self.notify(MessageType::Warning, NOTHING_TO_EXPORT);
            return;
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let filename = match self
            .templates
            .render_filename(&self.settings.filename_template, &timestamp)
        {
            Ok(name) => name,
            Err(e) => {
                tracing::error!(error = %e, "failed to render export filename");
                self.notify(MessageType::Error, EXPORT_FAILED);
                return;
            }
        };

        let seq = self.sequencer.issue(OpKind::Export);
        let count = ids.len();
        let path = self.settings.export_dir.join(filename);
        tracing::info!(seq, count, path = %path.display(), "export issued");

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = download(gateway.as_ref(), &ids, path).await;
            let _ = tx.send(Completion::Export { seq, count, result });
        });
    }

    // ----- completions -----

    /// Apply every completion that has already arrived. Returns true if any did.
    pub fn poll_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            changed = true;
        }
        changed
    }

    /// Wait for the next completion and apply it
    pub async fn next_completion(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Agencies(result) => self.on_agencies(result),
            Completion::Search { seq, result } => {
                if self.sequencer.settle(OpKind::Search, seq) {
                    self.on_search(result);
                } else {
                    tracing::debug!(seq, "discarding stale search response");
                }
            }
            Completion::Delete {
                seq,
                generation,
                ids,
                result,
            } => {
                if self.sequencer.settle(OpKind::Delete, seq) {
                    self.on_delete(generation, ids, result);
                } else {
                    tracing::debug!(seq, "discarding stale delete response");
                }
            }
            Completion::Export { seq, count, result } => {
                if self.sequencer.settle(OpKind::Export, seq) {
                    self.on_export(count, result);
                } else {
                    tracing::debug!(seq, "discarding stale export response");
                }
            }
        }
    }

    fn on_agencies(&mut self, result: GatewayResult<Vec<String>>) {
        match result {
            Ok(agencies) => {
                tracing::debug!(count = agencies.len(), "agencies loaded");
                self.agencies = agencies;
            }
            Err(e) => tracing::warn!(error = %e, "failed to load agency list"),
        }
    }

    fn on_search(&mut self, result: GatewayResult<SearchOutcome>) {
        self.searched = true;

        match result {
            Ok(outcome) => {
                tracing::info!(rows = outcome.rows.len(), count = outcome.count, "search done");
                self.store.replace(outcome.rows);
                self.search_failed = false;
                self.count_label = Some(self.store.len());
                self.notify(
                    MessageType::Success,
                    format!("{}개의 입찰공고를 찾았습니다.", outcome.count),
                );
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "search failed");
                self.notify(
                    MessageType::Error,
                    failure.user_message(SEARCH_FAILED, SERVER_ERROR),
                );
                // The previous result set stays in the store; only a
                // successful search replaces it.
                self.search_failed = true;
                self.count_label = None;
            }
        }
    }

    fn on_delete(
        &mut self,
        generation: u64,
        ids: Vec<String>,
        result: GatewayResult<DeleteOutcome>,
    ) {
        match result {
            Ok(outcome) => {
                if generation != self.store.generation() {
                    tracing::info!("result set replaced while deleting; skipping local removal");
                    return;
                }

                let remaining = self.store.remove(&ids);
                self.store.clear_selection();
                if remaining != outcome.remaining_count {
                    tracing::debug!(
                        local = remaining,
                        server = outcome.remaining_count,
                        "row count differs from server"
                    );
                }
                if !self.search_failed {
                    self.count_label = Some(outcome.remaining_count);
                }
                self.notify(MessageType::Success, outcome.message);
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "delete failed");
                self.notify(
                    MessageType::Error,
                    failure.user_message(DELETE_FAILED, DELETE_SERVER_ERROR),
                );
            }
        }
    }

    fn on_export(&mut self, count: usize, result: std::result::Result<SavedExport, BidStackError>) {
        match result {
            Ok(saved) => {
                tracing::info!(
                    path = %saved.path.display(),
                    size = %format_size(saved.size, BINARY),
                    "export saved"
                );
                self.notify(
                    MessageType::Success,
                    format!("{}개 항목이 엑셀 파일로 저장되었습니다.", count),
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.notify(MessageType::Error, EXPORT_FAILED);
            }
        }
    }
}

/// Fetch the spreadsheet and write it to `path`
async fn download(
    gateway: &dyn RequestGateway,
    ids: &[String],
    path: PathBuf,
) -> std::result::Result<SavedExport, BidStackError> {
    let bytes = gateway
        .export_spreadsheet(ids)
        .await
        .map_err(BidStackError::from)?;

    if bytes.is_empty() {
        return Err(BidStackError::Export(
            "server returned an empty spreadsheet".to_string(),
        ));
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &bytes).await?;

    Ok(SavedExport {
        path,
        size: bytes.len(),
    })
}
