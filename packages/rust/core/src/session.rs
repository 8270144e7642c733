//! Run state for one simulation session and the reconciler that keeps its
//! derived fields in line with the current step and parameters.
//!
//! Front ends mutate the session (navigation, parameter changes) and then
//! call [`Session::reconcile`] once. The reconciler recomputes chunks and
//! retrieval results in place and, when an answer slot needs filling,
//! hands back a [`GenerationRequest`] for the caller to execute.

use tracing::{debug, info};

use ragsim_shared::{Chunk, Document, Mode, RunId, SimulationConfig, Step};

use crate::catalog::DOCUMENT;
use crate::chunking::split_into_chunks;
use crate::generation::{GenerationRequest, Generator, generate_answer};
use crate::pipeline;
use crate::retrieval::retrieve;

/// Aggregate mutable state of one simulation run.
#[derive(Debug, Clone)]
pub struct Session {
    run_id: RunId,
    /// Bumped on every reset; completions from older epochs are dropped.
    epoch: u64,
    defaults: SimulationConfig,
    document: Document,

    mode: Mode,
    step: Step,
    question: String,
    chunks: Vec<Chunk>,
    retrieved: Vec<Chunk>,
    rerank: bool,
    chunk_size: usize,
    chunk_overlap: usize,
    top_k: usize,
    baseline_answer: String,
    augmented_answer: String,
    pending: Option<Mode>,
}

impl Session {
    /// Start a baseline run over the built-in policy document.
    pub fn new(defaults: &SimulationConfig) -> Self {
        Self::with_document(defaults, DOCUMENT)
    }

    /// Start a baseline run over `document`.
    pub fn with_document(defaults: &SimulationConfig, document: Document) -> Self {
        Self {
            run_id: RunId::new(),
            epoch: 0,
            defaults: defaults.clone(),
            document,
            mode: Mode::Baseline,
            step: Step::Question,
            question: String::new(),
            chunks: Vec::new(),
            retrieved: Vec::new(),
            rerank: defaults.rerank,
            chunk_size: defaults.chunk_size.max(1),
            chunk_overlap: defaults.chunk_overlap,
            top_k: defaults.top_k,
            baseline_answer: String::new(),
            augmented_answer: String::new(),
            pending: None,
        }
    }

    /// Switch to `mode`, clearing the whole run back to its initial values.
    pub fn reset(&mut self, mode: Mode) {
        let epoch = self.epoch + 1;
        *self = Self {
            mode,
            epoch,
            ..Self::with_document(&self.defaults, self.document.clone())
        };
        info!(run = %self.run_id, %mode, epoch, "simulation reset");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn retrieved(&self) -> &[Chunk] {
        &self.retrieved
    }

    pub fn rerank_enabled(&self) -> bool {
        self.rerank
    }

    /// The "reranked" column. Identical to [`Session::retrieved`] when the
    /// reranker is on, hidden when it is off; nothing is reordered.
    pub fn reranked(&self) -> Option<&[Chunk]> {
        self.rerank.then_some(self.retrieved.as_slice())
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Configured overlap. Displayed only; chunking ignores it.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer slot for `mode` (empty until generated).
    pub fn answer(&self, mode: Mode) -> &str {
        match mode {
            Mode::Baseline => &self.baseline_answer,
            Mode::Augmented => &self.augmented_answer,
        }
    }

    /// Whether a generation call is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn question_mut(&mut self) -> &mut String {
        &mut self.question
    }

    /// Set characters per chunk; values below 1 are raised to 1.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    pub fn set_top_k(&mut self, top_k: usize) {
        self.top_k = top_k;
    }

    pub fn toggle_rerank(&mut self) {
        self.rerank = !self.rerank;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Steps shown in the navigation list for the active mode.
    pub fn steps(&self) -> &'static [Step] {
        pipeline::sequence(self.mode)
    }

    pub fn can_advance(&self) -> bool {
        pipeline::can_advance(self.mode, self.step, &self.question)
    }

    pub fn can_go_back(&self) -> bool {
        self.step != Step::Question
    }

    /// Move forward one step. Returns `false` when the move is disabled.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match pipeline::next_step(self.mode, self.step) {
            Some(next) => self.move_to(next),
            None => false,
        }
    }

    /// Move back one step. Returns `false` at the first step.
    pub fn previous(&mut self) -> bool {
        match pipeline::previous_step(self.mode, self.step) {
            Some(prev) => self.move_to(prev),
            None => false,
        }
    }

    /// Jump straight to `step` without checking that earlier steps ran.
    ///
    /// Steps outside the active pipeline are refused.
    pub fn jump(&mut self, step: Step) -> bool {
        if !pipeline::contains(self.mode, step) {
            debug!(run = %self.run_id, mode = %self.mode, %step, "jump refused: step not in pipeline");
            return false;
        }
        self.move_to(step)
    }

    fn move_to(&mut self, step: Step) -> bool {
        debug!(run = %self.run_id, from = %self.step, to = %step, "step transition");
        self.step = step;
        true
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Bring derived state in line with the current step and parameters.
    ///
    /// Chunk and retrieval results are recomputed wholesale. On the generate
    /// step, returns a request if the active answer slot is empty and no
    /// call is already in flight; the slot is then marked pending.
    pub fn reconcile(&mut self) -> Option<GenerationRequest> {
        match self.step {
            Step::Chunk => {
                self.chunks =
                    split_into_chunks(self.document.content, self.document.name, self.chunk_size);
                debug!(run = %self.run_id, size = self.chunk_size, count = self.chunks.len(), "chunks rebuilt");
                None
            }
            Step::Retrieval => {
                self.retrieved = retrieve(&self.question, &self.chunks, self.top_k);
                debug!(run = %self.run_id, top_k = self.top_k, count = self.retrieved.len(), "retrieval rescored");
                None
            }
            Step::Generate => self.request_generation(),
            _ => None,
        }
    }

    fn request_generation(&mut self) -> Option<GenerationRequest> {
        if !self.answer(self.mode).is_empty() || self.pending.is_some() {
            return None;
        }

        let context = match self.mode {
            Mode::Baseline => Vec::new(),
            Mode::Augmented => self.retrieved.clone(),
        };
        self.pending = Some(self.mode);

        info!(
            run = %self.run_id,
            mode = %self.mode,
            epoch = self.epoch,
            snippets = context.len(),
            "requesting answer generation"
        );

        Some(GenerationRequest {
            epoch: self.epoch,
            mode: self.mode,
            question: self.question.clone(),
            context,
        })
    }

    /// Store the answer for `request`.
    ///
    /// Results from an earlier epoch (the run was reset meanwhile) are
    /// dropped, as is anything aimed at an already populated slot.
    /// Returns whether the answer was stored.
    pub fn complete_generation(&mut self, request: &GenerationRequest, answer: String) -> bool {
        if request.epoch != self.epoch {
            debug!(
                run = %self.run_id,
                stale_epoch = request.epoch,
                epoch = self.epoch,
                "dropping stale generation result"
            );
            return false;
        }

        if self.pending == Some(request.mode) {
            self.pending = None;
        }

        let slot = match request.mode {
            Mode::Baseline => &mut self.baseline_answer,
            Mode::Augmented => &mut self.augmented_answer,
        };
        if !slot.is_empty() {
            return false;
        }
        *slot = answer;
        true
    }

    /// Reconcile and, if a call is needed, run it to completion on `generator`.
    ///
    /// Returns whether a new answer was stored.
    pub async fn reconcile_with<G: Generator>(&mut self, generator: &G) -> bool {
        let Some(request) = self.reconcile() else {
            return false;
        };
        let answer = generate_answer(generator, &request).await;
        self.complete_generation(&request, answer)
    }
}
