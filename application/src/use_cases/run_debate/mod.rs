//! Run Debate use case
//!
//! Drives a debate through every (round, participant) cell in order:
//!
//! ```text
//! generate_next_response()
//!   ├─ cursor done?            → Finished
//!   ├─ guard: in flight        → Duplicate (no-op)
//!   ├─ guard: already spoken   → advance, no generation
//!   └─ guard: acquired
//!        ├─ open empty statement
//!        ├─ stream fragments into the ledger
//!        ├─ release the cell
//!        └─ advance the cursor
//! ```
//!
//! The same entry point serves the manual "continue" action and the
//! auto-advance loop in [`TurnScheduler::run`], so the two can never
//! double-generate a cell.

pub mod accumulator;
pub mod guard;
pub mod types;

pub use accumulator::{AccumulatedStatement, StreamingAccumulator};
pub use guard::{GenerationGuard, GenerationPermit, GuardDecision};
pub use types::{DebateOutcome, RunDebateError, StepOutcome};

use crate::config::SchedulingParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::text_generator::{GenerationRequest, TextGenerator};
use crate::store::DebateStore;
use debate_domain::{
    CellKey, Debate, DebateId, Expert, OpenOutcome, Round, Transition, TurnCursor,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Turn scheduler for one debate
pub struct TurnScheduler<G: TextGenerator + 'static> {
    store: DebateStore,
    generator: Arc<G>,
    guard: GenerationGuard,
    accumulator: StreamingAccumulator,
    cursor: Mutex<TurnCursor>,
    panel_size: usize,
    params: SchedulingParams,
    conversation_logger: Arc<dyn ConversationLogger>,
    announced: AtomicBool,
    auto_advance: AtomicBool,
}

impl<G: TextGenerator + 'static> TurnScheduler<G> {
    /// Scheduler for the debate currently held by `store`.
    ///
    /// The cursor starts at the first cell; cells that already hold a
    /// complete statement are skipped without generation.
    pub fn new(
        store: DebateStore,
        generator: Arc<G>,
        params: SchedulingParams,
    ) -> Result<Self, RunDebateError> {
        let panel_size = store
            .with_debate(|d| d.panel().len())
            .map_err(|_| RunDebateError::NoActiveDebate)?;
        let auto_advance = params.auto_advance;

        Ok(Self {
            guard: GenerationGuard::new(store.clone()),
            accumulator: StreamingAccumulator::new(store.clone()),
            store,
            generator,
            cursor: Mutex::new(TurnCursor::new(panel_size)),
            panel_size,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
            announced: AtomicBool::new(false),
            auto_advance: AtomicBool::new(auto_advance),
        })
    }

    /// Set a conversation logger for structured transcript logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn guard(&self) -> &GenerationGuard {
        &self.guard
    }

    pub fn params(&self) -> &SchedulingParams {
        &self.params
    }

    pub fn store(&self) -> &DebateStore {
        &self.store
    }

    /// Copy of the current cursor position
    pub fn cursor(&self) -> TurnCursor {
        *self.lock_cursor()
    }

    /// Switch between auto-advance and one statement per `run` call
    pub fn set_auto_advance(&self, enabled: bool) {
        self.auto_advance.store(enabled, Ordering::SeqCst);
    }

    pub fn is_auto_advance(&self) -> bool {
        self.auto_advance.load(Ordering::SeqCst)
    }

    pub fn is_complete(&self) -> bool {
        self.lock_cursor().is_complete()
    }

    fn lock_cursor(&self) -> MutexGuard<'_, TurnCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Produce the statement for the cell under the cursor.
    ///
    /// Safe to call repeatedly and concurrently: a cell being generated is
    /// reported as [`StepOutcome::Duplicate`], and a cell already spoken only
    /// moves the cursor.
    pub async fn generate_next_response(
        &self,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<StepOutcome, RunDebateError> {
        let Some(position) = self.cursor().current() else {
            return Ok(StepOutcome::Finished);
        };
        let (participant, round) = position;

        let (debate_id, expert) = self
            .store
            .with_debate(|d| (d.id().clone(), d.panel().get(participant).cloned()))?;
        let expert = expert.ok_or(RunDebateError::CursorOutOfRange(participant))?;
        let key = CellKey::new(expert.id.clone(), round);

        if !self.announced.swap(true, Ordering::SeqCst) {
            info!("Round {} begins", round.display_name());
            progress.on_round_start(round, self.panel_size);
        }

        match self.guard.try_acquire(&key) {
            GuardDecision::InFlight => {
                debug!("Cell {} is already being generated, ignoring", key);
                Ok(StepOutcome::Duplicate(key))
            }
            GuardDecision::AlreadySpoken => {
                debug!("Cell {} already spoken, advancing", key);
                let transition = self.advance_from(position, &debate_id, progress)?;
                Ok(StepOutcome::AlreadySpoken { key, transition })
            }
            GuardDecision::Acquired(permit) => {
                let result = self.speak(&debate_id, &expert, &key, progress).await;
                drop(permit);

                match result {
                    Ok(()) => {
                        let transition = self.advance_from(position, &debate_id, progress)?;
                        Ok(StepOutcome::Spoken { key, transition })
                    }
                    Err(e) => {
                        self.store.set_error(e.to_string());
                        Err(e)
                    }
                }
            }
        }
    }

    /// Run cells until the debate completes, pauses or is cancelled.
    ///
    /// With auto-advance on, consecutive cells are separated by the pacing
    /// delays. With it off, one statement is produced per call. A failed
    /// cell stops the loop; calling `run` again retries it.
    ///
    /// Cancellation is observed between cells and during pauses. A statement
    /// already streaming is allowed to finish.
    pub async fn run(
        &self,
        progress: &dyn DebateProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<DebateOutcome, RunDebateError> {
        loop {
            if cancel.is_cancelled() {
                info!("Debate run cancelled");
                return Ok(DebateOutcome::Cancelled);
            }

            let delay = match self.generate_next_response(progress).await? {
                StepOutcome::Finished => return Ok(DebateOutcome::Completed),
                // Someone else owns the cell; give them time to finish it.
                StepOutcome::Duplicate(_) => self.params.participant_delay,
                StepOutcome::AlreadySpoken { transition, .. } => match transition {
                    Some(Transition::Completed) => self.params.settle_delay,
                    _ => continue,
                },
                StepOutcome::Spoken { transition, .. } => {
                    let finished = transition == Some(Transition::Completed);
                    if !self.is_auto_advance() && !finished {
                        return Ok(DebateOutcome::Paused);
                    }
                    self.delay_after(transition)
                }
            };

            if self.pause(delay, cancel).await {
                info!("Debate run cancelled");
                return Ok(DebateOutcome::Cancelled);
            }
        }
    }

    async fn speak(
        &self,
        debate_id: &DebateId,
        expert: &Expert,
        key: &CellKey,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), RunDebateError> {
        let round = key.round;
        if self.accumulator.open(key)? == OpenOutcome::AlreadyComplete {
            return Ok(());
        }

        info!("{} speaks ({})", expert.name, round);
        progress.on_statement_start(expert, round);
        self.conversation_logger
            .log(ConversationEvent::statement_started(debate_id, key));

        let request = self
            .store
            .with_debate(|d| build_request(d, expert, round))?;

        let outcome = match self.generator.stream_statement(request).await {
            Ok(handle) => {
                self.accumulator
                    .drain(key, &expert.name, handle, progress)
                    .await
            }
            Err(e) => {
                self.store.fail_statement(key)?;
                Err(e.into())
            }
        };

        match outcome {
            Ok(statement) => {
                progress.on_statement_end(key, true);
                self.conversation_logger
                    .log(ConversationEvent::statement_completed(
                        debate_id,
                        key,
                        &statement.content,
                    ));
                Ok(())
            }
            Err(e) => {
                let partial = self
                    .store
                    .statement(key)
                    .map(|s| s.content().to_string())
                    .unwrap_or_default();
                warn!(
                    "Generation for {} failed after {} bytes: {}",
                    key,
                    partial.len(),
                    e
                );
                progress.on_statement_end(key, false);
                self.conversation_logger
                    .log(ConversationEvent::generation_failed(
                        debate_id,
                        key,
                        &e.to_string(),
                        &partial,
                    ));
                Err(e)
            }
        }
    }

    /// Move the cursor off `position` and apply the round-level effects.
    fn advance_from(
        &self,
        position: (usize, Round),
        debate_id: &DebateId,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<Option<Transition>, RunDebateError> {
        let transition = self.lock_cursor().advance_from(position);

        match transition {
            Some(Transition::NextRound(round)) => {
                self.store.set_current_round(round)?;
                info!("Round {} begins", round.display_name());
                progress.on_round_start(round, self.panel_size);
            }
            Some(Transition::Completed) => {
                self.store.mark_complete()?;
                let statements = self.store.with_debate(|d| d.ledger().complete_count())?;
                info!("Debate {} complete ({} statements)", debate_id, statements);
                self.conversation_logger
                    .log(ConversationEvent::debate_completed(debate_id, statements));
                progress.on_debate_complete();
            }
            Some(Transition::NextParticipant { .. }) | None => {}
        }

        Ok(transition)
    }

    fn delay_after(&self, transition: Option<Transition>) -> Duration {
        match transition {
            Some(Transition::NextParticipant { .. }) => self.params.participant_delay,
            Some(Transition::NextRound(_)) => self.params.round_delay,
            Some(Transition::Completed) => self.params.settle_delay,
            None => Duration::ZERO,
        }
    }

    /// Returns `true` if cancelled while waiting.
    async fn pause(&self, delay: Duration, cancel: &CancellationToken) -> bool {
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return cancel.is_cancelled();
        }
        tokio::select! {
            _ = cancel.cancelled() => true,
            _ = tokio::time::sleep(delay) => false,
        }
    }
}

fn build_request(debate: &Debate, expert: &Expert, round: Round) -> GenerationRequest {
    let prior_statements = debate
        .round_transcript(round)
        .into_iter()
        .filter(|(speaker, _)| speaker.id != expert.id)
        .map(|(speaker, content)| (speaker.name.clone(), content.to_string()))
        .collect();

    GenerationRequest {
        expert: expert.clone(),
        topic: debate.topic().clone(),
        round,
        prior_statements,
        other_experts: debate.panel().others(&expert.id),
    }
}
