//! Start Debate use case
//!
//! Assembles the panel and installs a fresh debate in the store. Panel
//! failures surface here, before any debate exists.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::panel_source::{PanelError, PanelOptions, PanelSource};
use crate::store::DebateStore;
use debate_domain::{Debate, DebateId, DomainError, Panel, Topic};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum StartDebateError {
    #[error("Could not assemble a panel: {0}")]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case for starting a new debate
pub struct StartDebateUseCase<P: PanelSource + ?Sized> {
    panel_source: Arc<P>,
    store: DebateStore,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<P: PanelSource + ?Sized> StartDebateUseCase<P> {
    pub fn new(panel_source: Arc<P>, store: DebateStore) -> Self {
        Self {
            panel_source,
            store,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Set a conversation logger for structured transcript logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Build the panel for `topic` and make the new debate current.
    pub async fn execute(
        &self,
        topic: Topic,
        options: &PanelOptions,
    ) -> Result<DebateId, StartDebateError> {
        let experts = self.panel_source.assemble(&topic, options).await?;
        if experts.is_empty() {
            return Err(PanelError::Empty.into());
        }
        let panel = Panel::new(experts)?;

        let debate = Debate::new(topic, panel);
        let id = debate.id().clone();
        info!(
            "Starting debate {} on \"{}\" with {} experts",
            id,
            debate.topic().title,
            debate.panel().len()
        );
        self.conversation_logger
            .log(ConversationEvent::debate_started(&debate));
        self.store.set_current(debate);
        Ok(id)
    }
}
