//! [`burger_core::Responder`] for one serenity command interaction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use burger_core::{BurgerError, Responder, Result};
use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, Http,
};

/// Answers one interaction and remembers whether it already replied or deferred.
pub struct DiscordResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl DiscordResponder {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            replied: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for DiscordResponder {
    async fn reply(&self, content: &str) -> Result<()> {
        let message = CreateInteractionResponseMessage::new().content(content);
        self.interaction
            .create_response(&*self.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(|e| BurgerError::Platform(e.to_string()))?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self) -> Result<()> {
        self.interaction
            .defer(&*self.http)
            .await
            .map_err(|e| BurgerError::Platform(e.to_string()))?;
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_reply(&self, content: &str) -> Result<()> {
        self.interaction
            .edit_response(&*self.http, EditInteractionResponse::new().content(content))
            .await
            .map_err(|e| BurgerError::Platform(e.to_string()))?;
        Ok(())
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }
}
