//! The narrow chat-platform seam the poll engine talks through.
//!
//! The engine needs exactly four operations: post a poll, post a plain
//! notice, end a poll, and fetch exact per-answer vote counts. Confining
//! them to one trait keeps serenity types out of the orchestration code and
//! lets tests drive the engine with an in-memory double.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{ChannelId, MessageId, UserId};
use serenity::async_trait;
use serenity::builder::{CreateMessage, CreatePoll, CreatePollAnswer};
use serenity::http::Http;

use crate::error::AppError;

/// Voter pages are fetched at this size; a short page ends pagination.
const VOTER_PAGE_SIZE: u8 = 100;

#[async_trait]
pub trait PollPlatform: Send + Sync {
    /// Posts a poll and returns the new message's ID. Discord accepts poll
    /// durations at hour granularity only.
    async fn send_poll(
        &self,
        channel_id: u64,
        question: &str,
        answers: &[String],
        duration_hours: u8,
    ) -> Result<u64, AppError>;

    /// Posts a plain text message to the channel.
    async fn send_notice(&self, channel_id: u64, text: &str) -> Result<(), AppError>;

    /// Ends the poll on a message. Callers treat failure as non-fatal since
    /// expired polls end on their own.
    async fn end_poll(&self, channel_id: u64, message_id: u64) -> Result<(), AppError>;

    /// Exact vote counts per answer, in answer order.
    async fn fetch_poll_counts(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Vec<u64>, AppError>;
}

/// [`PollPlatform`] backed by the Discord REST API.
pub struct DiscordPlatform {
    http: Arc<Http>,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PollPlatform for DiscordPlatform {
    async fn send_poll(
        &self,
        channel_id: u64,
        question: &str,
        answers: &[String],
        duration_hours: u8,
    ) -> Result<u64, AppError> {
        let answers: Vec<CreatePollAnswer> = answers
            .iter()
            .map(|text| CreatePollAnswer::new().text(text))
            .collect();
        let poll = CreatePoll::new()
            .question(question)
            .answers(answers)
            .duration(Duration::from_secs(u64::from(duration_hours) * 3600));

        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().poll(poll))
            .await?;

        Ok(message.id.get())
    }

    async fn send_notice(&self, channel_id: u64, text: &str) -> Result<(), AppError> {
        ChannelId::new(channel_id).say(&self.http, text).await?;
        Ok(())
    }

    async fn end_poll(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
        self.http
            .expire_poll(ChannelId::new(channel_id), MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn fetch_poll_counts(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Vec<u64>, AppError> {
        let channel_id = ChannelId::new(channel_id);
        let message_id = MessageId::new(message_id);

        let message = self.http.get_message(channel_id, message_id).await?;
        let poll = message
            .poll
            .ok_or_else(|| AppError::InternalError(format!("message {} has no poll", message_id)))?;

        let mut counts = Vec::with_capacity(poll.answers.len());
        for answer in &poll.answers {
            // Answer counts in the message payload are approximate while a
            // poll is open; paginating the voter list gives exact numbers.
            let mut count: u64 = 0;
            let mut after: Option<UserId> = None;
            loop {
                let voters = self
                    .http
                    .get_poll_answer_voters(
                        channel_id,
                        message_id,
                        answer.answer_id,
                        after,
                        Some(VOTER_PAGE_SIZE),
                    )
                    .await?;
                count += voters.len() as u64;
                if voters.len() < usize::from(VOTER_PAGE_SIZE) {
                    break;
                }
                after = voters.last().map(|user| user.id);
            }
            counts.push(count);
        }

        Ok(counts)
    }
}
