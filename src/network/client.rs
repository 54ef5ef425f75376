use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::common::{ConversationContext, NetworkCommand, NetworkEvent};

use super::api::ChatApi;

/// Background side of the chat window: runs the poll timer and executes
/// the commands the UI sends down.
pub struct ChatClient {
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    api: Arc<ChatApi>,
    context: Arc<ConversationContext>,
    poll_interval: Duration,
}

impl ChatClient {
    pub fn new(
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        api: ChatApi,
        context: ConversationContext,
        poll_interval: Duration,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            api: Arc::new(api),
            context: Arc::new(context),
            poll_interval,
        }
    }

    /// Runs until the UI drops its command sender.
    ///
    /// The first tick fires immediately and serves as the initial load.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Polling help session {} every {:?}",
            self.context.help_id,
            self.poll_interval
        );

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                _ = ticker.tick() => {
                    self.spawn_fetch();
                }
            }
        }

        log::info!("Command channel closed; network loop stopped");
    }

    fn handle_command(&self, command: NetworkCommand) {
        match command {
            NetworkCommand::SendMessage(content) => {
                self.spawn_send(content);
            }
            NetworkCommand::FetchNow => {
                self.spawn_fetch();
            }
        }
    }

    // Requests run detached so a hung one never holds up the next tick.
    fn spawn_fetch(&self) {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let events = self.event_sender.clone();
        tokio::spawn(async move { fetch_and_forward(&api, &context, &events).await });
    }

    fn spawn_send(&self, content: String) {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let events = self.event_sender.clone();
        tokio::spawn(async move { send_and_refresh(&api, &context, &events, content).await });
    }
}

async fn fetch_and_forward(
    api: &ChatApi,
    context: &ConversationContext,
    events: &mpsc::Sender<NetworkEvent>,
) {
    match api.fetch_messages(context).await {
        Ok(Some(messages)) => {
            log::debug!("Fetched {} messages", messages.len());
            if events
                .send(NetworkEvent::MessagesFetched(messages))
                .await
                .is_err()
            {
                log::debug!("UI gone; dropping fetched messages");
            }
        }
        Ok(None) => {}
        Err(err) => log::error!("Failed to fetch messages: {err}"),
    }
}

async fn send_and_refresh(
    api: &ChatApi,
    context: &ConversationContext,
    events: &mpsc::Sender<NetworkEvent>,
    content: String,
) {
    let outcome = match api.send_message(context, &content).await {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Failed to send message: {err}");
            return;
        }
    };

    if let Some(reason) = outcome.rejection() {
        log::warn!("Server did not accept message: {reason}");
    }

    if events.send(NetworkEvent::MessageSent).await.is_err() {
        log::debug!("UI gone; skipping refresh after send");
        return;
    }

    fetch_and_forward(api, context, events).await;
}
