use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};

use super::components::{chat_area, input_bar};
use super::state::ChatSession;

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChatApp {
    session: ChatSession,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: ChatSession,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self::with_channels(session, command_sender, event_receiver)
    }

    fn with_channels(
        session: ChatSession,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self {
            session,
            command_sender,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                NetworkEvent::MessagesFetched(messages) => {
                    self.session.apply_fetch(messages);
                }
                NetworkEvent::MessageSent => self.session.message_sent(),
            }
        }
    }

    fn send_message(&mut self) {
        let Some(content) = self.session.take_outgoing() else {
            return;
        };
        self.send_command(NetworkCommand::SendMessage(content));
    }

    fn send_command(&mut self, command: NetworkCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        let context = self.session.context();
        let title = format!("Help #{} · chatting with {}", context.help_id, context.peer);
        let signed_in = format!("Signed in as {}", context.me);
        let updated = self
            .session
            .last_rendered_at()
            .map(|at| format!("updated {}", at.format("%H:%M:%S")));

        ui.horizontal(|ui| {
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    self.send_command(NetworkCommand::FetchNow);
                }
                if let Some(updated) = updated {
                    ui.label(egui::RichText::new(updated).weak());
                }
            });
        });
        ui.label(egui::RichText::new(signed_in).weak());
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
            self.render_header(ui);
        });

        egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
            ui.add_space(4.0);
            if input_bar::render(ui, &mut self.session.input_text) {
                self.send_message();
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let scroll = self.session.take_scroll_request();
            chat_area::render(ui, &self.session.bubbles, scroll);
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
