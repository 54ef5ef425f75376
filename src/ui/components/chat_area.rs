use eframe::egui;

use crate::ui::state::{Bubble, Direction};

const MAX_BUBBLE_WIDTH_RATIO: f32 = 0.75;

fn colors(direction: Direction) -> (egui::Color32, egui::Color32) {
    match direction {
        Direction::Outgoing => (egui::Color32::from_rgb(37, 99, 235), egui::Color32::WHITE),
        Direction::Incoming => (egui::Color32::from_gray(243), egui::Color32::from_gray(30)),
    }
}

pub fn render(ui: &mut egui::Ui, bubbles: &[Bubble], scroll_to_bottom: bool) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if bubbles.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }

            let max_width = ui.available_width() * MAX_BUBBLE_WIDTH_RATIO;
            for bubble in bubbles {
                let layout = match bubble.direction {
                    Direction::Outgoing => egui::Layout::right_to_left(egui::Align::Min),
                    Direction::Incoming => egui::Layout::left_to_right(egui::Align::Min),
                };
                ui.with_layout(layout, |ui| render_bubble(ui, bubble, max_width));
                ui.add_space(4.0);
            }

            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

fn render_bubble(ui: &mut egui::Ui, bubble: &Bubble, max_width: f32) {
    let (fill, text_color) = colors(bubble.direction);

    egui::Frame::new()
        .fill(fill)
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.vertical(|ui| {
                ui.add(egui::Label::new(egui::RichText::new(&bubble.text).color(text_color)).wrap());
                if let Some(timestamp) = &bubble.timestamp {
                    ui.label(
                        egui::RichText::new(timestamp)
                            .small()
                            .color(text_color.gamma_multiply(0.7)),
                    );
                }
            });
        });
}
