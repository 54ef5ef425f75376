use eframe::egui;

/// Draws the input row. Returns true when the user asked to send.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let button_width = 60.0;
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .hint_text("Type a message")
                .desired_width(ui.available_width() - button_width),
        );
        let clicked = ui.button("Send").clicked();
        let enter = submitted_with_enter(
            response.lost_focus(),
            ui.input(|i| i.key_pressed(egui::Key::Enter)),
        );

        if enter {
            response.request_focus();
        }
        send = clicked || enter;
    });

    send
}

/// A single-line edit gives up focus when Enter is pressed, so Enter only
/// counts as a submit on the frame focus is lost.
fn submitted_with_enter(lost_focus: bool, enter_pressed: bool) -> bool {
    lost_focus && enter_pressed
}
