// src/ui/panel.rs
//! Control panel
//!
//! Builds one slider per entry in [`CONTROL_BINDINGS`], so widgets and ranges
//! can never drift apart. The panel only mutates `Controls`; the render loop
//! copies the values into the scene on its next tick.

use super::controls::{Controls, CONTROL_BINDINGS};

pub fn controls_panel(ui: &imgui::Ui, controls: &mut Controls) {
    ui.window("Controls")
        .size([320.0, 430.0], imgui::Condition::FirstUseEver)
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let (camera, rest) = CONTROL_BINDINGS.split_at(3);
            let (arms, body) = rest.split_at(4);

            for (title, bindings) in [("Camera", camera), ("Arms", arms), ("Body", body)] {
                ui.text(title);
                for binding in bindings {
                    if let Some(value) = controls.field_mut(binding.name) {
                        ui.slider(binding.name, binding.min, binding.max, value);
                    }
                }
                ui.separator();
            }
        });
}
