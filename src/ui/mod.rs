//! User interface: imgui integration, the control state, and the slider panel.

pub mod controls;
pub mod manager;
pub mod panel;

pub use controls::{ControlBinding, Controls, CONTROL_BINDINGS};
pub use manager::UiManager;
pub use panel::controls_panel;
