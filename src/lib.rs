pub mod logging;
pub mod mouse_gestures;
pub mod relay;
pub mod settings;
pub mod tab_actions;
