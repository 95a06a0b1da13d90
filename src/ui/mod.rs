pub mod app;
pub mod gate;
pub mod home_screen;
pub mod profile_screen;
pub mod quiz_screen;
pub mod settings_screen;
pub mod setup_screen;
pub mod speech;
