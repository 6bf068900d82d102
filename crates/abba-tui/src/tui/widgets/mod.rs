// TUI widget modules for each explorer panel.

pub mod params;
pub mod quit_confirm;
pub mod results;
pub mod status_bar;
