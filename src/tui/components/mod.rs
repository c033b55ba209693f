// Individual TUI panels

pub mod logs_panel;
pub mod readout_panel;
pub mod status_panel;
pub mod title_bar;
