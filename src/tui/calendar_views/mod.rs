pub mod day_panel;
pub mod month;
pub mod sidebar;
