pub mod cards;
pub mod chart;
pub mod header;
pub mod statusbar;
