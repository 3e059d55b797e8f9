pub mod chart;
pub mod indicators;
pub mod portfolio;
pub mod price;
pub mod report;
pub mod settings;
