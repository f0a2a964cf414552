pub mod labels;
pub mod params;
pub mod table;
pub mod thresholds;
