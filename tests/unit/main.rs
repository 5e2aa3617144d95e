//! Unit test modules.

mod config_test;
mod effort_law_test;
mod equipment_test;
mod load_velocity_test;
mod rep_quality_test;
