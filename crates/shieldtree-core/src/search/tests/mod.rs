mod support;

mod config_tests;
mod shield_tests;
mod update_tests;
