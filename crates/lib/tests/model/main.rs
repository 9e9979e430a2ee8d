mod common;
mod configuration_tests;
mod linking_tests;
mod problems_tests;
mod settings_tests;
