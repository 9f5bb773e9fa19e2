mod common;
mod lock_tests;
mod pull_tests;
mod push_tests;
