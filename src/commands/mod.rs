//! Subcommand implementations for proc-check-exporter.


pub use test::command_test;
