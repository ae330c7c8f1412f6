/*
[INPUT]:  Non-interactive CLI invocations
[OUTPUT]: Headless run entry point
[POS]:    CLI module for nexus-console binary
[UPDATE]: When adding non-interactive commands
*/

mod headless;

pub use headless::run_headless;
