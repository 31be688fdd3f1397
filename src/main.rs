/// Main entry point for the matching core demo
///
/// This is a thin wrapper; the harness logic lives in the `cli` module.

use matching_core::cli;

fn main() {
    cli::run();
}
