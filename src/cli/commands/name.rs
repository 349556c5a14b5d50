//! `name` command.

use crate::cli::args::NameArgs;
use crate::reporter::Reporter;

/// Prints the namespaced form of the base name.
pub fn run(reporter: &Reporter, args: &NameArgs) {
    println!("{}", reporter.namespaced_name(&args.base));
}
