//! Command-line argument definitions for the padforge CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the footprint scripts to evaluate, where
//! the JSON records go, the configuration file and logging verbosity.

use clap::Parser;

/// Command-line arguments for the padforge footprint generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Footprint scripts to evaluate
    #[arg(required = true, help = "Paths to the footprint scripts (.fps)")]
    pub inputs: Vec<String>,

    /// Path to the output JSON file; stdout when absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pretty-print the JSON output, overriding the configuration file
    #[arg(long)]
    pub pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_inputs_and_flags() {
        let args = Args::parse_from([
            "padforge",
            "-o",
            "out.json",
            "--pretty",
            "a.fps",
            "b.fps",
        ]);
        assert_eq!(args.inputs, ["a.fps", "b.fps"]);
        assert_eq!(args.output.as_deref(), Some("out.json"));
        assert!(args.pretty);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["padforge"]).is_err());
    }
}
