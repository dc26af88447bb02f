use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use lastseen_types::FieldPath;

#[derive(Parser)]
#[command(
    name = "lastseen",
    about = "Inspect what changed on an object since it was last handled",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Tracking annotation prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Extra field to keep in the essence (repeatable), e.g. status.phase
    #[arg(long = "field", global = true)]
    pub fields: Vec<FieldPath>,

    /// TOML file with tracking settings and extra fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the tracking annotation key
    Key,
    /// Print the essence of an object
    Essence(BodyArgs),
    /// Show essential changes since the object was last handled
    Diff(DiffArgs),
    /// Print the patch that records the object as handled
    Refresh(BodyArgs),
    /// Classify the change as create, update, delete, or noop
    Reason(BodyArgs),
}

#[derive(Args)]
pub struct BodyArgs {
    /// JSON file with the object, or `-` for stdin
    pub body: String,
}

#[derive(Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub input: BodyArgs,
    /// Render old and new essences as a line diff
    #[arg(long)]
    pub text: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key() {
        let cli = Cli::try_parse_from(["lastseen", "key"]).unwrap();
        assert!(matches!(cli.command, Command::Key));
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(cli.fields.is_empty());
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["lastseen", "--format", "json", "key"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_repeated_fields() {
        let cli = Cli::try_parse_from([
            "lastseen", "--field", "status.phase", "--field", "metadata.name", "essence", "o.json",
        ])
        .unwrap();
        assert_eq!(
            cli.fields,
            vec![
                FieldPath::parse("status.phase").unwrap(),
                FieldPath::parse("metadata.name").unwrap(),
            ]
        );
    }

    #[test]
    fn parse_invalid_field() {
        assert!(Cli::try_parse_from(["lastseen", "--field", "a..b", "key"]).is_err());
    }

    #[test]
    fn parse_diff_text() {
        let cli = Cli::try_parse_from(["lastseen", "diff", "--text", "o.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert!(args.text);
            assert_eq!(args.input.body, "o.json");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_stdin_body() {
        let cli = Cli::try_parse_from(["lastseen", "refresh", "-"]).unwrap();
        if let Command::Refresh(args) = cli.command {
            assert_eq!(args.body, "-");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lastseen", "reason", "o.json", "--prefix", "ops", "--verbose", "--config", "t.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Reason(_)));
        assert_eq!(cli.prefix.as_deref(), Some("ops"));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
    }

    #[test]
    fn parse_missing_body() {
        assert!(Cli::try_parse_from(["lastseen", "essence"]).is_err());
    }
}
