//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::Client;
use crate::config::{validate_date, ClientConfig};
use crate::druid::druid;
use crate::error::Result;
use crate::metadata::Section;
use crate::oai::{Header, Record};
use crate::options::HarvestOptions;

/// DOR Harvester - Harvest object metadata from the Stanford Digital Object Repository.
#[derive(Parser)]
#[command(name = "dor-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List druids of harvested objects.
    Ids(HarvestFilter),

    /// List OAI headers (identifier, datestamp, sets).
    Headers(HarvestFilter),

    /// Print the metadata of harvested records.
    Records(HarvestFilter),

    /// Fetch a single record with GetRecord.
    Record {
        /// Druid (e.g., bb375wb8869)
        druid: String,

        /// Metadata prefix (default: from configuration)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Print the public XML of an object.
    PublicXml {
        /// Druid (e.g., bb375wb8869)
        druid: String,
    },

    /// Print one metadata section of the public XML.
    Metadata {
        /// Druid (e.g., bb375wb8869)
        druid: String,

        /// Section to extract
        #[arg(value_enum)]
        section: Section,
    },

    /// Print the MODS record of an object.
    Mods {
        /// Druid (e.g., bb375wb8869)
        druid: String,
    },
}

/// Listing filters shared by the harvest commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestFilter {
    /// Metadata prefix (default: from configuration)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Harvest changes since this date (YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ)
    #[arg(long, conflicts_with = "no_from")]
    pub from: Option<String>,

    /// Harvest changes up to this date
    #[arg(long, conflicts_with = "no_until")]
    pub until: Option<String>,

    /// OAI set to harvest
    #[arg(short, long, conflicts_with = "no_set")]
    pub set: Option<String>,

    /// Ignore the configured from date
    #[arg(long)]
    pub no_from: bool,

    /// Ignore the configured until date
    #[arg(long)]
    pub no_until: bool,

    /// Ignore the configured set
    #[arg(long)]
    pub no_set: bool,

    /// Stop after this many entries
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl HarvestFilter {
    /// Validate the dates given on the command line.
    pub fn validate(&self) -> Result<()> {
        for date in [&self.from, &self.until].into_iter().flatten() {
            validate_date(date)?;
        }
        Ok(())
    }

    /// Harvest options for these filters.
    #[must_use]
    pub fn options(&self) -> HarvestOptions {
        let mut options = HarvestOptions::new();
        if let Some(prefix) = &self.prefix {
            options = options.metadata_prefix(prefix);
        }
        options = match (&self.from, self.no_from) {
            (_, true) => options.without_from(),
            (Some(from), false) => options.from_date(from),
            (None, false) => options,
        };
        options = match (&self.until, self.no_until) {
            (_, true) => options.without_until(),
            (Some(until), false) => options.until_date(until),
            (None, false) => options,
        };
        match (&self.set, self.no_set) {
            (_, true) => options.without_set(),
            (Some(set), false) => options.set(set),
            (None, false) => options,
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Validate inputs before making HTTP requests
    if let Commands::Ids(filter) | Commands::Headers(filter) | Commands::Records(filter) =
        &cli.command
    {
        filter.validate()?;
    }

    let client = Client::new(load_config(cli.config.as_deref())?)?;

    match cli.command {
        Commands::Ids(filter) => harvest_command(
            client.harvest_ids(&filter.options()),
            filter.limit,
            "ids",
            String::clone,
        ),
        Commands::Headers(filter) => harvest_command(
            client.harvest_headers(&filter.options()),
            filter.limit,
            "headers",
            render_header,
        ),
        Commands::Records(filter) => harvest_command(
            client.harvest_records(&filter.options()),
            filter.limit,
            "records",
            render_record,
        ),
        Commands::Record { druid, prefix } => {
            let record = client.oai_record(&druid, prefix.as_deref())?;
            println!("{}", render_record(&record));
            Ok(())
        }
        Commands::PublicXml { druid } => {
            println!("{}", client.public_xml(&druid)?);
            Ok(())
        }
        Commands::Metadata { druid, section } => {
            println!("{}", client.metadata(&druid, section)?);
            Ok(())
        }
        Commands::Mods { druid } => {
            println!("{}", client.mods(&druid)?);
            Ok(())
        }
    }
}

/// Defaults, then the YAML file, then `DOR_HARVESTER_*` variables.
fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Print every harvested entry, one per line, with a spinner on stderr.
fn harvest_command<E>(
    entries: impl Iterator<Item = Result<E>>,
    limit: Option<usize>,
    noun: &str,
    render: impl Fn(&E) -> String,
) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Harvesting {noun}..."));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut count = 0usize;
    for entry in entries.take(limit.unwrap_or(usize::MAX)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        count += 1;
        pb.suspend(|| println!("{}", render(&entry)));
        pb.set_message(format!("Harvested {count} {noun}..."));
    }

    pb.finish_and_clear();
    eprintln!(
        "{} {} {noun}",
        style("Harvested").green().bold(),
        style(count).cyan()
    );
    Ok(())
}

/// `identifier<TAB>datestamp<TAB>set,set[<TAB>deleted]`
fn render_header(header: &Header) -> String {
    let mut line = format!(
        "{}\t{}\t{}",
        header.identifier,
        header.datestamp,
        header.set_specs.join(",")
    );
    if header.deleted {
        line.push_str("\tdeleted");
    }
    line
}

fn render_record(record: &Record) -> String {
    match &record.metadata {
        Some(metadata) => metadata.to_string(),
        None => format!("{} (no metadata)", druid(record)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oai::HarvestArguments;
    use crate::options::normalize;

    #[test]
    fn test_cli_parse_ids() {
        let cli = Cli::parse_from(["dor-harvester", "ids"]);
        let Commands::Ids(filter) = cli.command else {
            panic!("expected ids command");
        };
        assert_eq!(filter, HarvestFilter::default());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_headers_with_filters() {
        let cli = Cli::parse_from([
            "dor-harvester",
            "headers",
            "--from",
            "2012-11-29",
            "--set",
            "is_member_of_collection_ab123cd4567",
            "--no-until",
            "--limit",
            "5",
            "--config",
            "harvester.yml",
        ]);

        let Commands::Headers(filter) = cli.command else {
            panic!("expected headers command");
        };
        assert_eq!(filter.from.as_deref(), Some("2012-11-29"));
        assert_eq!(filter.set.as_deref(), Some("is_member_of_collection_ab123cd4567"));
        assert!(filter.no_until);
        assert_eq!(filter.limit, Some(5));
        assert_eq!(cli.config, Some(PathBuf::from("harvester.yml")));
    }

    #[test]
    fn test_cli_from_conflicts_with_no_from() {
        let result = Cli::try_parse_from([
            "dor-harvester",
            "ids",
            "--from",
            "2012-11-29",
            "--no-from",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_metadata_section() {
        let cli = Cli::parse_from(["dor-harvester", "metadata", "bb375wb8869", "content-metadata"]);
        let Commands::Metadata { druid, section } = cli.command else {
            panic!("expected metadata command");
        };
        assert_eq!(druid, "bb375wb8869");
        assert_eq!(section, Section::ContentMetadata);

        let cli = Cli::parse_from(["dor-harvester", "metadata", "bb375wb8869", "rdf"]);
        assert!(matches!(cli.command, Commands::Metadata { section: Section::Rdf, .. }));
    }

    #[test]
    fn test_cli_parse_record_with_prefix() {
        let cli = Cli::parse_from(["dor-harvester", "record", "bb375wb8869", "--prefix", "oai_dc"]);
        let Commands::Record { druid, prefix } = cli.command else {
            panic!("expected record command");
        };
        assert_eq!(druid, "bb375wb8869");
        assert_eq!(prefix.as_deref(), Some("oai_dc"));
    }

    #[test]
    fn test_filter_options() {
        let defaults = HarvestArguments {
            metadata_prefix: Some("mods".to_string()),
            from: Some("2012-01-01".to_string()),
            until: Some("2014-01-01".to_string()),
            set: Some("default_set".to_string()),
        };
        let filter = HarvestFilter {
            prefix: Some("oai_dc".to_string()),
            from: Some("2013-01-01".to_string()),
            no_until: true,
            no_set: true,
            ..HarvestFilter::default()
        };

        let args = normalize(&filter.options(), &defaults);
        assert_eq!(args.metadata_prefix.as_deref(), Some("oai_dc"));
        assert_eq!(args.from.as_deref(), Some("2013-01-01"));
        assert_eq!(args.until, None);
        assert_eq!(args.set, None);
    }

    #[test]
    fn test_filter_validate() {
        let filter = HarvestFilter {
            from: Some("2012-11-29".to_string()),
            ..HarvestFilter::default()
        };
        assert!(filter.validate().is_ok());

        let filter = HarvestFilter {
            until: Some("11/29/2012".to_string()),
            ..HarvestFilter::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_render_header() {
        let mut header = Header::new("oai:searchworks.stanford.edu/druid:bb375wb8869");
        header.datestamp = "2012-11-29T10:00:00Z".to_string();
        header.set_specs = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            render_header(&header),
            "oai:searchworks.stanford.edu/druid:bb375wb8869\t2012-11-29T10:00:00Z\ta,b"
        );
        header.deleted = true;
        assert!(render_header(&header).ends_with("\tdeleted"));
    }
}
