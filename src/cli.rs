use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use medconsole::path::FieldPath;
use medconsole::resource::Resource;

/// Command-line front end for the medical content console
#[derive(Parser)]
#[command(name = "medconsole")]
#[command(about = "Browse and edit medical content through the admin API", long_about = None)]
pub struct Cli {
    /// Config file to read instead of the per-user config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the table for a resource
    List {
        /// articles, conditions, diseases, well-being, doctors or categories
        resource: Resource,
    },
    /// Print one record in full
    Show { resource: Resource, id: String },
    /// Create a record from the blank template
    Create {
        resource: Resource,
        #[command(flatten)]
        edits: Edits,
    },
    /// Change fields of an existing record
    Edit {
        resource: Resource,
        id: String,
        #[command(flatten)]
        edits: Edits,
    },
    /// Delete a record
    Delete {
        resource: Resource,
        id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Record counts per resource
    Stats,
}

#[derive(Args, Debug, Default)]
pub struct Edits {
    /// Set a field, e.g. `--set seo.metaTitle=Asthma` or `--set isPublished=false`
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Add an item to a list field, e.g. `--push tags=respiratory`
    #[arg(long = "push", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub push: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: FieldPath,
    pub raw: String,
}

impl Assignment {
    /// JSON if the text parses as JSON, otherwise the text as a string.
    pub fn value(&self) -> Value {
        serde_json::from_str(&self.raw).unwrap_or_else(|_| Value::String(self.raw.clone()))
    }
}

fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (path, raw) = s.split_once('=').ok_or_else(|| format!("expected PATH=VALUE, got {s:?}"))?;
    let path = FieldPath::parse(path.trim()).map_err(|e| e.to_string())?;
    Ok(Assignment { path, raw: raw.to_string() })
}
