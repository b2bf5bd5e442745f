use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutletKind {
    #[clap(name = "dry-run")]
    DryRun,
    Http,
}

impl fmt::Display for OutletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => write!(f, "dry-run"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl FromStr for OutletKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dry-run" | "dryrun" => Ok(Self::DryRun),
            "http" => Ok(Self::Http),
            other => Err(anyhow!("unknown outlet kind: {other}")),
        }
    }
}
