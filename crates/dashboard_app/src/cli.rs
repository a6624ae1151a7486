use std::path::PathBuf;

use clap::Parser;
use dashboard_core::Domain;

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    version,
    about = "Browse CI results by facet from the terminal"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "dashboard.ron")]
    pub(crate) config: PathBuf,
    /// jobs, platform, registry, telco, load-test or lab-run.
    #[arg(long, default_value = "jobs")]
    pub(crate) domain: Domain,
    /// Initial location, e.g. `platform=aws&start_date=2024-01-01`.
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Log to ./dashboard.log as well as the terminal.
    #[arg(long)]
    pub(crate) log_to_file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_jobs_and_local_config() {
        let args = Args::parse_from(["dashboard"]);
        assert_eq!(args.domain, Domain::Jobs);
        assert_eq!(args.config, PathBuf::from("dashboard.ron"));
        assert_eq!(args.query, None);
        assert!(!args.log_to_file);
    }

    #[test]
    fn domain_names_parse_case_insensitively() {
        let args = Args::parse_from(["dashboard", "--domain", "Lab-Run", "--query", "a=b"]);
        assert_eq!(args.domain, Domain::LabRun);
        assert_eq!(args.query.as_deref(), Some("a=b"));
    }

    #[test]
    fn unknown_domain_is_rejected() {
        assert!(Args::try_parse_from(["dashboard", "--domain", "nope"]).is_err());
    }
}
