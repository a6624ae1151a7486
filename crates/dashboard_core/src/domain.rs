use std::fmt;
use std::str::FromStr;

/// The independent result domains the dashboard can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Jobs,
    Platform,
    Registry,
    Telco,
    LoadTest,
    LabRun,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Jobs,
        Domain::Platform,
        Domain::Registry,
        Domain::Telco,
        Domain::LoadTest,
        Domain::LabRun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Jobs => "jobs",
            Domain::Platform => "platform",
            Domain::Registry => "registry",
            Domain::Telco => "telco",
            Domain::LoadTest => "load-test",
            Domain::LabRun => "lab-run",
        }
    }

    pub fn config(self) -> DomainConfig {
        match self {
            Domain::Jobs => DomainConfig::jobs(),
            Domain::Platform => DomainConfig::platform(),
            Domain::Registry => DomainConfig::registry(),
            Domain::Telco => DomainConfig::telco(),
            Domain::LoadTest => DomainConfig::load_test(),
            Domain::LabRun => DomainConfig::lab_run(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown domain {0:?}")]
pub struct UnknownDomain(pub String);

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// How values in a column compare when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    Number,
    Date,
    #[default]
    Text,
    /// Compare the human-readable status label rather than the raw value.
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(key: &str, label: &str, kind: ColumnKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// Where applied filters are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// The full dataset for the date range is held and filtered locally.
    InMemory,
    /// Filters are sent to the backend and the returned dataset is the view.
    Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    /// The whole date range is fetched at once and paged locally.
    Client,
    /// Results are fetched in batches as the page window advances.
    ServerIncremental,
}

/// Everything that distinguishes one result domain from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub domain: Domain,
    pub endpoint: String,
    pub graph_endpoint: String,
    /// Filterable categories, in display order. Always includes `status_field`.
    pub categories: Vec<String>,
    pub status_field: String,
    /// Field identifying an item for secondary (graph) fetches.
    pub id_field: String,
    /// Fields holding a result's start and end timestamps; the date columns
    /// read them.
    pub start_date_field: String,
    pub end_date_field: String,
    pub columns: Vec<ColumnSpec>,
    pub filter_mode: FilterMode,
    pub paging: PagingMode,
    pub default_per_page: usize,
}

impl DomainConfig {
    #[allow(clippy::too_many_arguments)]
    fn preset(
        domain: Domain,
        endpoint: &str,
        graph_endpoint: &str,
        categories: &[&str],
        status_field: &str,
        columns: Vec<ColumnSpec>,
        filter_mode: FilterMode,
        paging: PagingMode,
    ) -> Self {
        let mut categories: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
        if !categories.iter().any(|c| c == status_field) {
            categories.push(status_field.to_string());
        }
        Self {
            domain,
            endpoint: endpoint.to_string(),
            graph_endpoint: graph_endpoint.to_string(),
            categories,
            status_field: status_field.to_string(),
            id_field: "uuid".to_string(),
            start_date_field: "startDate".to_string(),
            end_date_field: "endDate".to_string(),
            columns,
            filter_mode,
            paging,
            default_per_page: 25,
        }
    }

    pub fn jobs() -> Self {
        Self::preset(
            Domain::Jobs,
            "api/v1/cpt/jobs",
            "api/v1/cpt/graph",
            &["product", "ciSystem", "testName", "releaseStream", "jobStatus"],
            "jobStatus",
            vec![
                ColumnSpec::new("product", "Product", ColumnKind::Text),
                ColumnSpec::new("ciSystem", "CI System", ColumnKind::Text),
                ColumnSpec::new("testName", "Test Name", ColumnKind::Text),
                ColumnSpec::new("version", "Version", ColumnKind::Text),
                ColumnSpec::new("releaseStream", "Release Stream", ColumnKind::Text),
                ColumnSpec::new("jobStatus", "Status", ColumnKind::Status),
            ],
            FilterMode::Backend,
            PagingMode::Client,
        )
        .with_date_columns()
    }

    pub fn platform() -> Self {
        Self::preset(
            Domain::Platform,
            "api/v1/ocp/jobs",
            "api/v1/ocp/graph",
            &[
                "platform",
                "benchmark",
                "releaseStream",
                "workerNodesCount",
                "networkType",
                "ciSystem",
                "jobType",
                "isRehearse",
                "fips",
                "encrypted",
                "computeArch",
                "jobStatus",
            ],
            "jobStatus",
            vec![
                ColumnSpec::new("benchmark", "Benchmark", ColumnKind::Text),
                ColumnSpec::new("releaseStream", "Release Stream", ColumnKind::Text),
                ColumnSpec::new("build", "Build", ColumnKind::Text),
                ColumnSpec::new("workerNodesCount", "Worker Count", ColumnKind::Number),
                ColumnSpec::new("jobStatus", "Status", ColumnKind::Status),
            ],
            FilterMode::Backend,
            PagingMode::Client,
        )
        .with_date_columns()
    }

    pub fn registry() -> Self {
        Self::preset(
            Domain::Registry,
            "api/v1/quay/jobs",
            "api/v1/quay/graph",
            &[
                "platform",
                "benchmark",
                "releaseStream",
                "workerNodesCount",
                "hitSize",
                "concurrency",
                "imagePushPulls",
                "jobStatus",
            ],
            "jobStatus",
            vec![
                ColumnSpec::new("benchmark", "Benchmark", ColumnKind::Text),
                ColumnSpec::new("releaseStream", "Release Stream", ColumnKind::Text),
                ColumnSpec::new("platform", "Platform", ColumnKind::Text),
                ColumnSpec::new("workerNodesCount", "Worker Count", ColumnKind::Number),
                ColumnSpec::new("jobStatus", "Status", ColumnKind::Status),
            ],
            FilterMode::Backend,
            PagingMode::Client,
        )
        .with_date_columns()
    }

    pub fn telco() -> Self {
        Self::preset(
            Domain::Telco,
            "api/v1/telco/jobs",
            "api/v1/telco/graph",
            &[
                "benchmark",
                "cpu",
                "nodeName",
                "ocpVersion",
                "releaseStream",
                "jobStatus",
            ],
            "jobStatus",
            vec![
                ColumnSpec::new("benchmark", "Benchmark", ColumnKind::Text),
                ColumnSpec::new("releaseStream", "Release Stream", ColumnKind::Text),
                ColumnSpec::new("ocpVersion", "Build", ColumnKind::Text),
                ColumnSpec::new("cpu", "CPU", ColumnKind::Text),
                ColumnSpec::new("nodeName", "Node Name", ColumnKind::Text),
                ColumnSpec::new("jobStatus", "Status", ColumnKind::Status),
            ],
            FilterMode::InMemory,
            PagingMode::Client,
        )
        .with_date_columns()
    }

    pub fn load_test() -> Self {
        Self::preset(
            Domain::LoadTest,
            "api/v1/ocm/jobs",
            "api/v1/ocm/graph",
            &["ciSystem", "testName", "version", "buildUrl", "jobStatus"],
            "jobStatus",
            vec![
                ColumnSpec::new("ciSystem", "CI System", ColumnKind::Text),
                ColumnSpec::new("testName", "Test Name", ColumnKind::Text),
                ColumnSpec::new("version", "Version", ColumnKind::Text),
                ColumnSpec::new("duration", "Duration", ColumnKind::Number),
                ColumnSpec::new("jobStatus", "Status", ColumnKind::Status),
            ],
            FilterMode::InMemory,
            PagingMode::Client,
        )
        .with_date_columns()
    }

    pub fn lab_run() -> Self {
        let mut config = Self::preset(
            Domain::LabRun,
            "api/v1/ilab/runs",
            "api/v1/ilab/runs/graph",
            &["benchmark", "model", "gpu", "status"],
            "status",
            vec![
                ColumnSpec::new("benchmark", "Benchmark", ColumnKind::Text),
                ColumnSpec::new("model", "Model", ColumnKind::Text),
                ColumnSpec::new("gpu", "GPU", ColumnKind::Text),
                ColumnSpec::new("iterations", "Iterations", ColumnKind::Number),
                ColumnSpec::new("status", "Status", ColumnKind::Status),
            ],
            FilterMode::Backend,
            PagingMode::ServerIncremental,
        );
        config.id_field = "id".to_string();
        config.start_date_field = "begin_date".to_string();
        config.end_date_field = "end_date".to_string();
        config.default_per_page = 10;
        config.with_date_columns()
    }

    /// Inserts the start and end date columns, read from the configured date
    /// fields, ahead of the status column.
    fn with_date_columns(mut self) -> Self {
        let at = self
            .columns
            .iter()
            .position(|column| column.key == self.status_field)
            .unwrap_or(self.columns.len());
        let dates = [
            ColumnSpec::new(&self.start_date_field, "Start Date", ColumnKind::Date),
            ColumnSpec::new(&self.end_date_field, "End Date", ColumnKind::Date),
        ];
        self.columns.splice(at..at, dates);
        self
    }

    /// Declared kind of a column; undeclared columns compare as text.
    pub fn column_kind(&self, key: &str) -> ColumnKind {
        self.columns
            .iter()
            .find(|column| column.key == key)
            .map(|column| column.kind)
            .unwrap_or_default()
    }
}
