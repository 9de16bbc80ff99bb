pub mod config;
pub mod downloader;
pub mod issuer;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, Config, ConfigError,
    DestinationConfig, ResolverConfig, SanitizedConfig,
};
pub use downloader::{DownloadConfig, DownloadError, Downloader, HttpDownloader};
pub use issuer::{
    CertificateIssuer, CertificateRecord, InfosimplesClient, IssueResponse, IssuerError, Strategy,
};
pub use orchestrator::{
    FailureRecord, RetrievalConfig, RetrievalOrchestrator, RetrievalTask, SuccessRecord,
    TaskOutcome, TaskState,
};
pub use report::{OutcomeAggregator, ReportRow, RunReport};
pub use resolver::{ControlFileResolver, ResolverError};
