pub mod report_writer;

pub use report_writer::{DetectionReport, FailedStation, OutputFormat, ReportWriter};
