//! Command-line surface of the resume match client

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "resume-match")]
#[command(about = "Submit a resume and job description to the resume analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a resume against a job description
    Analyze {
        /// Resume file (PDF, DOCX or DOC, at most 10 MB)
        resume: PathBuf,

        /// File holding the job description, or `-` to read it from stdin
        job_description: String,
    },

    /// Check whether a resume file would be accepted for upload
    Check {
        /// Resume file to check
        resume: PathBuf,
    },

    /// Show the resolved mode, endpoint and settings file
    Config,

    /// Persist the API host used in development mode
    SetApiUrl {
        /// Base URL, e.g. http://localhost:8000
        url: String,
    },

    /// Persist the application origin used in production mode
    SetOrigin {
        /// Origin URL, e.g. https://resume.example.com
        url: String,
    },
}
