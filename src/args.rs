use clap::Parser;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// This is a service to load Qualtrics survey exports and annotate their questions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (default 127.0.0.1) The address the HTTP service listens on.
    #[clap(long, value_parser, default_value = "127.0.0.1")]
    pub host: String,

    /// (default 5000) The port the HTTP service listens on.
    #[clap(short, long, value_parser, default_value_t = 5000)]
    pub port: u16,

    /// (file path, optional) A CSV export to load at startup, before any upload.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path or 'stdout') If specified, the questions read from --input are written in JSON format
    /// to the given location and the program exits without starting the service.
    #[clap(short, long, value_parser, requires = "input")]
    pub out: Option<String>,

    /// If passed as an argument, rows that do not have as many cells as the header are rejected instead
    /// of being silently tolerated.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    /// The maximum size of an uploaded file, in bytes.
    #[clap(long, value_parser, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
