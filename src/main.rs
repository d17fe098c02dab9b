use clap::Parser;
use log::{debug, error, info, LevelFilter};

use question_store::{ParseOptions, QuestionStore};

mod args;
mod service;

use crate::args::Args;
use crate::service::*;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run(args: &Args) -> ServiceResult<()> {
    let options = ParseOptions {
        strict: args.strict,
    };

    let store = match &args.input {
        Some(path) => load_questions(path, &options)?,
        None => QuestionStore::new(),
    };
    info!("Loaded {} questions at startup", store.len());

    if let Some(out) = &args.out {
        return write_questions(&store, out);
    }

    let state = AppState::new(store, options, args.max_upload_bytes);
    actix_web::rt::System::new().block_on(serve(state, &args.host, args.port))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
