use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use trivia_quiz::logging::{self, LogLevel};
use trivia_quiz::{DEFAULT_API_URL, OpenTdb, Trivia};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the Open Trivia Database API
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Give up on a question request after this many seconds
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// File that receives the application log
    #[arg(long, default_value = "trivia-quiz.log")]
    log_file: PathBuf,

    /// Minimum level written to the log file
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_file, args.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let timeout = args.request_timeout.map(Duration::from_secs);
    let source = match OpenTdb::new(&args.api_url, timeout) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("using question provider at {}", args.api_url);

    if let Err(e) = Trivia::new(source).run().await {
        log::error!("quiz exited with an error: {}", e);
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
