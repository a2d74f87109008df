use ipv4_range_tools::cmd::{execute, CommandLine};
use ipv4_range_tools::config::Settings;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

const LOG_CONFIG: &str = "log4rs.yml";

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging();
    let settings = Settings::from_env();
    log::info!("#Start main() {settings:?}");

    let cli = CommandLine::parse_args();
    let output = execute(&cli, &settings)?;

    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    Ok(())
}

/// Use log4rs.yml when present, otherwise log warnings to stderr.
fn init_logging() {
    if Path::new(LOG_CONFIG).exists() {
        if let Err(e) = log4rs::init_file(LOG_CONFIG, Default::default()) {
            eprintln!("Error initializing log4rs from {LOG_CONFIG}: {e}");
        }
        return;
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));

    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Error initializing log4rs: {e}");
            }
        }
        Err(e) => eprintln!("Error building log4rs config: {e}"),
    }
}
