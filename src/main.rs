use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use pix_brcode::services;
use pix_brcode::settings::Settings;

#[derive(Parser)]
#[command(name = "pix-brcode", about = "Static Pix BR Code charge server")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

fn init_logging() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .expect("Could not build logging config.");

    log4rs::init_config(config).expect("Could not initialize logging.");
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging();

    let settings = Settings::new(&args.config).expect("Could not load config file.");

    println!("[*] Starting services.");
    services::start_services(settings)
        .await
        .expect("Could not start services.");
}
