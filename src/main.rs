use clap::Parser;
use log::{error, info, Level};
use simple_logger::init_with_level;

use otupipe::{
    cli::{Args, SubArgs},
    config::Config,
    core::Pipeline,
};

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    match args.command {
        SubArgs::Run { args } => {
            let config = Config::read(&args.config).unwrap_or_else(|e| {
                error!("could not read config file: {}", e);
                std::process::exit(1);
            });

            let output_dirs = Pipeline::new(config)
                .run(&args.input_dir)
                .unwrap_or_else(|e| {
                    error!("{}", e);
                    std::process::exit(1);
                });

            info!("stage output directories:");
            for dir in &output_dirs {
                info!("\t{}", dir.display());
            }
        }
    }

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
