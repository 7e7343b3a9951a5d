use std::path::PathBuf;
use std::process;

use clap::Parser;

use autorelease::command::ProcessRunner;
use autorelease::config::{self, ReleaseConfig, TagAuthor};
use autorelease::error::NEUTRAL_EXIT_CODE;
use autorelease::{event, pipeline, ui};

#[derive(clap::Parser)]
#[command(
    name = "autorelease",
    version,
    about = "Version, tag and publish a package on pushes to the default branch"
)]
struct Args {
    /// Repository root (defaults to the CI workspace directory)
    dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let event = match event::load(&config::event_file_from_env()) {
        Ok(event) => event,
        Err(e) => {
            ui::error_detail(&e.to_string());
            process::exit(1);
        }
    };

    let author = TagAuthor::from(&event.repository.owner);
    let config = match ReleaseConfig::from_env(args.dir, author) {
        Ok(config) => config,
        Err(e) => {
            ui::error_detail(&e.to_string());
            process::exit(1);
        }
    };

    match pipeline::run(&ProcessRunner, &config, &event) {
        Ok(_) => {}
        Err(e) if e.is_benign() => {
            ui::info(&e.to_string());
            process::exit(NEUTRAL_EXIT_CODE);
        }
        Err(e) => {
            ui::error_detail(&e.to_string());
            process::exit(1);
        }
    }
}
