// Copyright (C) 2026 Liyang <liyang@veronica>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use tracing::info;

use kitbash::session::EditSession;
use kitbash::{config, drums, sfz};

#[derive(Parser)]
#[clap(
    author = "Liyang",
    version = crate_version!(),
    about = "A drumkit .sfz sketching tool."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the percussion instruments a kit can use.
    Instruments {},
    /// Renders a YAML sketch to an .sfz file.
    Render {
        /// The path to the sketch file.
        sketch_path: String,
        /// Where to write the .sfz output. Defaults to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Reads an .sfz file back and reports what it contains.
    Check {
        /// The path to the .sfz file.
        sfz_path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Instruments {} => {
            let mut group = None;
            for drum in drums::iter_by_group() {
                if group != Some(drum.group) {
                    println!("{}:", drum.group.name());
                    group = Some(drum.group);
                }
                println!("- {} {} ({})", drum.pitch, drum.id, drums::note_name(drum.pitch));
            }
        }
        Commands::Render {
            sketch_path,
            output,
        } => {
            let sketch = config::load_sketch(&PathBuf::from(&sketch_path))?;
            let session = EditSession::new();
            sketch.apply(&session)?;
            session.notifier().flush().await;

            let kit = session.snapshot();
            match output {
                Some(output) => {
                    let mut file = File::create(&output)?;
                    sfz::write_kit(&kit, &mut file)?;
                    session.clear_dirty();
                    info!(output, "wrote kit");
                }
                None => print!("{}", sfz::render(&kit)),
            }
        }
        Commands::Check { sfz_path } => {
            let kit = sfz::load_kit(&PathBuf::from(&sfz_path))?;

            let mut samples = 0;
            for instrument in kit.instruments().filter(|i| !i.is_empty()) {
                println!(
                    "- {} \"{}\" ({}): {} sample(s)",
                    instrument.pitch(),
                    instrument.name(),
                    instrument.note_name(),
                    instrument.len()
                );
                samples += instrument.len();
            }

            if samples == 0 {
                println!("No samples assigned.");
            }
        }
    }

    Ok(())
}
