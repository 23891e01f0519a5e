use std::path::PathBuf;

use dccalendar::CalendarSettings;
use schemars::gen::SchemaSettings;

use super::Cmd;

// -----------------------------------------------------------------------------
// Args
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Output file. Prints to stdout if omitted
    #[clap(short = 'o', long = "outfile")]
    pub outfile: Option<PathBuf>,
}

impl Cmd for Args {
    fn run(&self) -> anyhow::Result<()> {
        let schema = settings_schema()?;
        match &self.outfile {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(path, schema)?;
                log::info!("Schema written to {:?}", path);
            }
            None => println!("{schema}"),
        }
        Ok(())
    }
}

pub fn settings_schema() -> anyhow::Result<String> {
    let gen = SchemaSettings::draft07().into_generator();
    let schema = gen.into_root_schema_for::<CalendarSettings>();
    Ok(serde_json::to_string_pretty(&schema)?)
}
