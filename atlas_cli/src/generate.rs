use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// JSON schema of the problem document
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// JSON schema of the problem-with-solution document
    SolutionJsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

fn write_schema(out: PathBuf, schema: String) -> Result<(), anyhow::Error> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, schema)?;
    Ok(())
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            write_schema(out, atlas_optimizer::json::schema::generate_json_schema()?)?
        }
        GenerateSubcommands::SolutionJsonSchema { out } => write_schema(
            out,
            atlas_optimizer::json::schema::generate_solution_json_schema()?,
        )?,
    }

    Ok(())
}
