use anyhow::Result;
use batchmap::cli::{self, Commands, DigestConfig};

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbose);

    match cli.command {
        Commands::Digest {
            inputs,
            output,
            list,
            extensions,
            exclude,
            batch_size,
            jobs,
            sequential,
            level,
            config,
            progress,
        } => {
            let summary = cli::handle_digest_command(DigestConfig {
                inputs,
                output: output.clone(),
                list,
                extensions,
                exclude,
                batch_size,
                jobs,
                sequential,
                level,
                config,
                progress,
            })?;
            println!(
                "{}: {} inputs, {} batches, {} bytes",
                output.display(),
                summary.identifiers,
                summary.batches,
                summary.output_bytes
            );
        }
    }

    Ok(())
}
