use log::{debug, info};
use located_error::prelude::*;
use parser::{Cli, Commands::*};

/// Run the appropriate module, according to the requested subcommand.
///
/// # Errors
/// - if the requested module fails. The returned error carries the full context chain.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Infer{infer} => {
            let posteriors = pedigree_inference::run(&infer).loc("While running inference")?;
            info!("Computed posterior distributions of {} individuals", posteriors.len());
        },

        FromYaml{yaml} => {
            let cli = Cli::deserialize(&yaml)?;
            debug!("Replaying arguments from {}", yaml.display());
            self::run(cli)?;
        },

        Tables => {
            let tables = pedigree_inference::ProbabilityTables::default().to_yaml()?;
            print!("{tables}");
        },
    };
    Ok(())
}
