use clap::Subcommand;

use super::{open_tracker, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete the profile's stored progression and start over
    Reset,
}

pub fn run(profile: Option<&str>, action: DataAction) -> CliResult {
    match action {
        DataAction::Reset => {
            let (tracker, _) = open_tracker(profile)?;
            tracker.reset()?;
            println!("profile '{}' reset", tracker.profile());
        }
    }
    Ok(())
}
