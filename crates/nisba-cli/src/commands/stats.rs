use chrono::Utc;
use clap::Subcommand;
use nisba_core::daily::app_today;

use crate::common::{open_app, print_json, Audio, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Raw streak and completion history
    Show,
    /// Today's figures: completion rate, streaks, active days
    Summary,
}

pub fn run(action: StatsAction) -> CliResult {
    let app = open_app(Audio::Silent)?;
    match action {
        StatsAction::Show => print_json(app.stats())?,
        StatsAction::Summary => print_json(&app.summary(app_today(Utc::now())))?,
    }
    Ok(())
}
