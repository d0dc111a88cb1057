use chrono::Utc;
use clap::Args;
use nisba_core::{Cue, Language, Today};
use serde_json::json;

use crate::common::{linger, open_app, print_json, Audio, CliResult};

#[derive(Args)]
pub struct TodayArgs {
    /// ar or en; defaults to the language preference
    #[arg(long)]
    language: Option<Language>,
}

pub fn run(args: TodayArgs) -> CliResult {
    let app = open_app(Audio::Silent)?;
    let language = args.language.unwrap_or(app.preferences().language);
    print_json(&Today::at(Utc::now(), language))
}

pub fn welcome() -> CliResult {
    let mut app = open_app(Audio::System)?;
    let first_visit = !app.preferences().welcome_seen;
    app.dismiss_welcome()?;
    print_json(&json!({
        "welcomeSeen": true,
        "firstVisit": first_visit,
    }))?;
    linger(&app, app.effects().is_enabled(), Cue::ButtonClick);
    Ok(())
}
