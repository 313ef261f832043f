//! Subcommand handlers
//!
//! Each handler builds a [`Session`] from the selection flags the same way a
//! user would fill the form top to bottom, then reads from it.

use crate::cli::{self, LEVEL_FLAGS};
use anyhow::{bail, Context, Result};
use ccc_catalog::{builtin, CascadeLevel, Catalog};
use ccc_core::{
    decode_url, Action, AppConfig, FormType, Location, MapWidget, Session, ShareEncoder,
};
use ccc_store::{from_config, MarkerService};
use clap::ArgMatches;
use std::io::Write;
use std::path::Path;

/// Map stand-in for a terminal: records the pin and logs
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pin: Option<Location>,
}

impl HeadlessMap {
    /// Currently placed pin
    #[must_use]
    pub fn pin(&self) -> Option<Location> {
        self.pin
    }
}

impl MapWidget for HeadlessMap {
    fn center_on(&mut self, at: Location, zoom: f64) {
        tracing::debug!(%at, zoom, "map centred");
    }

    fn show_user_location(&mut self, at: Location) {
        tracing::debug!(%at, "user location shown");
    }

    fn place_marker(&mut self, at: Location) {
        tracing::debug!(%at, "pin placed");
        self.pin = Some(at);
    }

    fn remove_marker(&mut self) {
        self.pin = None;
    }
}

/// Load configuration from `path` (or defaults) and apply `lookup` overrides
///
/// # Errors
/// Unreadable or invalid configuration.
pub fn load_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    let config = config.with_overrides(lookup);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn session_from<'c>(matches: &ArgMatches, catalog: &'c Catalog) -> Session<'c> {
    let mut session = Session::new(catalog);
    for (flag, level) in LEVEL_FLAGS {
        if let Some(id) = matches.get_one::<String>(flag) {
            session.dispatch(&Action::level(level, id.as_str()));
        }
    }
    if let Some(id) = matches.get_one::<String>("lead-observer") {
        session.dispatch(&Action::SetLeadObserver(Some(id.clone())));
    }
    session
}

fn place_pin(session: &mut Session<'_>, matches: &ArgMatches, config: &AppConfig) -> Result<()> {
    let (Some(lat), Some(lng)) = (matches.get_one::<f64>("lat"), matches.get_one::<f64>("lng"))
    else {
        return Ok(());
    };
    let mut map = HeadlessMap::default();
    session.init_map(&mut map, config.map.center()?, config.map.zoom);
    session.handle_map_click(&mut map, *lat, *lng)?;
    Ok(())
}

/// Execute the parsed command line, writing results to `out`
///
/// # Errors
/// Any failure of the selected subcommand.
pub async fn run(matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli::config_path(matches).map(|p| p.as_path()), |name| {
        std::env::var(name).ok()
    })?;
    let catalog = builtin();

    match matches.subcommand() {
        Some(("options", args)) => {
            let level = args
                .get_one::<CascadeLevel>("level")
                .copied()
                .context("missing level")?;
            let session = session_from(args, catalog);
            let options = session.options(level);
            if options.is_empty() {
                tracing::info!(%level, "nothing offered; select the level above first");
            }
            for entry in options {
                writeln!(out, "{}", entry.display())?;
            }
        }
        Some(("url", args)) => {
            let mut session = session_from(args, catalog);
            let url = session.refresh_share_url(&ShareEncoder::new(&config.share.base_url))?;
            writeln!(out, "{url}")?;
        }
        Some(("decode", args)) => {
            let url = args.get_one::<String>("url").context("missing url")?;
            let params = decode_url(url).with_context(|| format!("decoding {url}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&params)?)?;
        }
        Some(("summary", args)) => {
            let mut session = session_from(args, catalog);
            place_pin(&mut session, args, &config)?;
            write!(out, "{}", session.summary())?;
        }
        Some(("assignees", _)) => {
            let service = MarkerService::new(from_config(&config.store)?, catalog);
            for assignee in service.assignees().await? {
                writeln!(out, "{}\t{}", assignee.id, assignee.display_name)?;
            }
        }
        Some(("submit", args)) => submit(args, &config, catalog, out).await?,
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("no command given"),
    }
    Ok(())
}

async fn submit(
    args: &ArgMatches,
    config: &AppConfig,
    catalog: &Catalog,
    out: &mut dyn Write,
) -> Result<()> {
    let mut session = session_from(args, catalog);
    let form = args.get_one::<FormType>("form").copied();
    session.dispatch(&Action::SetFormType(form));
    place_pin(&mut session, args, config)?;
    session.refresh_share_url(&ShareEncoder::new(&config.share.base_url))?;

    let service = MarkerService::new(from_config(&config.store)?, catalog);

    if let Some(uid) = args.get_one::<String>("assignee") {
        let ticket = session.begin_assignee_fetch();
        let fetched = service.assignees().await;
        session.complete_assignee_fetch(ticket, fetched)?;
        session.select_assignee(Some(uid));
        if session.selection().cascade_complete() && session.selection().assignee().is_none() {
            bail!("assignee {uid} not found in the store");
        }
    }

    let stored = service.submit_session(&session).await?;
    writeln!(out, "stored marker {}", stored.id)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&stored.marker)?)?;
    Ok(())
}
