#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::exit;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use error_chain::ChainedError;

use freedesktop::entry::DesktopEntry;
use freedesktop::env::SearchPaths;
use freedesktop::errors::*;
use freedesktop::files::*;
use freedesktop::find_all_desktop_files;
use freedesktop::icon::{IconResolver, DEFAULT_ICON_SIZE};
use freedesktop::launch::xdg_open;

const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
const APP_NAME: &str = env!("CARGO_PKG_NAME");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    env_logger::init();
    let matches = app().get_matches();

    if let Err(ref err) = run(&matches) {
        error!("{}", err);
        eprintln!("{}", err.display_chain());
        exit(1);
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(APP_NAME)
        .version(VERSION)
        .about(DESCRIPTION)
        .author(AUTHORS)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("app-name")
                .long("app-name")
                .takes_value(true)
                .global(true)
                .help("Application name used to namespace config and data lookups"),
        )
        .arg(
            Arg::with_name("locale")
                .long("locale")
                .takes_value(true)
                .global(true)
                .help("Locale used for localised keys instead of $LANG"),
        )
        .subcommand(
            SubCommand::with_name("entry")
                .about("Parses a single desktop file")
                .arg(Arg::with_name("file").required(true)),
        )
        .subcommand(
            SubCommand::with_name("apps")
                .about("Lists installed desktop entries")
                .arg(
                    Arg::with_name("all")
                        .long("all")
                        .help("Include Link and Directory entries"),
                )
                .arg(
                    Arg::with_name("show-skipped")
                        .long("show-skipped")
                        .help("Report desktop files that failed to parse"),
                ),
        )
        .subcommand(
            SubCommand::with_name("icon")
                .about("Resolves an icon name to a file")
                .arg(Arg::with_name("name").required(true))
                .arg(
                    Arg::with_name("size")
                        .long("size")
                        .takes_value(true)
                        .default_value(DEFAULT_ICON_SIZE),
                )
                .arg(
                    Arg::with_name("theme")
                        .long("theme")
                        .takes_value(true)
                        .help("Icon theme to search instead of the session's"),
                ),
        )
        .subcommand(
            SubCommand::with_name("config")
                .about("Finds a file in the config search path")
                .arg(Arg::with_name("file").required(true))
                .arg(Arg::with_name("app").long("app")),
        )
        .subcommand(
            SubCommand::with_name("data")
                .about("Finds a file in the data search path")
                .arg(Arg::with_name("file").required(true))
                .arg(Arg::with_name("app").long("app")),
        )
        .subcommand(
            SubCommand::with_name("collect")
                .about("Lists data files matching a glob pattern")
                .arg(Arg::with_name("pattern").required(true))
                .arg(Arg::with_name("app").long("app")),
        )
        .subcommand(
            SubCommand::with_name("user-dir")
                .about("Resolves a user directory such as 'music'")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(
            SubCommand::with_name("open")
                .about("Opens an item with the default handler")
                .arg(Arg::with_name("item").required(true)),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut paths = SearchPaths::from_env()?;
    if let Some(app_name) = matches.value_of("app-name") {
        paths = paths.with_app_name(app_name);
    }
    if let Some(locale) = matches.value_of("locale") {
        paths = paths.with_locale(locale);
    }
    debug!("Using search paths {:?}", paths);

    match matches.subcommand() {
        ("entry", Some(sub)) => {
            let entry = DesktopEntry::parse_file(arg(sub, "file"), paths.locale())?;
            println!("{:#?}", entry);
        }
        ("apps", Some(sub)) => list_entries(&paths, sub.is_present("all"), sub.is_present("show-skipped"))?,
        ("icon", Some(sub)) => {
            let resolver = match sub.value_of("theme") {
                Some(theme) => IconResolver::new(&paths, Some(theme.to_owned())),
                None => IconResolver::from_session(&paths),
            };
            print_found(resolver.resolve_icon(arg(sub, "name"), arg(sub, "size")));
        }
        ("config", Some(sub)) => print_found(if sub.is_present("app") {
            find_app_config(&paths, arg(sub, "file"))
        } else {
            find_config(&paths, arg(sub, "file"))
        }),
        ("data", Some(sub)) => print_found(if sub.is_present("app") {
            find_app_data(&paths, arg(sub, "file"))
        } else {
            find_data(&paths, arg(sub, "file"))
        }),
        ("collect", Some(sub)) => {
            let files = if sub.is_present("app") {
                collect_app_data(&paths, arg(sub, "pattern"))?
            } else {
                collect_data(&paths, arg(sub, "pattern"))?
            };
            for file in files {
                println!("{}", file.display());
            }
        }
        ("user-dir", Some(sub)) => print_found(user_dir(&paths, arg(sub, "name"))?),
        ("open", Some(sub)) => xdg_open(arg(sub, "item"))?,
        _ => unreachable!(),
    }
    Ok(())
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.value_of(name).unwrap_or_default()
}

fn list_entries(paths: &SearchPaths, all: bool, show_skipped: bool) -> Result<()> {
    let desktop_files = find_all_desktop_files(paths)?;
    let mut skipped = vec![];
    let entries = desktop_files.parse_with_diagnostics(paths.locale(), &mut skipped);
    for entry in entries.iter().filter(|entry| all || entry.is_application()) {
        println!("{}\t{}", entry, entry.file.display());
    }
    if show_skipped {
        for skip in skipped {
            eprintln!("skipped {}: {}", skip.file.display(), skip.error);
        }
    }
    Ok(())
}

fn print_found(path: Option<PathBuf>) {
    match path {
        Some(path) => println!("{}", path.display()),
        None => info!("Not found"),
    }
}
