use std::path::Path;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use histrank::config::Config;
use histrank::error::{HistoryError, Result};
use histrank::{analyze, dashboard, history, interactive, report, search, Analysis};

fn build_cli() -> App<'static, 'static> {
    App::new("histrank")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rank and categorize your shell command history")
        .setting(AppSettings::ColoredHelp)
        .arg(Arg::with_name("file")
            .short("f")
            .long("file")
            .value_name("FILE")
            .help("Use specific history file")
            .takes_value(true))
        .arg(Arg::with_name("shell")
            .long("shell")
            .value_name("SHELL")
            .help("Read the history of this shell instead of the configured one")
            .takes_value(true))
        .arg(Arg::with_name("top-n")
            .short("n")
            .long("top-n")
            .value_name("N")
            .help("Number of top commands/words to display")
            .takes_value(true))
        .arg(Arg::with_name("json")
            .short("j")
            .long("json")
            .help("Output in JSON format"))
        .arg(Arg::with_name("bare")
            .short("r")
            .long("bare")
            .help("Plain text output without formatting"))
        .arg(Arg::with_name("brief")
            .short("b")
            .long("brief")
            .help("Show brief summary only"))
        .arg(Arg::with_name("detailed")
            .short("d")
            .long("detailed")
            .help("Show detailed analysis"))
        .arg(Arg::with_name("visualize")
            .short("v")
            .long("visualize")
            .help("Show bar charts in the terminal"))
        .arg(Arg::with_name("interactive")
            .short("i")
            .long("interactive")
            .help("Pick a command from history interactively"))
        .arg(Arg::with_name("search")
            .short("s")
            .long("search")
            .value_name("PATTERN")
            .help("Search commands and keywords by regex")
            .takes_value(true))
        .arg(Arg::with_name("category")
            .short("c")
            .long("category")
            .value_name("PATTERN")
            .help("Search commands by category")
            .takes_value(true))
        .arg(Arg::with_name("case-sensitive")
            .long("case-sensitive")
            .help("Make --search and --category case sensitive"))
        .arg(Arg::with_name("csv")
            .long("csv")
            .value_name("FILE")
            .help("Also export counts to a CSV file")
            .takes_value(true))
        .arg(Arg::with_name("quiet")
            .short("q")
            .long("quiet")
            .help("Suppress non-essential output"))
        .after_help("EXAMPLES:\n  histrank         # Default boxed output\n  histrank -r      # Plain text output\n  histrank -j -n 10  # JSON with top 10 lists\n  histrank -s docker # Search history\n  histrank -f ~/.zsh_history  # Analyze zsh history")
}

fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_history(matches: &ArgMatches, config: &Config) -> Result<String> {
    if let Some(file) = matches.value_of("file") {
        return history::read_history_file(Path::new(file));
    }
    history::load_shell_history(config)
}

fn print_report(analysis: &Analysis, matches: &ArgMatches) -> Result<()> {
    if matches.is_present("json") {
        println!("{}", report::json_report(analysis)?);
        return Ok(());
    }
    if matches.is_present("bare") {
        return report::print_lines(&report::bare_report(analysis)?);
    }
    if matches.is_present("brief") {
        return report::print_lines(&report::brief_report(analysis)?);
    }
    if matches.is_present("detailed") {
        return report::print_lines(&report::detailed_report(analysis)?);
    }
    report::print_colored(&report::boxed_report(analysis)?)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let quiet = matches.is_present("quiet");

    let mut config = Config::load_or_init()?;
    if let Some(shell) = matches.value_of("shell") {
        config.shell_type = shell.to_string();
        config.history_file = None;
    }
    if let Some(n) = matches.value_of("top-n") {
        config.top_n = n.parse().map_err(|_| HistoryError::InvalidArgument {
            name: "--top-n",
            value: n.to_string(),
        })?;
    }
    debug!(?config, "effective config");

    if !quiet && !matches.is_present("brief") && !matches.is_present("json") {
        eprintln!("Analyzing your command history...");
    }

    let history_text = load_history(matches, &config)?;
    let analysis = analyze(&history_text, config.top_n)?;

    if matches.is_present("interactive") {
        if let Some(cmd) = interactive::interactive_search(&analysis.commands)? {
            println!("{}", cmd);
        }
        return Ok(());
    }

    let case_sensitive = matches.is_present("case-sensitive");
    if let Some(pattern) = matches.value_of("search") {
        let found = search::search_keyword(&analysis, pattern, case_sensitive)?;
        return report::print_lines(&search::format_keyword_results(&found));
    }
    if let Some(pattern) = matches.value_of("category") {
        let found = search::search_category(&analysis, pattern, case_sensitive)?;
        return report::print_lines(&search::format_category_results(&found));
    }

    if matches.is_present("json") || !quiet {
        print_report(&analysis, matches)?;
    }

    if let Some(path) = matches.value_of("csv") {
        report::export_csv(&analysis, Path::new(path))?;
        if !quiet {
            eprintln!("Counts exported to {}", path);
        }
    }

    if matches.is_present("visualize") {
        dashboard::show_dashboard(&analysis, &config.style)?;
    }

    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.is_present("quiet"));

    match run(&matches) {
        Ok(()) => {}
        Err(HistoryError::EmptyInput(e)) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
