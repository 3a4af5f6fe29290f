use deckbuilder::dictionary::{self, DEFAULT_SOURCES, FsFetcher};
use deckbuilder::report::TextReport;
use deckbuilder::session::DeckSession;
use deckbuilder::suggest::MatchMode;
use deckbuilder::svg::CurveChart;
use std::env;
use std::fs;
use std::process;
use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

enum OutputFormat {
    Text,
    Export,
    Svg,
}

impl OutputFormat {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(OutputFormat::Text),
            "export" => Some(OutputFormat::Export),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

enum Action {
    Render(OutputFormat),
    Suggest(usize),
    Complete(usize),
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber only when `RUST_LOG` is set, so normal runs stay quiet.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let Ok(filter) = EnvFilter::try_from_env("RUST_LOG") else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <deck.txt> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --source <file>   Card data file, repeatable; later files win (default: ./dict/*.json sets)");
    eprintln!("  -r, --root <dir>      Base directory for card data files (default: .)");
    eprintln!("  -o, --output <file>   Output file (default: stdout)");
    eprintln!("  -f, --format <fmt>    Output format: text, export, svg (default: text)");
    eprintln!("      --curve           Include the mana curve in the text report");
    eprintln!("      --suggest <pos>   Print name suggestions for the line at byte offset <pos>");
    eprintln!("      --complete <pos>  Print the deck with the line at byte offset <pos> completed");
    eprintln!("      --literal         Match name fragments literally instead of as patterns");
    process::exit(1);
}

fn parse_offset(flag: &str, value: &str) -> usize {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid offset for {}: {}", flag, value);
        process::exit(1);
    })
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let mut sources: Vec<String> = Vec::new();
    let mut root = String::from(".");
    let mut output_path: Option<String> = None;
    let mut action = Action::Render(OutputFormat::Text);
    let mut show_curve = false;
    let mut mode = MatchMode::Pattern;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-s" | "--source" | "-r" | "--root" | "-o" | "--output" | "-f" | "--format"
            | "--suggest" | "--complete" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    eprintln!("Missing value for {}", flag);
                    process::exit(1);
                };
                match flag {
                    "-s" | "--source" => sources.push(value.clone()),
                    "-r" | "--root" => root = value.clone(),
                    "-o" | "--output" => output_path = Some(value.clone()),
                    "-f" | "--format" => {
                        let format = OutputFormat::from_str(value).unwrap_or_else(|| {
                            eprintln!("Invalid format: {}", value);
                            process::exit(1);
                        });
                        action = Action::Render(format);
                    }
                    "--suggest" => action = Action::Suggest(parse_offset(flag, value)),
                    _ => action = Action::Complete(parse_offset(flag, value)),
                }
            }
            "--curve" => show_curve = true,
            "--literal" => mode = MatchMode::Literal,
            "-h" | "--help" => usage(&args[0]),
            _ => {
                eprintln!("Unknown option: {}", flag);
                process::exit(1);
            }
        }
        i += 1;
    }

    let deck = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let fetcher = FsFetcher::new(&root);
    let loaded = if sources.is_empty() {
        dictionary::load(&DEFAULT_SOURCES, &fetcher)
    } else {
        dictionary::load(&sources, &fetcher)
    };
    if let Err(e) = &loaded {
        eprintln!("Warning: card data not loaded: {}", e);
    }

    let mut session = DeckSession::new().with_mode(mode);
    session.finish_load(loaded);
    if show_curve {
        session.toggle_curve();
    }

    let output = match action {
        Action::Render(OutputFormat::Text) => {
            let mut report = TextReport::new();
            session.refresh(&deck, &mut report);
            report.into_string()
        }
        Action::Render(OutputFormat::Export) => {
            let mut text = session.analyze(&deck).export();
            if !text.is_empty() {
                text.push('\n');
            }
            text
        }
        Action::Render(OutputFormat::Svg) => {
            CurveChart::default().render(&session.analyze(&deck).stats)
        }
        Action::Suggest(cursor) => match session.suggest(&deck, cursor) {
            Ok(suggestions) => suggestions
                .matches
                .iter()
                .map(|name| format!("{}\n", name))
                .collect(),
            Err(e) => {
                eprintln!("Suggest error: {}", e);
                process::exit(1);
            }
        },
        Action::Complete(cursor) => match session.complete(&deck, cursor) {
            Ok(completion) => completion.text.into_owned(),
            Err(e) => {
                eprintln!("Complete error: {}", e);
                process::exit(1);
            }
        },
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &output) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}
