//! Simple CLI that reads a page from stdin and outputs JSON to stdout.
//!
//! ```text
//! extract_stdin [--json] [--user | --assistant] [--base-url <url>] [--verbose]
//! ```
//!
//! Input is HTML unless `--json` is given, in which case it is a node
//! snapshot. Without `--user` / `--assistant` the whole conversation is
//! extracted.

use std::io::{self, Read, Write};
use std::sync::Arc;

use log::{error, info};
use simplelog::{LevelFilter, WriteLogger};
use turn_extract::{dom, encoding, Extractor, LogTracer, Options, SnapshotNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Conversation,
    User,
    Assistant,
}

#[derive(Debug)]
struct Args {
    json: bool,
    mode: Mode,
    base_url: Option<String>,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        json: false,
        mode: Mode::Conversation,
        base_url: None,
        verbose: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--user" => args.mode = Mode::User,
            "--assistant" => args.mode = Mode::Assistant,
            "--verbose" => args.verbose = true,
            "--base-url" => {
                args.base_url = Some(iter.next().ok_or("--base-url needs a value")?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn run(args: &Args) -> turn_extract::Result<String> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    info!("read {} bytes from stdin", input.len());

    let options = Options {
        base_url: args.base_url.clone(),
        ..Options::default()
    };
    let mut extractor = Extractor::try_new(options)?;
    if args.verbose {
        extractor = extractor.with_tracer(Arc::new(LogTracer));
    }

    let output = if args.json {
        let snapshot = SnapshotNode::from_json(&String::from_utf8_lossy(&input))?;
        render(&extractor, &&snapshot, args.mode)?
    } else {
        let doc = dom::parse(&encoding::transcode_to_utf8(&input));
        render(&extractor, &dom::body_or_root(&doc), args.mode)?
    };
    Ok(output)
}

fn render<N: dom::ContentNode>(extractor: &Extractor, root: &N, mode: Mode) -> turn_extract::Result<String> {
    let json = match mode {
        Mode::Conversation => serde_json::to_string(&extractor.extract_conversation(root))?,
        Mode::User => serde_json::to_string(&extractor.extract_user(root))?,
        Mode::Assistant => serde_json::to_string(&extractor.extract_assistant(root))?,
    };
    Ok(json)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    if args.verbose {
        let config = simplelog::ConfigBuilder::new()
            .set_max_level(LevelFilter::Debug)
            .add_filter_ignore_str("html5ever")
            .build();
        if WriteLogger::init(LevelFilter::Debug, config, io::stderr()).is_err() {
            eprintln!("Failed to initialize logger");
        }
    }

    match run(&args) {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{json}").is_err() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            error!("extraction failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
