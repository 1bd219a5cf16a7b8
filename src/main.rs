//! heurscan - query a source file with the heuristic token scanner

use std::env;
use std::path::PathBuf;
use std::process;

use log::debug;

use heurscan::line::Line;
use heurscan::scanner::PeerPair;
use heurscan::{
    Config, Document, HeuristicScanner, LanguageRegistry, PartitionClassifier, PartitionFilter,
    PartitionMap, Region, Result, RulePartitioner, ScanError, TextBuffer, WholeDocument,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Parsed command line
struct Options {
    config: Option<PathBuf>,
    language: Option<String>,
    partition: Option<String>,
    file: PathBuf,
    command: String,
    arguments: Vec<String>,
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Handle --help and --version
    if let Some(first) = args.first() {
        match first.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            _ => {}
        }
    }

    let options = parse_args(&args)?;
    let config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let mut registry = LanguageRegistry::new();
    for lang in config.languages.iter().cloned() {
        registry.add_language(lang);
    }

    let buffer = TextBuffer::from_file(&options.file)?;
    let language = match &options.language {
        Some(name) => Some(
            registry
                .get_language(name)
                .ok_or_else(|| ScanError::Message(format!("Unknown language: {}", name)))?,
        ),
        None => registry
            .detect_language(&options.file)
            .and_then(|name| registry.get_language(name)),
    };

    if let Some(lang) = language {
        debug!("partitioning {} as {}", options.file.display(), lang.name);
    }
    let whole = WholeDocument::new();
    let map: Option<PartitionMap> = language
        .map(|lang| RulePartitioner::new(lang).partition(&buffer))
        .transpose()?;
    let classifier: &dyn PartitionClassifier = match &map {
        Some(map) => map,
        None => &whole,
    };

    // Scan code by default when the file has a language
    let filter = match options.partition.as_deref() {
        Some("any") => PartitionFilter::Any,
        Some("default") => PartitionFilter::default_content(),
        Some(kind) => PartitionFilter::single(kind),
        None if language.is_some() => PartitionFilter::default_content(),
        None => PartitionFilter::Any,
    };

    let mut scanner = HeuristicScanner::with_document(classifier, &buffer, filter);
    let report = Report {
        buffer: &buffer,
        tab_width: config.tab_width,
    };

    match options.command.as_str() {
        "partitions" => {
            let partitions = match &map {
                Some(map) => map.partitions().to_vec(),
                None => vec![classifier.partition_at(&buffer, 0)?],
            };
            for partition in partitions {
                println!(
                    "{:>6} {:>6}  {}  {}",
                    partition.offset,
                    partition.length,
                    report.location(partition.offset)?,
                    partition.kind
                );
            }
        }
        "peer" => {
            let offset = report.offset(argument(&options, 0)?)?;
            let ch = buffer.char_at(offset)?;
            let pair = PeerPair::find(&config.pairs, ch)
                .ok_or_else(|| ScanError::Message(format!("No pair for {:?} at {}", ch, offset)))?;
            let found = match (ch == pair.open, config.escape_char) {
                (true, Some(escape)) => scanner.find_closing_peer_escaped(offset, pair, escape),
                (true, None) => scanner.find_closing_peer(offset, pair),
                (false, Some(escape)) => scanner.find_opening_peer_escaped(offset, pair, escape),
                (false, None) => scanner.find_opening_peer(offset, pair),
            };
            match found {
                Some(peer) => println!("{}", report.location(peer)?),
                None => println!("no peer"),
            }
        }
        "blank" => {
            let offset = report.offset(argument(&options, 0)?)?;
            match scanner.find_blank_region(offset, config.line_break_is_blank) {
                Some(region) => println!("{}", report.region(region)?),
                None => println!("no blank region"),
            }
            if scanner.is_blank_line(offset)? {
                println!("line is blank");
            }
        }
        "word" => {
            let offset = report.offset(argument(&options, 0)?)?;
            match scanner.find_common_word(offset) {
                Some(region) => println!("{}  {}", report.region(region)?, buffer.text_of(region)?),
                None => println!("no word"),
            }
        }
        "block" => {
            let start = report.offset(argument(&options, 0)?)?;
            let end = match options.arguments.get(1) {
                Some(arg) => report.offset(arg)?,
                None => start,
            };
            let block = scanner.get_text_block(start, end)?;
            println!(
                "lines {}-{}",
                scanner.get_first_line_of_region(block)? + 1,
                scanner.get_last_line_of_region(block)? + 1
            );
            print!("{}", buffer.text_of(block)?);
        }
        "count" => {
            let arg = argument(&options, 0)?;
            let mut chars = arg.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(ScanError::Message(format!("count needs one character, got {:?}", arg)));
            };
            println!("{}", scanner.count(0, buffer.len(), ch));
        }
        other => {
            return Err(ScanError::Message(format!("Unknown command: {}", other)));
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut config = None;
    let mut language = None;
    let mut partition = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| ScanError::Message(format!("{} needs a value", name)))
        };
        match arg.as_str() {
            "--config" | "-c" => config = Some(PathBuf::from(value(arg.as_str())?)),
            "--language" | "-l" => language = Some(value(arg.as_str())?),
            "--partition" | "-p" => partition = Some(value(arg.as_str())?),
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(ScanError::Message(format!("Unknown option: {}", arg)));
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(file), Some(command)) = (positional.next(), positional.next()) else {
        return Err(ScanError::Message("Usage: heurscan [OPTIONS] FILE COMMAND [ARGS]".to_string()));
    };

    Ok(Options {
        config,
        language,
        partition,
        file: PathBuf::from(file),
        command,
        arguments: positional.collect(),
    })
}

fn argument(options: &Options, index: usize) -> Result<&str> {
    options
        .arguments
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ScanError::Message(format!("{} needs an argument", options.command)))
}

/// Formats offsets for the user
struct Report<'b> {
    buffer: &'b TextBuffer,
    tab_width: usize,
}

impl Report<'_> {
    /// Parse a character offset or a 1-based LINE:COL position
    fn offset(&self, arg: &str) -> Result<usize> {
        let bad = || ScanError::Message(format!("Bad position: {}", arg));
        match arg.split_once(':') {
            Some((line, col)) => {
                let line: usize = line.parse().map_err(|_| bad())?;
                let col: usize = col.parse().map_err(|_| bad())?;
                if line == 0 || col == 0 {
                    return Err(bad());
                }
                let info = self.buffer.line_information(line - 1)?;
                Ok(info.offset + (col - 1).min(info.length))
            }
            None => arg.parse().map_err(|_| bad()),
        }
    }

    /// `line:column`, 1-based, with the column in display cells
    fn location(&self, offset: usize) -> Result<String> {
        let line = self.buffer.line_of_offset(offset)?;
        let col = offset - self.buffer.line_offset(line)?;
        let display = self
            .buffer
            .line(line)
            .map_or(col, |l: &Line| l.display_col(col, self.tab_width));
        Ok(format!("{}:{}", line + 1, display + 1))
    }

    fn region(&self, region: Region) -> Result<String> {
        Ok(format!(
            "{}-{} ({} chars)",
            self.location(region.offset)?,
            self.location(region.end())?,
            region.length
        ))
    }
}

fn print_usage() {
    println!("heurscan {} - heuristic token scanner", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: heurscan [OPTIONS] FILE COMMAND [ARGS]");
    println!();
    println!("Options:");
    println!("  -c, --config PATH     Read settings from PATH instead of ~/.heurscan.toml");
    println!("  -l, --language NAME   Partition as NAME instead of detecting by extension");
    println!("  -p, --partition TYPE  Scan only TYPE partitions ('any', 'default' or a type)");
    println!("  -h, --help            Show this help message");
    println!("  -V, --version         Show version information");
    println!();
    println!("Commands (POS is an offset or LINE:COL):");
    println!("  partitions            List the partitions of FILE");
    println!("  peer POS              Find the peer of the bracket at POS");
    println!("  blank POS             Find the blank region at POS");
    println!("  word POS              Find the word at POS");
    println!("  block POS [POS]       Show the lines spanned by the positions");
    println!("  count CHAR            Count CHAR in the scanned partitions");
    println!();
    println!("Set RUST_LOG=debug for diagnostics");
}

fn print_version() {
    println!("heurscan {}", env!("CARGO_PKG_VERSION"));
}
