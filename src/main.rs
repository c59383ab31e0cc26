use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use logwhen::logging::{self, LogFormat};
use logwhen::{ErrorStrategy, LineConfig, LineFilterPipeline, RuleSpec, RulesFile, SinkLevel, TracingSink};

#[derive(Parser)]
#[command(name = "logwhen")]
#[command(about = "Filter text streams and log when rules match")]
#[command(version)]
struct Args {
    /// Keep only lines matching this regex (default: keep all)
    #[arg(short = 'k', long = "keep", value_name = "REGEX")]
    keep: Option<String>,

    /// Keep lines that do not match --keep
    #[arg(short = 'v', long)]
    invert: bool,

    /// Log rule: 'REGEX => MESSAGE [=> FIELD,FIELD...]'
    #[arg(short = 'w', long = "log-when", value_name = "RULE", action = ArgAction::Append)]
    rules: Vec<RuleSpec>,

    /// YAML file with keep pattern and rules
    #[arg(short = 'r', long = "rules")]
    rules_file: Option<PathBuf>,

    /// Level of the messages emitted by rules
    #[arg(long, default_value = "info")]
    level: SinkLevel,

    /// Format of log output on stderr (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Debug mode - show processing statistics
    #[arg(long)]
    debug: bool,

    /// Fail on first over-long line instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Maximum line length
    #[arg(long, default_value = "1048576")] // 1MB
    max_line_length: usize,

    /// Buffer size for I/O
    #[arg(long, default_value = "65536")] // 64KB
    buffer_size: usize,

    /// Input file (default: stdin)
    #[arg(short = 'i', long = "input")]
    input_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,
}

impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.buffer_size == 0 {
            bail!("--buffer-size must be greater than zero");
        }
        if self.invert && self.keep.is_none() && self.rules_file.is_none() {
            bail!("--invert requires --keep or --rules");
        }
        Ok(())
    }

    fn config(&self) -> LineConfig {
        LineConfig {
            error_strategy: if self.fail_fast {
                ErrorStrategy::FailFast
            } else {
                ErrorStrategy::Skip
            },
            debug: self.debug,
            buffer_size: self.buffer_size,
            max_line_length: self.max_line_length,
        }
    }

    fn directive(&self) -> String {
        let level = if self.debug {
            self.level.min(SinkLevel::Debug)
        } else {
            self.level
        };
        level.to_string()
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.log_format, &args.directive());

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match run(args) {
        Ok(records_output) => {
            // grep convention: 2 when nothing was kept
            if records_output == 0 {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<usize> {
    let config = args.config();

    let rules_file = match &args.rules_file {
        Some(path) => RulesFile::load(path).context("Failed to load rules file")?,
        None => RulesFile::default(),
    };

    let mut pipeline =
        LineFilterPipeline::from_rules_file(config, &rules_file).context("Failed to compile rules file")?;
    if let Some(pattern) = &args.keep {
        pipeline.set_keep(pattern).context("Failed to compile --keep")?;
    }
    if args.invert {
        pipeline.set_invert(true);
    }
    for (i, spec) in args.rules.iter().enumerate() {
        pipeline
            .add_rule(spec)
            .with_context(|| format!("Failed to compile rule {}", i + 1))?;
    }

    let buffer_size = pipeline.config().buffer_size;

    // Set up input
    let input: Box<dyn BufRead> = if let Some(input_path) = &args.input_file {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open input file '{}'", input_path.display()))?;
        Box::new(BufReader::with_capacity(buffer_size, file))
    } else {
        Box::new(BufReader::with_capacity(buffer_size, io::stdin()))
    };

    // Set up output
    let mut output: Box<dyn Write> = if let Some(output_path) = &args.output_file {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file '{}'", output_path.display()))?;
        Box::new(io::BufWriter::with_capacity(buffer_size, file))
    } else {
        Box::new(io::BufWriter::with_capacity(buffer_size, io::stdout()))
    };

    let sink = TracingSink::new("logwhen", args.level);
    let stats = pipeline
        .process_stream(input, &mut output, sink)
        .context("Processing failed")?;

    if let Err(e) = output.flush() {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(e.into());
        }
    }

    Ok(stats.records_output)
}
