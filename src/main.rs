//! huffpack command line
//!
//! Runs the whole pipeline or any single step of it, printing the
//! intermediate structures along the way.
//!
//! ```bash
//! huffpack freq notes.txt            # frequency table of a file
//! huffpack tree --text "aab"         # code tree of a literal string
//! huffpack compress notes.txt        # writes notes.txt.huf
//! huffpack decompress notes.txt.huf  # writes notes_unc.txt
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::{
    decoder, encoder, files, CodeTable, CodeTree, CompressionConfig, Compressor, FrequencyTable,
    SourceMode,
};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Static Huffman compression, one step at a time", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// File to read, or the literal text with --text
    source: String,

    /// Treat SOURCE as the text itself rather than a file name
    #[arg(long)]
    text: bool,
}

impl SourceArgs {
    fn mode(&self) -> SourceMode {
        if self.text {
            SourceMode::Text
        } else {
            SourceMode::File
        }
    }

    fn table(&self) -> Result<FrequencyTable> {
        FrequencyTable::build(&self.source, self.mode())
            .with_context(|| format!("counting frequencies of {}", self.source))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the frequency table
    Freq(SourceArgs),
    /// Print the code tree
    Tree(SourceArgs),
    /// Print the code table
    Table(SourceArgs),
    /// Encode SOURCE into a raw payload file (no header)
    Encode {
        #[command(flatten)]
        source: SourceArgs,
        /// Payload file to write
        output: PathBuf,
    },
    /// Decode a raw payload with the tree built from SOURCE
    Decode {
        #[command(flatten)]
        source: SourceArgs,
        /// Payload file to read
        payload: PathBuf,
        /// File to write the decoded bytes to
        output: PathBuf,
    },
    /// Compress FILE into FILE.huf
    Compress { file: PathBuf },
    /// Decompress FILE.huf into FILE_unc.txt
    Decompress { file: PathBuf },
    /// Print compression statistics for FILE as JSON
    Stats { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = match &cli.config {
        Some(path) => CompressionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompressionConfig::default(),
    };
    info!(?config, "starting");

    match cli.command {
        Command::Freq(source) => {
            println!("{}", source.table()?);
        }
        Command::Tree(source) => {
            let tree = CodeTree::build(&source.table()?)?;
            print!("{}", tree);
        }
        Command::Table(source) => {
            let tree = CodeTree::build(&source.table()?)?;
            print!("{}", CodeTable::from_tree(&tree));
        }
        Command::Encode { source, output } => {
            let table = source.table()?;
            let codes = CodeTable::from_tree(&CodeTree::build(&table)?);
            let sink = BufWriter::new(
                File::create(&output).with_context(|| format!("creating {}", output.display()))?,
            );
            let encoded = match source.mode() {
                SourceMode::Text => encoder::encode(source.source.as_bytes(), &codes, sink)?,
                SourceMode::File => {
                    let input = BufReader::new(File::open(&source.source)?);
                    encoder::encode(input, &codes, sink)?
                }
            };
            println!("{}", encoded.bits);
            println!("{} bits", encoded.bit_count);
        }
        Command::Decode {
            source,
            payload,
            output,
        } => {
            let tree = CodeTree::build(&source.table()?)?;
            let input = BufReader::new(
                File::open(&payload).with_context(|| format!("opening {}", payload.display()))?,
            );
            let decoded = decoder::decode(input, &tree, std::io::sink())?;
            std::fs::write(&output, &decoded)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{}", String::from_utf8_lossy(&decoded));
        }
        Command::Compress { file } => {
            let outcome = files::compress_file(&file, &config)
                .with_context(|| format!("compressing {}", file.display()))?;
            println!("{}", outcome.value);
            println!("wrote {}", outcome.output.display());
        }
        Command::Decompress { file } => {
            let outcome = files::decompress_file(&file, &config)
                .with_context(|| format!("decompressing {}", file.display()))?;
            println!("{}", String::from_utf8_lossy(&outcome.value));
            println!("wrote {}", outcome.output.display());
        }
        Command::Stats { file } => {
            let data =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let output = Compressor::new(config).compress(&data)?;
            println!("{}", serde_json::to_string_pretty(&output.metadata)?);
        }
    }

    Ok(())
}
