use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use structopt::StructOpt;
use tracing::info;
use tracing::level_filters::LevelFilter;

use huff_decoder::hufftree::format_code;
use huff_decoder::metadata::read_header;
use huff_decoder::{
    decode, BranchOrder, DecodeConfig, DecodeOptions, HuffmanTree, SymbolCountConvention,
};

#[derive(StructOpt, Debug)]
#[structopt(name = "huffd", about = "Decompress a .huff file")]
struct Opt {
    #[structopt(parse(from_os_str), help = "Compressed .huff input")]
    input: PathBuf,

    #[structopt(parse(from_os_str), help = "Destination for the decoded bytes")]
    output: PathBuf,

    #[structopt(short, long, help = "Log phase transitions")]
    verbose: bool,

    #[structopt(long, help = "Print each symbol's code after decoding")]
    codes: bool,

    #[structopt(long = "zero-means-256", help = "Read a symbol count of 0 as 256")]
    zero_means_256: bool,

    #[structopt(long = "lighter-on-zero", help = "Encoder put the lighter node on the 0 branch")]
    lighter_on_zero: bool,

    #[structopt(long = "verify-sum", help = "Reject tables not summing to the original size")]
    verify_sum: bool,

    #[structopt(long, default_value = "8192", help = "Output staging buffer in bytes")]
    buffer: usize,
}

impl Opt {
    fn config(&self) -> DecodeConfig {
        let symbol_count = if self.zero_means_256 {
            SymbolCountConvention::ZeroMeans256
        } else {
            SymbolCountConvention::Strict
        };
        let branch_order = if self.lighter_on_zero {
            BranchOrder::LighterOnZero
        } else {
            BranchOrder::LighterOnOne
        };
        DecodeConfig::default()
            .with_symbol_count(symbol_count)
            .with_branch_order(branch_order)
            .with_verify_frequency_sum(self.verify_sum)
            .with_output_buffer(self.buffer)
    }
}

fn run(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config = opt.config();
    let progress = |message: &str| info!("{}", message);
    let options = DecodeOptions::new(config.clone()).with_progress(&progress);

    let mut source = BufReader::new(File::open(&opt.input)?);
    let mut sink = BufWriter::new(File::create(&opt.output)?);
    decode(&mut source, &mut sink, &options)?;
    sink.flush()?;

    if opt.codes {
        let mut source = BufReader::new(File::open(&opt.input)?);
        let header = read_header(&mut source, &config)?;
        if !header.frequencies.is_empty() {
            let tree = HuffmanTree::from_frequencies(&header.frequencies, config.branch_order)?;
            for (byte, code) in tree.code_table() {
                println!("0x{:02x}\t{}", byte, format_code(&code));
            }
        }
    }

    info!("decompression complete");
    Ok(())
}

fn main() -> ExitCode {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&opt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
