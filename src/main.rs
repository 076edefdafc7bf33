use std::path::Path;
use std::process::ExitCode;

use clap::{arg, crate_version, ArgAction, Command};

use packrat::bwt::Bwt;
use packrat::huffman::Huffman;
use packrat::lzw::Lzw;
use packrat::mtf::Mtf;
use packrat::pipeline::Pipeline;
use packrat::rle::Rle;
use packrat::{Codec, Error, Transform};

const ALGOS: [&str; 3] = ["rle", "lzw", "huff"];
const TRANSFORMS: [&str; 2] = ["bwt", "mtf"];

fn extension_for(algo: &str) -> &'static str {
    match algo {
        "rle" => "rle",
        "lzw" => "lzw",
        "huff" => "huff",
        _ => unreachable!("clap restricts algo to {:?}", ALGOS),
    }
}

fn build_codec(algo: &str) -> Box<dyn Codec> {
    match algo {
        "rle" => Box::new(Rle),
        "lzw" => Box::new(Lzw::default()),
        "huff" => Box::new(Huffman),
        _ => unreachable!("clap restricts algo to {:?}", ALGOS),
    }
}

fn build_transforms(names: &[String]) -> Vec<Box<dyn Transform>> {
    names
        .iter()
        .map(|n| match n.as_str() {
            "bwt" => Box::new(Bwt) as Box<dyn Transform>,
            "mtf" => Box::new(Mtf) as Box<dyn Transform>,
            _ => unreachable!("clap restricts transform to {:?}", TRANSFORMS),
        })
        .collect()
}

fn check_not_in_place(input: &str, output: &str) -> Result<(), Error> {
    if Path::new(input) == Path::new(output) {
        return Err(Error::InvalidOption(format!(
            "input and output both name {}; in-place compression is not supported",
            input
        )));
    }
    Ok(())
}

fn run_compress(algo: &str, input: &str, output: &str, transform_names: &[String]) -> Result<(), Error> {
    check_not_in_place(input, output)?;

    let expected_ext = extension_for(algo);
    let actual_ext = Path::new(output).extension().and_then(|e| e.to_str());
    if actual_ext != Some(expected_ext) {
        return Err(Error::InvalidOption(format!(
            "compress with algo '{}' expects output extension '.{}', got '{}'",
            algo,
            expected_ext,
            output
        )));
    }

    log::debug!("reading {}", input);
    let data = std::fs::read(input)?;
    let transforms = build_transforms(transform_names);
    let codec = build_codec(algo);
    let pipeline = Pipeline::new(&transforms, codec.as_ref());
    let compressed = pipeline.compress(&data)?;
    log::debug!("writing {} bytes to {}", compressed.len(), output);
    std::fs::write(output, compressed)?;
    Ok(())
}

fn run_decompress(algo: &str, input: &str, output: &str, transform_names: &[String]) -> Result<(), Error> {
    check_not_in_place(input, output)?;

    let expected_ext = extension_for(algo);
    let actual_ext = Path::new(input).extension().and_then(|e| e.to_str());
    if actual_ext != Some(expected_ext) {
        log::warn!(
            "input '{}' does not have the expected '.{}' extension for algo '{}'",
            input,
            expected_ext,
            algo
        );
    }

    log::debug!("reading {}", input);
    let data = std::fs::read(input)?;
    let transforms = build_transforms(transform_names);
    let codec = build_codec(algo);
    let pipeline = Pipeline::new(&transforms, codec.as_ref());
    let decompressed = pipeline.decompress(&data)?;
    log::debug!("writing {} bytes to {}", decompressed.len(), output);
    std::fs::write(output, decompressed)?;
    Ok(())
}

fn transform_arg() -> clap::Arg {
    arg!(-t --transform <TRANSFORM> "reordering transform, may repeat; applied in the order given")
        .value_parser(TRANSFORMS)
        .action(ArgAction::Append)
        .required(false)
}

fn run() -> Result<(), Error> {
    let long_help = "Examples:
---------
Compress:   `packrat compress huff my_file my_file.huff -t bwt -t mtf`
Decompress: `packrat decompress huff my_file.huff my_file_out -t bwt -t mtf`";

    let mut main_cmd = Command::new("packrat")
        .about("compress and decompress with RLE, LZW, and Huffman, optionally preceded by BWT/MTF")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(arg!(<ALGO> "compression algorithm").value_parser(ALGOS))
            .arg(arg!(<INPUT> "input path"))
            .arg(arg!(<OUTPUT> "output path"))
            .arg(transform_arg())
            .about("compress a file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("decompress")
            .arg(arg!(<ALGO> "compression algorithm").value_parser(ALGOS))
            .arg(arg!(<INPUT> "input path"))
            .arg(arg!(<OUTPUT> "output path"))
            .arg(transform_arg())
            .about("decompress a file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let algo = cmd.get_one::<String>("ALGO").expect("required by clap");
        let input = cmd.get_one::<String>("INPUT").expect("required by clap");
        let output = cmd.get_one::<String>("OUTPUT").expect("required by clap");
        let transforms: Vec<String> = cmd
            .get_many::<String>("transform")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        run_compress(algo, input, output, &transforms)?;
    } else if let Some(cmd) = matches.subcommand_matches("decompress") {
        let algo = cmd.get_one::<String>("ALGO").expect("required by clap");
        let input = cmd.get_one::<String>("INPUT").expect("required by clap");
        let output = cmd.get_one::<String>("OUTPUT").expect("required by clap");
        let transforms: Vec<String> = cmd
            .get_many::<String>("transform")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        run_decompress(algo, input, output, &transforms)?;
    }

    Ok(())
}

fn exit_code_for(err: &Error) -> u8 {
    match err {
        Error::Io(_) => 1,
        Error::Truncated | Error::Corrupt(_) => 2,
        Error::OutOfMemory => 3,
        Error::InvalidOption(_) => 4,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("packrat: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
