use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Error};
use clap::{App, Arg, ArgMatches, SubCommand};
use env_logger::Builder;
use log::LevelFilter;
use rand::Rng;

use kgram_speller::{Config, MarkovGraph, ModelTrainer, TextCorrector, WordBag};

fn main() {
    let matches = App::new("kgram-speller")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Train a k-gram model, or use one to repair malformed words.")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log more, may be repeated"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("train")
                .about("Create a model and a word bag from a directory of text files")
                .arg(
                    Arg::with_name("corpus")
                        .short("i")
                        .long("corpus")
                        .value_name("DIR")
                        .help("Directory whose files make up the training corpus.")
                        .takes_value(true)
                        .required(true),
                )
                .arg(model_arg().help("File where the trained model will be written."))
                .arg(bag_arg().help("File where word counts will be written."))
                .arg(
                    Arg::with_name("orders")
                        .long("orders")
                        .value_name("K")
                        .help("k-gram orders to train, e.g. --orders 2 3")
                        .takes_value(true)
                        .multiple(true),
                )
                .arg(
                    Arg::with_name("continue")
                        .long("continue")
                        .help("Keep training the existing model instead of starting over"),
                ),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Repair malformed words in text")
                .arg(model_arg().help("File containing the model produced by `train`"))
                .arg(bag_arg().help("File containing the word counts produced by `train`"))
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .value_name("FILE")
                        .help("File containing text to check. stdin by default.")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("FILE")
                        .help("File into which checked text will be written")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("generate")
                .about("Generate random text by walking the model")
                .arg(model_arg().help("File containing the model produced by `train`"))
                .arg(
                    Arg::with_name("seed")
                        .short("s")
                        .long("seed")
                        .value_name("KGRAM")
                        .help("Starting k-gram, random by default")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("length")
                        .short("n")
                        .long("length")
                        .value_name("N")
                        .help("Maximum number of letters to generate")
                        .takes_value(true)
                        .default_value("80"),
                ),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn model_arg() -> Arg<'static, 'static> {
    Arg::with_name("model")
        .short("m")
        .long("model")
        .value_name("FILE")
        .takes_value(true)
}

fn bag_arg() -> Arg<'static, 'static> {
    Arg::with_name("bag")
        .short("b")
        .long("bag")
        .value_name("FILE")
        .takes_value(true)
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("cannot load configuration from {}", path))?,
        None => Config::default(),
    };

    match matches.subcommand() {
        ("train", Some(matches)) => {
            apply_paths(&mut config, matches);
            if let Some(orders) = matches.values_of("orders") {
                config.training.orders = orders
                    .map(str::parse)
                    .collect::<Result<Vec<usize>, _>>()
                    .context("orders must be positive integers")?;
            }
            // required argument
            let corpus = matches.value_of("corpus").unwrap();
            do_train(&config, Path::new(corpus), matches.is_present("continue"))
        }
        ("check", Some(matches)) => {
            apply_paths(&mut config, matches);
            do_check(&config, matches.value_of("input"), matches.value_of("output"))
        }
        ("generate", Some(matches)) => {
            apply_paths(&mut config, matches);
            let length = matches
                .value_of("length")
                .unwrap_or("80")
                .parse::<usize>()
                .context("length must be a number")?;
            do_generate(&config, matches.value_of("seed"), length)
        }
        _ => bail!("no command given, see --help"),
    }
}

fn apply_paths(config: &mut Config, matches: &ArgMatches) {
    if let Some(model) = matches.value_of("model") {
        config.model_path = PathBuf::from(model);
    }
    if let Some(bag) = matches.value_of("bag") {
        config.bag_path = PathBuf::from(bag);
    }
}

fn do_train(config: &Config, corpus: &Path, resume: bool) -> Result<(), Error> {
    let mut trainer = if resume {
        let graph = MarkovGraph::from_dump(&config.model_path)?;
        let bag = WordBag::load_from_file(&config.bag_path)?;
        ModelTrainer::with_model(graph, bag, config.training.chunk_size)
    } else {
        ModelTrainer::new(&config.training)?
    };

    let files = trainer
        .add_directory(corpus)
        .with_context(|| format!("cannot read corpus from {}", corpus.display()))?;
    if files == 0 {
        bail!("corpus directory {} has no files", corpus.display());
    }

    let (graph, bag) = trainer.into_model();
    graph.save(&config.model_path)?;
    bag.save_to_file(&config.bag_path)?;

    Ok(())
}

fn do_check(config: &Config, input: Option<&str>, output: Option<&str>) -> Result<(), Error> {
    let graph = MarkovGraph::from_dump(&config.model_path)?;
    let bag = WordBag::load_from_file(&config.bag_path)?;
    let mut checker = TextCorrector::with_config(&graph, &bag, config.corrector);

    let input: Box<dyn BufRead> = match input {
        Some(filename) => Box::new(BufReader::new(File::open(filename)?)),
        None => Box::new(BufReader::new(stdin())),
    };

    let mut output: Box<dyn Write> = match output {
        Some(filename) => Box::new(File::create(filename)?),
        None => Box::new(stdout()),
    };

    for line in input.lines() {
        let checked = checker.check_text(&line?);
        output.write_all(checked.as_bytes())?;
        output.write_all(b"\n")?;
        checker.clear_cache();
    }

    Ok(())
}

fn do_generate(config: &Config, seed: Option<&str>, length: usize) -> Result<(), Error> {
    let graph = MarkovGraph::from_dump(&config.model_path)?;
    let mut rng = rand::rng();

    let order = graph.orders().iter().copied().max().unwrap_or(1);
    let mut text = match seed {
        Some(seed) if seed.bytes().all(|b| b.is_ascii_alphabetic()) => seed.to_ascii_lowercase(),
        Some(seed) => bail!("seed {:?} must consist of ASCII letters", seed),
        None => {
            let kgrams: Vec<&str> = graph
                .iter()
                .map(|(kgram, _)| kgram)
                .filter(|kgram| kgram.len() == order)
                .collect();
            if kgrams.is_empty() {
                bail!("model has no k-grams of order {}", order);
            }
            kgrams[rng.random_range(0..kgrams.len())].to_owned()
        }
    };

    while text.len() < length {
        let start = text.len().saturating_sub(order);
        match graph.sample_next(&text[start..], &mut rng) {
            Some(symbol) => text.push(symbol),
            None => break,
        }
    }

    println!("{}", text);

    Ok(())
}
