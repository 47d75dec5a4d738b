use std::{env, io, process};

use latencygate::{
    GateConfig, LatencyGate, ResultStore, TimingRunner,
    cli::{Command, CommandLineConfig, list_lines},
    demo,
    logging::init_logging,
};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let cli = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", CommandLineConfig::help());
            process::exit(2);
        }
    };
    init_logging();

    let config = match GateConfig::from_env().and_then(|base| cli.apply(base)) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    let registry = match demo::registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    match cli.command {
        Command::List => {
            for line in list_lines(&registry, &config.package) {
                println!("{line}");
            }
        }
        Command::Run => {
            let mut gate = LatencyGate::new(registry, TimingRunner::new()).with_config(config.run);
            if let Some(path) = config.results_file {
                gate = gate.with_store(ResultStore::new(path));
            }
            let stdout = io::stdout();
            let report = match gate.run(&config.package, &mut stdout.lock()) {
                Ok(report) => report,
                Err(err) => {
                    eprintln!("run failed: {err}");
                    process::exit(2);
                }
            };
            println!("{}", report.summary());
            if let Err(err) = report.assert_all() {
                eprintln!("{err}");
                process::exit(1);
            }
        }
    }
}
