use clap::Parser;
use taxi_fare::app::commands::{cmd_batch, cmd_demo, cmd_quote, cmd_tariffs};
use taxi_fare::config::Command;
use taxi_fare::utils::{logger, validation::Validate};
use taxi_fare::{CliConfig, FareConfig, FareError, FareRequest, TaxiCalculator};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => match FareConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(e.exit_code());
            }
        },
        None => FareConfig::default(),
    };

    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig, mut config: FareConfig) -> Result<(), FareError> {
    config.validate()?;
    let calc = TaxiCalculator::with_schedule(config.schedule)?;

    let output = match cli.command {
        Command::Quote(args) => {
            let request = FareRequest::from_raw(
                args.distance,
                &args.tariff,
                args.traffic,
                args.weather,
                args.demand,
            )?;
            cmd_quote(&calc, &request, args.json)?
        }
        Command::Tariffs { json } => cmd_tariffs(&calc, json)?,
        Command::Batch(args) => {
            args.apply_to(&mut config.batch);
            cmd_batch(calc, config.batch, args.dry_run).await?
        }
        Command::Demo => cmd_demo(&calc)?,
    };

    println!("{}", output);
    Ok(())
}
