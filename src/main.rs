use clap::Parser;
use katalog::application::{
    AttachImagesService, ConfigService, ExportCatalogService, ExportTarget, InitService,
};
use katalog::cli::{format_attach_reports, format_export_report, Cli, Commands};
use katalog::error::KatalogError;
use katalog::infrastructure::{Config, FrappeClient, HttpImageProbe};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("katalog={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, KatalogError> {
    let config = Config::load(&cli.config)?;
    if !config.has_credentials() {
        warn!("erp.api_key / erp.api_secret not set; requests run as Guest");
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), KatalogError> {
    match &cli.command {
        Commands::Init { path } => {
            let written = InitService::execute(path)?;
            println!("Wrote default config to {}", written.display());
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(cli.config.clone());

            if *list {
                for (k, v) in service.list()? {
                    println!("{} = {}", k, v);
                }
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(k, v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(k)?);
                }
                Ok(())
            } else {
                println!("Usage: katalog config [--list | <key> [<value>]]");
                println!("Run 'katalog config --list' to see valid keys");
                Ok(())
            }
        }
        Commands::AttachImages { items, all } => {
            let config = load_config(&cli)?;
            let backend = FrappeClient::new(&config.erp)?;
            let probe = HttpImageProbe::new(config.images.timeout_secs)?;
            let service = AttachImagesService::new(&backend, &probe, &config.images);

            let reports = if *all {
                service.attach_all()?
            } else {
                items
                    .iter()
                    .map(|code| service.attach_code(code))
                    .collect::<Result<Vec<_>, _>>()?
            };

            print!("{}", format_attach_reports(&reports));
            Ok(())
        }
        Commands::Export {
            only_publish,
            output,
            dry_run,
        } => {
            let mut config = load_config(&cli)?;
            if *only_publish {
                config.export.only_publish = true;
            }

            let target = match (output, dry_run) {
                (Some(path), _) => ExportTarget::LocalFile(path.clone()),
                (None, true) => ExportTarget::Stdout,
                (None, false) => ExportTarget::Publish,
            };

            let backend = FrappeClient::new(&config.erp)?;
            let service = ExportCatalogService::new(&backend, &config.export, &config.erp.base_url);

            info!(only_publish = config.export.only_publish, "Starting catalog export");
            let report = service.execute(target)?;

            if report.target == ExportTarget::Stdout {
                println!("{}", report.payload);
            } else {
                print!("{}", format_export_report(&report));
            }
            Ok(())
        }
    }
}
