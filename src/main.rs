use clap::Parser;
use kehilapp::config::Platform;
use kehilapp::server::{self, State};
use kehilapp::utils::error::ErrorSeverity;
use kehilapp::utils::{logger, validation::Validate};
use kehilapp::{CliConfig, Command, FetchClient, KehilClient, KehilError, Prober, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting kehilapp");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<(), KehilError> {
    let config = cli.load_config()?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    match &cli.command {
        Command::Serve { .. } => {
            let state = State::new(&config).await?;
            server::start_server(state).await
        }
        Command::Discover { platform } => {
            let prober = build_prober(&config)?;
            let url = prober.discover(*platform).await;
            println!("{}", url);
            Ok(())
        }
        Command::Survey { platform } => {
            let prober = build_prober(&config)?;
            let platforms = match platform {
                Some(p) => vec![*p],
                None => Platform::ALL.to_vec(),
            };

            let mut any_reachable = false;
            let mut attempted = 0;
            for platform in platforms {
                println!("📱 {}", platform);
                let reports = prober.survey(prober.table().candidates(platform)).await;
                for report in &reports {
                    match &report.error {
                        None => println!("   ✅ {} ({} ms)", report.url, report.elapsed_ms),
                        Some(error) => {
                            println!("   ❌ {} ({} ms): {}", report.url, report.elapsed_ms, error)
                        }
                    }
                }
                any_reachable |= reports.iter().any(|r| r.reachable);
                attempted += reports.len();
            }

            if any_reachable {
                Ok(())
            } else {
                Err(KehilError::NoReachableEndpoint { attempted })
            }
        }
        Command::Health { url } => {
            let fetch = FetchClient::new(&config.network_config())?;
            let timeout = fetch.timeout();
            let client = KehilClient::new(url.clone(), fetch);
            tracing::info!("🔍 Checking {} (timeout {:?})", client.base_url(), timeout);

            let status = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
    }
}

fn build_prober(config: &TomlConfig) -> Result<Prober<FetchClient>, KehilError> {
    let fetch = FetchClient::new(&config.network_config())?;
    Ok(Prober::new(fetch, config.candidate_table()?))
}
