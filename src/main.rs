use clap::Parser;
use jiandaoyun_connector::utils::error::ErrorSeverity;
use jiandaoyun_connector::utils::{logger, validation::Validate};
use jiandaoyun_connector::{
    build_request, CliConfig, NodeRunner, Operation, ProfileConfig, ReqwestTransport, Resource,
    StaticParameters,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting jdy CLI");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    // 載入連線設定
    let profile = match ProfileConfig::from_file(&args.config) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = profile.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let resource: Resource = parse_or_exit(&args.resource, "resource");
    let operation: Operation = parse_or_exit(&args.operation, "operation");

    let mut params = match args.load_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 取上傳憑證需要 transaction_id，缺的話補一個 UUID
    if resource == Resource::File
        && operation == Operation::GetUploadToken
        && !params.has("transactionId")
    {
        let generated = uuid::Uuid::new_v4().to_string();
        tracing::info!("Generated transaction id: {}", generated);
        params.insert("transactionId", Value::String(generated));
    }

    if args.dry_run {
        let request = build_request(resource, operation, &params)?;
        println!("POST {}", request.endpoint);
        println!("{}", serde_json::to_string_pretty(&request.body)?);
        return Ok(());
    }

    let items = match args.load_items() {
        Ok(items) => items,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let started = chrono::Utc::now();
    let transport = ReqwestTransport::with_timeout(profile.credential(), profile.timeout())?;
    let runner = NodeRunner::new(resource, operation, transport, StaticParameters(params))
        .continue_on_fail(args.continue_on_fail || profile.execution.continue_on_fail);

    match runner.run(&items).await {
        Ok(output) => {
            let elapsed = chrono::Utc::now() - started;
            tracing::info!("✅ Completed in {} ms", elapsed.num_milliseconds());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Execution failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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

    Ok(())
}

fn parse_or_exit<T: std::str::FromStr>(raw: &str, what: &str) -> T
where
    T::Err: std::fmt::Display,
{
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("❌ Invalid {} '{}': {}", what, raw, e);
            std::process::exit(1);
        }
    }
}
